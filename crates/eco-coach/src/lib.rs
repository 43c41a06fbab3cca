//! Eco Coach: personalized tips for reducing a day's carbon footprint.
//!
//! Emission arithmetic lives in the `footprint` crate; this crate turns a
//! day's activities and total into one short tip:
//! - An OpenAI-compatible chat model behind the [`TipModel`] trait
//! - A bounded LRU cache so identical days cost one remote call
//! - Exponential-backoff retries for transient remote failures
//! - A deterministic rules-based fallback when no remote tip is available
//!
//! [`TipGenerator::generate`] never fails and never returns empty text.
//!
//! # Usage
//!
//! ```bash
//! # Print the factor table
//! eco-coach factors
//!
//! # Estimate a day and get a tip (remote when OPENAI_API_KEY is set)
//! eco-coach estimate electricity_kwh=10 bus_km=15 meat_kg=0.2 --previous 12.4
//! ```

pub mod config;
pub mod tips;

pub use config::{CoachConfig, RemoteEndpoint};
pub use tips::{
    clean_tip, local_tip, OpenAiChatModel, PendingTip, RetryPolicy, Tip, TipCache, TipError,
    TipGenerator, TipModel, TipSource,
};
