//! Eco tips: turn a day's activities into one short, actionable suggestion.
//!
//! # Modules
//!
//! - [`generator`]: TipGenerator: cache, remote model with retries, local fallback
//! - [`model`]: TipModel trait and the OpenAI-compatible chat client
//! - [`cache`]: Bounded LRU of remote tips keyed by canonical day summary
//! - [`retry`]: Attempt count and exponential backoff
//! - [`fallback`]: Rules-based tips from the largest emission source
//! - [`clean`]: Sentence capping for display
//! - [`pending`]: Handle for a tip generated on a worker task
//! - [`errors`]: Typed remote failure taxonomy

pub mod cache;
pub mod clean;
pub mod errors;
pub mod fallback;
pub mod generator;
pub mod model;
pub mod pending;
pub mod retry;

pub use cache::{canonical_summary, TipCache, TipCacheKey, DEFAULT_CACHE_CAPACITY};
pub use clean::{clean_tip, DEFAULT_MAX_SENTENCES};
pub use errors::TipError;
pub use fallback::{local_tip, Severity};
pub use generator::{Tip, TipGenerator, TipSource};
pub use model::{tip_prompt, OpenAiChatModel, TipModel, SYSTEM_PROMPT};
pub use pending::PendingTip;
pub use retry::RetryPolicy;
