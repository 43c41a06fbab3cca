//! Footprint: deterministic CO₂-equivalent estimates for daily activities.
//!
//! This crate provides:
//! - Activity label normalization onto canonical snake-case keys
//! - The fixed emission factor table (kg CO₂e per unit), grouped by category
//! - Totals, per-activity breakdowns and per-category subtotals
//! - Input diagnostics for callers that want stricter validation
//!
//! Everything here is pure: no I/O, no global state beyond the constant
//! factor table, and no failure modes. Invalid input degrades to
//! "contributes zero" plus a `tracing` event.
//!
//! # Usage
//!
//! ```
//! use footprint::{quantities, total_emissions, emissions_breakdown};
//!
//! let day = quantities([("electricity_kwh", 10.0), ("bus_km", 15.0), ("meat_kg", 0.2)]);
//! assert_eq!(total_emissions(&day), 9.53);
//! assert_eq!(emissions_breakdown(&day).len(), 3);
//! ```

pub mod amount;
pub mod calculator;
pub mod error;
pub mod factors;
pub mod normalize;
pub mod report;

pub use amount::{quantities, ActivityQuantities, Amount};
pub use calculator::{category_totals, emissions_breakdown, inspect, round_to, total_emissions};
pub use error::{AmountError, InputIssue};
pub use factors::{factor_for, factors_in, Category, EmissionFactor, FACTORS};
pub use normalize::normalize_activity;
pub use report::{format_emissions, percentage_change, status_message};
