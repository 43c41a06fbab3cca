//! Small presentation helpers shared by callers of the calculator.

use crate::calculator::round_to;

/// Format kilograms CO₂e with 2 decimals and the unit.
pub fn format_emissions(kg: f64) -> String {
    format!("{kg:.2} kg CO₂")
}

/// Percent change from `old` to `new`, rounded to 2 decimals.
///
/// Returns 0 when there is no baseline (`old == 0`).
pub fn percentage_change(old: f64, new: f64) -> f64 {
    if old == 0.0 {
        return 0.0;
    }
    round_to((new - old) / old * 100.0, 2)
}

/// One-line status blurb for a daily footprint.
pub fn status_message(kg: f64) -> &'static str {
    if kg > 50.0 {
        "🚨 High footprint today! Try to reduce energy or transport use."
    } else if kg > 20.0 {
        "🌱 Moderate footprint. Small changes can make a big difference!"
    } else {
        "🌍 Low footprint today, great job!"
    }
}
