//! Activity label normalization.
//!
//! Form labels arrive in whatever shape the presentation layer chose
//! ("Electricity (kWh)", "Flight short/km", "cold-water"). Every lookup in
//! this crate goes through [`normalize_activity`] first so those labels land
//! on the canonical snake-case keys of the factor table.

/// Separators that collapse into a single underscore.
const SEPARATORS: [char; 4] = [' ', '-', '/', '\\'];

/// Normalize an arbitrary label into a canonical activity key.
///
/// Trims, lowercases, drops parentheses, turns spaces, dashes and slashes
/// into underscores, and collapses runs of underscores. Total and
/// idempotent: any string maps to *some* key, and a canonical key maps to
/// itself.
///
/// ```
/// use footprint::normalize_activity;
///
/// assert_eq!(normalize_activity("Electricity (kWh)"), "electricity_kwh");
/// assert_eq!(normalize_activity("Flight short/km"), "flight_short_km");
/// ```
pub fn normalize_activity(label: &str) -> String {
    let lowered = label.trim().to_lowercase();
    let mut key = String::with_capacity(lowered.len());

    for ch in lowered.chars() {
        match ch {
            '(' | ')' => {}
            c if SEPARATORS.contains(&c) || c == '_' => {
                if !key.ends_with('_') {
                    key.push('_');
                }
            }
            c => key.push(c),
        }
    }

    // Whitespace hidden behind a stripped parenthesis would otherwise
    // survive until the next pass.
    key.trim().to_owned()
}
