//! Calculator property tests: invariants checked across a grid of inputs.
//!
//! Tests verify:
//! - Totals are non-negative and equal the clamped factor sum
//! - Totals do not depend on entry order or label spelling
//! - Breakdowns never carry zero or unrecognized entries
//! - Normalization is idempotent
//! - Input problems surface as warnings, never as failures

use std::io::Write;
use std::sync::{Arc, Mutex};

use footprint::{
    emissions_breakdown, factor_for, normalize_activity, quantities, round_to, total_emissions,
    ActivityQuantities, Amount, FACTORS,
};

/// Deterministic amounts covering zero, negatives, fractions and large values.
const AMOUNTS: [f64; 8] = [0.0, -3.0, 0.2, 1.0, 4.75, 15.0, 120.0, 1e4];

/// Build a day that uses every factor with amounts rotated by `seed`.
fn rotated_day(seed: usize) -> Vec<(String, f64)> {
    FACTORS
        .iter()
        .enumerate()
        .map(|(i, f)| (f.key.to_string(), AMOUNTS[(i + seed) % AMOUNTS.len()]))
        .collect()
}

fn expected_total(entries: &[(String, f64)]) -> f64 {
    let sum: f64 = entries
        .iter()
        .filter_map(|(label, amount)| {
            factor_for(&normalize_activity(label)).map(|f| f.kg_per_unit * amount.max(0.0))
        })
        .sum();
    round_to(sum, 2)
}

/// Spell a canonical key the way a form might.
fn decorate(key: &str) -> String {
    let mut label = key.replace('_', " ").to_uppercase();
    label.insert_str(0, "  ");
    label.push(' ');
    label
}

// ── Property: total matches the clamped factor sum ───────────────────

#[test]
fn prop_total_is_clamped_factor_sum() {
    for seed in 0..AMOUNTS.len() {
        let entries = rotated_day(seed);
        let day = quantities(entries.clone());
        let total = total_emissions(&day);

        assert!(total >= 0.0, "seed={seed}: total {total} negative");
        assert!(total.is_finite(), "seed={seed}: total not finite");
        assert!(
            (total - expected_total(&entries)).abs() < 0.011,
            "seed={seed}: total={total}, expected={}",
            expected_total(&entries)
        );
    }
}

// ── Property: label spelling and order do not matter ─────────────────

#[test]
fn prop_total_ignores_label_spelling() {
    for seed in 0..AMOUNTS.len() {
        let canonical = quantities(rotated_day(seed));
        let decorated = quantities(
            rotated_day(seed)
                .into_iter()
                .map(|(k, v)| (decorate(&k), v)),
        );
        // Summation order may differ; only the final rounding can disagree.
        assert!(
            (total_emissions(&canonical) - total_emissions(&decorated)).abs() < 0.011,
            "seed={seed}"
        );
        assert_eq!(
            emissions_breakdown(&canonical),
            emissions_breakdown(&decorated),
            "seed={seed}"
        );
    }
}

#[test]
fn prop_total_is_order_independent() {
    let forward = rotated_day(3);
    let mut reversed = forward.clone();
    reversed.reverse();
    // Prefix labels so the ordered map iterates the reversed sequence.
    let reversed: ActivityQuantities = reversed
        .into_iter()
        .enumerate()
        .map(|(i, (k, v))| (format!("{}{k}", " ".repeat(i)), Amount::from(v)))
        .collect();

    let a = total_emissions(&quantities(forward));
    let b = total_emissions(&reversed);
    assert!((a - b).abs() < 0.011, "forward={a}, reversed={b}");
}

// ── Property: breakdown never holds zero or unknown entries ──────────

#[test]
fn prop_breakdown_has_no_zero_or_unknown_keys() {
    for seed in 0..AMOUNTS.len() {
        let mut entries = rotated_day(seed);
        entries.push(("hoverboard_km".into(), 30.0));
        entries.push(("Mystery (units)".into(), 2.0));
        let breakdown = emissions_breakdown(&quantities(entries));

        for (key, kg) in &breakdown {
            assert!(*kg != 0.0, "seed={seed}: zero entry for {key}");
            assert!(*kg > 0.0, "seed={seed}: negative entry for {key}");
            assert!(factor_for(key).is_some(), "seed={seed}: unknown key {key}");
        }
    }
}

#[test]
fn prop_breakdown_sums_to_total() {
    for seed in 0..AMOUNTS.len() {
        let day = quantities(rotated_day(seed));
        let sum: f64 = emissions_breakdown(&day).values().sum();
        assert!(
            (round_to(sum, 2) - total_emissions(&day)).abs() < 0.011,
            "seed={seed}"
        );
    }
}

// ── Property: normalization is idempotent ────────────────────────────

#[test]
fn prop_normalize_idempotent() {
    let mut labels: Vec<String> = FACTORS.iter().map(|f| decorate(f.key)).collect();
    labels.extend(
        [
            "Electricity (kWh)",
            "Flight short/km",
            "  --  ",
            "((()))",
            "a\\b/c-d e",
            "Ünïcödé Kg",
            "tab\tinside",
        ]
        .map(String::from),
    );

    for label in labels {
        let once = normalize_activity(&label);
        assert_eq!(normalize_activity(&once), once, "label={label:?}");
    }
}

// ── Diagnostics ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_invalid_entries_emit_warnings() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();

    let day = quantities([
        ("UNKNOWN_ACTIVITY", Amount::from(5)),
        ("electricity_kwh", Amount::from("abc")),
        ("meat_kg", Amount::from(-1)),
        ("bus_km", Amount::from(10)),
    ]);
    let total = tracing::subscriber::with_default(subscriber, || total_emissions(&day));

    assert_eq!(total, 1.2);
    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("not found in factor table"), "logs: {logs}");
    assert!(logs.contains("not numeric"), "logs: {logs}");
    assert!(logs.contains("negative amount"), "logs: {logs}");
}
