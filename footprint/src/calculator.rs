//! Emissions calculator.
//!
//! Pure functions over an [`ActivityQuantities`] mapping. Nothing here fails:
//! unknown activities and unusable amounts contribute zero and are reported
//! through `tracing` (see [`InputIssue`]).

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::amount::{ActivityQuantities, Amount};
use crate::error::{AmountError, InputIssue};
use crate::factors::{factor_for, Category, EmissionFactor};
use crate::normalize::normalize_activity;

/// Round half away from zero to `places` decimals.
///
/// Values too large to scale are already integral and come back unchanged.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Sums of finite contributions can still overflow; clamp to the largest
/// finite value.
fn saturate(kg: f64) -> f64 {
    if kg.is_finite() {
        kg
    } else {
        f64::MAX
    }
}

/// One recognized entry of a quantity mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Contribution {
    factor: &'static EmissionFactor,
    amount: f64,
}

impl Contribution {
    fn kg(&self) -> f64 {
        self.factor.kg_per_unit * self.amount
    }
}

/// Resolve one entry. Issues are pushed to `issues`; `None` means the entry
/// contributes nothing at all.
fn resolve(label: &str, amount: &Amount, issues: &mut Vec<InputIssue>) -> Option<Contribution> {
    let key = normalize_activity(label);
    let Some(factor) = factor_for(&key) else {
        issues.push(InputIssue::UnknownActivity {
            label: label.to_string(),
            key,
        });
        return None;
    };

    let value = match amount.value() {
        Ok(v) => v,
        Err(source) => {
            issues.push(InputIssue::InvalidAmount {
                label: label.to_string(),
                source,
            });
            return None;
        }
    };

    let amount = if value < 0.0 {
        issues.push(InputIssue::NegativeAmount {
            label: label.to_string(),
            value,
        });
        0.0
    } else {
        value
    };

    if !(factor.kg_per_unit * amount).is_finite() {
        issues.push(InputIssue::InvalidAmount {
            label: label.to_string(),
            source: AmountError::TooLarge(amount),
        });
        return None;
    }

    Some(Contribution { factor, amount })
}

fn contributions(quantities: &ActivityQuantities) -> (Vec<Contribution>, Vec<InputIssue>) {
    let mut issues = Vec::new();
    let found = quantities
        .iter()
        .filter_map(|(label, amount)| resolve(label, amount, &mut issues))
        .collect();
    (found, issues)
}

/// Total emissions in kg CO₂e, rounded to 2 decimals.
///
/// Always finite and non-negative. Unknown activities and invalid amounts
/// are skipped with a warning; negative amounts count as zero.
pub fn total_emissions(quantities: &ActivityQuantities) -> f64 {
    let (found, issues) = contributions(quantities);
    for issue in &issues {
        warn!(activity = %issue.label(), "{issue}");
    }

    let total: f64 = found.iter().map(Contribution::kg).sum();
    round_to(saturate(total), 2)
}

/// Per-activity emissions keyed by canonical activity key, rounded to 4
/// decimals.
///
/// Zero contributions and unrecognized activities are omitted entirely.
/// Labels that normalize to the same key accumulate into one entry.
pub fn emissions_breakdown(quantities: &ActivityQuantities) -> BTreeMap<String, f64> {
    let (found, issues) = contributions(quantities);
    for issue in &issues {
        debug!(activity = %issue.label(), "breakdown skipped entry: {issue}");
    }

    let mut raw: BTreeMap<&'static str, f64> = BTreeMap::new();
    for c in &found {
        *raw.entry(c.factor.key).or_insert(0.0) += c.kg();
    }

    raw.into_iter()
        .map(|(key, kg)| (key.to_string(), round_to(saturate(kg), 4)))
        .filter(|(_, kg)| *kg != 0.0)
        .collect()
}

/// Emissions per [`Category`], rounded to 2 decimals. Every category is
/// present, zero included.
pub fn category_totals(quantities: &ActivityQuantities) -> BTreeMap<Category, f64> {
    let (found, _) = contributions(quantities);

    let mut totals: BTreeMap<Category, f64> =
        Category::ALL.iter().map(|c| (*c, 0.0)).collect();
    for c in &found {
        *totals.entry(c.factor.category).or_insert(0.0) += c.kg();
    }

    totals
        .into_iter()
        .map(|(category, kg)| (category, round_to(saturate(kg), 2)))
        .collect()
}

/// Every issue the calculator would silently absorb for this mapping.
///
/// Empty when the input is clean.
pub fn inspect(quantities: &ActivityQuantities) -> Vec<InputIssue> {
    contributions(quantities).1
}
