//! Activity amounts and the per-day quantity mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AmountError;

/// Amount of one activity for one day, as supplied by the caller.
///
/// Form layers hand over whatever the user typed, so an amount may be a
/// number, raw text, or nothing at all. Only [`Amount::value`] decides
/// whether it is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
    Missing,
}

impl Amount {
    /// Parse into a finite number. Sign is preserved.
    pub fn value(&self) -> Result<f64, AmountError> {
        let v = match self {
            Self::Number(v) => *v,
            Self::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| AmountError::NotNumeric(raw.clone()))?,
            Self::Missing => return Err(AmountError::Missing),
        };
        if v.is_finite() {
            Ok(v)
        } else {
            Err(AmountError::NotFinite(v))
        }
    }

    /// Usable amount: negatives clamp to zero, invalid values count as zero.
    pub fn effective(&self) -> f64 {
        match self.value() {
            Ok(v) if v > 0.0 => v,
            _ => 0.0,
        }
    }
}

impl From<f64> for Amount {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for Amount {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i32> for Amount {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for Amount {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Amount {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

impl From<String> for Amount {
    fn from(raw: String) -> Self {
        Self::Text(raw)
    }
}

impl From<Option<f64>> for Amount {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Self::Missing, Self::Number)
    }
}

/// Raw activity label → amount for one day.
///
/// Ordered so iteration (and therefore diagnostics) is deterministic.
pub type ActivityQuantities = BTreeMap<String, Amount>;

/// Build an [`ActivityQuantities`] from label/amount pairs.
///
/// ```
/// use footprint::quantities;
///
/// let day = quantities([("electricity_kwh", 10.0), ("bus_km", 15.0)]);
/// assert_eq!(day.len(), 2);
/// ```
pub fn quantities<I, K, A>(pairs: I) -> ActivityQuantities
where
    I: IntoIterator<Item = (K, A)>,
    K: Into<String>,
    A: Into<Amount>,
{
    pairs
        .into_iter()
        .map(|(label, amount)| (label.into(), amount.into()))
        .collect()
}
