//! Bounded LRU cache for remotely generated tips.
//!
//! Keys are built from the *content* of a quantity mapping, not its
//! spelling: labels are normalized, sorted, and paired with their effective
//! amounts, so `{"Bus (km)": 3}` and `{"bus_km": 3.0}` share an entry.

use std::collections::BTreeMap;

use footprint::{normalize_activity, round_to, ActivityQuantities};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;

/// Default number of cached tips.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Cache key: canonical activity summary plus the total in hundredths of a kg.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TipCacheKey {
    activities: String,
    emissions_centi: i64,
}

impl TipCacheKey {
    pub fn new(quantities: &ActivityQuantities, emissions: f64) -> Self {
        Self {
            activities: canonical_summary(quantities),
            emissions_centi: (round_to(emissions, 2) * 100.0).round() as i64,
        }
    }

    /// `key=value` pairs sorted by canonical key, as embedded in the prompt.
    pub fn activities(&self) -> &str {
        &self.activities
    }

    /// Emissions total the key was built for, rounded to 2 decimals.
    pub fn emissions(&self) -> f64 {
        self.emissions_centi as f64 / 100.0
    }
}

/// Order-independent `key=value,key=value` rendering of a quantity mapping.
///
/// Labels that normalize to the same key are summed.
pub fn canonical_summary(quantities: &ActivityQuantities) -> String {
    let mut merged: BTreeMap<String, f64> = BTreeMap::new();
    for (label, amount) in quantities {
        *merged.entry(normalize_activity(label)).or_insert(0.0) += amount.effective();
    }

    merged
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Thread-safe LRU map from [`TipCacheKey`] to tip text.
///
/// Entries are never overwritten: a second insert for a key that is still
/// cached keeps the first text. A capacity of 0 disables caching.
pub struct TipCache {
    capacity: usize,
    inner: Option<Cache<TipCacheKey, String>>,
}

impl TipCache {
    pub fn new(capacity: usize) -> Self {
        let inner = (capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(capacity as u64)
                .eviction_policy(EvictionPolicy::lru())
                .build()
        });
        Self { capacity, inner }
    }

    /// Cached text for `key`, marking it most recently used.
    pub fn get(&self, key: &TipCacheKey) -> Option<String> {
        self.inner.as_ref()?.get(key)
    }

    /// Store `tip` under `key`, evicting the least recently used entry when
    /// full. Returns `false` if the key was already cached.
    pub fn insert(&self, key: TipCacheKey, tip: String) -> bool {
        match &self.inner {
            Some(cache) => cache.entry(key).or_insert(tip).is_fresh(),
            None => false,
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
            cache.run_pending_tasks();
        }
    }

    /// Number of live entries, after pending evictions are applied.
    pub fn len(&self) -> usize {
        match &self.inner {
            Some(cache) => {
                cache.run_pending_tasks();
                cache.entry_count() as usize
            }
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for TipCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl Default for TipCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
