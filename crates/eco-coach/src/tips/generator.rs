//! Tip generator: cache → remote model with retries → local rules.
//!
//! # Flow
//!
//! ```text
//! generate(quantities, emissions)
//!   ├─ no model configured ─────────────────────────────→ local tip
//!   ├─ cache hit ───────────────────────────────────────→ cached tip
//!   └─ cache miss → model.complete (≤ max_attempts)
//!        ├─ Service error → back off, retry
//!        ├─ other error / empty text / retries exhausted → local tip
//!        └─ text → cache insert ────────────────────────→ remote tip
//! every branch → clean_tip(max_sentences)
//! ```
//!
//! `generate` cannot fail and never returns an empty string.

use std::sync::Arc;

use anyhow::Result;
use footprint::ActivityQuantities;
use tracing::{debug, info, warn};

use super::cache::{TipCache, TipCacheKey};
use super::clean::clean_tip;
use super::errors::TipError;
use super::fallback::local_tip;
use super::model::{tip_prompt, OpenAiChatModel, TipModel};
use super::pending::PendingTip;
use super::retry::RetryPolicy;
use crate::config::CoachConfig;

/// Where a tip came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipSource {
    Remote,
    Cache,
    Local,
}

impl std::fmt::Display for TipSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Cache => write!(f, "cache"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// A cleaned tip plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub text: String,
    pub source: TipSource,
}

/// Produces eco tips for a day's activities.
///
/// Owns its cache; share it across tasks behind an `Arc`.
pub struct TipGenerator {
    model: Option<Arc<dyn TipModel>>,
    cache: TipCache,
    retry: RetryPolicy,
    max_sentences: usize,
}

impl TipGenerator {
    /// Build a generator around an explicit model (or none).
    pub fn new(model: Option<Arc<dyn TipModel>>, config: &CoachConfig) -> Self {
        Self {
            model,
            cache: TipCache::new(config.cache_capacity),
            retry: config.retry.clone(),
            max_sentences: config.max_sentences,
        }
    }

    /// Generator that only ever uses the local rules.
    pub fn offline(config: &CoachConfig) -> Self {
        Self::new(None, config)
    }

    /// Build the production generator: an OpenAI-compatible model when a
    /// credential is configured, local rules otherwise.
    pub fn from_config(config: &CoachConfig) -> Result<Self> {
        let model: Option<Arc<dyn TipModel>> = match &config.remote {
            Some(endpoint) => {
                let model = OpenAiChatModel::new(endpoint.clone())?;
                info!(model = %model.model_name(), url = %endpoint.url, "remote tip model configured");
                Some(Arc::new(model))
            }
            None => {
                info!("no API key configured; tips use local rules");
                None
            }
        };
        Ok(Self::new(model, config))
    }

    /// Whether a remote model is configured.
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn cache(&self) -> &TipCache {
        &self.cache
    }

    /// Drop all cached tips.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Generate a tip for `quantities` with total `emissions` (kg CO₂e).
    pub async fn generate(&self, quantities: &ActivityQuantities, emissions: f64) -> String {
        self.generate_tip(quantities, emissions).await.text
    }

    /// Like [`generate`](Self::generate), also reporting where the text came from.
    pub async fn generate_tip(&self, quantities: &ActivityQuantities, emissions: f64) -> Tip {
        let emissions = sanitize_emissions(emissions);

        let Some(model) = &self.model else {
            debug!("no remote model; using local tip");
            return self.local(quantities, emissions);
        };

        let key = TipCacheKey::new(quantities, emissions);
        if let Some(hit) = self.cache.get(&key) {
            debug!(activities = %key.activities(), "tip cache hit");
            return self.finish(&hit, TipSource::Cache);
        }
        debug!(activities = %key.activities(), "tip cache miss");

        let prompt = tip_prompt(key.activities(), key.emissions());
        match self.request(model.as_ref(), &prompt).await {
            Ok(text) => {
                let tip = self.finish(&text, TipSource::Remote);
                self.cache.insert(key, text);
                tip
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "remote tip unavailable; using local tip");
                self.local(quantities, emissions)
            }
        }
    }

    /// Dispatch generation onto the runtime and return a handle the caller
    /// can poll, await, or cancel. Must be called within a tokio runtime.
    pub fn spawn(self: &Arc<Self>, quantities: ActivityQuantities, emissions: f64) -> PendingTip {
        let fallback = clean_tip(
            &local_tip(&quantities, sanitize_emissions(emissions)),
            self.max_sentences,
        );
        let generator = Arc::clone(self);
        let handle =
            tokio::spawn(async move { generator.generate(&quantities, emissions).await });
        PendingTip::new(handle, fallback)
    }

    /// Call the model with bounded retries. Returns trimmed text with at
    /// least one word in it.
    async fn request(&self, model: &dyn TipModel, prompt: &str) -> Result<String, TipError> {
        let attempts = self.retry.attempts();
        let mut last_error = None;

        for attempt in 0..attempts {
            match model.complete(prompt).await {
                Ok(text) => {
                    let text = text.trim();
                    if !has_words(text) {
                        return Err(TipError::EmptyResponse);
                    }
                    return Ok(text.to_string());
                }
                Err(err) if err.is_retryable() => {
                    if self.retry.has_next(attempt) {
                        let delay = self.retry.backoff(attempt);
                        warn!(
                            attempt = attempt + 1,
                            attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "remote tip attempt failed; retrying"
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        warn!(attempt = attempt + 1, attempts, error = %err, "remote tip attempt failed");
                    }
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(TipError::Exhausted {
            attempts,
            last: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    fn local(&self, quantities: &ActivityQuantities, emissions: f64) -> Tip {
        self.finish(&local_tip(quantities, emissions), TipSource::Local)
    }

    fn finish(&self, text: &str, source: TipSource) -> Tip {
        Tip {
            text: clean_tip(text, self.max_sentences),
            source,
        }
    }
}

impl std::fmt::Debug for TipGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipGenerator")
            .field("has_model", &self.has_model())
            .field("cache_len", &self.cache.len())
            .field("retry", &self.retry)
            .field("max_sentences", &self.max_sentences)
            .finish()
    }
}

/// Blank or punctuation-only replies carry no tip.
fn has_words(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

/// Negative or non-finite totals are treated as zero.
fn sanitize_emissions(emissions: f64) -> f64 {
    if emissions.is_finite() && emissions > 0.0 {
        emissions
    } else {
        0.0
    }
}
