//! Environment-driven configuration for the tip generator.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::tips::{RetryPolicy, DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_SENTENCES};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROGRESS_MS: u64 = 300;

/// OpenAI-compatible chat endpoint.
#[derive(Clone)]
pub struct RemoteEndpoint {
    pub url: String,
    pub api_key: String,
    pub model: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEndpoint")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Top-level coach configuration.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// Remote model (None = local rules only).
    pub remote: Option<RemoteEndpoint>,
    /// Tip cache entries; 0 disables caching.
    pub cache_capacity: usize,
    /// Sentence cap applied to every tip.
    pub max_sentences: usize,
    pub retry: RetryPolicy,
    /// How long a caller waits before showing a progress notice.
    pub progress_threshold: Duration,
}

impl Default for CoachConfig {
    /// Offline defaults; never reads the environment.
    fn default() -> Self {
        Self {
            remote: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_sentences: DEFAULT_MAX_SENTENCES,
            retry: RetryPolicy::default(),
            progress_threshold: Duration::from_millis(DEFAULT_PROGRESS_MS),
        }
    }
}

impl CoachConfig {
    /// Read configuration from process environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OPENAI_API_KEY` | unset (remote disabled) |
    /// | `ECO_COACH_BASE_URL` | `https://api.openai.com/v1` |
    /// | `ECO_COACH_MODEL` | `gpt-4o-mini` |
    /// | `ECO_COACH_TIMEOUT_SECS` | 30 |
    /// | `ECO_COACH_CACHE_CAPACITY` | 128 |
    /// | `ECO_COACH_MAX_SENTENCES` | 2 |
    /// | `ECO_COACH_PROGRESS_MS` | 300 |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unparseable numbers keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            remote: Self::remote_from_lookup(&lookup),
            cache_capacity: parse_or(&lookup, "ECO_COACH_CACHE_CAPACITY", defaults.cache_capacity),
            max_sentences: parse_or(&lookup, "ECO_COACH_MAX_SENTENCES", defaults.max_sentences),
            retry: defaults.retry,
            progress_threshold: Duration::from_millis(parse_or(
                &lookup,
                "ECO_COACH_PROGRESS_MS",
                DEFAULT_PROGRESS_MS,
            )),
        }
    }

    fn remote_from_lookup<F>(lookup: &F) -> Option<RemoteEndpoint>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())?;
        let url = lookup("ECO_COACH_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = lookup("ECO_COACH_MODEL")
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.into());
        let secs = match parse_or(lookup, "ECO_COACH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS) {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        };
        let timeout = Duration::from_secs(secs);
        Some(RemoteEndpoint {
            url,
            api_key,
            model,
            timeout,
        })
    }

    /// Same configuration without a remote model.
    pub fn offline(mut self) -> Self {
        self.remote = None;
        self
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "ignoring unparseable setting");
            default
        }),
        None => default,
    }
}
