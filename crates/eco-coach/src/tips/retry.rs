//! Retry policy for remote tip requests.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounded attempts with exponential backoff between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, first call included (minimum 1).
    pub max_attempts: u32,
    /// Delay after the first failed attempt, in milliseconds.
    pub base_delay_ms: u64,
    /// Backoff multiplier (2.0 for doubling).
    pub backoff_multiplier: f64,
    /// Upper bound on any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (0-indexed): `base × multiplier^attempt`.
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let delay = self.base_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        (delay as u64).min(self.max_delay_ms)
    }

    /// Backoff as a Duration.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms(attempt))
    }

    /// Whether another attempt follows attempt `attempt` (0-indexed).
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt + 1 < self.attempts()
    }

    /// Effective attempt count.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Sum of every delay the loop can sleep through.
    pub fn worst_case_sleep(&self) -> Duration {
        (0..self.attempts().saturating_sub(1))
            .map(|attempt| self.backoff(attempt))
            .sum()
    }

    /// Single attempt, no sleeping.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

impl Default for RetryPolicy {
    /// Default: 3 attempts, 1s base delay, 2x multiplier, 8s cap.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            backoff_multiplier: 2.0,
            max_delay_ms: 8_000,
        }
    }
}
