//! Remote tip generation error taxonomy with retry classification.
//!
//! | Variant       | Retriable | Effect                               |
//! |---------------|-----------|--------------------------------------|
//! | Service       | yes       | back off, retry until attempts run out |
//! | Unexpected    | no        | stop, use the local tip              |
//! | EmptyResponse | no        | stop, use the local tip              |
//! | Exhausted     | no        | terminal, use the local tip          |
//!
//! None of these reach the caller of [`super::TipGenerator::generate`]; they
//! only shape the retry loop and the logs.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TipError {
    /// Rate limit, quota, HTTP error status or transport fault.
    #[error("remote service error: {0}")]
    Service(String),

    /// Anything the retry loop should not try again (malformed body, etc.).
    #[error("unexpected remote error: {0}")]
    Unexpected(String),

    /// The call succeeded but produced no usable text.
    #[error("remote returned an empty tip")]
    EmptyResponse,

    /// Every attempt failed with a retriable error.
    #[error("remote tip failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl TipError {
    /// Whether the retry loop may try again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Service(_) => "service",
            Self::Unexpected(_) => "unexpected",
            Self::EmptyResponse => "empty_response",
            Self::Exhausted { .. } => "exhausted",
        }
    }
}
