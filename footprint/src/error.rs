//! Input diagnostics.
//!
//! None of these ever reach the caller as a failure: the calculator logs them
//! and treats the offending entry as contributing zero. They are public so a
//! stricter caller can run [`crate::inspect`] and reject a request up front.

/// Why an amount could not be used as a number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmountError {
    /// No value was supplied.
    #[error("amount is missing")]
    Missing,

    /// Text that does not parse as a number.
    #[error("amount {0:?} is not numeric")]
    NotNumeric(String),

    /// NaN or infinity.
    #[error("amount {0} is not finite")]
    NotFinite(f64),

    /// Finite, but factor × amount overflows.
    #[error("amount {0} is too large to convert")]
    TooLarge(f64),
}

/// A problem with one entry of an activity quantity mapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputIssue {
    /// The label normalized to a key absent from the factor table.
    #[error("activity '{label}' (key '{key}') not found in factor table")]
    UnknownActivity { label: String, key: String },

    /// The amount is unusable; the entry is skipped.
    #[error("amount for '{label}' is invalid: {source}")]
    InvalidAmount {
        label: String,
        #[source]
        source: AmountError,
    },

    /// The amount is negative; it is treated as zero.
    #[error("negative amount for '{label}' ({value}); treating as 0")]
    NegativeAmount { label: String, value: f64 },
}

impl InputIssue {
    /// Label of the entry this issue refers to.
    pub fn label(&self) -> &str {
        match self {
            Self::UnknownActivity { label, .. }
            | Self::InvalidAmount { label, .. }
            | Self::NegativeAmount { label, .. } => label,
        }
    }
}
