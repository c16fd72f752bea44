//! Error types for the earnings pipeline.

use thiserror::Error;

/// Result type for earnings operations.
pub type Result<T> = std::result::Result<T, EarningsError>;

/// Errors that can occur while building an earnings series.
///
/// Only [`EarningsError::SourceUnavailable`] ever reaches callers of the
/// pipeline. The record-level variants are produced while ingesting a single
/// record and are recovered by dropping that record.
#[derive(Debug, Error)]
pub enum EarningsError {
    /// The upstream fetch failed entirely.
    #[error("Source unavailable for {ticker}: {reason}")]
    SourceUnavailable {
        /// Ticker that was requested
        ticker: String,
        /// Human-readable reason, suitable for display
        reason: String,
    },

    /// Period end date is not an ISO-8601 calendar date
    #[error("Invalid period end date: {0}")]
    InvalidDate(String),

    /// Reported value is not numeric
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl EarningsError {
    /// Build a [`EarningsError::SourceUnavailable`] from any displayable cause.
    pub fn source_unavailable(ticker: &str, reason: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable {
            ticker: ticker.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The display reason of a source failure, if this is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::SourceUnavailable { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
