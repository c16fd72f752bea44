//! Error types for signal computation.

use thiserror::Error;

/// Result type for signal operations.
pub type Result<T> = std::result::Result<T, SignalError>;

/// Errors that can occur when configuring signals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// EMA span must be at least one period
    #[error("Invalid EMA span: {0} (must be at least 1)")]
    InvalidSpan(usize),

    /// Fast span must be shorter than slow span
    #[error("Fast span {fast} must be shorter than slow span {slow}")]
    SpanOrder {
        /// Fast span
        fast: usize,
        /// Slow span
        slow: usize,
    },

    /// Minimum observations below what a slope needs
    #[error("Invalid minimum observations: {0} (must be at least 2)")]
    InvalidMinObservations(usize),
}
