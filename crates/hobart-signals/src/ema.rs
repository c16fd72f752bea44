//! Exponential moving average.
//!
//! Uses the adjusted weighting of a span-parameterised EMA:
//!
//! ```text
//! y_t = Σ_{i=0..t} (1-α)^i x_{t-i} / Σ_{i=0..t} (1-α)^i,   α = 2 / (span + 1)
//! ```
//!
//! so early values are not biased toward the first observation.

use crate::error::{Result, SignalError};
use serde::{Deserialize, Serialize};

/// Span-parameterised exponential moving average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ema {
    span: usize,
}

impl Ema {
    /// Create an EMA with the given span.
    pub const fn new(span: usize) -> Result<Self> {
        if span == 0 {
            return Err(SignalError::InvalidSpan(span));
        }
        Ok(Self { span })
    }

    /// Span in periods.
    pub const fn span(&self) -> usize {
        self.span
    }

    /// Smoothing factor α = 2 / (span + 1).
    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }

    /// EMA value at every point of `values`, oldest first.
    pub fn series(&self, values: &[f64]) -> Vec<f64> {
        let decay = 1.0 - self.alpha();
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        values
            .iter()
            .map(|&x| {
                numerator = x + decay * numerator;
                denominator = 1.0 + decay * denominator;
                numerator / denominator
            })
            .collect()
    }

    /// Final EMA value, if any.
    pub fn last(&self, values: &[f64]) -> Option<f64> {
        self.series(values).last().copied()
    }
}
