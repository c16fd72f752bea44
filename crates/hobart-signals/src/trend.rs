//! Trend light from a fast/slow EMA crossover.
//!
//! The light compares the latest fast and slow EMA values and the direction
//! each moved since the previous close.

use crate::ema::Ema;
use crate::error::{Result, SignalError};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Benchmark symbol for the market trend.
pub const DEFAULT_SYMBOL: &str = "QQQ";

/// Calendar days of history fetched for the trend (about three months).
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;

/// Trend light state.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendLight {
    /// Fast EMA above slow EMA, both rising
    #[display("green")]
    Green,
    /// Mixed signals
    #[display("yellow")]
    Yellow,
    /// Fast EMA below slow EMA, both falling
    #[display("red")]
    Red,
    /// Not enough data, or the data source failed
    #[display("unknown")]
    Unknown,
}

impl TrendLight {
    /// Colored circle for terminal output.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Green => "🟢",
            Self::Yellow => "🟡",
            Self::Red => "🔴",
            Self::Unknown => "⚪",
        }
    }

    /// Short explanation of the state.
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::Green => "9 EMA > 21 EMA, both rising",
            Self::Yellow => "ambiguous",
            Self::Red => "9 EMA < 21 EMA, both falling",
            Self::Unknown => "trend unavailable",
        }
    }
}

/// Trend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Fast EMA span (default: 9)
    pub fast_span: usize,
    /// Slow EMA span (default: 21)
    pub slow_span: usize,
    /// Minimum closes required for a light (default: 3)
    pub min_observations: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            fast_span: 9,
            slow_span: 21,
            min_observations: 3,
        }
    }
}

impl TrendConfig {
    /// Check spans and minimum observations.
    pub const fn validate(&self) -> Result<()> {
        if self.fast_span == 0 {
            return Err(SignalError::InvalidSpan(self.fast_span));
        }
        if self.fast_span >= self.slow_span {
            return Err(SignalError::SpanOrder {
                fast: self.fast_span,
                slow: self.slow_span,
            });
        }
        if self.min_observations < 2 {
            return Err(SignalError::InvalidMinObservations(self.min_observations));
        }
        Ok(())
    }
}

/// Trend light with the EMA values it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    /// Light state
    pub light: TrendLight,
    /// Latest fast EMA
    pub fast_ema: Option<f64>,
    /// Latest slow EMA
    pub slow_ema: Option<f64>,
    /// Number of closes used
    pub observations: usize,
    /// Reason the light is unknown, if it is
    pub note: Option<String>,
}

impl TrendSignal {
    /// Evaluate the default 9/21 trend on closes, oldest first.
    pub fn evaluate(closes: &[f64]) -> Self {
        Self::evaluate_with(&TrendConfig::default(), closes)
    }

    /// Evaluate a trend with explicit configuration.
    ///
    /// Non-finite closes are ignored. An invalid configuration yields an
    /// unknown light carrying the validation error.
    pub fn evaluate_with(config: &TrendConfig, closes: &[f64]) -> Self {
        if let Err(e) = config.validate() {
            return Self::unavailable(e.to_string());
        }

        let closes: Vec<f64> = closes.iter().copied().filter(|c| c.is_finite()).collect();
        let observations = closes.len();
        if observations < config.min_observations {
            return Self {
                note: Some(format!(
                    "need at least {} closes, got {}",
                    config.min_observations, observations
                )),
                observations,
                ..Self::unavailable_light()
            };
        }

        let (fast, slow) = match (Ema::new(config.fast_span), Ema::new(config.slow_span)) {
            (Ok(fast), Ok(slow)) => (fast.series(&closes), slow.series(&closes)),
            (Err(e), _) | (_, Err(e)) => return Self::unavailable(e.to_string()),
        };

        let n = observations - 1;
        let light = classify(fast[n], slow[n], fast[n - 1], slow[n - 1]);

        tracing::debug!(
            %light,
            fast = fast[n],
            slow = slow[n],
            observations,
            "evaluated trend"
        );

        Self {
            light,
            fast_ema: Some(fast[n]),
            slow_ema: Some(slow[n]),
            observations,
            note: None,
        }
    }

    /// Unknown light for a failed data source.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            note: Some(reason.into()),
            ..Self::unavailable_light()
        }
    }

    const fn unavailable_light() -> Self {
        Self {
            light: TrendLight::Unknown,
            fast_ema: None,
            slow_ema: None,
            observations: 0,
            note: None,
        }
    }

    /// One-line summary, e.g. "🟢 green (9 EMA > 21 EMA, both rising)".
    pub fn summary(&self) -> String {
        match &self.note {
            Some(note) if self.light == TrendLight::Unknown => {
                format!("{} {} ({})", self.light.symbol(), self.light, note)
            }
            _ => format!(
                "{} {} ({})",
                self.light.symbol(),
                self.light,
                self.light.hint()
            ),
        }
    }
}

/// Light from the latest and previous EMA values.
fn classify(fast: f64, slow: f64, prev_fast: f64, prev_slow: f64) -> TrendLight {
    let rising = fast > prev_fast && slow > prev_slow;
    let falling = fast < prev_fast && slow < prev_slow;

    if fast > slow && rising {
        TrendLight::Green
    } else if fast < slow && falling {
        TrendLight::Red
    } else {
        TrendLight::Yellow
    }
}
