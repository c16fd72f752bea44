//! Dashboard assembly: market trend and ticker earnings side by side.

use crate::context::TickerContext;
use crate::source::{FactsSource, QuoteSource};
use hobart_earnings::{EarningsError, EarningsSeries};
use hobart_output::{DashboardReport, ReportBuilder, ReportError};
use hobart_signals::{DEFAULT_LOOKBACK_DAYS, DEFAULT_SYMBOL, TrendConfig, TrendSignal};

/// Where the trend light comes from.
#[derive(Debug, Clone)]
pub struct TrendSettings {
    /// Benchmark symbol (default: QQQ)
    pub symbol: String,
    /// Calendar days of history (default: 90)
    pub days: i64,
    /// EMA spans
    pub config: TrendConfig,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            days: DEFAULT_LOOKBACK_DAYS,
            config: TrendConfig::default(),
        }
    }
}

/// Fetch closes and evaluate the trend light.
///
/// A failed fetch gives an unknown light rather than an error.
pub async fn evaluate_trend<Q: QuoteSource>(quotes: &Q, settings: &TrendSettings) -> TrendSignal {
    match quotes.daily_closes(&settings.symbol, settings.days).await {
        Ok(closes) => TrendSignal::evaluate_with(&settings.config, &closes),
        Err(e) => {
            tracing::warn!(symbol = %settings.symbol, error = %e, "trend quotes unavailable");
            TrendSignal::unavailable(format!("quotes for {} unavailable", settings.symbol))
        }
    }
}

/// Both dashboard sections for one ticker.
#[derive(Debug)]
pub struct Dashboard {
    /// Ticker
    pub ticker: String,
    /// Metric name
    pub concept: String,
    /// Market trend
    pub trend: TrendSignal,
    /// Earnings, or why they are missing
    pub earnings: Result<EarningsSeries, EarningsError>,
}

impl Dashboard {
    /// Evaluate the trend, then build the earnings.
    ///
    /// Either section may fail without affecting the other.
    pub async fn assemble<F, Q>(
        ctx: &TickerContext,
        facts: &F,
        quotes: &Q,
        settings: &TrendSettings,
    ) -> Self
    where
        F: FactsSource,
        Q: QuoteSource,
    {
        let trend = evaluate_trend(quotes, settings).await;
        let earnings = ctx.earnings(facts).await;

        Self {
            ticker: ctx.ticker().to_string(),
            concept: ctx.concept().to_string(),
            trend,
            earnings,
        }
    }

    /// Convert into a renderable report.
    pub fn into_report(self) -> Result<DashboardReport, ReportError> {
        let builder = ReportBuilder::new().ticker(self.ticker).trend(self.trend);
        let builder = match self.earnings {
            Ok(series) => builder.earnings(series),
            Err(e) => builder.earnings_error(e.reason().map_or_else(|| e.to_string(), str::to_string)),
        };
        builder.build()
    }
}
