//! Dashboard report: trend light plus earnings for one ticker.

use crate::chart::{DEFAULT_CHART_QUARTERS, YoyChart};
use crate::table::EarningsTable;
use chrono::{DateTime, Utc};
use hobart_earnings::EarningsSeries;
use hobart_signals::TrendSignal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Required field not set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// A dashboard report for one ticker.
///
/// Each section stands alone: a failed trend fetch does not hide the
/// earnings, and the reverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Ticker being analyzed.
    pub ticker: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Market trend light.
    pub trend: TrendSignal,

    /// Earnings series, when the source answered.
    pub earnings: Option<EarningsSeries>,

    /// Why the earnings section is missing.
    pub earnings_error: Option<String>,
}

impl DashboardReport {
    /// Earnings table, with a placeholder row if the source failed.
    pub fn table(&self, concept: &str) -> EarningsTable {
        match (&self.earnings, &self.earnings_error) {
            (Some(series), _) => EarningsTable::from_series(series),
            (None, reason) => EarningsTable::unavailable(
                &self.ticker,
                concept,
                reason.as_deref().unwrap_or("no earnings data"),
            ),
        }
    }

    /// Year-over-year chart, if any quarter has a comparison.
    pub fn chart(&self) -> Option<YoyChart> {
        self.earnings
            .as_ref()
            .and_then(|s| YoyChart::from_series(s, DEFAULT_CHART_QUARTERS))
    }

    /// Link to further earnings history.
    pub fn more_earnings_url(&self) -> String {
        format!("https://seekingalpha.com/symbol/{}/earnings", self.ticker)
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the report as text.
    pub fn to_text(&self, concept: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Market trend: {}\n", self.trend.summary()));
        output.push_str(&self.table(concept).to_ascii_table());
        output.push('\n');

        match self.chart() {
            Some(chart) => output.push_str(&chart.render()),
            None => output.push_str("YoY data not available\n"),
        }

        output.push_str(&format!("\nMore earnings: {}\n", self.more_earnings_url()));
        output
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    ticker: Option<String>,
    trend: Option<TrendSignal>,
    earnings: Option<EarningsSeries>,
    earnings_error: Option<String>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticker.
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Set the trend signal.
    pub fn trend(mut self, trend: TrendSignal) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Set the earnings series.
    pub fn earnings(mut self, series: EarningsSeries) -> Self {
        self.earnings = Some(series);
        self.earnings_error = None;
        self
    }

    /// Record why the earnings section is missing.
    pub fn earnings_error(mut self, reason: impl Into<String>) -> Self {
        self.earnings = None;
        self.earnings_error = Some(reason.into());
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<DashboardReport, ReportError> {
        Ok(DashboardReport {
            ticker: self.ticker.ok_or(ReportError::MissingField("ticker"))?,
            timestamp: Utc::now(),
            trend: self
                .trend
                .unwrap_or_else(|| TrendSignal::unavailable("trend not evaluated")),
            earnings: self.earnings,
            earnings_error: self.earnings_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_earnings::{EarningsPipeline, ProviderRecord};
    use hobart_signals::TrendLight;

    fn series() -> EarningsSeries {
        EarningsPipeline::default().run(
            "ACME",
            "EPS",
            vec![
                ProviderRecord::new("2024-03-31", 2.10, "Q1", "10-Q"),
                ProviderRecord::new("2023-03-31", 1.75, "Q1", "10-Q"),
            ],
        )
    }

    #[test]
    fn test_report_builder() {
        let report = ReportBuilder::new()
            .ticker("ACME")
            .trend(TrendSignal::evaluate(&[1.0, 2.0, 3.0]))
            .earnings(series())
            .build()
            .unwrap();

        assert_eq!(report.ticker, "ACME");
        assert_eq!(report.trend.light, TrendLight::Green);
        assert!(report.chart().is_some());
        assert_eq!(
            report.more_earnings_url(),
            "https://seekingalpha.com/symbol/ACME/earnings"
        );
    }

    #[test]
    fn test_report_requires_ticker() {
        let result = ReportBuilder::new().build();
        assert!(matches!(result, Err(ReportError::MissingField("ticker"))));
    }

    #[test]
    fn test_sections_fail_independently() {
        let report = ReportBuilder::new()
            .ticker("ACME")
            .trend(TrendSignal::unavailable("quotes unavailable"))
            .earnings(series())
            .build()
            .unwrap();
        let text = report.to_text("EPS");

        assert!(text.contains("⚪ unknown (quotes unavailable)"));
        assert!(text.contains("+20.00%"));

        let report = ReportBuilder::new()
            .ticker("ACME")
            .trend(TrendSignal::evaluate(&[3.0, 2.0, 1.0]))
            .earnings_error("CIK not found for ticker: ACME")
            .build()
            .unwrap();
        let text = report.to_text("EPS");

        assert!(text.contains("🔴 red"));
        assert!(text.contains("Source unavailable: CIK not found for ticker: ACME"));
        assert!(text.contains("YoY data not available"));
    }

    #[test]
    fn test_report_json() {
        let report = ReportBuilder::new()
            .ticker("ACME")
            .earnings(series())
            .build()
            .unwrap();
        let json = report.to_json().unwrap();

        assert!(json.contains("\"ticker\": \"ACME\""));
        assert!(json.contains("\"light\": \"Unknown\""));
        assert!(json.contains("\"earnings_error\": null"));
    }
}
