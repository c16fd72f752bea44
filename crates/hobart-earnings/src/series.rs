//! Earnings series: the pipeline output handed to renderers.

use crate::ingest::FactIngestor;
use crate::normalize::{NormalizerConfig, PeriodNormalizer};
use crate::record::FactRecord;
use crate::yoy::{YoyCalculator, YoyResult};
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One rendered row of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    /// Display label, e.g. "Q1 2024"
    pub label: String,
    /// Reported value
    pub value: Option<f64>,
    /// Year-over-year change in percent
    pub yoy_change_percent: Option<f64>,
    /// Calendar year
    pub year: i32,
    /// Quarter number 1-4
    pub quarter: u8,
    /// Period end date
    pub period_end: NaiveDate,
}

impl From<YoyResult> for SeriesRow {
    fn from(result: YoyResult) -> Self {
        Self {
            label: result.quarter.label,
            value: result.quarter.value,
            yoy_change_percent: result.change_percent,
            year: result.quarter.year,
            quarter: result.quarter.quarter_number,
            period_end: result.quarter.period_end,
        }
    }
}

/// What a renderer can say about a series without re-deriving it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStatus {
    /// The source answered but no record was a quarterly or annual report
    #[display("no quarterly filings")]
    NoQualifyingRecords,
    /// Quarters exist but none has a prior-year comparison
    #[display("insufficient history for year-over-year")]
    InsufficientHistory,
    /// At least one quarter has a year-over-year value
    #[display("complete")]
    Complete,
}

/// A point on the year-over-year chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Quarter label
    pub label: String,
    /// Year-over-year change in percent
    pub yoy_change_percent: Option<f64>,
}

/// Canonical quarterly series for one ticker and metric.
///
/// Rows are ordered by period end, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsSeries {
    /// Ticker, for labeling only
    pub ticker: String,
    /// Metric name, e.g. "us-gaap:EarningsPerShareBasic"
    pub concept: String,
    rows: Vec<SeriesRow>,
}

impl EarningsSeries {
    /// Build a series from year-over-year results.
    pub fn new(ticker: impl Into<String>, concept: impl Into<String>, results: Vec<YoyResult>) -> Self {
        Self {
            ticker: ticker.into(),
            concept: concept.into(),
            rows: results.into_iter().map(SeriesRow::from).collect(),
        }
    }

    /// Rows, newest first.
    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    /// Consume the series into its rows.
    pub fn into_rows(self) -> Vec<SeriesRow> {
        self.rows
    }

    /// Rows, oldest first.
    pub fn ascending(&self) -> impl Iterator<Item = &SeriesRow> {
        self.rows.iter().rev()
    }

    /// Number of quarters.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series has no quarters.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any quarter has a year-over-year value.
    pub fn has_yoy(&self) -> bool {
        self.rows.iter().any(|r| r.yoy_change_percent.is_some())
    }

    /// Most recent quarter.
    pub fn latest(&self) -> Option<&SeriesRow> {
        self.rows.first()
    }

    /// Data status of the series.
    pub fn status(&self) -> SeriesStatus {
        if self.is_empty() {
            SeriesStatus::NoQualifyingRecords
        } else if self.has_yoy() {
            SeriesStatus::Complete
        } else {
            SeriesStatus::InsufficientHistory
        }
    }

    /// The `n` most recent quarters, oldest first, for charting.
    pub fn chart_points(&self, n: usize) -> Vec<ChartPoint> {
        self.rows
            .iter()
            .take(n)
            .rev()
            .map(|r| ChartPoint {
                label: r.label.clone(),
                yoy_change_percent: r.yoy_change_percent,
            })
            .collect()
    }
}

/// Ingest, normalize and compare in one call.
#[derive(Debug, Clone, Default)]
pub struct EarningsPipeline {
    ingestor: FactIngestor,
    normalizer: PeriodNormalizer,
    calculator: YoyCalculator,
}

impl EarningsPipeline {
    /// Create a pipeline with the given normalizer configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self {
            ingestor: FactIngestor::new(),
            normalizer: PeriodNormalizer::new(config),
            calculator: YoyCalculator::new(),
        }
    }

    /// Run the full pipeline over provider records.
    ///
    /// Never fails: malformed records are dropped and an empty result is
    /// reported through [`EarningsSeries::status`].
    pub fn run<I, R>(&self, ticker: &str, concept: &str, records: I) -> EarningsSeries
    where
        I: IntoIterator<Item = R>,
        R: FactRecord,
    {
        let (facts, stats) = self.ingestor.ingest_with_stats(records);
        let quarters = self.normalizer.normalize(facts);
        let results = self.calculator.compute(&quarters);
        let series = EarningsSeries::new(ticker, concept, results);

        tracing::info!(
            ticker,
            concept,
            records = stats.seen,
            quarters = series.len(),
            status = %series.status(),
            "built earnings series"
        );

        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ProviderRecord;

    fn run(records: Vec<ProviderRecord>) -> EarningsSeries {
        EarningsPipeline::default().run("TEST", "EPS", records)
    }

    #[test]
    fn test_status_no_qualifying_records() {
        let series = run(vec![ProviderRecord::new("2024-03-31", 1.0, "Q1", "8-K")]);
        assert!(series.is_empty());
        assert_eq!(series.status(), SeriesStatus::NoQualifyingRecords);
        assert!(series.latest().is_none());
    }

    #[test]
    fn test_status_insufficient_history() {
        let series = run(vec![
            ProviderRecord::new("2024-06-30", 1.1, "Q2", "10-Q"),
            ProviderRecord::new("2024-03-31", 1.0, "Q1", "10-Q"),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.status(), SeriesStatus::InsufficientHistory);
        assert!(!series.has_yoy());
    }

    #[test]
    fn test_status_complete() {
        let series = run(vec![
            ProviderRecord::new("2023-03-31", 1.00, "Q1", "10-Q"),
            ProviderRecord::new("2024-03-31", 1.20, "Q1", "10-Q"),
        ]);
        assert_eq!(series.status(), SeriesStatus::Complete);
        assert_eq!(series.latest().unwrap().yoy_change_percent, Some(20.0));
    }

    #[test]
    fn test_chart_points_oldest_first() {
        let records = (2021..=2024)
            .map(|y| ProviderRecord::new(format!("{y}-03-31"), f64::from(y - 2020), "Q1", "10-Q"))
            .collect();
        let series = run(records);

        let points = series.chart_points(3);
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Q1 2022", "Q1 2023", "Q1 2024"]);
        assert_eq!(points[0].yoy_change_percent, Some(100.0));
        assert_eq!(points[2].yoy_change_percent, Some(33.33));
    }

    #[test]
    fn test_ascending_reverses_rows() {
        let series = run(vec![
            ProviderRecord::new("2024-03-31", 1.0, "Q1", "10-Q"),
            ProviderRecord::new("2024-06-30", 1.1, "Q2", "10-Q"),
        ]);
        let labels: Vec<&str> = series.ascending().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Q1 2024", "Q2 2024"]);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SeriesStatus::NoQualifyingRecords.to_string(), "no quarterly filings");
        assert_eq!(SeriesStatus::Complete.to_string(), "complete");
    }
}
