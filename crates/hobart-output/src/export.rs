//! Export functionality for earnings series.
//!
//! Series are exported one row per quarter, so several tickers can share a
//! single CSV file.

use chrono::NaiveDate;
use hobart_earnings::{EarningsError, EarningsSeries, SeriesRow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(format!(
                "unsupported file extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

/// One quarter of one series, flattened for CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesRowExport {
    /// Ticker symbol.
    pub ticker: String,

    /// Metric name.
    pub concept: String,

    /// Quarter label, e.g. "Q1 2024".
    pub quarter: String,

    /// Period end date, absent on a placeholder row.
    pub period_end: Option<NaiveDate>,

    /// Reported value.
    pub value: Option<f64>,

    /// Year-over-year change in percent.
    pub yoy_change_percent: Option<f64>,

    /// Why the row carries no data.
    pub note: Option<String>,
}

impl SeriesRowExport {
    /// Flatten one row of a series.
    pub fn new(series: &EarningsSeries, row: &SeriesRow) -> Self {
        Self {
            ticker: series.ticker.clone(),
            concept: series.concept.clone(),
            quarter: row.label.clone(),
            period_end: Some(row.period_end),
            value: row.value,
            yoy_change_percent: row.yoy_change_percent,
            note: None,
        }
    }

    /// A single row standing in for a source that failed.
    pub fn placeholder(ticker: &str, concept: &str, reason: impl Into<String>) -> Self {
        Self {
            ticker: ticker.to_string(),
            concept: concept.to_string(),
            quarter: "-".to_string(),
            period_end: None,
            value: None,
            yoy_change_percent: None,
            note: Some(reason.into()),
        }
    }

    /// Flatten a whole series, newest first.
    pub fn from_series(series: &EarningsSeries) -> Vec<Self> {
        series.rows().iter().map(|row| Self::new(series, row)).collect()
    }
}

/// Exported result for one ticker: its series, or why it is missing.
///
/// In JSON a failure becomes `{"ticker", "concept", "error"}`; in CSV it
/// becomes one placeholder row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EarningsOutcome {
    /// Earnings were produced
    Series(EarningsSeries),
    /// The source failed
    Unavailable {
        /// Ticker symbol
        ticker: String,
        /// Metric name
        concept: String,
        /// Display reason
        error: String,
    },
}

impl EarningsOutcome {
    /// Wrap a pipeline result.
    pub fn from_result(
        ticker: &str,
        concept: &str,
        result: Result<EarningsSeries, EarningsError>,
    ) -> Self {
        match result {
            Ok(series) => Self::Series(series),
            Err(e) => Self::unavailable(ticker, concept, &e),
        }
    }

    /// Record a failed source.
    pub fn unavailable(ticker: &str, concept: &str, error: &EarningsError) -> Self {
        Self::Unavailable {
            ticker: ticker.to_string(),
            concept: concept.to_string(),
            error: error
                .reason()
                .map_or_else(|| error.to_string(), str::to_string),
        }
    }

    /// Whether the source failed.
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Flatten into CSV rows.
    pub fn rows(&self) -> Vec<SeriesRowExport> {
        match self {
            Self::Series(series) => SeriesRowExport::from_series(series),
            Self::Unavailable {
                ticker,
                concept,
                error,
            } => vec![SeriesRowExport::placeholder(ticker, concept, error.as_str())],
        }
    }
}

/// Write records as CSV with a header row.
fn to_csv<'a, T, I>(records: I) -> Result<String, ExportError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for EarningsSeries {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(&SeriesRowExport::from_series(self)),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<EarningsSeries> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let rows: Vec<SeriesRowExport> =
                    self.iter().flat_map(SeriesRowExport::from_series).collect();
                to_csv(&rows)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for EarningsOutcome {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(&self.rows()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<EarningsOutcome> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let rows: Vec<SeriesRowExport> =
                    self.iter().flat_map(EarningsOutcome::rows).collect();
                to_csv(&rows)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
