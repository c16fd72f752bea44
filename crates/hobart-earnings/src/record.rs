//! Raw financial facts and the record contract providers implement.
//!
//! Providers (XBRL company facts, REST earnings endpoints, parsed HTML tables)
//! expose their rows through [`FactRecord`]. Ingestion turns each qualifying
//! row into a typed [`RawFact`], so nothing downstream touches loosely shaped
//! provider data.

use crate::error::{EarningsError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of filing a fact was reported in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingType {
    /// Original quarterly report (10-Q)
    QuarterlyReport,
    /// Amendment to a quarterly report (10-Q/A)
    QuarterlyAmendment,
    /// Original annual report (10-K, 20-F, 40-F)
    AnnualReport,
    /// Amendment to an annual report (10-K/A, 20-F/A, 40-F/A)
    AnnualAmendment,
    /// Any other filing (8-K, S-1, ...)
    Other(String),
}

impl FilingType {
    /// Parse a provider filing tag.
    ///
    /// Accepts SEC form codes as well as plain-text tags such as
    /// `"quarterly report amendment"`. Matching is case-insensitive.
    pub fn parse(tag: &str) -> Self {
        let trimmed = tag.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "10-q" | "quarterly" | "quarterly report" => Self::QuarterlyReport,
            "10-q/a" | "quarterly amendment" | "quarterly report amendment" => {
                Self::QuarterlyAmendment
            }
            "10-k" | "20-f" | "40-f" | "annual" | "annual report" => Self::AnnualReport,
            "10-k/a" | "20-f/a" | "40-f/a" | "annual amendment" | "annual report amendment" => {
                Self::AnnualAmendment
            }
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Quarterly report or its amendment.
    pub const fn is_quarterly(&self) -> bool {
        matches!(self, Self::QuarterlyReport | Self::QuarterlyAmendment)
    }

    /// Annual report or its amendment.
    pub const fn is_annual(&self) -> bool {
        matches!(self, Self::AnnualReport | Self::AnnualAmendment)
    }

    /// Whether this filing amends an earlier one.
    pub const fn is_amendment(&self) -> bool {
        matches!(self, Self::QuarterlyAmendment | Self::AnnualAmendment)
    }

    /// Sort rank among filings for the same period; originals come first.
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::QuarterlyReport | Self::AnnualReport => 0,
            Self::QuarterlyAmendment | Self::AnnualAmendment => 1,
            Self::Other(_) => 2,
        }
    }
}

/// Fiscal period a fact covers, as reported by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiscalPeriod {
    /// Fiscal quarter 1 through 4
    Quarter(u8),
    /// Full fiscal year
    FiscalYear,
}

impl FiscalPeriod {
    /// Parse a fiscal period marker (`"Q1"`..`"Q4"`, `"FY"`).
    ///
    /// Returns `None` when the marker carries no usable quarter, e.g. `"Q"`
    /// or `"Q5"`.
    pub fn parse(marker: &str) -> Option<Self> {
        let marker = marker.trim();
        if marker == "FY" {
            return Some(Self::FiscalYear);
        }

        let digit = marker.strip_prefix('Q')?.chars().next()?.to_digit(10)?;
        match digit {
            1..=4 => Some(Self::Quarter(digit as u8)),
            _ => None,
        }
    }

    /// Quarter number this period maps to. A full fiscal year counts as Q4.
    pub const fn quarter_number(&self) -> u8 {
        match self {
            Self::Quarter(q) => *q,
            Self::FiscalYear => 4,
        }
    }
}

/// A provider value, either already numeric or still textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    /// Numeric value as delivered by a JSON API
    Number(f64),
    /// Text scraped from a page, e.g. `"$1.23"` or `"(0.45)"`
    Text(String),
    /// No value reported
    Missing,
}

impl RecordValue {
    /// Resolve to a number. Text is parsed with [`parse_metric`].
    pub fn resolve(&self) -> Result<Option<f64>> {
        match self {
            Self::Number(v) => Ok(Some(*v)),
            Self::Text(text) => parse_metric(text),
            Self::Missing => Ok(None),
        }
    }
}

impl From<f64> for RecordValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for RecordValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Contract for one provider row.
///
/// Every source only needs to expose these fields; the pipeline is agnostic
/// to where the row came from.
pub trait FactRecord {
    /// Period end date as reported (ISO-8601 expected).
    fn period_end(&self) -> &str;

    /// Numeric value. An error marks the record unparseable.
    fn value(&self) -> Result<Option<f64>>;

    /// Fiscal period marker, e.g. `"Q3"` or `"FY"`.
    fn fiscal_period_marker(&self) -> Option<&str>;

    /// Filing type tag, e.g. `"10-Q"` or `"quarterly report"`.
    fn filing_type(&self) -> Option<&str>;

    /// Period start date, when the source reports durations.
    fn period_start(&self) -> Option<&str> {
        None
    }
}

impl<T: FactRecord + ?Sized> FactRecord for &T {
    fn period_end(&self) -> &str {
        (**self).period_end()
    }

    fn value(&self) -> Result<Option<f64>> {
        (**self).value()
    }

    fn fiscal_period_marker(&self) -> Option<&str> {
        (**self).fiscal_period_marker()
    }

    fn filing_type(&self) -> Option<&str> {
        (**self).filing_type()
    }

    fn period_start(&self) -> Option<&str> {
        (**self).period_start()
    }
}

/// Owned, provider-neutral record.
///
/// Useful for REST endpoints and scraped tables that have no dedicated type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Period end date string
    pub period_end: String,
    /// Reported value
    #[serde(default = "missing_value")]
    pub value: RecordValue,
    /// Fiscal period marker
    #[serde(default)]
    pub fiscal_period: Option<String>,
    /// Filing type tag
    #[serde(default)]
    pub filing_type: Option<String>,
    /// Period start date string
    #[serde(default)]
    pub period_start: Option<String>,
}

const fn missing_value() -> RecordValue {
    RecordValue::Missing
}

impl ProviderRecord {
    /// Create a record with a marker and filing type.
    pub fn new(
        period_end: impl Into<String>,
        value: impl Into<RecordValue>,
        fiscal_period: impl Into<String>,
        filing_type: impl Into<String>,
    ) -> Self {
        Self {
            period_end: period_end.into(),
            value: value.into(),
            fiscal_period: Some(fiscal_period.into()),
            filing_type: Some(filing_type.into()),
            period_start: None,
        }
    }

    /// Attach a period start date.
    pub fn with_period_start(mut self, start: impl Into<String>) -> Self {
        self.period_start = Some(start.into());
        self
    }
}

impl FactRecord for ProviderRecord {
    fn period_end(&self) -> &str {
        &self.period_end
    }

    fn value(&self) -> Result<Option<f64>> {
        self.value.resolve()
    }

    fn fiscal_period_marker(&self) -> Option<&str> {
        self.fiscal_period.as_deref()
    }

    fn filing_type(&self) -> Option<&str> {
        self.filing_type.as_deref()
    }

    fn period_start(&self) -> Option<&str> {
        self.period_start.as_deref()
    }
}

/// One reported financial data point, typed and validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFact {
    /// Calendar date the reporting period ended
    pub period_end: NaiveDate,
    /// Calendar date the reporting period started, for duration facts
    pub period_start: Option<NaiveDate>,
    /// Reported value
    pub value: Option<f64>,
    /// Fiscal period marker, when the source gave a usable one
    pub fiscal_period: Option<FiscalPeriod>,
    /// Filing the fact came from
    pub filing_type: FilingType,
    /// Position in the provider's input, used as the last tie-break
    pub sequence: usize,
}

impl RawFact {
    /// Create a fact with no start date at sequence 0.
    pub const fn new(
        period_end: NaiveDate,
        value: Option<f64>,
        fiscal_period: Option<FiscalPeriod>,
        filing_type: FilingType,
    ) -> Self {
        Self {
            period_end,
            period_start: None,
            value,
            fiscal_period,
            filing_type,
            sequence: 0,
        }
    }

    /// Parse a provider record.
    ///
    /// Fails on an unparseable end date or value. A malformed start date is
    /// treated as absent since it only refines ordering.
    pub fn from_record<R: FactRecord + ?Sized>(record: &R, sequence: usize) -> Result<Self> {
        let period_end = parse_period_date(record.period_end())?;
        let value = record.value()?;
        let period_start = record
            .period_start()
            .and_then(|s| parse_period_date(s).ok());

        Ok(Self {
            period_end,
            period_start,
            value,
            fiscal_period: record.fiscal_period_marker().and_then(FiscalPeriod::parse),
            filing_type: FilingType::parse(record.filing_type().unwrap_or_default()),
            sequence,
        })
    }

    /// Set the start date.
    pub const fn with_period_start(mut self, start: NaiveDate) -> Self {
        self.period_start = Some(start);
        self
    }

    /// Set the ingestion position.
    pub const fn with_sequence(mut self, sequence: usize) -> Self {
        self.sequence = sequence;
        self
    }

    /// Reported duration in days, if this is a duration fact.
    pub fn duration_days(&self) -> Option<i64> {
        self.period_start
            .map(|start| self.period_end.signed_duration_since(start).num_days())
    }
}

/// Calendar quarter (1-4) of a date.
pub fn calendar_quarter(date: NaiveDate) -> u8 {
    (date.month0() / 3 + 1) as u8
}

/// Parse an ISO-8601 calendar date.
///
/// A datetime such as `2024-03-31T00:00:00` is accepted by its date part.
pub fn parse_period_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| EarningsError::InvalidDate(s.to_string()))
}

/// Parse a scraped metric such as `"$1,234.5"`, `"12.3%"` or `"(0.45)"`.
///
/// Placeholders (`""`, `"-"`, `"N/A"`, `"—"`) parse to `None`. Parentheses
/// denote a negative number.
pub fn parse_metric(text: &str) -> Result<Option<f64>> {
    let trimmed = text.trim();
    if trimmed.is_empty()
        || trimmed == "-"
        || trimmed == "\u{2014}"
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("na")
    {
        return Ok(None);
    }

    let negative = trimmed.starts_with('(') && trimmed.ends_with(')');
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let parsed: f64 = cleaned
        .parse()
        .map_err(|_| EarningsError::InvalidValue(text.to_string()))?;

    Ok(Some(if negative { -parsed.abs() } else { parsed }))
}
