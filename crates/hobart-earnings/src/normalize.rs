//! Period normalization: map facts onto canonical fiscal quarters.
//!
//! Each fact gets a `(year, quarter)` key. The year is the calendar year of
//! the period end; the quarter comes from the reported fiscal marker, with an
//! annual filing counting as Q4. Facts are then ordered newest first and only
//! the first fact per key survives.
//!
//! Several facts often share a period end: an original 10-Q and its 10-Q/A,
//! or a three-month and a year-to-date figure from the same filing. The order
//! among them is fixed by:
//!
//! 1. original filings before amendments,
//! 2. shorter reported durations before longer ones,
//! 3. ingestion order.

use crate::ingest::FactIngestor;
use crate::record::{FactRecord, FilingType, FiscalPeriod, RawFact, calendar_quarter};
use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Canonical identity of a fiscal quarter.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[display("Q{quarter} {year}")]
pub struct QuarterKey {
    /// Calendar year of the period end
    pub year: i32,
    /// Quarter number 1-4
    pub quarter: u8,
}

impl QuarterKey {
    /// Create a new key.
    pub const fn new(year: i32, quarter: u8) -> Self {
        Self { year, quarter }
    }

    /// Same quarter, one year earlier.
    pub const fn prior_year(&self) -> Self {
        Self::new(self.year - 1, self.quarter)
    }
}

/// How the quarter number of a fact is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuarterDerivation {
    /// Use the reported fiscal marker; fall back to the calendar quarter of
    /// the period end only when no marker is present.
    #[default]
    FiscalMarker,
    /// Always use the calendar quarter of the period end.
    ///
    /// Groups differently from [`QuarterDerivation::FiscalMarker`] for
    /// companies whose fiscal year is not the calendar year.
    CalendarDate,
}

/// Configuration for the period normalizer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Quarter derivation strategy (default: fiscal marker)
    pub derivation: QuarterDerivation,
}

/// One canonical fiscal quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedQuarter {
    /// Calendar year of the period end
    pub year: i32,
    /// Quarter number 1-4
    pub quarter_number: u8,
    /// Display label, e.g. "Q3 2024"
    pub label: String,
    /// Retained value
    pub value: Option<f64>,
    /// Period end of the retained fact
    pub period_end: NaiveDate,
}

impl NormalizedQuarter {
    /// Build a quarter from its key.
    pub fn new(key: QuarterKey, value: Option<f64>, period_end: NaiveDate) -> Self {
        Self {
            year: key.year,
            quarter_number: key.quarter,
            label: key.to_string(),
            value,
            period_end,
        }
    }

    /// Canonical key of this quarter.
    pub const fn key(&self) -> QuarterKey {
        QuarterKey::new(self.year, self.quarter_number)
    }
}

impl From<&NormalizedQuarter> for RawFact {
    fn from(quarter: &NormalizedQuarter) -> Self {
        Self::new(
            quarter.period_end,
            quarter.value,
            Some(FiscalPeriod::Quarter(quarter.quarter_number)),
            FilingType::QuarterlyReport,
        )
    }
}

/// Maps facts to canonical quarters and removes duplicates.
#[derive(Debug, Clone, Default)]
pub struct PeriodNormalizer {
    config: NormalizerConfig,
}

impl PeriodNormalizer {
    /// Create a normalizer with the given configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub const fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Canonical key for one fact.
    pub fn key_for(&self, fact: &RawFact) -> QuarterKey {
        let quarter = match (self.config.derivation, fact.fiscal_period) {
            (QuarterDerivation::FiscalMarker, Some(period)) => period.quarter_number(),
            _ => calendar_quarter(fact.period_end),
        };
        QuarterKey::new(fact.period_end.year(), quarter)
    }

    /// Normalize facts into a newest-first sequence, unique per quarter.
    ///
    /// An empty input yields an empty output; callers treat that as
    /// insufficient data rather than an error.
    pub fn normalize(&self, mut facts: Vec<RawFact>) -> Vec<NormalizedQuarter> {
        facts.sort_by_key(|f| {
            (
                Reverse(f.period_end),
                f.filing_type.precedence(),
                f.duration_days().unwrap_or(i64::MAX),
                f.sequence,
            )
        });

        let mut seen = HashSet::with_capacity(facts.len());
        let mut quarters = Vec::with_capacity(facts.len());

        for fact in &facts {
            let key = self.key_for(fact);
            if seen.insert(key) {
                quarters.push(NormalizedQuarter::new(key, fact.value, fact.period_end));
            } else {
                tracing::trace!(%key, period_end = %fact.period_end, "duplicate filing dropped");
            }
        }

        quarters
    }

    /// Run provider records through [`FactIngestor`], then normalize them.
    pub fn normalize_records<I, R>(&self, records: I) -> Vec<NormalizedQuarter>
    where
        I: IntoIterator<Item = R>,
        R: FactRecord,
    {
        self.normalize(FactIngestor::new().ingest(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fact(end: NaiveDate, value: f64, period: FiscalPeriod, filing: FilingType) -> RawFact {
        RawFact::new(end, Some(value), Some(period), filing)
    }

    #[test]
    fn test_quarter_key_display() {
        assert_eq!(QuarterKey::new(2024, 3).to_string(), "Q3 2024");
        assert_eq!(QuarterKey::new(2024, 3).prior_year(), QuarterKey::new(2023, 3));
    }

    #[test]
    fn test_normalize_empty() {
        assert!(PeriodNormalizer::default().normalize(Vec::new()).is_empty());
    }

    #[test]
    fn test_fiscal_year_becomes_q4() {
        let facts = vec![fact(
            date(2023, 12, 31),
            6.5,
            FiscalPeriod::FiscalYear,
            FilingType::AnnualReport,
        )];
        let quarters = PeriodNormalizer::default().normalize(facts);

        assert_eq!(quarters.len(), 1);
        assert_eq!(quarters[0].quarter_number, 4);
        assert_eq!(quarters[0].label, "Q4 2023");
    }

    #[test]
    fn test_fiscal_marker_beats_calendar() {
        // Fiscal Q1 ending in December (e.g. a September fiscal year-end)
        let facts = vec![fact(
            date(2023, 12, 30),
            2.18,
            FiscalPeriod::Quarter(1),
            FilingType::QuarterlyReport,
        )];

        let fiscal = PeriodNormalizer::default().normalize(facts.clone());
        assert_eq!(fiscal[0].label, "Q1 2023");

        let calendar = PeriodNormalizer::new(NormalizerConfig {
            derivation: QuarterDerivation::CalendarDate,
        })
        .normalize(facts);
        assert_eq!(calendar[0].label, "Q4 2023");
    }

    #[test]
    fn test_calendar_fallback_without_marker() {
        let facts = vec![RawFact::new(
            date(2024, 8, 31),
            Some(0.9),
            None,
            FilingType::QuarterlyReport,
        )];
        let quarters = PeriodNormalizer::default().normalize(facts);
        assert_eq!(quarters[0].label, "Q3 2024");
    }

    #[test]
    fn test_sorted_descending_and_unique() {
        let facts = vec![
            fact(date(2023, 3, 31), 1.0, FiscalPeriod::Quarter(1), FilingType::QuarterlyReport),
            fact(date(2024, 3, 31), 1.2, FiscalPeriod::Quarter(1), FilingType::QuarterlyReport),
            fact(date(2023, 6, 30), 1.1, FiscalPeriod::Quarter(2), FilingType::QuarterlyReport),
            // Prior-year comparative restated in a later filing
            fact(date(2023, 3, 31), 0.9, FiscalPeriod::Quarter(1), FilingType::QuarterlyReport)
                .with_sequence(3),
        ];
        let quarters = PeriodNormalizer::default().normalize(facts);

        let labels: Vec<&str> = quarters.iter().map(|q| q.label.as_str()).collect();
        assert_eq!(labels, vec!["Q1 2024", "Q2 2023", "Q1 2023"]);
        assert_eq!(quarters[2].value, Some(1.0));
    }

    #[test]
    fn test_original_preferred_over_amendment() {
        let facts = vec![
            fact(date(2024, 3, 31), 2.05, FiscalPeriod::Quarter(1), FilingType::QuarterlyAmendment)
                .with_sequence(0),
            fact(date(2024, 3, 31), 2.10, FiscalPeriod::Quarter(1), FilingType::QuarterlyReport)
                .with_sequence(1),
        ];
        let quarters = PeriodNormalizer::default().normalize(facts);

        assert_eq!(quarters.len(), 1);
        assert_eq!(quarters[0].value, Some(2.10));
    }

    #[test]
    fn test_discrete_quarter_preferred_over_year_to_date() {
        let end = date(2024, 6, 30);
        let facts = vec![
            fact(end, 3.1, FiscalPeriod::Quarter(2), FilingType::QuarterlyReport)
                .with_period_start(date(2024, 1, 1))
                .with_sequence(0),
            fact(end, 1.6, FiscalPeriod::Quarter(2), FilingType::QuarterlyReport)
                .with_period_start(date(2024, 4, 1))
                .with_sequence(1),
        ];
        let quarters = PeriodNormalizer::default().normalize(facts);
        assert_eq!(quarters[0].value, Some(1.6));
    }

    #[test]
    fn test_ingestion_order_breaks_remaining_ties() {
        let end = date(2024, 9, 30);
        let facts = vec![
            fact(end, 0.7, FiscalPeriod::Quarter(3), FilingType::QuarterlyReport).with_sequence(4),
            fact(end, 0.8, FiscalPeriod::Quarter(3), FilingType::QuarterlyReport).with_sequence(2),
        ];
        let quarters = PeriodNormalizer::default().normalize(facts);
        assert_eq!(quarters[0].value, Some(0.8));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let facts = vec![
            fact(date(2024, 3, 31), 1.2, FiscalPeriod::Quarter(1), FilingType::QuarterlyReport),
            fact(date(2023, 12, 31), 4.4, FiscalPeriod::FiscalYear, FilingType::AnnualReport),
            fact(date(2023, 9, 30), 1.1, FiscalPeriod::Quarter(3), FilingType::QuarterlyReport),
            fact(date(2023, 9, 30), 1.0, FiscalPeriod::Quarter(3), FilingType::QuarterlyAmendment),
        ];
        let normalizer = PeriodNormalizer::default();
        let once = normalizer.normalize(facts);

        let again = normalizer.normalize(
            once.iter()
                .enumerate()
                .map(|(i, q)| RawFact::from(q).with_sequence(i))
                .collect(),
        );
        assert_eq!(once, again);
    }

    #[test]
    fn test_normalize_records_applies_relevance_filter() {
        use crate::record::ProviderRecord;

        let quarters = PeriodNormalizer::default().normalize_records(vec![
            ProviderRecord::new("2024-03-31", 9.9, "Q1", "8-K"),
            ProviderRecord::new("2023-03-31", 1.5, "Q1", "10-Q"),
            ProviderRecord::new("garbage", 1.0, "Q2", "10-Q"),
        ]);

        assert_eq!(quarters.len(), 1);
        assert_eq!(quarters[0].label, "Q1 2023");
        assert_eq!(quarters[0].value, Some(1.5));
    }
}
