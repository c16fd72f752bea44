//! Fact ingestion: filter provider records to periodic reports and parse them.

use crate::record::{FactRecord, FilingType, FiscalPeriod, RawFact};

/// Counters describing one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Records offered by the provider
    pub seen: usize,
    /// Records that passed the period filter and parsed
    pub retained: usize,
    /// Records rejected by the period filter
    pub filtered: usize,
    /// Records dropped because their marker, date or value failed to parse
    pub unparseable: usize,
}

/// Turns provider records into [`RawFact`]s.
///
/// A record is kept if and only if it is a quarter (`Q*`) reported on a
/// quarterly filing, or a full fiscal year (`FY`) reported on an annual
/// filing. Amendments count as their base filing type.
///
/// A kept record whose marker names no usable quarter (`"Q"`, `"Q5"`) is
/// counted as unparseable and dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactIngestor;

impl FactIngestor {
    /// Create a new ingestor.
    pub const fn new() -> Self {
        Self
    }

    /// Whether a marker/filing pair is a periodic report worth keeping.
    pub fn is_relevant(marker: Option<&str>, filing_type: &FilingType) -> bool {
        match marker {
            Some(m) if m.starts_with('Q') => filing_type.is_quarterly(),
            Some("FY") => filing_type.is_annual(),
            _ => false,
        }
    }

    /// Ingest records, returning the retained facts in input order.
    ///
    /// An empty result means "no data available" and is not an error.
    pub fn ingest<I, R>(&self, records: I) -> Vec<RawFact>
    where
        I: IntoIterator<Item = R>,
        R: FactRecord,
    {
        self.ingest_with_stats(records).0
    }

    /// Ingest records and report what happened to them.
    pub fn ingest_with_stats<I, R>(&self, records: I) -> (Vec<RawFact>, IngestStats)
    where
        I: IntoIterator<Item = R>,
        R: FactRecord,
    {
        let mut stats = IngestStats::default();
        let mut facts = Vec::new();

        for (sequence, record) in records.into_iter().enumerate() {
            stats.seen += 1;

            let filing_type = FilingType::parse(record.filing_type().unwrap_or_default());
            if !Self::is_relevant(record.fiscal_period_marker(), &filing_type) {
                stats.filtered += 1;
                continue;
            }

            let marker = record.fiscal_period_marker().unwrap_or_default();
            if FiscalPeriod::parse(marker).is_none() {
                stats.unparseable += 1;
                tracing::debug!(
                    period_end = record.period_end(),
                    marker,
                    "dropping record with unusable period marker"
                );
                continue;
            }

            match RawFact::from_record(&record, sequence) {
                Ok(fact) => facts.push(fact),
                Err(e) => {
                    stats.unparseable += 1;
                    tracing::debug!(
                        period_end = record.period_end(),
                        error = %e,
                        "dropping unparseable record"
                    );
                }
            }
        }

        stats.retained = facts.len();
        tracing::debug!(
            seen = stats.seen,
            retained = stats.retained,
            filtered = stats.filtered,
            unparseable = stats.unparseable,
            "ingested provider records"
        );

        (facts, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ProviderRecord;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[case("Q1", "10-Q", true)]
    #[case("Q3", "10-Q/A", true)]
    #[case("FY", "10-K", true)]
    #[case("FY", "10-K/A", true)]
    #[case("Q4", "10-K", false)]
    #[case("FY", "10-Q", false)]
    #[case("Q2", "8-K", false)]
    #[case("H1", "10-Q", false)]
    #[case("fy", "10-K", false)]
    fn test_is_relevant(#[case] marker: &str, #[case] form: &str, #[case] expected: bool) {
        assert_eq!(
            FactIngestor::is_relevant(Some(marker), &FilingType::parse(form)),
            expected
        );
    }

    #[test]
    fn test_missing_marker_is_not_relevant() {
        assert!(!FactIngestor::is_relevant(
            None,
            &FilingType::QuarterlyReport
        ));
    }

    #[test]
    fn test_ingest_filters_and_parses() {
        let records = vec![
            ProviderRecord::new("2024-03-31", 2.10, "Q1", "10-Q"),
            ProviderRecord::new("2023-12-31", 7.00, "FY", "10-K"),
            ProviderRecord::new("2023-12-31", 1.80, "Q4", "8-K"),
            ProviderRecord::new("not-a-date", 1.00, "Q2", "10-Q"),
            ProviderRecord::new("2023-06-30", "garbage", "Q2", "10-Q"),
        ];

        let (facts, stats) = FactIngestor::new().ingest_with_stats(&records);

        assert_eq!(facts.len(), 2);
        assert_eq!(
            stats,
            IngestStats {
                seen: 5,
                retained: 2,
                filtered: 1,
                unparseable: 2,
            }
        );
        assert_eq!(facts[0].fiscal_period, Some(FiscalPeriod::Quarter(1)));
        assert_eq!(facts[0].sequence, 0);
        assert_eq!(facts[1].fiscal_period, Some(FiscalPeriod::FiscalYear));
        assert_eq!(facts[1].sequence, 1);
        assert_eq!(
            facts[1].period_end,
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_ingest_empty() {
        let records: Vec<ProviderRecord> = Vec::new();
        assert!(FactIngestor::new().ingest(records).is_empty());
    }

    #[rstest]
    #[case("Q")]
    #[case("Q5")]
    #[case("Q0")]
    fn test_ingest_drops_unusable_quarter_marker(#[case] marker: &str) {
        let records = vec![
            ProviderRecord::new("2024-05-31", 0.5, marker, "10-Q"),
            ProviderRecord::new("2024-03-31", 2.1, "Q1", "10-Q"),
        ];
        let (facts, stats) = FactIngestor::new().ingest_with_stats(records);

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].fiscal_period, Some(FiscalPeriod::Quarter(1)));
        assert_eq!(stats.unparseable, 1);
        assert_eq!(stats.filtered, 0);
    }

    #[test]
    fn test_ingest_keeps_null_values() {
        let records = vec![ProviderRecord::new("2024-03-31", None::<f64>, "Q1", "10-Q")];
        let facts = FactIngestor::new().ingest(records);

        assert_eq!(facts.len(), 1);
        assert!(facts[0].value.is_none());
    }
}
