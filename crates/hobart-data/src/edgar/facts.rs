//! XBRL company facts from the SEC JSON API.
//!
//! The SEC publishes every XBRL fact a company has filed at:
//! `https://data.sec.gov/api/xbrl/companyfacts/CIK{cik_padded}.json`
//!
//! Facts are grouped by taxonomy (`us-gaap`, `dei`, ...), then by concept,
//! then by unit. Each entry carries the period, value, fiscal period marker
//! (`fp`) and form type, which is exactly what the earnings pipeline needs.

use crate::error::{DataError, Result};
use hobart_earnings::FactRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Taxonomy assumed when a concept carries no prefix.
pub const DEFAULT_TAXONOMY: &str = "us-gaap";

/// Unit preference when a concept is reported in several units.
const UNIT_PREFERENCE: [&str; 4] = ["USD/shares", "USD", "shares", "pure"];

/// Common US-GAAP concepts for earnings tracking.
pub mod concepts {
    /// Earnings Per Share - Basic
    pub const EPS_BASIC: &str = "us-gaap:EarningsPerShareBasic";

    /// Earnings Per Share - Diluted
    pub const EPS_DILUTED: &str = "us-gaap:EarningsPerShareDiluted";

    /// Total Revenue
    pub const REVENUES: &str = "us-gaap:Revenues";

    /// Revenue from Contract with Customer
    pub const REVENUE_FROM_CONTRACT: &str =
        "us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax";

    /// Net Income (Loss)
    pub const NET_INCOME: &str = "us-gaap:NetIncomeLoss";
}

/// CIK as the SEC sends it: a number in company facts, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum CikValue {
    Number(u64),
    Text(String),
}

impl CikValue {
    fn padded(&self) -> String {
        match self {
            Self::Number(n) => format!("{:0>10}", n),
            Self::Text(s) => format!("{:0>10}", s),
        }
    }
}

/// One reported value for a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactEntry {
    /// End date of the period
    pub end: String,
    /// Start date of the period (absent for instant facts)
    #[serde(default)]
    pub start: Option<String>,
    /// Value
    #[serde(default)]
    pub val: Option<f64>,
    /// Accession number
    #[serde(default)]
    pub accn: Option<String>,
    /// Fiscal year
    #[serde(default)]
    pub fy: Option<i32>,
    /// Fiscal period (Q1..Q4, FY)
    #[serde(default)]
    pub fp: Option<String>,
    /// Form type (10-Q, 10-K, ...)
    #[serde(default)]
    pub form: Option<String>,
    /// Filed date
    #[serde(default)]
    pub filed: Option<String>,
    /// Calendar frame, e.g. "CY2023Q4"
    #[serde(default)]
    pub frame: Option<String>,
}

impl FactRecord for FactEntry {
    fn period_end(&self) -> &str {
        &self.end
    }

    fn value(&self) -> hobart_earnings::Result<Option<f64>> {
        Ok(self.val)
    }

    fn fiscal_period_marker(&self) -> Option<&str> {
        self.fp.as_deref()
    }

    fn filing_type(&self) -> Option<&str> {
        self.form.as_deref()
    }

    fn period_start(&self) -> Option<&str> {
        self.start.as_deref()
    }
}

/// All facts for one concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptFacts {
    /// Label
    #[serde(default)]
    pub label: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Entries keyed by unit (USD, USD/shares, shares, ...)
    #[serde(default)]
    pub units: BTreeMap<String, Vec<FactEntry>>,
}

impl ConceptFacts {
    /// Entries in the preferred unit.
    ///
    /// With none of the preferred units present, falls back to the unit
    /// whose name sorts first, not the first one in the JSON document.
    pub fn preferred_unit(&self) -> Option<(&str, &[FactEntry])> {
        UNIT_PREFERENCE
            .iter()
            .find_map(|unit| self.units.get_key_value(*unit))
            .or_else(|| self.units.iter().next())
            .map(|(unit, entries)| (unit.as_str(), entries.as_slice()))
    }
}

/// Company facts document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFacts {
    cik: CikValue,
    /// Company name
    pub entity_name: String,
    /// Concepts by taxonomy, then concept name
    #[serde(default)]
    pub facts: HashMap<String, HashMap<String, ConceptFacts>>,
}

impl CompanyFacts {
    /// Parse a company facts JSON body.
    pub fn parse_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DataError::Parse(format!("Failed to parse SEC company facts: {}", e)))
    }

    /// CIK, zero-padded to 10 digits.
    pub fn cik(&self) -> String {
        self.cik.padded()
    }

    /// Look up a concept such as `"us-gaap:EarningsPerShareBasic"`.
    ///
    /// A concept without a taxonomy prefix is looked up in `us-gaap`.
    pub fn concept(&self, concept: &str) -> Option<&ConceptFacts> {
        let (taxonomy, name) = concept
            .split_once(':')
            .unwrap_or((DEFAULT_TAXONOMY, concept));
        self.facts.get(taxonomy)?.get(name)
    }

    /// Entries for a concept in its preferred unit.
    pub fn concept_entries(&self, concept: &str) -> Result<&[FactEntry]> {
        self.concept(concept)
            .and_then(ConceptFacts::preferred_unit)
            .map(|(_, entries)| entries)
            .ok_or_else(|| DataError::ConceptNotFound {
                cik: self.cik(),
                concept: concept.to_string(),
            })
    }

    /// Entries for the first concept in `candidates` the company reports.
    ///
    /// Companies switch tags over time (e.g. `Revenues` vs.
    /// `RevenueFromContractWithCustomerExcludingAssessedTax`).
    pub fn first_reported<'a>(&self, candidates: &[&'a str]) -> Result<(&'a str, &[FactEntry])> {
        candidates
            .iter()
            .find_map(|c| self.concept_entries(c).ok().map(|entries| (*c, entries)))
            .ok_or_else(|| DataError::ConceptNotFound {
                cik: self.cik(),
                concept: candidates.join(", "),
            })
    }

    /// All concepts, as `taxonomy:name`, sorted.
    pub fn concepts(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .facts
            .iter()
            .flat_map(|(taxonomy, concepts)| {
                concepts.keys().map(move |name| format!("{}:{}", taxonomy, name))
            })
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SAMPLE: &str = r#"{
        "cik": 320193,
        "entityName": "Apple Inc.",
        "facts": {
            "dei": {
                "EntityCommonStockSharesOutstanding": {
                    "label": "Entity Common Stock, Shares Outstanding",
                    "units": {"shares": [{"end": "2024-10-18", "val": 15116786000, "fy": 2024, "fp": "FY", "form": "10-K"}]}
                }
            },
            "us-gaap": {
                "EarningsPerShareBasic": {
                    "label": "Earnings Per Share, Basic",
                    "description": "Net income per share.",
                    "units": {
                        "USD/shares": [
                            {"start": "2023-10-01", "end": "2023-12-30", "val": 2.19, "accn": "0000320193-24-000006", "fy": 2024, "fp": "Q1", "form": "10-Q", "filed": "2024-02-02", "frame": "CY2023Q4"},
                            {"start": "2022-09-25", "end": "2023-09-30", "val": 6.16, "fy": 2023, "fp": "FY", "form": "10-K", "filed": "2023-11-03"}
                        ]
                    }
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_company_facts() {
        let facts = CompanyFacts::parse_json(SAMPLE).unwrap();

        assert_eq!(facts.entity_name, "Apple Inc.");
        assert_eq!(facts.cik(), "0000320193");
        assert_eq!(
            facts.concepts(),
            vec![
                "dei:EntityCommonStockSharesOutstanding".to_string(),
                "us-gaap:EarningsPerShareBasic".to_string(),
            ]
        );
    }

    #[test]
    fn test_concept_entries() {
        let facts = CompanyFacts::parse_json(SAMPLE).unwrap();
        let entries = facts.concept_entries(concepts::EPS_BASIC).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].val, Some(2.19));
        assert_eq!(entries[0].fiscal_period_marker(), Some("Q1"));
        assert_eq!(entries[0].filing_type(), Some("10-Q"));
        assert_eq!(entries[0].period_start(), Some("2023-10-01"));

        // Unprefixed concepts default to us-gaap
        assert!(facts.concept("EarningsPerShareBasic").is_some());
    }

    #[test]
    fn test_concept_not_found() {
        let facts = CompanyFacts::parse_json(SAMPLE).unwrap();
        let result = facts.concept_entries(concepts::EPS_DILUTED);
        assert!(matches!(result, Err(DataError::ConceptNotFound { .. })));
    }

    #[test]
    fn test_first_reported() {
        let facts = CompanyFacts::parse_json(SAMPLE).unwrap();
        let (concept, entries) = facts
            .first_reported(&[concepts::EPS_DILUTED, concepts::EPS_BASIC])
            .unwrap();

        assert_eq!(concept, concepts::EPS_BASIC);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_preferred_unit_fallback() {
        let mut units = BTreeMap::new();
        units.insert("EUR".to_string(), Vec::new());
        let concept = ConceptFacts {
            label: None,
            description: None,
            units,
        };
        assert_eq!(concept.preferred_unit().map(|(u, _)| u), Some("EUR"));
    }

    #[test]
    fn test_preferred_unit_fallback_is_alphabetical() {
        let json = r#"{"units": {"EUR": [], "CHF": [{"end": "2024-03-31", "val": 1.0}]}}"#;
        let concept: ConceptFacts = serde_json::from_str(json).unwrap();
        let (unit, entries) = concept.preferred_unit().unwrap();
        assert_eq!(unit, "CHF");
        assert_eq!(entries.len(), 1);
    }

    #[rstest]
    #[case("789019", "0000789019")]
    #[case(r#""789019""#, "0000789019")]
    #[case(r#""0000320193""#, "0000320193")]
    fn test_cik_padding(#[case] cik: &str, #[case] expected: &str) {
        let json = format!(r#"{{"cik": {}, "entityName": "X", "facts": {{}}}}"#, cik);
        let facts = CompanyFacts::parse_json(&json).unwrap();
        assert_eq!(facts.cik(), expected);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            CompanyFacts::parse_json("invalid json"),
            Err(DataError::Parse(_))
        ));
    }
}
