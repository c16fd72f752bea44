//! Year-over-year change between a quarter and the same quarter a year earlier.

use crate::normalize::{NormalizedQuarter, QuarterKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A normalized quarter with its year-over-year comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoyResult {
    /// The quarter being reported
    pub quarter: NormalizedQuarter,
    /// Same quarter one year earlier, if present
    pub prior: Option<NormalizedQuarter>,
    /// Percentage change, rounded to two decimals
    pub change_percent: Option<f64>,
}

/// Round to a fixed number of decimal places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Percentage change from `prior` to `current`, rounded to two decimals.
///
/// Returns `None` when either value is missing or the prior is zero. A
/// computed change of exactly zero stays `Some(0.0)`.
pub fn yoy_change_percent(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    match (current, prior) {
        (Some(curr), Some(prev)) if prev != 0.0 => {
            let change = round_to((curr - prev) / prev.abs() * 100.0, 2);
            change.is_finite().then_some(change)
        }
        _ => None,
    }
}

/// Computes year-over-year change across a normalized collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct YoyCalculator;

impl YoyCalculator {
    /// Create a new calculator.
    pub const fn new() -> Self {
        Self
    }

    /// Compare each quarter with the same quarter one year earlier.
    ///
    /// Output order matches input order. The input is indexed by
    /// `(year, quarter)`; if a key occurs more than once, its first
    /// occurrence is used as the prior.
    pub fn compute(&self, quarters: &[NormalizedQuarter]) -> Vec<YoyResult> {
        let mut index: HashMap<QuarterKey, &NormalizedQuarter> =
            HashMap::with_capacity(quarters.len());
        for quarter in quarters {
            index.entry(quarter.key()).or_insert(quarter);
        }

        quarters
            .iter()
            .map(|quarter| {
                let prior = index.get(&quarter.key().prior_year()).copied();
                let change_percent = prior.and_then(|p| yoy_change_percent(quarter.value, p.value));

                YoyResult {
                    quarter: quarter.clone(),
                    prior: prior.cloned(),
                    change_percent,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn quarter(year: i32, q: u8, value: Option<f64>) -> NormalizedQuarter {
        let month = u32::from(q) * 3;
        let end = NaiveDate::from_ymd_opt(year, month, 28).unwrap();
        NormalizedQuarter::new(QuarterKey::new(year, q), value, end)
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(20.000000000000004, 2), 20.0);
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-7.125001, 2), -7.13);
    }

    #[test]
    fn test_change_percent_basic() {
        assert_eq!(yoy_change_percent(Some(1.20), Some(1.00)), Some(20.0));
        assert_eq!(yoy_change_percent(Some(2.10), Some(1.75)), Some(20.0));
        assert_eq!(yoy_change_percent(Some(1.00), Some(1.00)), Some(0.0));
        // 0.125% sits exactly between 0.12 and 0.13
        assert_eq!(yoy_change_percent(Some(801.0), Some(800.0)), Some(0.12));
        assert_eq!(yoy_change_percent(Some(400.5), Some(400.0)), Some(0.12));
    }

    #[test]
    fn test_change_percent_negative_prior() {
        // From a loss of -0.50 to a profit of 0.25 is +150%
        assert_eq!(yoy_change_percent(Some(0.25), Some(-0.50)), Some(150.0));
        // Deeper loss is a negative change
        assert_eq!(yoy_change_percent(Some(-1.0), Some(-0.5)), Some(-100.0));
    }

    #[test]
    fn test_change_percent_guards() {
        assert_eq!(yoy_change_percent(Some(1.0), Some(0.0)), None);
        assert_eq!(yoy_change_percent(Some(1.0), None), None);
        assert_eq!(yoy_change_percent(None, Some(1.0)), None);
    }

    #[test]
    fn test_compute_matches_prior_year() {
        let quarters = vec![
            quarter(2024, 1, Some(1.20)),
            quarter(2023, 4, Some(1.50)),
            quarter(2023, 1, Some(1.00)),
        ];
        let results = YoyCalculator::new().compute(&quarters);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].change_percent, Some(20.0));
        assert_eq!(results[0].prior.as_ref().map(|p| p.year), Some(2023));
        assert_eq!(results[1].change_percent, None);
        assert_eq!(results[2].change_percent, None);
    }

    #[test]
    fn test_compute_zero_prior() {
        let quarters = vec![quarter(2024, 2, Some(0.3)), quarter(2023, 2, Some(0.0))];
        let results = YoyCalculator::new().compute(&quarters);

        assert!(results[0].prior.is_some());
        assert_eq!(results[0].change_percent, None);
    }

    #[test]
    fn test_compute_single_year_has_no_changes() {
        let quarters: Vec<_> = (1..=4).rev().map(|q| quarter(2024, q, Some(1.0))).collect();
        let results = YoyCalculator::new().compute(&quarters);
        assert!(results.iter().all(|r| r.change_percent.is_none()));
    }

    #[test]
    fn test_compute_does_not_mutate_input() {
        let quarters = vec![quarter(2025, 3, Some(3.3)), quarter(2024, 3, Some(3.0))];
        let before = quarters.clone();
        let results = YoyCalculator::new().compute(&quarters);

        assert_eq!(quarters, before);
        assert_eq!(results[0].quarter, before[0]);
        assert_relative_eq!(results[0].change_percent.unwrap(), 10.0, epsilon = 1e-9);
    }
}
