#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ingest;
pub mod normalize;
pub mod record;
pub mod series;
pub mod yoy;

pub use error::{EarningsError, Result};
pub use ingest::{FactIngestor, IngestStats};
pub use normalize::{
    NormalizedQuarter, NormalizerConfig, PeriodNormalizer, QuarterDerivation, QuarterKey,
};
pub use record::{
    FactRecord, FilingType, FiscalPeriod, ProviderRecord, RawFact, RecordValue, calendar_quarter,
    parse_metric, parse_period_date,
};
pub use series::{ChartPoint, EarningsPipeline, EarningsSeries, SeriesRow, SeriesStatus};
pub use yoy::{YoyCalculator, YoyResult, round_to, yoy_change_percent};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
