#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod dashboard;
pub mod source;

// Re-export main types from sub-crates
pub use hobart_data as data;
pub use hobart_earnings as earnings;
pub use hobart_output as output;
pub use hobart_signals as signals;

pub use context::{DEFAULT_CONCEPT, TickerContext, source_unavailable};
pub use dashboard::{Dashboard, TrendSettings, evaluate_trend};
pub use source::{EdgarSource, FactsSource, FetchConfig, QuoteSource};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
