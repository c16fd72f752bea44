#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;
pub mod report;
pub mod table;

pub use chart::{DEFAULT_CHART_QUARTERS, YoyChart, sparkline};
pub use export::{EarningsOutcome, ExportError, ExportFormat, Exporter, SeriesRowExport};
pub use report::{DashboardReport, ReportBuilder, ReportError};
pub use table::{EarningsTable, TableRow, TableStatus, format_percent, format_value};
