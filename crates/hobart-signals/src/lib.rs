#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod ema;
pub mod error;
pub mod trend;

pub use ema::Ema;
pub use error::{Result, SignalError};
pub use trend::{
    DEFAULT_LOOKBACK_DAYS, DEFAULT_SYMBOL, TrendConfig, TrendLight, TrendSignal,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
