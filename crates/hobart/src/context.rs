//! Per-request context for one ticker.

use crate::source::FactsSource;
use hobart_data::DataError;
use hobart_data::edgar::{CompanyFacts, concepts};
use hobart_earnings::{EarningsError, EarningsPipeline, EarningsSeries, NormalizerConfig};

/// Metric fetched when none is given.
pub const DEFAULT_CONCEPT: &str = concepts::EPS_BASIC;

/// Convert a fetch failure into the pipeline's source error.
pub fn source_unavailable(ticker: &str, error: &DataError) -> EarningsError {
    let reason = match error {
        DataError::CikNotFound(_) => "ticker not found".to_string(),
        DataError::ConceptNotFound { concept, .. } => format!("concept {} not reported", concept),
        other => other.to_string(),
    };
    EarningsError::source_unavailable(ticker, reason)
}

/// Ticker, metric and normalization settings for one request.
///
/// A context holds no shared state, so any number can run concurrently.
#[derive(Debug, Clone)]
pub struct TickerContext {
    ticker: String,
    concept: String,
    normalizer: NormalizerConfig,
}

impl TickerContext {
    /// Context for a ticker with the default metric.
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            concept: DEFAULT_CONCEPT.to_string(),
            normalizer: NormalizerConfig::default(),
        }
    }

    /// Use another metric, e.g. [`concepts::NET_INCOME`].
    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = concept.into();
        self
    }

    /// Use another quarter derivation.
    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Ticker, uppercased.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Metric name.
    pub fn concept(&self) -> &str {
        &self.concept
    }

    /// Run the pipeline over an already fetched document.
    pub fn earnings_from_facts(
        &self,
        facts: &CompanyFacts,
    ) -> Result<EarningsSeries, EarningsError> {
        let entries = facts
            .concept_entries(&self.concept)
            .map_err(|e| source_unavailable(&self.ticker, &e))?;

        Ok(EarningsPipeline::new(self.normalizer).run(&self.ticker, &self.concept, entries))
    }

    /// Fetch company facts and build the earnings series.
    ///
    /// Every fetch failure surfaces as [`EarningsError::SourceUnavailable`].
    pub async fn earnings<S: FactsSource>(
        &self,
        source: &S,
    ) -> Result<EarningsSeries, EarningsError> {
        if self.ticker.is_empty() {
            return Err(EarningsError::source_unavailable(&self.ticker, "empty ticker"));
        }

        let facts = source.company_facts(&self.ticker).await.map_err(|e| {
            tracing::warn!(ticker = %self.ticker, error = %e, "company facts unavailable");
            source_unavailable(&self.ticker, &e)
        })?;

        self.earnings_from_facts(&facts)
    }
}
