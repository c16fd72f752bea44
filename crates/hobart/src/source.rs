//! Data sources behind the earnings and trend sections.
//!
//! The traits keep the request context independent of the network, so the
//! pipeline can be driven from canned documents as easily as from EDGAR.

use chrono::Duration;
use hobart_data::cache::{DEFAULT_FACTS_MAX_AGE_HOURS, SqliteCache};
use hobart_data::edgar::{CompanyFacts, EdgarClient};
use hobart_data::yahoo::{YahooQuoteProvider, closes};
use hobart_data::{DataError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Source of SEC company facts by ticker.
pub trait FactsSource {
    /// Fetch all company facts for a ticker.
    fn company_facts(&self, ticker: &str) -> impl Future<Output = Result<CompanyFacts>> + Send;
}

/// Source of daily closing prices.
pub trait QuoteSource {
    /// Daily closes for the last `days` calendar days, oldest first.
    fn daily_closes(&self, symbol: &str, days: i64)
    -> impl Future<Output = Result<Vec<f64>>> + Send;
}

impl QuoteSource for YahooQuoteProvider {
    async fn daily_closes(&self, symbol: &str, days: i64) -> Result<Vec<f64>> {
        let df = self.fetch_recent(symbol, days).await?;
        closes(&df)
    }
}

/// Cache behavior for [`EdgarSource`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whether to use the cache.
    pub use_cache: bool,
    /// Whether to force refresh (ignore cached documents, still store new ones).
    pub force_refresh: bool,
    /// Maximum age of a cached company facts document.
    pub max_age: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
            max_age: Duration::hours(DEFAULT_FACTS_MAX_AGE_HOURS),
        }
    }
}

/// SEC EDGAR company facts, optionally through the SQLite cache.
///
/// Cache failures are logged and otherwise ignored; only the network fetch
/// can fail a lookup.
#[derive(Debug, Clone)]
pub struct EdgarSource {
    client: EdgarClient,
    cache: Option<Arc<Mutex<SqliteCache>>>,
    config: FetchConfig,
}

impl EdgarSource {
    /// Source without a cache.
    pub fn new(client: EdgarClient) -> Self {
        Self {
            client,
            cache: None,
            config: FetchConfig {
                use_cache: false,
                ..FetchConfig::default()
            },
        }
    }

    /// Source reading through a cache.
    pub fn with_cache(client: EdgarClient, cache: SqliteCache, config: FetchConfig) -> Self {
        Self {
            client,
            cache: config.use_cache.then(|| Arc::new(Mutex::new(cache))),
            config,
        }
    }

    /// Get the fetch configuration.
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn resolve_cik(&self, ticker: &str) -> Result<String> {
        if let Some(cache) = &self.cache {
            match cache.lock().await.get_cik(ticker) {
                Ok(Some(cik)) => return Ok(cik),
                Ok(None) => {}
                Err(e) => tracing::warn!(ticker, error = %e, "CIK cache read failed"),
            }
        }

        let info = self.client.get_company_info(ticker).await?;
        let cik = info.cik();

        if let Some(cache) = &self.cache
            && let Err(e) = cache.lock().await.put_cik(ticker, &cik, Some(&info.title))
        {
            tracing::warn!(ticker, error = %e, "failed to cache CIK");
        }

        Ok(cik)
    }

    async fn facts_body(&self, cik: &str) -> Result<String> {
        if let Some(cache) = &self.cache
            && !self.config.force_refresh
        {
            match cache.lock().await.get_company_facts(cik, self.config.max_age) {
                Ok(Some(body)) => {
                    tracing::debug!(cik, "company facts served from cache");
                    return Ok(body);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(cik, error = %e, "company facts cache read failed"),
            }
        }

        let body = self.client.get_company_facts_json(cik).await?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.lock().await.put_company_facts(cik, &body)
        {
            tracing::warn!(cik, error = %e, "failed to cache company facts");
        }

        Ok(body)
    }
}

impl FactsSource for EdgarSource {
    async fn company_facts(&self, ticker: &str) -> Result<CompanyFacts> {
        let cik = self.resolve_cik(ticker).await?;
        tracing::info!(ticker, cik = %cik, "fetching company facts");

        let body = self.facts_body(&cik).await?;
        CompanyFacts::parse_json(&body).map_err(|e| {
            DataError::Parse(format!("company facts for {} (CIK {}): {}", ticker, cik, e))
        })
    }
}
