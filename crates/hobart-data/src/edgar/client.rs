//! SEC EDGAR API client with rate limiting.

use super::facts::CompanyFacts;
use crate::error::{DataError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// Ticker to CIK mapping (hosted at www.sec.gov, not data.sec.gov)
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent for SEC EDGAR requests (SEC requires identifying information)
pub const DEFAULT_USER_AGENT: &str = "Hobart-Earnings/0.1 (contact@example.com)";

/// Company information from tickers endpoint
/// The SEC returns: {"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyInfo {
    /// CIK as a number (SEC returns this as an integer despite the name)
    pub cik_str: u64,
    /// Ticker symbol
    pub ticker: String,
    /// Company name
    pub title: String,
}

impl CompanyInfo {
    /// CIK, zero-padded to 10 digits.
    pub fn cik(&self) -> String {
        format!("{:0>10}", self.cik_str)
    }
}

/// Settings for [`EdgarClient`].
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    /// User-Agent header; the SEC rejects requests without contact details
    pub user_agent: String,
    /// Minimum duration between requests
    pub min_interval: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// Base URL for the data API
    pub base_url: String,
    /// URL of the ticker to CIK mapping
    pub tickers_url: String,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_interval: DEFAULT_RATE_LIMIT,
            timeout: DEFAULT_TIMEOUT,
            base_url: EDGAR_BASE_URL.to_string(),
            tickers_url: COMPANY_TICKERS_URL.to_string(),
        }
    }
}

impl EdgarConfig {
    /// Default settings with a custom User-Agent.
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }
}

/// Rate limiter to ensure we don't exceed SEC's rate limits
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR API client with rate limiting.
///
/// Cloning is cheap and clones share one rate limiter, so a single client can
/// serve concurrent lookups.
#[derive(Clone)]
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    config: EdgarConfig,
}

impl EdgarClient {
    /// Create a new EDGAR client with default settings (10 req/sec)
    pub fn new() -> Result<Self> {
        Self::with_config(EdgarConfig::default())
    }

    /// Create a new EDGAR client with custom rate limit
    ///
    /// # Example
    /// ```no_run
    /// use hobart_data::edgar::EdgarClient;
    /// use std::time::Duration;
    ///
    /// # async fn example() -> hobart_data::Result<()> {
    /// // 5 requests per second
    /// let client = EdgarClient::with_rate_limit(Duration::from_millis(200))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_rate_limit(min_interval: Duration) -> Result<Self> {
        Self::with_config(EdgarConfig {
            min_interval,
            ..EdgarConfig::default()
        })
    }

    /// Create a new EDGAR client from explicit settings.
    pub fn with_config(config: EdgarConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(config.min_interval))),
            config,
        })
    }

    /// Get the client settings.
    pub const fn config(&self) -> &EdgarConfig {
        &self.config
    }

    /// Rate-limited GET returning the response body.
    async fn get_text(&self, url: &str, what: &str) -> Result<String> {
        self.rate_limiter.lock().await.wait().await;

        tracing::debug!(url, "EDGAR request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "Failed to fetch {}: HTTP {}",
                what,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| DataError::EdgarApi(format!("Failed to read {}: {}", what, e)))
    }

    /// Look up a company from its ticker symbol.
    pub async fn get_company_info(&self, ticker: &str) -> Result<CompanyInfo> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("Empty ticker".to_string()));
        }

        let body = self
            .get_text(&self.config.tickers_url, "company tickers")
            .await?;

        // Parse as a map of index -> CompanyInfo
        let data: HashMap<String, CompanyInfo> = serde_json::from_str(&body)
            .map_err(|e| DataError::EdgarApi(format!("Failed to parse company tickers: {}", e)))?;

        find_ticker(data.into_values(), ticker)
            .ok_or_else(|| DataError::CikNotFound(ticker.to_string()))
    }

    /// Look up a company's CIK number from its ticker symbol
    ///
    /// # Returns
    /// The company's CIK number as a zero-padded 10-digit string
    ///
    /// # Errors
    /// Returns `DataError::CikNotFound` if the ticker is not found
    ///
    /// # Example
    /// ```no_run
    /// use hobart_data::edgar::EdgarClient;
    ///
    /// # async fn example() -> hobart_data::Result<()> {
    /// let client = EdgarClient::new()?;
    /// let cik = client.get_company_cik("AAPL").await?;
    /// println!("Apple CIK: {}", cik);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_company_cik(&self, ticker: &str) -> Result<String> {
        self.get_company_info(ticker).await.map(|info| info.cik())
    }

    /// Fetch the raw company facts JSON body for a CIK.
    pub async fn get_company_facts_json(&self, cik: &str) -> Result<String> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("Empty CIK".to_string()));
        }

        let url = company_facts_url(&self.config.base_url, cik);
        self.get_text(&url, &format!("company facts for CIK {:0>10}", cik))
            .await
    }

    /// Fetch and parse company facts for a CIK.
    ///
    /// # Example
    /// ```no_run
    /// use hobart_data::edgar::{EdgarClient, concepts};
    ///
    /// # async fn example() -> hobart_data::Result<()> {
    /// let client = EdgarClient::new()?;
    /// let cik = client.get_company_cik("AAPL").await?;
    /// let facts = client.get_company_facts(&cik).await?;
    /// let eps = facts.concept_entries(concepts::EPS_BASIC)?;
    /// println!("{} EPS facts", eps.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_company_facts(&self, cik: &str) -> Result<CompanyFacts> {
        let body = self.get_company_facts_json(cik).await?;
        CompanyFacts::parse_json(&body)
    }
}

impl std::fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarClient")
            .field("base_url", &self.config.base_url)
            .field("user_agent", &self.config.user_agent)
            .finish_non_exhaustive()
    }
}

/// Company facts URL for a CIK, padded to 10 digits.
fn company_facts_url(base_url: &str, cik: &str) -> String {
    format!("{}/api/xbrl/companyfacts/CIK{:0>10}.json", base_url, cik)
}

/// Case-insensitive ticker match.
fn find_ticker(companies: impl IntoIterator<Item = CompanyInfo>, ticker: &str) -> Option<CompanyInfo> {
    companies
        .into_iter()
        .find(|company| company.ticker.eq_ignore_ascii_case(ticker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companies() -> Vec<CompanyInfo> {
        let json = r#"{
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
        }"#;
        let map: HashMap<String, CompanyInfo> = serde_json::from_str(json).unwrap();
        map.into_values().collect()
    }

    #[test]
    fn test_find_ticker_case_insensitive() {
        let found = find_ticker(companies(), "aapl").unwrap();
        assert_eq!(found.cik(), "0000320193");
        assert_eq!(found.title, "Apple Inc.");

        assert!(find_ticker(companies(), "NOTAREALTICKER123").is_none());
    }

    #[test]
    fn test_company_facts_url() {
        assert_eq!(
            company_facts_url(EDGAR_BASE_URL, "320193"),
            "https://data.sec.gov/api/xbrl/companyfacts/CIK0000320193.json"
        );
    }

    #[test]
    fn test_config_user_agent() {
        let config = EdgarConfig::with_user_agent("Research desk research@example.org");
        assert_eq!(config.user_agent, "Research desk research@example.org");
        assert_eq!(config.min_interval, DEFAULT_RATE_LIMIT);
    }

    #[tokio::test]
    async fn test_get_company_cik_empty() {
        let client = EdgarClient::new().unwrap();
        let result = client.get_company_cik("  ").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_get_company_facts_empty_cik() {
        let client = EdgarClient::new().unwrap();
        let result = client.get_company_facts("").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_rate_limiter_spacing() {
        let mut limiter = RateLimiter::new(Duration::from_millis(50));
        let start = Instant::now();

        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;

        // First call is immediate, then two full intervals
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_get_company_cik() {
        let client = EdgarClient::new().unwrap();
        let cik = client.get_company_cik("AAPL").await.unwrap();
        assert_eq!(cik, "0000320193");
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_get_company_facts() {
        let client = EdgarClient::new().unwrap();
        let facts = client.get_company_facts("320193").await.unwrap();
        assert!(facts.concept_entries(crate::edgar::concepts::EPS_BASIC).is_ok());
    }
}
