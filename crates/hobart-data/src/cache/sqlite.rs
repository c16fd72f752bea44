//! SQLite caching layer for SEC data.
//!
//! Company facts documents are stored as raw JSON together with the time they
//! were fetched, so a lookup can decide whether the copy is still fresh.

use crate::error::Result;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Company facts older than this are refetched.
pub const DEFAULT_FACTS_MAX_AGE_HOURS: i64 = 24;

/// Fixed-width UTC timestamp, so stored values compare as strings.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite cache for SEC data.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        // Company CIK mappings
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS company_ciks (
                symbol TEXT PRIMARY KEY,
                cik TEXT NOT NULL,
                company_name TEXT,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        // Company facts documents
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS company_facts (
                cik TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                cached_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Get CIK mapping for a symbol.
    pub fn get_cik(&self, symbol: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row(
                "SELECT cik FROM company_ciks WHERE symbol = ?1",
                params![symbol.to_uppercase()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(result)
    }

    /// Store CIK mapping for a symbol.
    pub fn put_cik(&self, symbol: &str, cik: &str, company_name: Option<&str>) -> Result<()> {
        let updated_at = timestamp(Utc::now());

        self.conn.execute(
            "INSERT OR REPLACE INTO company_ciks (symbol, cik, company_name, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![symbol.to_uppercase(), cik, company_name, updated_at],
        )?;

        Ok(())
    }

    /// Get a cached company facts body if it is younger than `max_age`.
    pub fn get_company_facts(&self, cik: &str, max_age: Duration) -> Result<Option<String>> {
        let cutoff = timestamp(Utc::now() - max_age);

        let result = self
            .conn
            .query_row(
                "SELECT body FROM company_facts WHERE cik = ?1 AND cached_at >= ?2",
                params![cik, cutoff],
                |row| row.get(0),
            )
            .optional()?;

        Ok(result)
    }

    /// Store a company facts body, fetched now.
    pub fn put_company_facts(&self, cik: &str, body: &str) -> Result<()> {
        self.put_company_facts_at(cik, body, Utc::now())
    }

    /// Store a company facts body with an explicit fetch time.
    pub fn put_company_facts_at(
        &self,
        cik: &str,
        body: &str,
        cached_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO company_facts (cik, body, cached_at)
             VALUES (?1, ?2, ?3)",
            params![cik, body, timestamp(cached_at)],
        )?;

        Ok(())
    }

    /// Clear all cached data.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM company_facts", [])?;
        self.conn.execute("DELETE FROM company_ciks", [])?;
        Ok(())
    }

    /// Clear cached data for a specific symbol.
    pub fn clear_symbol(&self, symbol: &str) -> Result<()> {
        if let Some(cik) = self.get_cik(symbol)? {
            self.conn
                .execute("DELETE FROM company_facts WHERE cik = ?1", params![cik])?;
        }
        self.conn.execute(
            "DELETE FROM company_ciks WHERE symbol = ?1",
            params![symbol.to_uppercase()],
        )?;
        Ok(())
    }

    /// Get cache statistics.
    pub fn get_stats(&self) -> Result<CacheStats> {
        let cik_mappings_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM company_ciks", [], |row| row.get(0))?;

        let company_facts_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM company_facts", [], |row| row.get(0))?;

        let facts_bytes: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(body)), 0) FROM company_facts",
            [],
            |row| row.get(0),
        )?;

        Ok(CacheStats {
            cik_mappings: cik_mappings_count as usize,
            company_facts: company_facts_count as usize,
            company_facts_bytes: facts_bytes as usize,
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of CIK mappings
    pub cik_mappings: usize,
    /// Number of company facts documents
    pub company_facts: usize,
    /// Total size of cached company facts bodies
    pub company_facts_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_initialization() {
        let cache = SqliteCache::in_memory();
        assert!(cache.is_ok());
    }

    #[test]
    fn test_cik_operations() {
        let cache = SqliteCache::in_memory().unwrap();

        cache
            .put_cik("AAPL", "0000320193", Some("Apple Inc."))
            .unwrap();

        // Lookups are case-insensitive
        let cik = cache.get_cik("aapl").unwrap();
        assert_eq!(cik, Some("0000320193".to_string()));

        let cik = cache.get_cik("MSFT").unwrap();
        assert_eq!(cik, None);

        // Update CIK
        cache
            .put_cik("AAPL", "0000320193", Some("Apple Inc. Updated"))
            .unwrap();
        assert_eq!(cache.get_stats().unwrap().cik_mappings, 1);
    }

    #[test]
    fn test_company_facts_freshness() {
        let cache = SqliteCache::in_memory().unwrap();
        let max_age = Duration::hours(DEFAULT_FACTS_MAX_AGE_HOURS);

        assert_eq!(cache.get_company_facts("0000320193", max_age).unwrap(), None);

        cache
            .put_company_facts("0000320193", r#"{"cik":320193}"#)
            .unwrap();
        assert_eq!(
            cache.get_company_facts("0000320193", max_age).unwrap(),
            Some(r#"{"cik":320193}"#.to_string())
        );

        // A copy from two days ago is stale
        cache
            .put_company_facts_at("0000320193", "{}", Utc::now() - Duration::days(2))
            .unwrap();
        assert_eq!(cache.get_company_facts("0000320193", max_age).unwrap(), None);
        assert_eq!(
            cache
                .get_company_facts("0000320193", Duration::days(3))
                .unwrap(),
            Some("{}".to_string())
        );
    }

    #[test]
    fn test_cache_stats() {
        let cache = SqliteCache::in_memory().unwrap();

        let stats = cache.get_stats().unwrap();
        assert_eq!(stats.cik_mappings, 0);
        assert_eq!(stats.company_facts, 0);
        assert_eq!(stats.company_facts_bytes, 0);

        cache.put_company_facts("0000320193", "abcd").unwrap();
        let stats = cache.get_stats().unwrap();
        assert_eq!(stats.company_facts, 1);
        assert_eq!(stats.company_facts_bytes, 4);
    }

    #[test]
    fn test_clear_operations() {
        let cache = SqliteCache::in_memory().unwrap();

        cache.put_cik("AAPL", "0000320193", None).unwrap();
        cache.put_cik("MSFT", "0000789019", None).unwrap();
        cache.put_company_facts("0000320193", "{}").unwrap();
        cache.put_company_facts("0000789019", "{}").unwrap();

        cache.clear_symbol("AAPL").unwrap();
        let stats = cache.get_stats().unwrap();
        assert_eq!(stats.cik_mappings, 1);
        assert_eq!(stats.company_facts, 1);
        assert_eq!(cache.get_cik("MSFT").unwrap(), Some("0000789019".to_string()));

        cache.clear_all().unwrap();
        let stats = cache.get_stats().unwrap();
        assert_eq!(stats.cik_mappings, 0);
        assert_eq!(stats.company_facts, 0);
    }
}
