//! Caching layer for SEC lookups.

pub mod sqlite;

pub use sqlite::{CacheStats, DEFAULT_FACTS_MAX_AGE_HOURS, SqliteCache};
