//! Location and lifecycle of the SQLite cache.

use hobart_data::DataError;
use hobart_data::cache::SqliteCache;
use std::path::PathBuf;

/// Environment variable overriding the cache directory.
pub(crate) const CACHE_DIR_ENV: &str = "HOBART_CACHE_DIR";

/// Get the default cache directory path.
///
/// Uses platform-specific cache directories:
/// - Linux: `~/.cache/hobart/`
/// - macOS: `~/Library/Caches/hobart/`
/// - Windows: `%LOCALAPPDATA%\hobart\`
pub(crate) fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hobart")
}

/// Get the configured cache path.
pub(crate) fn get_cache_path() -> PathBuf {
    cache_path_from(std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from))
}

fn cache_path_from(dir: Option<PathBuf>) -> PathBuf {
    dir.filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(default_cache_dir)
        .join("hobart.db")
}

/// Open the cache, creating the directory if needed.
pub(crate) fn open_cache() -> Result<SqliteCache, DataError> {
    let cache_path = get_cache_path();

    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!(path = %cache_path.display(), "opening cache");
    SqliteCache::new(&cache_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_path_override() {
        let path = cache_path_from(Some(PathBuf::from("/tmp/hobart-test")));
        assert_eq!(path, PathBuf::from("/tmp/hobart-test/hobart.db"));
    }

    #[test]
    fn test_empty_override_uses_default() {
        let path = cache_path_from(Some(PathBuf::new()));
        assert_eq!(path, default_cache_dir().join("hobart.db"));
        assert!(path.ends_with("hobart/hobart.db"));
    }
}
