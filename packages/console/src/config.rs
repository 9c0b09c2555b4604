//! Console configuration, populated from environment variables.

use std::sync::Arc;

use crate::storage::{memory::MemoryStorage, sqlite::SqliteStorage, CacheStore, CounterStore};

/// Days a cached tree or path detail stays valid when not configured.
pub const DEFAULT_CACHE_TTL_DAYS: u32 = 10;

/// Longest configurable cache lifetime, in days.
pub const MAX_CACHE_TTL_DAYS: u32 = 3650;

/// Runtime configuration for the documentation console.
///
/// All fields are populated from environment variables with sensible
/// defaults, so a console can be built with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `APIDOC_DB` | (absent = in-memory) | Path to the SQLite database file |
/// | `APIDOC_CACHE_TTL_DAYS` | `10` | Lifetime of cached documentation, in days (at most 3650) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Path to the SQLite database file.
    /// `None` means use in-memory stores (data is lost on restart).
    pub db_path: Option<String>,

    /// How many days cached documentation stays valid.
    pub cache_ttl_days: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            cache_ttl_days: DEFAULT_CACHE_TTL_DAYS,
        }
    }
}

impl ConsoleConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let cache_ttl_days = match lookup("APIDOC_CACHE_TTL_DAYS") {
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "APIDOC_CACHE_TTL_DAYS is not a day count, using default");
                DEFAULT_CACHE_TTL_DAYS
            }),
            None => DEFAULT_CACHE_TTL_DAYS,
        };
        let cache_ttl_days = if cache_ttl_days > MAX_CACHE_TTL_DAYS {
            tracing::warn!(
                value = cache_ttl_days,
                max = MAX_CACHE_TTL_DAYS,
                "APIDOC_CACHE_TTL_DAYS too large, clamping"
            );
            MAX_CACHE_TTL_DAYS
        } else {
            cache_ttl_days
        };

        Self {
            db_path: lookup("APIDOC_DB"),
            cache_ttl_days,
        }
    }
}

/// The cache and counter stores selected by `config`.
pub struct Stores {
    pub cache: Arc<dyn CacheStore>,
    pub counters: Arc<dyn CounterStore>,
}

/// Open the stores `config` asks for: one SQLite file backing both, or a
/// shared in-memory store.
pub fn open_stores(config: &ConsoleConfig) -> Result<Stores, rusqlite::Error> {
    match &config.db_path {
        Some(path) => {
            tracing::info!("storage: SQLite at {path}");
            let storage = Arc::new(SqliteStorage::open(path)?);
            Ok(Stores {
                cache: Arc::clone(&storage) as Arc<dyn CacheStore>,
                counters: storage,
            })
        }
        None => {
            tracing::info!("storage: in-memory (data will not survive restart)");
            let storage = Arc::new(MemoryStorage::new());
            Ok(Stores {
                cache: Arc::clone(&storage) as Arc<dyn CacheStore>,
                counters: storage,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(ConsoleConfig::from_lookup(lookup(&[])), ConsoleConfig::default());
    }

    #[test]
    fn reads_db_path_and_ttl() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("APIDOC_DB", "/var/lib/apidoc.db"),
            ("APIDOC_CACHE_TTL_DAYS", "3"),
        ]));
        assert_eq!(config.db_path.as_deref(), Some("/var/lib/apidoc.db"));
        assert_eq!(config.cache_ttl_days, 3);
    }

    #[test]
    fn bad_ttl_falls_back_to_default() {
        let config = ConsoleConfig::from_lookup(lookup(&[("APIDOC_CACHE_TTL_DAYS", "ten")]));
        assert_eq!(config.cache_ttl_days, DEFAULT_CACHE_TTL_DAYS);
    }

    #[test]
    fn huge_ttl_is_clamped() {
        let config = ConsoleConfig::from_lookup(lookup(&[("APIDOC_CACHE_TTL_DAYS", "4294967295")]));
        assert_eq!(config.cache_ttl_days, MAX_CACHE_TTL_DAYS);
    }

    #[tokio::test]
    async fn in_memory_stores_share_state() {
        let stores = open_stores(&ConsoleConfig::default()).unwrap();
        stores.cache.set("k", "v", 1).await.unwrap();
        assert!(stores.cache.has_key("k").await.unwrap());
        assert!(stores.counters.daily_counts("2024-03-01").await.unwrap().is_none());
    }
}
