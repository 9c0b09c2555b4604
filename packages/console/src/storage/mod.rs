//! Key-value stores the console reads and writes.
//!
//! The [`CacheStore`] holds serialised documentation (trees and path details)
//! with a time-to-live. The [`CounterStore`] holds the gateway's daily
//! invocation counters, one JSON blob per day (or per day and service).
//! Both are advisory: the console treats any failure reading them as "not
//! present" and recomputes or zero-fills.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryStorage`] | Tests, single-process consoles |
//! | [`SqliteStorage`] | Durable single-file store shared across restarts |
//!
//! [`MemoryStorage`]: memory::MemoryStorage
//! [`SqliteStorage`]: sqlite::SqliteStorage

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors that store operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An unexpected error in the underlying backend.
    #[error("internal storage error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Cache key of the controller sub-tree of one service version.
pub fn tree_cache_key(service: &str, version: &str) -> String {
    format!("api-tree-doc:{service}:{version}")
}

/// Cache key of one endpoint's detail.
pub fn path_detail_cache_key(
    route: &str,
    version: &str,
    controller: &str,
    operation_id: &str,
) -> String {
    format!("path-detail:{route}:{version}:{controller}:{operation_id}")
}

/// Counter key of one service's per-API counts on `date`.
pub fn service_counter_key(date: &str, service: &str) -> String {
    format!("{date}:{service}")
}

/// The instant an entry written at `now` with a TTL of `ttl_days` expires.
///
/// Fails instead of overflowing when the TTL reaches past the representable
/// date range.
pub fn expiry_after(now: DateTime<Utc>, ttl_days: u32) -> Result<DateTime<Utc>, StorageError> {
    TimeDelta::try_days(i64::from(ttl_days))
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| StorageError::Internal(format!("cache ttl of {ttl_days} days is out of range")))
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Expiring string cache.
///
/// Implementations must tolerate concurrent readers and writers; the last
/// write to a key wins.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// `true` if `key` holds an unexpired value.
    async fn has_key(&self, key: &str) -> Result<bool, StorageError>;

    /// The unexpired value at `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` at `key` for `ttl_days` days, replacing any earlier value.
    async fn set(&self, key: &str, value: &str, ttl_days: u32) -> Result<(), StorageError>;
}

/// Read side of the gateway's daily invocation counters.
///
/// Blobs are returned undecoded; they are expected to be JSON objects
/// mapping counter names to counts.
#[async_trait]
pub trait CounterStore: Send + Sync + 'static {
    /// Per-service counts for `date` (`YYYY-MM-DD`).
    async fn daily_counts(&self, date: &str) -> Result<Option<String>, StorageError>;

    /// Per-API counts of `service` for `date`.
    async fn service_daily_counts(
        &self,
        date: &str,
        service: &str,
    ) -> Result<Option<String>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_rejects_out_of_range_ttl() {
        let now = Utc::now();
        assert_eq!(expiry_after(now, 10).unwrap(), now + TimeDelta::days(10));
        assert!(expiry_after(now, u32::MAX).is_err());
    }
}
