//! In-memory storage implementation.
//!
//! All data is held in RAM behind a [`RwLock`] and is lost when the process
//! exits. Cache entries carry an absolute expiry instant and are treated as
//! absent once it has passed; expired entries are dropped on the next write.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{expiry_after, service_counter_key, CacheStore, CounterStore, StorageError};

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Default)]
struct Inner {
    cache: HashMap<String, CacheEntry>,
    /// Counter key (`date` or `date:service`) → raw JSON blob.
    counters: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Thread-safe, in-memory implementation of [`CacheStore`] and [`CounterStore`].
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the raw counter blob for `date`.
    pub fn put_daily_counts(&self, date: &str, blob: &str) -> Result<(), StorageError> {
        self.write()?.counters.insert(date.to_string(), blob.to_string());
        Ok(())
    }

    /// Store the raw per-API counter blob of `service` for `date`.
    pub fn put_service_daily_counts(
        &self,
        date: &str,
        service: &str,
        blob: &str,
    ) -> Result<(), StorageError> {
        self.write()?
            .counters
            .insert(service_counter_key(date, service), blob.to_string());
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StorageError> {
        self.inner
            .read()
            .map_err(|_| StorageError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StorageError> {
        self.inner
            .write()
            .map_err(|_| StorageError::Internal("memory store lock poisoned".into()))
    }
}

// ---------------------------------------------------------------------------
// Store impls
// ---------------------------------------------------------------------------

#[async_trait]
impl CacheStore for MemoryStorage {
    async fn has_key(&self, key: &str) -> Result<bool, StorageError> {
        let now = Utc::now();
        Ok(self.read()?.cache.get(key).is_some_and(|e| e.is_live(now)))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let now = Utc::now();
        Ok(self
            .read()?
            .cache
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_days: u32) -> Result<(), StorageError> {
        let now = Utc::now();
        let expires_at = expiry_after(now, ttl_days)?;
        let mut inner = self.write()?;
        inner.cache.retain(|_, e| e.is_live(now));
        inner.cache.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl CounterStore for MemoryStorage {
    async fn daily_counts(&self, date: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read()?.counters.get(date).cloned())
    }

    async fn service_daily_counts(
        &self,
        date: &str,
        service: &str,
    ) -> Result<Option<String>, StorageError> {
        Ok(self
            .read()?
            .counters
            .get(&service_counter_key(date, service))
            .cloned())
    }
}
