//! SQLite-backed storage implementation.
//!
//! Uses `rusqlite` (with bundled SQLite) wrapped in an `Arc<Mutex<Connection>>`
//! to satisfy the `Send + Sync` requirements. All blocking calls are offloaded
//! to a thread-pool via `tokio::task::spawn_blocking`.
//!
//! # Schema
//!
//! - `cache`: cached documentation keyed by cache key, with a unix-seconds expiry.
//! - `counters`: raw daily counter blobs keyed by `date` or `date:service`.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{expiry_after, service_counter_key, CacheStore, CounterStore, StorageError};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cache (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    expires_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_cache_expires_at ON cache(expires_at);

CREATE TABLE IF NOT EXISTS counters (
    key   TEXT PRIMARY KEY,
    blob  TEXT NOT NULL
);
";

// ---------------------------------------------------------------------------
// SqliteStorage
// ---------------------------------------------------------------------------

/// SQLite-backed implementation of [`CacheStore`] and [`CounterStore`].
///
/// Holds a single database connection protected by a `Mutex`. All operations
/// run inside `spawn_blocking` to avoid blocking the async runtime.
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) the SQLite database at `path` and apply the schema.
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database (data is lost when dropped).
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Store the raw counter blob for `date`.
    pub async fn put_daily_counts(&self, date: &str, blob: &str) -> Result<(), StorageError> {
        self.put_counter(date.to_string(), blob.to_string()).await
    }

    /// Store the raw per-API counter blob of `service` for `date`.
    pub async fn put_service_daily_counts(
        &self,
        date: &str,
        service: &str,
        blob: &str,
    ) -> Result<(), StorageError> {
        self.put_counter(service_counter_key(date, service), blob.to_string())
            .await
    }

    async fn put_counter(&self, key: String, blob: String) -> Result<(), StorageError> {
        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO counters (key, blob) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET blob = excluded.blob",
                params![key, blob],
            )
            .map_err(map_err)?;
            Ok(())
        })
        .await
    }

    async fn get_counter(&self, key: String) -> Result<Option<String>, StorageError> {
        self.blocking(move |conn| {
            conn.query_row(
                "SELECT blob FROM counters WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(map_err)
        })
        .await
    }

    /// Run `f` against the connection on the blocking thread-pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            f(&conn)
        })
        .await
        .map_err(|e| StorageError::Internal(format!("task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// Error conversions
// ---------------------------------------------------------------------------

fn map_err(e: rusqlite::Error) -> StorageError {
    StorageError::Internal(e.to_string())
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, StorageError> {
    conn.lock()
        .map_err(|_| StorageError::Internal("connection lock poisoned".into()))
}

// ---------------------------------------------------------------------------
// Store impls
// ---------------------------------------------------------------------------

#[async_trait]
impl CacheStore for SqliteStorage {
    async fn has_key(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        let now = Utc::now().timestamp();
        self.blocking(move |conn| {
            conn.query_row(
                "SELECT value FROM cache WHERE key = ?1 AND expires_at > ?2",
                params![key, now],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(map_err)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl_days: u32) -> Result<(), StorageError> {
        let (key, value) = (key.to_string(), value.to_string());
        let now = Utc::now();
        let expires_at = expiry_after(now, ttl_days)?.timestamp();
        let now = now.timestamp();
        self.blocking(move |conn| {
            conn.execute("DELETE FROM cache WHERE expires_at <= ?1", params![now])
                .map_err(map_err)?;
            conn.execute(
                "INSERT INTO cache (key, value, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
                params![key, value, expires_at],
            )
            .map_err(map_err)?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl CounterStore for SqliteStorage {
    async fn daily_counts(&self, date: &str) -> Result<Option<String>, StorageError> {
        self.get_counter(date.to_string()).await
    }

    async fn service_daily_counts(
        &self,
        date: &str,
        service: &str,
    ) -> Result<Option<String>, StorageError> {
        self.get_counter(service_counter_key(date, service)).await
    }
}
