//! The console service and the cache plumbing its operations share.
//!
//! Operations live next to the data they produce: [`tree`](crate::tree),
//! [`docs`](crate::docs), and [`invocation`](crate::invocation) each add an
//! `impl ApiConsole` block.

use std::sync::Arc;

use apidoc::ServiceCatalog;
use serde::{de::DeserializeOwned, Serialize};

use crate::collaborators::{RouteRegistry, SchemaSource, ServiceRegistry, SourceError};
use crate::config::{ConsoleConfig, Stores};
use crate::storage::{CacheStore, CounterStore};

/// Documentation and statistics queries over the gateway's services.
///
/// Cheap to share: every collaborator is behind an `Arc`, and no operation
/// holds state between calls beyond what the cache stores.
#[derive(Clone)]
pub struct ApiConsole {
    pub schemas: Arc<dyn SchemaSource>,
    pub services: Arc<dyn ServiceRegistry>,
    pub routes: Arc<dyn RouteRegistry>,
    pub cache: Arc<dyn CacheStore>,
    pub counters: Arc<dyn CounterStore>,
    pub config: ConsoleConfig,
}

impl ApiConsole {
    pub fn new(
        schemas: Arc<dyn SchemaSource>,
        services: Arc<dyn ServiceRegistry>,
        routes: Arc<dyn RouteRegistry>,
        stores: Stores,
        config: ConsoleConfig,
    ) -> Self {
        Self {
            schemas,
            services,
            routes,
            cache: stores.cache,
            counters: stores.counters,
            config,
        }
    }

    /// The registry's resources grouped by route, service, and version.
    ///
    /// An unreachable registry yields an empty catalog.
    pub(crate) async fn catalog(&self) -> ServiceCatalog {
        match self.services.resources().await {
            Ok(resources) => ServiceCatalog::from_resources(&resources),
            Err(e) => {
                tracing::warn!(error = %e, "service registry unavailable, using an empty catalog");
                ServiceCatalog::default()
            }
        }
    }

    /// The non-blank schema document of `service` at `version`.
    pub(crate) async fn fetch_document(
        &self,
        service: &str,
        version: &str,
    ) -> Result<Option<String>, SourceError> {
        let text = self.schemas.fetch(service, version).await?;
        Ok(text.filter(|t| !t.trim().is_empty()))
    }

    /// Read and decode the cached value at `key`.
    ///
    /// Store failures and undecodable values are logged and read as a miss.
    pub(crate) async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed, recomputing");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "corrupt cache entry, recomputing");
                None
            }
        }
    }

    /// Cache `value` at `key` for the configured TTL. Failures are logged.
    pub(crate) async fn store<T: Serialize>(&self, key: &str, value: &T) {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cannot serialise value for caching");
                return;
            }
        };
        if let Err(e) = self
            .cache
            .set(key, &text, self.config.cache_ttl_days)
            .await
        {
            tracing::warn!(key = %key, error = %e, "cache write failed");
        }
    }
}
