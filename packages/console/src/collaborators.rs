//! Services the console reads from but does not own.
//!
//! The gateway publishes one schema document per (service, version), a
//! registry advertising those documents, and a route table mapping public
//! route names to service ids. Each is an async trait so the console can be
//! wired to HTTP clients, databases, or the in-memory [`StaticCatalog`].

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use apidoc::ServiceResource;
use async_trait::async_trait;

/// Failure reaching a collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Fetches the raw schema document of a service version.
#[async_trait]
pub trait SchemaSource: Send + Sync + 'static {
    /// `Ok(None)` when the service publishes no document for `version`.
    async fn fetch(&self, service_id: &str, version: &str) -> Result<Option<String>, SourceError>;
}

/// Lists the schema documents known to the gateway.
#[async_trait]
pub trait ServiceRegistry: Send + Sync + 'static {
    /// One resource per published document, named `<route>:<service>` and
    /// located at `<path>?version=<version>`.
    async fn resources(&self) -> Result<Vec<ServiceResource>, SourceError>;
}

/// Maps public route names to service ids.
#[async_trait]
pub trait RouteRegistry: Send + Sync + 'static {
    async fn service_id(&self, route: &str) -> Result<Option<String>, SourceError>;
}

// ---------------------------------------------------------------------------
// StaticCatalog
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Inner {
    resources: Vec<ServiceResource>,
    routes: HashMap<String, String>,
    /// (service id, version) → document text.
    documents: HashMap<(String, String), String>,
}

/// In-memory implementation of all three collaborator traits.
///
/// Registering a document also registers its route and registry resource,
/// which is what a gateway does when a service starts.
#[derive(Default)]
pub struct StaticCatalog {
    inner: RwLock<Inner>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `document` for `service` at `version` under `route`.
    pub fn publish(
        &self,
        route: &str,
        service: &str,
        version: &str,
        document: impl Into<String>,
    ) -> Result<(), SourceError> {
        let mut inner = self.write()?;
        inner
            .routes
            .insert(route.to_string(), service.to_string());
        inner.resources.push(ServiceResource::new(
            format!("{route}:{service}"),
            format!("/docs/{route}?version={version}"),
        ));
        inner
            .documents
            .insert((service.to_string(), version.to_string()), document.into());
        Ok(())
    }

    /// Advertise a resource without a document behind it.
    pub fn advertise(&self, resource: ServiceResource) -> Result<(), SourceError> {
        self.write()?.resources.push(resource);
        Ok(())
    }

    /// Map `route` to `service` without publishing anything.
    pub fn route(&self, route: &str, service: &str) -> Result<(), SourceError> {
        self.write()?
            .routes
            .insert(route.to_string(), service.to_string());
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, SourceError> {
        self.inner
            .read()
            .map_err(|_| SourceError::Unavailable("catalog lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, SourceError> {
        self.inner
            .write()
            .map_err(|_| SourceError::Unavailable("catalog lock poisoned".into()))
    }
}

#[async_trait]
impl SchemaSource for StaticCatalog {
    async fn fetch(&self, service_id: &str, version: &str) -> Result<Option<String>, SourceError> {
        Ok(self
            .read()?
            .documents
            .get(&(service_id.to_string(), version.to_string()))
            .cloned())
    }
}

#[async_trait]
impl ServiceRegistry for StaticCatalog {
    async fn resources(&self) -> Result<Vec<ServiceResource>, SourceError> {
        Ok(self.read()?.resources.clone())
    }
}

#[async_trait]
impl RouteRegistry for StaticCatalog {
    async fn service_id(&self, route: &str) -> Result<Option<String>, SourceError> {
        Ok(self.read()?.routes.get(route).cloned())
    }
}
