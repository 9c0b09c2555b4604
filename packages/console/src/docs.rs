//! Controller listings, endpoint detail, and per-service API counts.

use apidoc::{find_operation, ControllerDoc, EndpointAssembler, SchemaDocument, SchemaError};
use apidoc_api::ApiCountReport;

use crate::console::ApiConsole;
use crate::error::ConsoleError;
use crate::storage::path_detail_cache_key;

impl ApiConsole {
    /// Every controller of the service published under `route`, at `version`,
    /// with fully assembled endpoints.
    pub async fn get_controllers(
        &self,
        route: &str,
        version: &str,
    ) -> Result<Vec<ControllerDoc>, ConsoleError> {
        let service = self.route_service(route).await?;
        let text = self
            .fetch_document(&service, version)
            .await
            .map_err(|e| {
                tracing::error!(route = %route, version = %version, error = %e, "schema fetch failed");
                ConsoleError::ServiceNotRun {
                    service: route.to_string(),
                    version: version.to_string(),
                }
            })?
            .ok_or_else(|| ConsoleError::SchemaUnavailable {
                service: route.to_string(),
                version: version.to_string(),
            })?;

        let document = SchemaDocument::from_json(&text).map_err(|e| match e {
            SchemaError::Empty => ConsoleError::SchemaUnavailable {
                service: route.to_string(),
                version: version.to_string(),
            },
            SchemaError::Malformed(e) => ConsoleError::ParseJson(e.to_string()),
        })?;
        Ok(EndpointAssembler::new(route, &document).controllers())
    }

    /// Controller `controller` of the service published under `route`, at
    /// `version`, narrowed to the endpoint(s) with `operation_id`.
    ///
    /// Cached under `path-detail:<route>:<version>:<controller>:<operation_id>`;
    /// a corrupt entry is recomputed. Permission codes match
    /// [`get_controllers`](Self::get_controllers).
    pub async fn query_path_detail(
        &self,
        route: &str,
        version: &str,
        controller: &str,
        operation_id: &str,
    ) -> Result<ControllerDoc, ConsoleError> {
        let cache_key = path_detail_cache_key(route, version, controller, operation_id);
        if let Some(detail) = self.cached::<ControllerDoc>(&cache_key).await {
            return Ok(detail);
        }

        let service = self.route_service(route).await?;
        let not_run = || ConsoleError::ServiceNotRun {
            service: route.to_string(),
            version: version.to_string(),
        };
        let text = match self.fetch_document(&service, version).await {
            Ok(Some(text)) => text,
            Ok(None) => return Err(not_run()),
            Err(e) => {
                tracing::error!(route = %route, version = %version, error = %e, "schema fetch failed");
                return Err(not_run());
            }
        };
        let document = SchemaDocument::from_json(&text).map_err(|e| {
            tracing::error!(route = %route, version = %version, error = %e, "unparsable schema document");
            not_run()
        })?;

        let controllers = EndpointAssembler::new(route, &document).controllers();
        let detail = find_operation(controllers, controller, operation_id)
            .ok_or_else(|| ConsoleError::ControllerNotFound(controller.to_string()))?;
        self.store(&cache_key, &detail).await;
        Ok(detail)
    }

    /// Documented API count of every registered service, using the first
    /// version of each. Unreadable documents count as zero.
    pub async fn query_instances_and_api_count(&self) -> ApiCountReport {
        let catalog = self.catalog().await;
        let mut report = ApiCountReport::default();
        for entry in catalog.entries() {
            let count = match entry.first_version() {
                Some(version) => self.documented_count(entry.service, version).await,
                None => 0,
            };
            report.services.push(entry.service.to_string());
            report.api_counts.push(count);
        }
        report
    }

    async fn documented_count(&self, service: &str, version: &str) -> usize {
        let text = match self.fetch_document(service, version).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!(service = %service, version = %version, "schema document is empty, skipping");
                return 0;
            }
            Err(e) => {
                tracing::warn!(service = %service, version = %version, error = %e, "schema document unavailable, skipping");
                return 0;
            }
        };
        match SchemaDocument::from_json(&text) {
            Ok(document) => document.documented_operation_count(),
            Err(e) => {
                tracing::warn!(service = %service, version = %version, error = %e, "unparsable schema document, skipping");
                0
            }
        }
    }

    async fn route_service(&self, route: &str) -> Result<String, ConsoleError> {
        match self.routes.service_id(route).await {
            Ok(Some(service)) => Ok(service),
            Ok(None) => Err(ConsoleError::RouteNotFound(route.to_string())),
            Err(e) => {
                tracing::warn!(route = %route, error = %e, "route registry unavailable");
                Err(ConsoleError::RouteNotFound(route.to_string()))
            }
        }
    }
}
