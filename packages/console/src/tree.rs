//! The documentation tree: service → version → controller → endpoint.
//!
//! The controller level of each (service, version) is cached under
//! `api-tree-doc:<service>:<version>`. Cached sub-trees are re-keyed on the
//! way out, so a hit renders the same tree as a fresh build.

use apidoc::{CatalogEntry, ControllerDoc, EndpointAssembler, SchemaDocument};
use apidoc_api::{DocumentationTree, TreeNode};

use crate::console::ApiConsole;
use crate::storage::tree_cache_key;

/// Tag-name fragments that mark a tag as a controller.
const CONTROLLER_MARKERS: [&str; 2] = ["-controller", "-endpoint"];

impl ApiConsole {
    /// Build the full documentation tree over every registered service.
    ///
    /// Never fails: a version whose document cannot be read gets an empty
    /// node and a warning.
    pub async fn query_tree_menu(&self) -> DocumentationTree {
        let catalog = self.catalog().await;
        let mut service = Vec::with_capacity(catalog.len());
        for (i, entry) in catalog.entries().enumerate() {
            service.push(self.service_node(&entry, i.to_string()).await);
        }
        DocumentationTree { service }
    }

    async fn service_node(&self, entry: &CatalogEntry<'_>, key: String) -> TreeNode {
        let mut node = TreeNode::branch(entry.service, key);
        for (j, version) in entry.versions.iter().enumerate() {
            let version_key = format!("{}-{j}", node.key);
            let mut version_node = TreeNode::branch(version.as_str(), version_key);
            version_node.children = self
                .controller_nodes(entry.route, entry.service, version)
                .await;
            // cached sub-trees carry the keys they were built with
            let key = version_node.key.clone();
            version_node.rekey(key);
            node.children.push(version_node);
        }
        node
    }

    async fn controller_nodes(&self, route: &str, service: &str, version: &str) -> Vec<TreeNode> {
        let cache_key = tree_cache_key(service, version);
        if let Some(children) = self.cached::<Vec<TreeNode>>(&cache_key).await {
            tracing::debug!(service = %service, version = %version, "tree cache hit");
            return children;
        }

        let text = match self.fetch_document(service, version).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!(service = %service, version = %version, "schema document is empty, skipping");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(service = %service, version = %version, error = %e, "schema document unavailable, skipping");
                return Vec::new();
            }
        };
        let document = match SchemaDocument::from_json(&text) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(service = %service, version = %version, error = %e, "unparsable schema document, skipping");
                return Vec::new();
            }
        };

        let controllers = EndpointAssembler::new(route, &document).controllers();
        let children = controller_tree(route, service, version, &controllers);
        self.store(&cache_key, &children).await;
        children
    }
}

/// Controller nodes with their endpoint leaves, keyed from `0`.
///
/// Only controller tags are kept, and only when they list an endpoint.
fn controller_tree(
    route: &str,
    service: &str,
    version: &str,
    controllers: &[ControllerDoc],
) -> Vec<TreeNode> {
    controllers
        .iter()
        .filter(|c| is_controller_tag(&c.name) && !c.paths.is_empty())
        .enumerate()
        .map(|(k, controller)| {
            let key = k.to_string();
            let children = controller
                .paths
                .iter()
                .enumerate()
                .map(|(l, path)| TreeNode {
                    title: path.url.clone(),
                    key: format!("{key}-{l}"),
                    children: Vec::new(),
                    method: Some(path.method.clone()),
                    operation_id: path.operation_id.clone(),
                    service: Some(service.to_string()),
                    version: Some(version.to_string()),
                    service_prefix: Some(route.to_string()),
                    ref_controller: Some(controller.name.clone()),
                })
                .collect();
            TreeNode {
                children,
                ..TreeNode::branch(controller.name.as_str(), key)
            }
        })
        .collect()
}

fn is_controller_tag(name: &str) -> bool {
    CONTROLLER_MARKERS.iter().any(|m| name.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn controllers() -> Vec<ControllerDoc> {
        let doc = json!({
            "tags": [
                {"name": "route-controller"},
                {"name": "misc"},
                {"name": "empty-controller"},
                {"name": "health-endpoint"}
            ],
            "paths": {
                "/v1/routes": {
                    "get": {"tags": ["route-controller", "misc"], "description": "list", "operationId": "list"}
                },
                "/v1/health": {
                    "get": {"tags": ["health-endpoint"], "description": "health", "operationId": "health"},
                    "post": {"tags": ["health-endpoint"], "operationId": "internal"}
                }
            }
        });
        let document = SchemaDocument::from_json(&doc.to_string()).unwrap();
        EndpointAssembler::new("manager", &document).controllers()
    }

    #[test]
    fn keeps_non_empty_controller_tags_in_order() {
        let tree = controller_tree("manager", "manager-service", "v1", &controllers());
        let titles: Vec<&str> = tree.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["route-controller", "health-endpoint"]);
        assert_eq!(tree[1].key, "1");
    }

    #[test]
    fn leaves_carry_navigation_fields() {
        let tree = controller_tree("manager", "manager-service", "v1", &controllers());
        let health = &tree[1];
        assert_eq!(health.children.len(), 1);
        let leaf = &health.children[0];
        assert_eq!(leaf.title, "/v1/health");
        assert_eq!(leaf.key, "1-0");
        assert_eq!(leaf.method.as_deref(), Some("get"));
        assert_eq!(leaf.operation_id.as_deref(), Some("health"));
        assert_eq!(leaf.service.as_deref(), Some("manager-service"));
        assert_eq!(leaf.version.as_deref(), Some("v1"));
        assert_eq!(leaf.service_prefix.as_deref(), Some("manager"));
        assert_eq!(leaf.ref_controller.as_deref(), Some("health-endpoint"));
    }

    #[test]
    fn controller_markers() {
        assert!(is_controller_tag("route-controller"));
        assert!(is_controller_tag("health-endpoint"));
        assert!(!is_controller_tag("misc"));
    }
}
