//! Documentation tree: service → version → controller → endpoint.

use serde::{Deserialize, Serialize};

/// One node of the documentation tree.
///
/// `key` is positional: the service at index `i` is `"i"`, its version at
/// index `j` is `"i-j"`, and so on down to endpoints at `"i-j-k-l"`. Leaf
/// (endpoint) nodes also carry the fields needed to open the endpoint's
/// detail page.
///
/// # Example
///
/// ```json
/// {
///   "title": "/v1/routes",
///   "key": "0-0-1-3",
///   "children": [],
///   "method": "get",
///   "operationId": "listUsingGET",
///   "service": "manager-service",
///   "version": "v1",
///   "servicePrefix": "manager",
///   "refController": "route-controller"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// The gateway route name the service is published under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_controller: Option<String>,
}

impl TreeNode {
    /// A branch node with no children yet.
    pub fn branch(title: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    /// Reassign this node's key and, positionally, every descendant's.
    pub fn rekey(&mut self, key: impl Into<String>) {
        self.key = key.into();
        for (i, child) in self.children.iter_mut().enumerate() {
            child.rekey(format!("{}-{i}", self.key));
        }
    }
}

/// The whole tree, as returned to the console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationTree {
    pub service: Vec<TreeNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rekey_renumbers_descendants() {
        let mut leaf = TreeNode::branch("/v1/routes", "9-9-9-9");
        leaf.method = Some("get".into());
        let mut controller = TreeNode::branch("route-controller", "9-9-9");
        controller.children = vec![TreeNode::branch("/a", "x"), leaf];
        let mut version = TreeNode::branch("v1", "9-9");
        version.children = vec![controller];

        version.rekey("2-0");
        assert_eq!(version.children[0].key, "2-0-0");
        assert_eq!(version.children[0].children[0].key, "2-0-0-0");
        assert_eq!(version.children[0].children[1].key, "2-0-0-1");
    }

    #[test]
    fn leaf_fields_use_camel_case_and_are_optional() {
        let mut leaf = TreeNode::branch("/v1/routes", "0-0-0-0");
        leaf.operation_id = Some("listUsingGET".into());
        let json = serde_json::to_value(&leaf).unwrap();
        assert_eq!(json["operationId"], "listUsingGET");
        assert!(json.get("method").is_none());
        assert_eq!(json["children"], serde_json::json!([]));
    }
}
