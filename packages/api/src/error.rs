//! Standard error response body.

use serde::{Deserialize, Serialize};

/// The JSON body returned for all console errors.
///
/// ```json
/// { "error": "route not found: iam", "code": "error.route.not.found", "params": ["iam"] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable description of the problem.
    pub error: String,

    /// Machine-readable error code, stable across releases. See [`codes`].
    pub code: String,

    /// The offending identifiers, in the order the message template expects
    /// them (for example the service name and version).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
            params: Vec::new(),
        }
    }

    /// Attach the offending identifiers.
    pub fn with_params<S: Into<String>>(mut self, params: impl IntoIterator<Item = S>) -> Self {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }
}

/// Well-known error codes.
///
/// | `code` | Raised when |
/// |--------|-------------|
/// | `error.date.format` | a date argument is not `YYYY-MM-DD` |
/// | `error.date.order` | the start date is after the end date |
/// | `error.route.not.found` | no route has the requested name |
/// | `error.controller.not.found` | the document has no such controller |
/// | `error.service.swaggerJson.empty` | the schema document is absent or empty |
/// | `error.service.not.run` | the schema document could not be fetched |
/// | `error.parseJson` | the schema document is not valid JSON |
/// | `error.storage` | a store failed on a path with no fallback |
pub mod codes {
    pub const DATE_FORMAT: &str = "error.date.format";
    pub const DATE_ORDER: &str = "error.date.order";
    pub const ROUTE_NOT_FOUND: &str = "error.route.not.found";
    pub const CONTROLLER_NOT_FOUND: &str = "error.controller.not.found";
    pub const SCHEMA_EMPTY: &str = "error.service.swaggerJson.empty";
    pub const SERVICE_NOT_RUN: &str = "error.service.not.run";
    pub const PARSE_JSON: &str = "error.parseJson";
    pub const STORAGE: &str = "error.storage";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let e = ErrorResponse::new(codes::SERVICE_NOT_RUN, "service iam v1 is not running")
            .with_params(["iam", "v1"]);
        let json = serde_json::to_string(&e).unwrap();
        let back: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn params_omitted_when_empty() {
        let e = ErrorResponse::new(codes::DATE_ORDER, "start after end");
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("params").is_none());
    }
}
