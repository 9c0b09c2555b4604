//! Application-level error type returned by console operations.
//!
//! Every variant carries a stable code and serialises to the
//! [`ErrorResponse`] JSON format with its offending identifiers as params.

use apidoc::ValidationError;
use apidoc_api::{codes, ErrorResponse};

use crate::storage::StorageError;

/// An error that a console operation can return.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("date must match YYYY-MM-DD, got: {0:?}")]
    InvalidDateFormat(String),

    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: String, end: String },

    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("controller not found: {0}")]
    ControllerNotFound(String),

    #[error("schema document of {service} {version} is absent or empty")]
    SchemaUnavailable { service: String, version: String },

    #[error("schema document of {service} {version} could not be fetched")]
    ServiceNotRun { service: String, version: String },

    #[error("schema document is not valid JSON: {0}")]
    ParseJson(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl ConsoleError {
    /// The stable error code, one of [`codes`].
    pub fn code(&self) -> &'static str {
        match self {
            ConsoleError::InvalidDateFormat(_) => codes::DATE_FORMAT,
            ConsoleError::InvertedDateRange { .. } => codes::DATE_ORDER,
            ConsoleError::RouteNotFound(_) => codes::ROUTE_NOT_FOUND,
            ConsoleError::ControllerNotFound(_) => codes::CONTROLLER_NOT_FOUND,
            ConsoleError::SchemaUnavailable { .. } => codes::SCHEMA_EMPTY,
            ConsoleError::ServiceNotRun { .. } => codes::SERVICE_NOT_RUN,
            ConsoleError::ParseJson(_) => codes::PARSE_JSON,
            ConsoleError::Storage(_) => codes::STORAGE,
        }
    }

    /// The identifiers the error is about.
    pub fn params(&self) -> Vec<String> {
        match self {
            ConsoleError::InvalidDateFormat(date) => vec![date.clone()],
            ConsoleError::InvertedDateRange { start, end } => vec![start.clone(), end.clone()],
            ConsoleError::RouteNotFound(route) => vec![route.clone()],
            ConsoleError::ControllerNotFound(name) => vec![name.clone()],
            ConsoleError::SchemaUnavailable { service, version }
            | ConsoleError::ServiceNotRun { service, version } => {
                vec![service.clone(), version.clone()]
            }
            ConsoleError::ParseJson(_) | ConsoleError::Storage(_) => Vec::new(),
        }
    }
}

impl From<&ConsoleError> for ErrorResponse {
    fn from(e: &ConsoleError) -> Self {
        ErrorResponse::new(e.code(), e.to_string()).with_params(e.params())
    }
}

impl From<ConsoleError> for ErrorResponse {
    fn from(e: ConsoleError) -> Self {
        ErrorResponse::from(&e)
    }
}

impl From<ValidationError> for ConsoleError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::InvalidDateFormat(date) => ConsoleError::InvalidDateFormat(date),
            ValidationError::InvertedDateRange { start, end } => {
                ConsoleError::InvertedDateRange { start, end }
            }
        }
    }
}

impl From<StorageError> for ConsoleError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Internal(msg) => ConsoleError::Storage(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let cases = [
            (ConsoleError::InvalidDateFormat("2024-1-1".into()), "error.date.format"),
            (
                ConsoleError::InvertedDateRange {
                    start: "2024-03-02".into(),
                    end: "2024-03-01".into(),
                },
                "error.date.order",
            ),
            (ConsoleError::RouteNotFound("iam".into()), "error.route.not.found"),
            (ConsoleError::ControllerNotFound("x".into()), "error.controller.not.found"),
            (
                ConsoleError::SchemaUnavailable {
                    service: "iam-service".into(),
                    version: "v1".into(),
                },
                "error.service.swaggerJson.empty",
            ),
            (
                ConsoleError::ServiceNotRun {
                    service: "iam-service".into(),
                    version: "v1".into(),
                },
                "error.service.not.run",
            ),
            (ConsoleError::ParseJson("eof".into()), "error.parseJson"),
            (ConsoleError::Storage("disk".into()), "error.storage"),
        ];
        for (error, code) in cases {
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn response_carries_params() {
        let e = ConsoleError::ServiceNotRun {
            service: "iam-service".into(),
            version: "v1".into(),
        };
        let body = ErrorResponse::from(&e);
        assert_eq!(body.code, "error.service.not.run");
        assert_eq!(body.params, vec!["iam-service", "v1"]);
    }

    #[test]
    fn validation_errors_convert() {
        let e: ConsoleError = apidoc::DateRange::parse("2024-03-02", "2024-03-01")
            .unwrap_err()
            .into();
        assert_eq!(e.code(), "error.date.order");
        assert_eq!(e.params(), vec!["2024-03-02", "2024-03-01"]);
    }
}
