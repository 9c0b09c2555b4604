//! Invocation statistics and API-count reports.

use apidoc::SeriesMatrix;
use serde::{Deserialize, Serialize};

/// Daily calls of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInvokeDetail {
    pub service: String,
    pub data: Vec<u64>,
}

/// Per-service invocation counts over a date range.
///
/// ```json
/// {
///   "date": ["2024-03-01", "2024-03-02"],
///   "details": [{ "service": "iam-service", "data": [12, 0] }],
///   "services": ["iam-service"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInvokeReport {
    pub date: Vec<String>,
    pub details: Vec<ServiceInvokeDetail>,
    /// Services ranked by calls on the last date, descending.
    pub services: Vec<String>,
}

impl From<SeriesMatrix> for ServiceInvokeReport {
    fn from(m: SeriesMatrix) -> Self {
        Self {
            date: m.dates,
            details: m
                .series
                .into_iter()
                .map(|s| ServiceInvokeDetail {
                    service: s.name,
                    data: s.data,
                })
                .collect(),
            services: m.ranking,
        }
    }
}

/// Daily calls of one API of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInvokeDetail {
    pub api: String,
    pub data: Vec<u64>,
}

/// Per-API invocation counts of one service over a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInvokeReport {
    pub date: Vec<String>,
    pub details: Vec<ApiInvokeDetail>,
    /// APIs ranked by calls on the last date, descending.
    pub apis: Vec<String>,
}

impl From<SeriesMatrix> for ApiInvokeReport {
    fn from(m: SeriesMatrix) -> Self {
        Self {
            date: m.dates,
            details: m
                .series
                .into_iter()
                .map(|s| ApiInvokeDetail {
                    api: s.name,
                    data: s.data,
                })
                .collect(),
            apis: m.ranking,
        }
    }
}

/// Number of documented APIs per service; the two lists are index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountReport {
    pub services: Vec<String>,
    pub api_counts: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidoc::SeriesBuilder;

    #[test]
    fn service_report_keeps_wire_names() {
        let mut b = SeriesBuilder::with_names(["iam-service"]);
        b.push_day("2024-03-01", None);
        let report = ServiceInvokeReport::from(b.finish());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["date"], serde_json::json!(["2024-03-01"]));
        assert_eq!(json["details"][0]["service"], "iam-service");
        assert_eq!(json["details"][0]["data"], serde_json::json!([0]));
        assert_eq!(json["services"], serde_json::json!(["iam-service"]));
    }

    #[test]
    fn api_count_is_camel_case() {
        let report = ApiCountReport {
            services: vec!["iam-service".into()],
            api_counts: vec![3],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["apiCounts"], serde_json::json!([3]));
    }
}
