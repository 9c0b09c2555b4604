//! Invocation statistics rebuilt from the gateway's daily counters.
//!
//! A day with no counter blob, an undecodable blob, or a failing store all
//! read as zero calls; only the date arguments can fail a query.

use apidoc::{decode_daily_counts, DailyCounts, DateRange, SeriesBuilder};
use apidoc_api::{ApiInvokeReport, ServiceInvokeReport};

use crate::console::ApiConsole;
use crate::error::ConsoleError;
use crate::storage::StorageError;

impl ApiConsole {
    /// Calls per service per day over `[start, end]`, both `YYYY-MM-DD`.
    ///
    /// Every registered service gets a series, in catalog order, followed by
    /// any other service the counters mention.
    pub async fn query_service_invoke(
        &self,
        start: &str,
        end: &str,
    ) -> Result<ServiceInvokeReport, ConsoleError> {
        let range = DateRange::parse(start, end)?;
        let catalog = self.catalog().await;
        let mut builder = SeriesBuilder::with_names(catalog.service_ids());
        for date in range.day_keys() {
            let blob = self.counters.daily_counts(&date).await;
            let counts = decode_day(&date, blob);
            builder.push_day(date, counts);
        }
        Ok(builder.finish().into())
    }

    /// Calls per API of `service` per day over `[start, end]`.
    pub async fn query_api_invoke(
        &self,
        start: &str,
        end: &str,
        service: &str,
    ) -> Result<ApiInvokeReport, ConsoleError> {
        let range = DateRange::parse(start, end)?;
        let mut builder = SeriesBuilder::new();
        for date in range.day_keys() {
            let blob = self.counters.service_daily_counts(&date, service).await;
            let counts = decode_day(&date, blob);
            builder.push_day(date, counts);
        }
        Ok(builder.finish().into())
    }
}

fn decode_day(date: &str, blob: Result<Option<String>, StorageError>) -> Option<DailyCounts> {
    match blob {
        Ok(Some(blob)) => match decode_daily_counts(&blob) {
            Ok(counts) => Some(counts),
            Err(e) => {
                tracing::error!(date = %date, value = %blob, error = %e, "undecodable counter blob, counting zero");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(date = %date, error = %e, "counter store read failed, counting zero");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_day_absorbs_failures() {
        assert_eq!(decode_day("2024-03-01", Ok(None)), None);
        assert_eq!(decode_day("2024-03-01", Ok(Some("not json".into()))), None);
        assert_eq!(
            decode_day("2024-03-01", Err(StorageError::Internal("down".into()))),
            None
        );
        let counts = decode_day("2024-03-01", Ok(Some(r#"{"iam-service": 4}"#.into()))).unwrap();
        assert_eq!(counts.get("iam-service"), Some(&4));
    }
}
