use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// Format of date arguments and of counter-store date keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors returned when date arguments are rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("date must match YYYY-MM-DD, got: {0:?}")]
    InvalidDateFormat(String),

    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: String, end: String },
}

/// Parse a `YYYY-MM-DD` date. The shape is checked before the calendar, so
/// `2024-1-05` and `2024-02-30` are both rejected.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    if !DATE_RE.is_match(s) {
        return Err(ValidationError::InvalidDateFormat(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDateFormat(s.to_string()))
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Validate both bounds and their order.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        let (from, to) = (parse_date(start)?, parse_date(end)?);
        if from > to {
            return Err(ValidationError::InvertedDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start: from, end: to })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }

    /// [`days`](Self::days) formatted as `YYYY-MM-DD` keys.
    pub fn day_keys(&self) -> Vec<String> {
        self.days()
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect()
    }
}

// --- helpers -----------------------------------------------------------------

/// `^\d{4}-\d{2}-\d{2}$`
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("invalid date regex"));

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_shapes_and_impossible_dates() {
        assert!(parse_date("2024-03-01").is_ok());
        for bad in ["2024-3-01", "20240301", "2024-02-30", "", "2024-03-01T00:00"] {
            assert_eq!(
                parse_date(bad),
                Err(ValidationError::InvalidDateFormat(bad.to_string()))
            );
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(
            DateRange::parse("2024-03-02", "2024-03-01"),
            Err(ValidationError::InvertedDateRange {
                start: "2024-03-02".into(),
                end: "2024-03-01".into()
            })
        );
    }

    #[test]
    fn single_day_range() {
        let r = DateRange::parse("2024-03-01", "2024-03-01").unwrap();
        assert_eq!(r.day_keys(), vec!["2024-03-01"]);
    }

    #[test]
    fn range_crosses_month_boundary() {
        let r = DateRange::parse("2024-02-28", "2024-03-01").unwrap();
        assert_eq!(r.day_keys(), vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
    }
}
