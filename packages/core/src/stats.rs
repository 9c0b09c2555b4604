//! Dense reconstruction of sparse daily counters.
//!
//! The counter store holds, per day, a JSON object mapping counter names
//! (services or API paths) to the number of calls that day. Days with no
//! entry, and names missing from a day's entry, mean zero. [`SeriesBuilder`]
//! turns a run of such days into one dense series per name plus a ranking.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Counts for one day, by counter name, in the order the blob lists them.
pub type DailyCounts = IndexMap<String, u64>;

/// Decode one day's counter blob.
pub fn decode_daily_counts(blob: &str) -> Result<DailyCounts, serde_json::Error> {
    serde_json::from_str(blob)
}

/// One counter's per-day values, aligned with [`SeriesMatrix::dates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSeries {
    pub name: String,
    pub data: Vec<u64>,
}

/// Dense per-day counts over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeriesMatrix {
    pub dates: Vec<String>,
    /// One series per counter name, in first-discovery order.
    pub series: Vec<CountSeries>,
    /// Counter names by their count on the last date, descending. Ties keep
    /// first-discovery order.
    pub ranking: Vec<String>,
}

/// Accumulates days in order and produces a [`SeriesMatrix`].
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    names: Vec<String>,
    index: HashMap<String, usize>,
    days: Vec<(String, Option<DailyCounts>)>,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `names` already discovered, in the given order, so they get
    /// a series even if no day mentions them.
    pub fn with_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut builder = Self::new();
        for name in names {
            builder.discover(name.into());
        }
        builder
    }

    /// Record the next day. `None` means the day has no usable counts.
    pub fn push_day(&mut self, date: impl Into<String>, counts: Option<DailyCounts>) {
        if let Some(counts) = &counts {
            for name in counts.keys() {
                if !self.index.contains_key(name) {
                    self.discover(name.clone());
                }
            }
        }
        self.days.push((date.into(), counts));
    }

    pub fn finish(self) -> SeriesMatrix {
        let series: Vec<CountSeries> = self
            .names
            .iter()
            .map(|name| CountSeries {
                name: name.clone(),
                data: self
                    .days
                    .iter()
                    .map(|(_, counts)| {
                        counts
                            .as_ref()
                            .and_then(|c| c.get(name))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect(),
            })
            .collect();

        let mut ranked: Vec<&CountSeries> = series.iter().collect();
        // stable sort: ties stay in discovery order
        ranked.sort_by(|a, b| last(b).cmp(&last(a)));
        let ranking = ranked.iter().map(|s| s.name.clone()).collect();

        SeriesMatrix {
            dates: self.days.into_iter().map(|(date, _)| date).collect(),
            series,
            ranking,
        }
    }

    fn discover(&mut self, name: String) {
        if self.index.contains_key(&name) {
            return;
        }
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
    }
}

fn last(series: &CountSeries) -> u64 {
    series.data.last().copied().unwrap_or(0)
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Option<DailyCounts> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn missing_day_is_zero_for_every_counter() {
        let mut b = SeriesBuilder::new();
        b.push_day("2024-03-01", counts(&[("a", 3), ("b", 1)]));
        b.push_day("2024-03-02", None);
        b.push_day("2024-03-03", counts(&[("a", 5)]));
        let m = b.finish();

        assert_eq!(m.dates, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
        assert_eq!(m.series[0].data, vec![3, 0, 5]);
        assert_eq!(m.series[1].data, vec![1, 0, 0]);
    }

    #[test]
    fn ranking_by_last_day_with_stable_ties() {
        let mut b = SeriesBuilder::with_names(["seeded"]);
        b.push_day("2024-03-01", counts(&[("x", 9), ("y", 1)]));
        b.push_day("2024-03-02", counts(&[("z", 4), ("y", 4), ("x", 2)]));
        let m = b.finish();

        let names: Vec<_> = m.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["seeded", "x", "y", "z"]);
        assert_eq!(m.ranking, vec!["y", "z", "x", "seeded"]);
    }

    #[test]
    fn ties_follow_blob_order() {
        let mut b = SeriesBuilder::new();
        b.push_day(
            "2024-03-01",
            Some(decode_daily_counts(r#"{"zeta": 3, "alpha": 3}"#).unwrap()),
        );
        let m = b.finish();
        assert_eq!(m.series[0].name, "zeta");
        assert_eq!(m.ranking, vec!["zeta", "alpha"]);
    }

    #[test]
    fn names_seen_only_later_are_backfilled() {
        let mut b = SeriesBuilder::new();
        b.push_day("2024-03-01", counts(&[]));
        b.push_day("2024-03-02", counts(&[("late", 2)]));
        let m = b.finish();
        assert_eq!(m.series[0].data, vec![0, 2]);
    }

    #[test]
    fn decode_rejects_non_counter_blobs() {
        assert!(decode_daily_counts(r#"{"a": 1}"#).is_ok());
        assert!(decode_daily_counts(r#"{"a": "many"}"#).is_err());
        assert!(decode_daily_counts("not json").is_err());
    }
}
