//! Read-only filtering and aggregation over a fetched dataset.
//!
//! A [`DatasetView`] borrows records from the dataset, so filtering never
//! touches the cached data.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::record::{keys, CanonicalRecord, Coordinates};

/// Headline metrics for a set of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub distinct_types: usize,
    pub distinct_communes: usize,
    pub located: usize,
}

/// Number of records sharing one field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Commerce type × commune counts.
///
/// `counts[i][j]` is the number of records of `types[i]` in `communes[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub types: Vec<String>,
    pub communes: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    records: Vec<&'a CanonicalRecord>,
}

impl<'a> DatasetView<'a> {
    #[must_use]
    pub fn new(records: &'a [CanonicalRecord]) -> Self {
        Self {
            records: records.iter().collect(),
        }
    }

    /// Keeps records whose commerce type is one of `types`.
    ///
    /// An empty selection keeps everything.
    #[must_use]
    pub fn with_types(self, types: &[String]) -> Self {
        self.retain_in(keys::TYPE_COMMERCE, types)
    }

    /// Keeps records whose commune is one of `communes`.
    ///
    /// An empty selection keeps everything.
    #[must_use]
    pub fn with_communes(self, communes: &[String]) -> Self {
        self.retain_in(keys::COMMUNE, communes)
    }

    fn retain_in(mut self, key: &str, allowed: &[String]) -> Self {
        if allowed.is_empty() {
            return self;
        }
        self.records.retain(|record| {
            record
                .text(key)
                .is_some_and(|value| allowed.iter().any(|a| a == &value))
        });
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CanonicalRecord> + '_ {
        self.records.iter().copied()
    }

    /// Records that carry a coordinate pair.
    pub fn located(&self) -> impl Iterator<Item = (&'a CanonicalRecord, Coordinates)> + '_ {
        self.iter()
            .filter_map(|record| record.coordinates().map(|c| (record, c)))
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            total: self.len(),
            distinct_types: self.distinct(keys::TYPE_COMMERCE).len(),
            distinct_communes: self.distinct(keys::COMMUNE).len(),
            located: self.located().count(),
        }
    }

    /// Distinct non-empty values of `key`, sorted.
    #[must_use]
    pub fn distinct(&self, key: &str) -> BTreeSet<String> {
        self.iter().filter_map(|record| record.text(key)).collect()
    }

    /// Counts per value of `key`, most frequent first, ties broken by value.
    ///
    /// Records without the field are not counted.
    #[must_use]
    pub fn value_counts(&self, key: &str) -> Vec<ValueCount> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for value in self.iter().filter_map(|record| record.text(key)) {
            *counts.entry(value).or_default() += 1;
        }
        let mut out: Vec<ValueCount> = counts
            .into_iter()
            .map(|(value, count)| ValueCount { value, count })
            .collect();
        // BTreeMap order is by value; a stable sort keeps it for ties.
        out.sort_by(|a, b| b.count.cmp(&a.count));
        out
    }

    #[must_use]
    pub fn type_counts(&self) -> Vec<ValueCount> {
        self.value_counts(keys::TYPE_COMMERCE)
    }

    #[must_use]
    pub fn commune_counts(&self) -> Vec<ValueCount> {
        self.value_counts(keys::COMMUNE)
    }

    /// The first of [`keys::DATE_FIELDS`] that any record carries.
    #[must_use]
    pub fn date_field(&self) -> Option<&'static str> {
        keys::DATE_FIELDS
            .iter()
            .copied()
            .find(|key| self.iter().any(|record| record.get(key).is_some()))
    }

    /// Records per calendar month of the date stored under `key`, oldest
    /// month first. Months are rendered as `YYYY-MM`.
    ///
    /// Records where `key` is missing or not a recognizable date are skipped.
    #[must_use]
    pub fn monthly_counts(&self, key: &str) -> Vec<ValueCount> {
        let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        for date in self
            .iter()
            .filter_map(|record| record.text(key))
            .filter_map(|raw| parse_date(&raw))
        {
            *months.entry((date.year(), date.month())).or_default() += 1;
        }
        months
            .into_iter()
            .map(|((year, month), count)| ValueCount {
                value: format!("{year:04}-{month:02}"),
                count,
            })
            .collect()
    }

    /// Cross-tabulates commerce types against the `top_communes` most
    /// frequent communes.
    #[must_use]
    pub fn crosstab(&self, top_communes: usize) -> CrossTab {
        let communes: Vec<String> = self
            .commune_counts()
            .into_iter()
            .take(top_communes)
            .map(|vc| vc.value)
            .collect();

        let mut cells: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for record in self.iter() {
            let (Some(kind), Some(commune)) = (record.type_commerce(), record.commune()) else {
                continue;
            };
            let Some(col) = communes.iter().position(|c| c == &commune) else {
                continue;
            };
            cells.entry(kind).or_insert_with(|| vec![0; communes.len()])[col] += 1;
        }

        let (types, counts): (Vec<String>, Vec<Vec<usize>>) = cells.into_iter().unzip();
        CrossTab {
            types,
            communes,
            counts,
        }
    }
}

/// Parses RFC 3339 timestamps, ISO datetimes and a few plain date layouts.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        })
}
