#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary structures produced by the earthquake aggregator.
//!
//! Each structure is a small counting map with a fixed iteration order
//! that the chart renderers depend on: the histogram iterates in bucket
//! order, monthly counts iterate chronologically, and regional counts
//! iterate in first-encounter order so ranking ties stay stable.

use std::collections::BTreeMap;

use quake_map_quake_models::MagnitudeBucket;
use serde::ser::SerializeMap as _;
use serde::{Serialize, Serializer};

/// Count of earthquakes per magnitude bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MagnitudeHistogram {
    counts: [u64; MagnitudeBucket::ALL.len()],
}

impl MagnitudeHistogram {
    /// Creates a histogram with every bucket at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: [0; MagnitudeBucket::ALL.len()],
        }
    }

    /// Adds one earthquake to `bucket`.
    pub const fn increment(&mut self, bucket: MagnitudeBucket) {
        self.counts[bucket.index()] += 1;
    }

    /// Returns the count for `bucket`.
    #[must_use]
    pub const fn get(&self, bucket: MagnitudeBucket) -> u64 {
        self.counts[bucket.index()]
    }

    /// Iterates `(bucket, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MagnitudeBucket, u64)> + '_ {
        MagnitudeBucket::ALL
            .iter()
            .map(|bucket| (*bucket, self.get(*bucket)))
    }

    /// Sum of all bucket counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Serialize for MagnitudeHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (bucket, count) in self.iter() {
            map.serialize_entry(bucket.label(), &count)?;
        }
        map.end()
    }
}

/// Count of earthquakes per `"YYYY-MM"` month, iterated chronologically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MonthlyCounts {
    counts: BTreeMap<String, u64>,
}

impl MonthlyCounts {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Adds one earthquake to `month`.
    pub fn increment(&mut self, month: String) {
        *self.counts.entry(month).or_insert(0) += 1;
    }

    /// Returns the count for `month` (zero when absent).
    #[must_use]
    pub fn get(&self, month: &str) -> u64 {
        self.counts.get(month).copied().unwrap_or(0)
    }

    /// Iterates `(month, count)` pairs in ascending month order.
    ///
    /// `"YYYY-MM"` keys sort lexicographically in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct months.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no month has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count of earthquakes in a single region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCount {
    /// Region name (epicenter text before the first comma).
    pub region: String,
    /// Number of earthquakes.
    pub count: u64,
}

/// Count of earthquakes per region, iterated in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionalCounts {
    entries: Vec<RegionCount>,
    index: BTreeMap<String, usize>,
}

impl RegionalCounts {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Adds one earthquake to `region`.
    pub fn increment(&mut self, region: &str) {
        if let Some(&i) = self.index.get(region) {
            self.entries[i].count += 1;
        } else {
            self.index.insert(region.to_string(), self.entries.len());
            self.entries.push(RegionCount {
                region: region.to_string(),
                count: 1,
            });
        }
    }

    /// Returns the count for `region` (zero when absent).
    #[must_use]
    pub fn get(&self, region: &str) -> u64 {
        self.index.get(region).map_or(0, |&i| self.entries[i].count)
    }

    /// Iterates regions in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = &RegionCount> {
        self.entries.iter()
    }

    /// Returns up to `limit` regions by descending count. Regions with equal
    /// counts keep their first-encounter order.
    #[must_use]
    pub fn top(&self, limit: usize) -> Vec<RegionCount> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(limit);
        ranked
    }

    /// Number of distinct regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no region has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RegionalCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.region, &entry.count)?;
        }
        map.end()
    }
}

/// Why a record was left out of the summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SkipReason {
    /// The record has no epicenter string.
    MissingEpicenter,
    /// The record has no `date_ad` string.
    MissingDate,
    /// `date_ad` is present but could not be parsed.
    InvalidDate {
        /// The raw value.
        value: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEpicenter => write!(f, "missing epicenter"),
            Self::MissingDate => write!(f, "missing date_ad"),
            Self::InvalidDate { value } => write!(f, "unparseable date_ad {value:?}"),
        }
    }
}

/// A record that was skipped during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecord {
    /// Position of the record in the input sequence.
    pub index: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// The three chart summaries plus bookkeeping about the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeSummary {
    /// Number of records in the input.
    pub total: usize,
    /// Number of records counted into the summaries.
    pub aggregated: usize,
    /// Magnitude distribution.
    pub magnitude_ranges: MagnitudeHistogram,
    /// Monthly frequency.
    pub monthly_data: MonthlyCounts,
    /// Regional distribution.
    pub regional_data: RegionalCounts,
    /// Records left out, with reasons.
    pub skipped: Vec<SkippedRecord>,
}

impl EarthquakeSummary {
    /// Number of skipped records.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
