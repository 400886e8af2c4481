#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation of earthquake records into chart-ready summaries.
//!
//! [`aggregate`] walks the records once and fills the magnitude histogram,
//! the monthly counts and the regional counts. Records without an
//! epicenter or with a missing/unparseable `date_ad` are skipped and
//! reported in [`EarthquakeSummary::skipped`]; [`aggregate_strict`]
//! rejects the whole batch instead.

use quake_map_analytics_models::{EarthquakeSummary, SkipReason, SkippedRecord};
use quake_map_quake_models::EarthquakeRecord;
use thiserror::Error;

/// Errors that can occur during aggregation.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A record could not be aggregated in strict mode.
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord {
        /// Position of the record in the input.
        index: usize,
        /// What was wrong with it.
        reason: SkipReason,
    },
}

/// The fields of a record that the summaries need, once validated.
struct Keys {
    region: String,
    month: String,
}

fn validate(record: &EarthquakeRecord) -> Result<Keys, SkipReason> {
    let region = record.region().ok_or(SkipReason::MissingEpicenter)?;
    let date_ad = record.date_ad.as_deref().ok_or(SkipReason::MissingDate)?;
    let month = record.month_key().ok_or_else(|| SkipReason::InvalidDate {
        value: date_ad.to_string(),
    })?;

    Ok(Keys {
        region: region.to_string(),
        month,
    })
}

/// Builds the three summaries from `records` in a single pass.
///
/// Malformed records are skipped, logged and listed in the result.
#[must_use]
pub fn aggregate(records: &[EarthquakeRecord]) -> EarthquakeSummary {
    let mut summary = EarthquakeSummary {
        total: records.len(),
        ..EarthquakeSummary::default()
    };

    for (index, record) in records.iter().enumerate() {
        match validate(record) {
            Ok(keys) => {
                summary.magnitude_ranges.increment(record.bucket());
                summary.monthly_data.increment(keys.month);
                summary.regional_data.increment(&keys.region);
                summary.aggregated += 1;
            }
            Err(reason) => {
                log::warn!("Skipping earthquake record {index}: {reason}");
                summary.skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    if !summary.skipped.is_empty() {
        log::warn!(
            "Skipped {} of {} earthquake records during aggregation",
            summary.skipped.len(),
            summary.total
        );
    }
    log::debug!(
        "Aggregated {} records into {} months and {} regions",
        summary.aggregated,
        summary.monthly_data.len(),
        summary.regional_data.len()
    );

    summary
}

/// Like [`aggregate`], but fails on the first malformed record.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedRecord`] if any record lacks an
/// epicenter or a parseable `date_ad`.
pub fn aggregate_strict(records: &[EarthquakeRecord]) -> Result<EarthquakeSummary, AnalyticsError> {
    if let Some((index, reason)) = records
        .iter()
        .enumerate()
        .find_map(|(i, record)| validate(record).err().map(|reason| (i, reason)))
    {
        return Err(AnalyticsError::MalformedRecord { index, reason });
    }

    Ok(aggregate(records))
}

#[cfg(test)]
mod tests {
    use quake_map_quake_models::MagnitudeBucket;

    use super::*;

    fn quake(magnitude: f64, epicenter: &str, date_ad: &str) -> EarthquakeRecord {
        EarthquakeRecord::new(27.7, 85.3, epicenter, magnitude, date_ad)
    }

    #[test]
    fn empty_input_yields_empty_summaries() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.magnitude_ranges.total(), 0);
        for (_, count) in summary.magnitude_ranges.iter() {
            assert_eq!(count, 0);
        }
        assert!(summary.monthly_data.is_empty());
        assert!(summary.regional_data.is_empty());
        assert_eq!(summary.skipped_count(), 0);
    }

    #[test]
    fn buckets_mixed_magnitudes() {
        let records = [
            quake(2.0, "Kathmandu, Bagmati", "2025-01-01"),
            quake(4.2, "Kathmandu, Bagmati", "2025-01-02"),
            quake(7.0, "Gorkha, Gandaki", "2015-04-25"),
        ];
        let summary = aggregate(&records);
        assert_eq!(
            serde_json::to_value(&summary.magnitude_ranges).unwrap(),
            serde_json::json!({"0-3": 1, "3-4": 0, "4-5": 1, "5-6": 0, "6+": 1})
        );
    }

    #[test]
    fn histogram_total_matches_input_length() {
        let records: Vec<EarthquakeRecord> = (0..40)
            .map(|i| quake(f64::from(i) * 0.25, "Jajarkot, Karnali", "2023-11-03"))
            .collect();
        let summary = aggregate(&records);
        assert_eq!(summary.magnitude_ranges.total(), 40);
        assert_eq!(summary.aggregated, 40);
    }

    #[test]
    fn boundary_magnitudes() {
        let records = [
            quake(3.0, "A", "2025-01-01"),
            quake(5.999, "A", "2025-01-01"),
            quake(6.0, "A", "2025-01-01"),
        ];
        let histogram = aggregate(&records).magnitude_ranges;
        assert_eq!(histogram.get(MagnitudeBucket::ThreeToFour), 1);
        assert_eq!(histogram.get(MagnitudeBucket::FiveToSix), 1);
        assert_eq!(histogram.get(MagnitudeBucket::SixPlus), 1);
    }

    #[test]
    fn region_keys_follow_first_comma() {
        let records = [
            quake(4.0, "Kathmandu, Bagmati", "2025-01-01"),
            quake(4.0, "Pokhara", "2025-01-01"),
            quake(4.0, " Kathmandu ,Lalitpur", "2025-01-01"),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.regional_data.get("Kathmandu"), 2);
        assert_eq!(summary.regional_data.get("Pokhara"), 1);
    }

    #[test]
    fn monthly_counts_use_utc_month() {
        let records = [
            quake(4.0, "A", "2024-03-01T00:30:00+05:45"),
            quake(4.0, "A", "2024-02-10"),
            quake(4.0, "A", "2024-03-15"),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.monthly_data.get("2024-02"), 2);
        assert_eq!(summary.monthly_data.get("2024-03"), 1);
    }

    #[test]
    fn malformed_records_are_skipped_and_reported() {
        let mut missing_epicenter = quake(4.0, "A", "2025-01-01");
        missing_epicenter.epicenter = None;
        let mut missing_date = quake(4.0, "A", "2025-01-01");
        missing_date.date_ad = None;
        let records = [
            quake(4.0, "Dolakha, Bagmati", "2025-02-25"),
            missing_epicenter,
            missing_date,
            quake(4.0, "Dolakha, Bagmati", "Unknown"),
        ];

        let summary = aggregate(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.aggregated, 1);
        assert_eq!(summary.magnitude_ranges.total(), 1);
        assert_eq!(
            summary.skipped,
            vec![
                SkippedRecord {
                    index: 1,
                    reason: SkipReason::MissingEpicenter,
                },
                SkippedRecord {
                    index: 2,
                    reason: SkipReason::MissingDate,
                },
                SkippedRecord {
                    index: 3,
                    reason: SkipReason::InvalidDate {
                        value: "Unknown".to_string(),
                    },
                },
            ]
        );
    }

    #[test]
    fn strict_mode_rejects_the_batch() {
        let records = [
            quake(4.0, "A", "2025-01-01"),
            quake(4.0, "A", "not a date"),
        ];
        let err = aggregate_strict(&records).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::MalformedRecord { index: 1, .. }
        ));
    }

    #[test]
    fn strict_mode_accepts_clean_input() {
        let records = [quake(4.0, "A", "2025-01-01")];
        let summary = aggregate_strict(&records).unwrap();
        assert_eq!(summary.aggregated, 1);
    }
}
