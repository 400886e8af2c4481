#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Earthquake record types and magnitude bucket definitions.
//!
//! This crate defines the record shape served by the `/get-earthquakes`
//! endpoint and the fixed magnitude buckets used across the dashboard.
//! Records are deserialized leniently: a single malformed field never
//! fails the whole array, it just leaves that field empty so downstream
//! consumers can decide whether to skip the record.

pub mod parsing;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Magnitude range used for the histogram chart.
///
/// Ranges are half-open and boundaries belong to the upper bucket, so a
/// magnitude of exactly `3.0` lands in [`MagnitudeBucket::ThreeToFour`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum MagnitudeBucket {
    /// Below 3.0
    #[serde(rename = "0-3")]
    #[strum(serialize = "0-3")]
    ZeroToThree,
    /// 3.0 up to 4.0
    #[serde(rename = "3-4")]
    #[strum(serialize = "3-4")]
    ThreeToFour,
    /// 4.0 up to 5.0
    #[serde(rename = "4-5")]
    #[strum(serialize = "4-5")]
    FourToFive,
    /// 5.0 up to 6.0
    #[serde(rename = "5-6")]
    #[strum(serialize = "5-6")]
    FiveToSix,
    /// 6.0 and above, plus anything that is not a comparable number
    #[serde(rename = "6+")]
    #[strum(serialize = "6+")]
    SixPlus,
}

impl MagnitudeBucket {
    /// All buckets in display order.
    pub const ALL: [Self; 5] = [
        Self::ZeroToThree,
        Self::ThreeToFour,
        Self::FourToFive,
        Self::FiveToSix,
        Self::SixPlus,
    ];

    /// Places a magnitude into its bucket.
    ///
    /// No validation is performed: negative magnitudes fall into the
    /// lowest bucket and `NaN` falls through every comparison into
    /// [`Self::SixPlus`].
    #[must_use]
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude < 3.0 {
            Self::ZeroToThree
        } else if magnitude < 4.0 {
            Self::ThreeToFour
        } else if magnitude < 5.0 {
            Self::FourToFive
        } else if magnitude < 6.0 {
            Self::FiveToSix
        } else {
            Self::SixPlus
        }
    }

    /// Position of this bucket in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The chart label for this bucket (e.g. `"3-4"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ZeroToThree => "0-3",
            Self::ThreeToFour => "3-4",
            Self::FourToFive => "4-5",
            Self::FiveToSix => "5-6",
            Self::SixPlus => "6+",
        }
    }
}

/// An earthquake as served by the backend.
///
/// Only `latitude`, `longitude`, `epicenter`, `magnitude` and `date_ad`
/// are consumed by the dashboard; the remaining fields are passed
/// through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    /// Latitude (WGS84). `None` when the payload did not carry a number.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    /// Longitude (WGS84). `None` when the payload did not carry a number.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    /// Free-text location label, `"<region>, <subregion>"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub epicenter: Option<String>,
    /// Richter magnitude. `NaN` when missing or not a number.
    #[serde(default = "missing_magnitude", deserialize_with = "lenient_magnitude")]
    pub magnitude: f64,
    /// Gregorian date string (e.g. `"2025-02-25"`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_ad: Option<String>,
    /// Bikram Sambat date string.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_bs: Option<String>,
    /// Local (Nepal) time of day.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_local: Option<String>,
    /// UTC time of day.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_utc: Option<String>,
    /// Reporting agency.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    /// Illustration URL for detail views.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

impl EarthquakeRecord {
    /// Creates a record with the fields the dashboard consumes.
    #[must_use]
    pub fn new(
        latitude: f64,
        longitude: f64,
        epicenter: impl Into<String>,
        magnitude: f64,
        date_ad: impl Into<String>,
    ) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            epicenter: Some(epicenter.into()),
            magnitude,
            date_ad: Some(date_ad.into()),
            date_bs: None,
            time_local: None,
            time_utc: None,
            source: None,
            image_url: None,
        }
    }

    /// The magnitude bucket this record falls into.
    #[must_use]
    pub fn bucket(&self) -> MagnitudeBucket {
        MagnitudeBucket::from_magnitude(self.magnitude)
    }

    /// The region key derived from the epicenter, if present.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.epicenter.as_deref().map(parsing::region_key)
    }

    /// The `date_ad` field parsed as a UTC calendar date.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date_ad.as_deref().and_then(parsing::parse_date_ad)
    }

    /// The `"YYYY-MM"` month key for this record, if the date parses.
    #[must_use]
    pub fn month_key(&self) -> Option<String> {
        self.date().map(parsing::month_key)
    }

    /// Returns `(latitude, longitude)` when both are finite numbers.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let latitude = self.latitude?;
        let longitude = self.longitude?;
        if latitude.is_finite() && longitude.is_finite() {
            Some((latitude, longitude))
        } else {
            None
        }
    }
}

/// Decodes each element of an endpoint response on its own.
///
/// Elements that are not records at all (`null`, strings, numbers) are
/// logged and left out; field-level problems are handled by the lenient
/// field decoders and never reject a record.
#[must_use]
pub fn parse_records(values: Vec<serde_json::Value>) -> Vec<EarthquakeRecord> {
    let total = values.len();
    let records: Vec<EarthquakeRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping earthquake entry {index}: {e}");
                None
            }
        })
        .collect();

    let rejected = total - records.len();
    if rejected > 0 {
        log::warn!("{rejected} of {total} earthquake entries were not records");
    }

    records
}

const fn missing_magnitude() -> f64 {
    f64::NAN
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn lenient_magnitude<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or(f64::NAN))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}
