#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Earthquake marker placement for the dashboard map.
//!
//! The map itself is an external collaborator behind [`MarkerLayer`].
//! This crate turns records into [`MarkerPoint`]s, drops points whose
//! coordinates are not finite numbers, places the rest and fits the
//! viewport to their bounding box. [`GeoJsonLayer`] is an in-memory layer
//! that exports the placed markers as a `GeoJSON` feature collection.

pub mod geojson_layer;

use geo::{BoundingRect as _, MultiPoint, Point};
use quake_map_quake_models::EarthquakeRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use geojson_layer::GeoJsonLayer;

/// Element id of the map container.
pub const MAP_ID: &str = "map";

/// Errors reported by a [`MarkerLayer`].
#[derive(Debug, Error)]
pub enum MapError {
    /// The layer rejected an operation.
    #[error("Map layer error: {message}")]
    Layer {
        /// Description of what went wrong.
        message: String,
    },
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    #[must_use]
    pub fn around(points: &[MarkerPoint]) -> Option<Self> {
        let multi: MultiPoint<f64> = points
            .iter()
            .map(|p| Point::new(p.lon, p.lat))
            .collect::<Vec<_>>()
            .into();
        multi
            .bounding_rect()
            .map(|rect| Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}

/// Initial map viewport and tile source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// `(latitude, longitude)` of the initial center.
    pub center: (f64, f64),
    /// Initial zoom level.
    pub zoom: u8,
    /// Slippy-map tile URL template.
    pub tile_url: String,
    /// Tile attribution text.
    pub attribution: String,
}

impl Default for MapView {
    /// Centered on Nepal with `OpenStreetMap` tiles.
    fn default() -> Self {
        Self {
            center: (27.7172, 85.3240),
            zoom: 7,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

/// A pin to place on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Popup text.
    pub label: String,
}

impl MarkerPoint {
    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<&EarthquakeRecord> for MarkerPoint {
    /// Missing coordinates become `NaN` so validation drops them.
    fn from(record: &EarthquakeRecord) -> Self {
        Self {
            lat: record.latitude.unwrap_or(f64::NAN),
            lon: record.longitude.unwrap_or(f64::NAN),
            label: marker_label(record),
        }
    }
}

/// Popup text for an earthquake marker.
#[must_use]
pub fn marker_label(record: &EarthquakeRecord) -> String {
    let epicenter = record.epicenter.as_deref().unwrap_or("Unknown");
    if record.magnitude.is_nan() {
        format!("Epicenter: {epicenter}, Magnitude: unknown")
    } else {
        format!("Epicenter: {epicenter}, Magnitude: {}", record.magnitude)
    }
}

/// A map that can show pins.
pub trait MarkerLayer {
    /// Places pins on the map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the layer cannot place the markers.
    fn add_markers(&mut self, points: &[MarkerPoint]) -> Result<(), MapError>;

    /// Moves the viewport so `bounds` is fully visible.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the layer cannot change its viewport.
    fn fit_bounds(&mut self, bounds: BoundingBox) -> Result<(), MapError>;
}

/// Result of placing markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPlacement {
    /// Markers handed to the layer.
    pub placed: usize,
    /// Points dropped for invalid coordinates.
    pub dropped: usize,
    /// Viewport the layer was fitted to, if any marker was placed.
    pub bounds: Option<BoundingBox>,
}

/// Places the valid `points` on `layer` and fits the viewport to them.
///
/// Points with non-finite coordinates are dropped with a warning; they
/// never fail the batch.
///
/// # Errors
///
/// Returns [`MapError`] if the layer fails.
pub fn place_markers<L: MarkerLayer + ?Sized>(
    layer: &mut L,
    points: Vec<MarkerPoint>,
) -> Result<MarkerPlacement, MapError> {
    let total = points.len();
    let valid: Vec<MarkerPoint> = points
        .into_iter()
        .filter(|point| {
            let ok = point.is_valid();
            if !ok {
                log::warn!(
                    "Invalid coordinates ({}, {}) for marker '{}', dropping",
                    point.lat,
                    point.lon,
                    point.label
                );
            }
            ok
        })
        .collect();
    let dropped = total - valid.len();

    if valid.is_empty() {
        return Ok(MarkerPlacement {
            placed: 0,
            dropped,
            bounds: None,
        });
    }

    layer.add_markers(&valid)?;

    let bounds = BoundingBox::around(&valid);
    if let Some(bounds) = bounds {
        layer.fit_bounds(bounds)?;
    }

    log::info!("Placed {} earthquake markers ({dropped} dropped)", valid.len());

    Ok(MarkerPlacement {
        placed: valid.len(),
        dropped,
        bounds,
    })
}

/// Converts `records` to markers and places them.
///
/// # Errors
///
/// Returns [`MapError`] if the layer fails.
pub fn place_earthquakes<L: MarkerLayer + ?Sized>(
    layer: &mut L,
    records: &[EarthquakeRecord],
) -> Result<MarkerPlacement, MapError> {
    place_markers(layer, records.iter().map(MarkerPoint::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> MarkerPoint {
        MarkerPoint {
            lat,
            lon,
            label: "test".to_string(),
        }
    }

    #[test]
    fn nan_coordinates_are_dropped() {
        let mut layer = GeoJsonLayer::default();
        let placement =
            place_markers(&mut layer, vec![point(f64::NAN, 85.0), point(27.7, 85.3)]).unwrap();
        assert_eq!(placement.placed, 1);
        assert_eq!(placement.dropped, 1);
        assert_eq!(layer.markers().len(), 1);
    }

    #[test]
    fn infinite_coordinates_are_dropped() {
        let mut layer = GeoJsonLayer::default();
        let placement = place_markers(&mut layer, vec![point(27.0, f64::INFINITY)]).unwrap();
        assert_eq!(placement.placed, 0);
        assert_eq!(placement.dropped, 1);
        assert_eq!(placement.bounds, None);
    }

    #[test]
    fn viewport_fits_all_markers() {
        let mut layer = GeoJsonLayer::default();
        let placement = place_markers(
            &mut layer,
            vec![point(26.5, 87.3), point(29.3, 80.6), point(27.7, 85.3)],
        )
        .unwrap();
        let expected = BoundingBox::new(80.6, 26.5, 87.3, 29.3);
        assert_eq!(placement.bounds, Some(expected));
        assert_eq!(layer.bounds(), Some(expected));
    }

    #[test]
    fn records_without_coordinates_are_dropped() {
        let mut record = EarthquakeRecord::new(27.7, 85.3, "Kathmandu, Bagmati", 4.1, "2025-01-01");
        record.latitude = None;
        let good = EarthquakeRecord::new(28.2, 83.98, "Pokhara", 3.4, "2025-01-02");

        let mut layer = GeoJsonLayer::default();
        let placement = place_earthquakes(&mut layer, &[record, good]).unwrap();
        assert_eq!(placement.placed, 1);
        assert_eq!(layer.markers()[0].label, "Epicenter: Pokhara, Magnitude: 3.4");
    }

    #[test]
    fn default_view_is_centered_on_nepal() {
        let view = MapView::default();
        assert_eq!(view.center, (27.7172, 85.3240));
        assert_eq!(view.zoom, 7);
    }
}
