//! In-memory marker layer that exports `GeoJSON`.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};

use crate::{BoundingBox, MapError, MapView, MarkerLayer, MarkerPoint};

/// Collects placed markers and the fitted viewport.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonLayer {
    view: MapView,
    markers: Vec<MarkerPoint>,
    bounds: Option<BoundingBox>,
}

impl GeoJsonLayer {
    /// Creates an empty layer with the given initial view.
    #[must_use]
    pub const fn new(view: MapView) -> Self {
        Self {
            view,
            markers: Vec::new(),
            bounds: None,
        }
    }

    /// Initial viewport.
    #[must_use]
    pub const fn view(&self) -> &MapView {
        &self.view
    }

    /// Markers placed so far.
    #[must_use]
    pub fn markers(&self) -> &[MarkerPoint] {
        &self.markers
    }

    /// Viewport the layer was last fitted to.
    #[must_use]
    pub const fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Exports the markers as point features with a `label` property.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .markers
            .iter()
            .map(|marker| {
                let point = geo::Point::new(marker.lon, marker.lat);
                let mut properties = JsonObject::new();
                properties.insert(
                    "label".to_string(),
                    serde_json::Value::String(marker.label.clone()),
                );
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&point))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: self
                .bounds
                .map(|b| vec![b.west, b.south, b.east, b.north]),
            features,
            foreign_members: None,
        }
    }
}

impl MarkerLayer for GeoJsonLayer {
    fn add_markers(&mut self, points: &[MarkerPoint]) -> Result<(), MapError> {
        self.markers.extend_from_slice(points);
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: BoundingBox) -> Result<(), MapError> {
        self.bounds = Some(bounds);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place_markers;

    #[test]
    fn exports_points_as_lon_lat() {
        let mut layer = GeoJsonLayer::default();
        place_markers(
            &mut layer,
            vec![MarkerPoint {
                lat: 27.7,
                lon: 85.3,
                label: "Epicenter: Kathmandu, Magnitude: 4.1".to_string(),
            }],
        )
        .unwrap();

        let json = serde_json::to_value(layer.to_feature_collection()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(
            json["features"][0]["geometry"]["coordinates"],
            serde_json::json!([85.3, 27.7])
        );
        assert_eq!(
            json["features"][0]["properties"]["label"],
            "Epicenter: Kathmandu, Magnitude: 4.1"
        );
    }

    #[test]
    fn empty_layer_exports_empty_collection() {
        let collection = GeoJsonLayer::default().to_feature_collection();
        assert!(collection.features.is_empty());
        assert!(collection.bbox.is_none());
    }
}
