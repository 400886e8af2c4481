//! The page the dashboard drives.
//!
//! [`Page`] is the element contract: lookups by id, visibility, text,
//! navigation and scrolling, plus drawing charts ([`ChartSurface`]) and
//! placing map pins ([`MarkerLayer`]). [`StaticPage`] implements it in
//! memory and can be exported as a [`PageSnapshot`].

use std::collections::{BTreeMap, BTreeSet};

use quake_map_alert::{
    ALERT_LOCATION_ID, ALERT_MAGNITUDE_ID, ALERT_TIME_ID, CLOSE_ALERT_ID, EARTHQUAKE_ALERT_ID,
    VIEW_ALERT_DETAILS_ID,
};
use quake_map_chart_models::ChartConfig;
use quake_map_charts::{
    ChartError, ChartSurface, FREQUENCY_CHART_ID, MAGNITUDE_CHART_ID, REGIONAL_CHART_ID,
};
use quake_map_map::{BoundingBox, GeoJsonLayer, MAP_ID, MapError, MapView, MarkerLayer, MarkerPoint};
use serde::Serialize;

/// Element id of the loading indicator.
pub const LOADING_ID: &str = "loading";
/// Element id of the scroll-to-top control.
pub const SCROLL_UP_ID: &str = "scrollUp";

/// Every element id the dashboard knows about.
pub const ALL_ELEMENT_IDS: &[&str] = &[
    MAP_ID,
    LOADING_ID,
    SCROLL_UP_ID,
    EARTHQUAKE_ALERT_ID,
    ALERT_LOCATION_ID,
    ALERT_MAGNITUDE_ID,
    ALERT_TIME_ID,
    CLOSE_ALERT_ID,
    VIEW_ALERT_DETAILS_ID,
    MAGNITUDE_CHART_ID,
    FREQUENCY_CHART_ID,
    REGIONAL_CHART_ID,
];

/// Errors reported by a [`Page`].
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The element does not exist.
    #[error("Element '{id}' not found")]
    MissingElement {
        /// Requested element id.
        id: String,
    },
}

/// The element contract the dashboard relies on.
pub trait Page: ChartSurface + MarkerLayer {
    /// Whether an element with the given id exists.
    fn has_element(&self, id: &str) -> bool;

    /// Shows or hides an element.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the element does not exist.
    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), PageError>;

    /// Replaces an element's text.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the element does not exist.
    fn set_text(&mut self, id: &str, text: &str) -> Result<(), PageError>;

    /// Navigates to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if navigation is not possible.
    fn navigate(&mut self, url: &str) -> Result<(), PageError>;

    /// Scrolls back to the top of the page.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the page cannot scroll.
    fn scroll_to_top(&mut self) -> Result<(), PageError>;
}

/// In-memory [`Page`].
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    elements: BTreeSet<String>,
    visible: BTreeMap<String, bool>,
    text: BTreeMap<String, String>,
    charts: BTreeMap<String, ChartConfig>,
    layer: GeoJsonLayer,
    navigations: Vec<String>,
    scroll_position: u32,
}

impl StaticPage {
    /// A page with every known element and the given map view.
    #[must_use]
    pub fn new(view: MapView) -> Self {
        Self::with_elements(view, ALL_ELEMENT_IDS.iter().copied())
    }

    /// A page containing only `ids`.
    #[must_use]
    pub fn with_elements<'a>(view: MapView, ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            elements: ids.into_iter().map(str::to_string).collect(),
            layer: GeoJsonLayer::new(view),
            ..Self::default()
        }
    }

    /// Whether an element is currently shown (elements start hidden).
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.get(id).copied().unwrap_or(false)
    }

    /// An element's text, if any was set.
    #[must_use]
    pub fn text(&self, id: &str) -> Option<&str> {
        self.text.get(id).map(String::as_str)
    }

    /// The chart drawn into `id`, if any.
    #[must_use]
    pub fn chart(&self, id: &str) -> Option<&ChartConfig> {
        self.charts.get(id)
    }

    /// Placed map markers.
    #[must_use]
    pub fn markers(&self) -> &[MarkerPoint] {
        self.layer.markers()
    }

    /// URLs navigated to, oldest first.
    #[must_use]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Current vertical scroll offset.
    #[must_use]
    pub const fn scroll_position(&self) -> u32 {
        self.scroll_position
    }

    /// Simulates the user scrolling down by `amount`.
    pub const fn scroll_by(&mut self, amount: u32) {
        self.scroll_position = self.scroll_position.saturating_add(amount);
    }

    /// Exports the page state.
    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            map_view: self.layer.view().clone(),
            map_bounds: self.layer.bounds(),
            markers: self.layer.to_feature_collection(),
            charts: self.charts.clone(),
            visible: self
                .visible
                .iter()
                .filter(|(_, shown)| **shown)
                .map(|(id, _)| id.clone())
                .collect(),
            text: self.text.clone(),
            navigations: self.navigations.clone(),
        }
    }

    fn require(&self, id: &str) -> Result<(), PageError> {
        if self.elements.contains(id) {
            Ok(())
        } else {
            Err(PageError::MissingElement { id: id.to_string() })
        }
    }
}

impl ChartSurface for StaticPage {
    fn has_target(&self, target: &str) -> bool {
        self.has_element(target)
    }

    fn draw(&mut self, target: &str, config: ChartConfig) -> Result<(), ChartError> {
        self.require(target).map_err(|e| ChartError::Surface {
            target: target.to_string(),
            message: e.to_string(),
        })?;
        self.charts.insert(target.to_string(), config);
        Ok(())
    }
}

impl MarkerLayer for StaticPage {
    fn add_markers(&mut self, points: &[MarkerPoint]) -> Result<(), MapError> {
        self.layer.add_markers(points)
    }

    fn fit_bounds(&mut self, bounds: BoundingBox) -> Result<(), MapError> {
        self.layer.fit_bounds(bounds)
    }
}

impl Page for StaticPage {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), PageError> {
        self.require(id)?;
        self.visible.insert(id.to_string(), visible);
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), PageError> {
        self.require(id)?;
        self.text.insert(id.to_string(), text.to_string());
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        log::info!("Navigating to {url}");
        self.navigations.push(url.to_string());
        Ok(())
    }

    fn scroll_to_top(&mut self) -> Result<(), PageError> {
        self.scroll_position = 0;
        Ok(())
    }
}

/// Serializable state of a [`StaticPage`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Initial map viewport.
    pub map_view: MapView,
    /// Viewport fitted to the markers, if any were placed.
    pub map_bounds: Option<BoundingBox>,
    /// Placed markers.
    pub markers: geojson::FeatureCollection,
    /// Charts keyed by target element id.
    pub charts: BTreeMap<String, ChartConfig>,
    /// Ids of visible elements.
    pub visible: Vec<String>,
    /// Element text keyed by id.
    pub text: BTreeMap<String, String>,
    /// URLs navigated to.
    pub navigations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_elements_are_reported() {
        let mut page = StaticPage::with_elements(MapView::default(), [LOADING_ID]);
        assert!(page.set_visible(LOADING_ID, true).is_ok());
        assert!(matches!(
            page.set_text(ALERT_TIME_ID, "now"),
            Err(PageError::MissingElement { .. })
        ));
        assert!(!page.has_target(MAGNITUDE_CHART_ID));
    }

    #[test]
    fn snapshot_lists_only_visible_elements() {
        let mut page = StaticPage::new(MapView::default());
        page.set_visible(LOADING_ID, true).unwrap();
        page.set_visible(EARTHQUAKE_ALERT_ID, false).unwrap();
        let snapshot = page.snapshot();
        assert_eq!(snapshot.visible, vec![LOADING_ID.to_string()]);
    }

    #[test]
    fn scroll_to_top_resets_position() {
        let mut page = StaticPage::new(MapView::default());
        page.scroll_by(640);
        page.scroll_to_top().unwrap();
        assert_eq!(page.scroll_position(), 0);
    }
}
