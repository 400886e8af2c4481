#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake dashboard bootstrap.
//!
//! A [`Dashboard`] owns the per-page state (the alert popup) and drives a
//! [`Page`]: it shows the loading indicator, fetches the earthquake list
//! once, hides the indicator again, then places map markers and renders
//! the three charts from the same records. Each section fails on its
//! own; a broken map never prevents the charts and vice versa. A failed
//! fetch leaves both empty and is reported in the [`LoadReport`].

pub mod config;
pub mod page;
pub mod report;

use std::sync::Arc;

use quake_map_alert::{
    ALERT_LOCATION_ID, ALERT_MAGNITUDE_ID, ALERT_TIME_ID, AlertEvent, AlertPopup, CLOSE_ALERT_ID,
    EARTHQUAKE_ALERT_ID, VIEW_ALERT_DETAILS_ID,
};
use quake_map_analytics::aggregate;
use quake_map_analytics_models::EarthquakeSummary;
use quake_map_charts::{
    ChartError, FREQUENCY_CHART_ID, MAGNITUDE_CHART_ID, REGIONAL_CHART_ID, RenderOutcome,
    render_frequency_chart, render_magnitude_chart, render_regional_chart,
};
use quake_map_client::{ClientError, EarthquakeClient, EarthquakeFeed};
use quake_map_map::{MAP_ID, place_earthquakes};
use quake_map_quake_models::EarthquakeRecord;

pub use config::{ConfigError, DashboardConfig};
pub use page::{LOADING_ID, Page, PageError, PageSnapshot, SCROLL_UP_ID, StaticPage};
pub use report::{ChartStatus, ChartsReport, LoadReport, MarkerStatus};

/// Builds the HTTP feed described by `config`.
///
/// # Errors
///
/// Returns [`ClientError`] if the HTTP client cannot be built.
pub fn http_feed(config: &DashboardConfig) -> Result<EarthquakeClient, ClientError> {
    EarthquakeClient::new(&config.client_options())
}

/// Fetches the earthquake list once so every consumer shares it.
///
/// # Errors
///
/// Returns [`ClientError`] if the feed fails.
pub async fn fetch_shared(
    feed: &dyn EarthquakeFeed,
) -> Result<Arc<[EarthquakeRecord]>, ClientError> {
    Ok(feed.fetch_earthquakes().await?.into())
}

/// Per-page dashboard state.
#[derive(Debug, Default)]
pub struct Dashboard {
    popup: AlertPopup,
}

impl Dashboard {
    /// Creates a dashboard with the alert popup hidden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current alert popup state.
    #[must_use]
    pub const fn popup(&self) -> &AlertPopup {
        &self.popup
    }

    /// Fetches earthquakes from `feed` and renders them onto `page`.
    ///
    /// Never fails: fetch errors are logged and returned in the report.
    pub async fn load<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        feed: &dyn EarthquakeFeed,
    ) -> LoadReport {
        set_loading(page, true);
        let fetched = fetch_shared(feed).await;
        set_loading(page, false);

        match fetched {
            Ok(records) => self.render(page, &records),
            Err(e) => {
                log::error!("Error fetching earthquake data from {}: {e}", feed.describe());
                LoadReport::failed(e)
            }
        }
    }

    /// Places markers and renders the charts for already-fetched records.
    pub fn render<P: Page + ?Sized>(&self, page: &mut P, records: &[EarthquakeRecord]) -> LoadReport {
        let markers = render_markers(page, records);
        let summary = aggregate(records);
        let charts = render_charts(page, &summary);

        LoadReport {
            fetched: Some(records.len()),
            error: None,
            summary: Some(summary),
            charts: Some(charts),
            markers: Some(markers),
        }
    }

    /// Shows `event` in the alert popup.
    ///
    /// Returns `false` without changing anything when the page lacks the
    /// popup or its buttons. Missing detail fields are left blank.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the page rejects the update.
    pub fn show_alert<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        event: AlertEvent,
    ) -> Result<bool, PageError> {
        if !alerts_available(page) {
            log::debug!("Alert popup elements not present, ignoring alert {}", event.id);
            return Ok(false);
        }

        for (id, text) in [
            (ALERT_LOCATION_ID, &event.location),
            (ALERT_MAGNITUDE_ID, &event.magnitude),
            (ALERT_TIME_ID, &event.time),
        ] {
            if page.has_element(id) {
                page.set_text(id, text)?;
            }
        }
        page.set_visible(EARTHQUAKE_ALERT_ID, true)?;
        self.popup.show(event);
        Ok(true)
    }

    /// Handles the popup's close button.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the page rejects the update.
    pub fn dismiss_alert<P: Page + ?Sized>(&mut self, page: &mut P) -> Result<(), PageError> {
        self.popup.dismiss();
        if page.has_element(EARTHQUAKE_ALERT_ID) {
            page.set_visible(EARTHQUAKE_ALERT_ID, false)?;
        }
        Ok(())
    }

    /// Handles the popup's view-details button: navigates to the detail
    /// view of the shown alert and hides the popup. Returns the URL, or
    /// `None` when no alert was shown.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the page rejects navigation or the update.
    pub fn view_alert_details<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
    ) -> Result<Option<String>, PageError> {
        let Some(url) = self.popup.view_details() else {
            return Ok(None);
        };
        page.navigate(&url)?;
        if page.has_element(EARTHQUAKE_ALERT_ID) {
            page.set_visible(EARTHQUAKE_ALERT_ID, false)?;
        }
        Ok(Some(url))
    }
}

/// Whether the page has the popup and both of its buttons.
#[must_use]
pub fn alerts_available<P: Page + ?Sized>(page: &P) -> bool {
    [EARTHQUAKE_ALERT_ID, CLOSE_ALERT_ID, VIEW_ALERT_DETAILS_ID]
        .iter()
        .all(|id| page.has_element(id))
}

/// Handles the scroll-up control. Returns `false` when the page has none.
///
/// # Errors
///
/// Returns [`PageError`] if the page cannot scroll.
pub fn scroll_up<P: Page + ?Sized>(page: &mut P) -> Result<bool, PageError> {
    if !page.has_element(SCROLL_UP_ID) {
        return Ok(false);
    }
    page.scroll_to_top()?;
    Ok(true)
}

fn set_loading<P: Page + ?Sized>(page: &mut P, visible: bool) {
    if !page.has_element(LOADING_ID) {
        return;
    }
    if let Err(e) = page.set_visible(LOADING_ID, visible) {
        log::warn!("Failed to toggle loading indicator: {e}");
    }
}

fn render_markers<P: Page + ?Sized>(page: &mut P, records: &[EarthquakeRecord]) -> MarkerStatus {
    if !page.has_element(MAP_ID) {
        log::debug!("Map element not present, skipping markers");
        return MarkerStatus::Skipped;
    }

    match place_earthquakes(page, records) {
        Ok(placement) => MarkerStatus::Placed(placement),
        Err(e) => {
            log::error!("Failed to place earthquake markers: {e}");
            MarkerStatus::Failed {
                message: e.to_string(),
            }
        }
    }
}

fn render_charts<P: Page + ?Sized>(page: &mut P, summary: &EarthquakeSummary) -> ChartsReport {
    ChartsReport {
        magnitude: chart_status(render_magnitude_chart(
            page,
            MAGNITUDE_CHART_ID,
            &summary.magnitude_ranges,
        )),
        frequency: chart_status(render_frequency_chart(
            page,
            FREQUENCY_CHART_ID,
            &summary.monthly_data,
        )),
        regional: chart_status(render_regional_chart(
            page,
            REGIONAL_CHART_ID,
            &summary.regional_data,
        )),
    }
}

fn chart_status(result: Result<RenderOutcome, ChartError>) -> ChartStatus {
    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            log::error!("{e}");
            ChartStatus::Failed {
                message: e.to_string(),
            }
        }
    }
}
