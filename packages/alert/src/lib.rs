#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake alert popup.
//!
//! [`AlertPopup`] is a two-state machine (hidden / visible) driven by
//! alert arrivals and the user's dismiss and view-details actions.
//! Alerts arrive through an [`AlertBus`], which hands each published
//! [`AlertEvent`] to every live [`Subscription`]. [`DemoAlertSource`]
//! publishes one fixed alert after a delay.

pub mod bus;
pub mod demo;

use serde::{Deserialize, Serialize};

pub use bus::{AlertBus, Subscription};
pub use demo::DemoAlertSource;

/// Element id of the popup container.
pub const EARTHQUAKE_ALERT_ID: &str = "earthquakeAlert";
/// Element id of the location field.
pub const ALERT_LOCATION_ID: &str = "alertLocation";
/// Element id of the magnitude field.
pub const ALERT_MAGNITUDE_ID: &str = "alertMagnitude";
/// Element id of the time field.
pub const ALERT_TIME_ID: &str = "alertTime";
/// Element id of the dismiss button.
pub const CLOSE_ALERT_ID: &str = "closeAlert";
/// Element id of the view-details button.
pub const VIEW_ALERT_DETAILS_ID: &str = "viewAlertDetails";

/// Path of the earthquake detail view.
pub const DETAILS_PATH: &str = "/earthquake-details";

/// A newly reported earthquake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    /// Earthquake id, used for the detail link.
    pub id: String,
    /// Human-readable location.
    pub location: String,
    /// Magnitude as displayed.
    pub magnitude: String,
    /// Time as displayed.
    pub time: String,
}

/// Link to the detail view of earthquake `id`.
#[must_use]
pub fn details_url(id: &str) -> String {
    format!("{DETAILS_PATH}?id={}", urlencoding::encode(id))
}

/// Popup visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "alert")]
pub enum AlertPopup {
    /// Nothing shown.
    #[default]
    Hidden,
    /// Showing an alert.
    Visible(AlertEvent),
}

impl AlertPopup {
    /// Shows `event`, replacing whatever alert was visible.
    pub fn show(&mut self, event: AlertEvent) {
        log::info!(
            "Showing earthquake alert {}: M{} at {}",
            event.id,
            event.magnitude,
            event.location
        );
        *self = Self::Visible(event);
    }

    /// Hides the popup.
    pub fn dismiss(&mut self) {
        *self = Self::Hidden;
    }

    /// Hides the popup and returns the detail link for the alert that was
    /// visible. Returns `None` (and stays hidden) when nothing was shown.
    pub fn view_details(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Self::Visible(event) => Some(details_url(&event.id)),
            Self::Hidden => None,
        }
    }

    /// The visible alert, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&AlertEvent> {
        match self {
            Self::Visible(event) => Some(event),
            Self::Hidden => None,
        }
    }

    /// Whether an alert is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> AlertEvent {
        AlertEvent {
            id: id.to_string(),
            location: "Dolakha, Nepal".to_string(),
            magnitude: "4.5".to_string(),
            time: "February 25, 2025, 10:30 AM".to_string(),
        }
    }

    #[test]
    fn starts_hidden() {
        let popup = AlertPopup::default();
        assert!(!popup.is_visible());
        assert!(popup.current().is_none());
    }

    #[test]
    fn show_then_dismiss() {
        let mut popup = AlertPopup::default();
        popup.show(event("a"));
        assert_eq!(popup.current().map(|e| e.id.as_str()), Some("a"));
        popup.dismiss();
        assert_eq!(popup, AlertPopup::Hidden);
    }

    #[test]
    fn newer_alert_replaces_visible_one() {
        let mut popup = AlertPopup::default();
        popup.show(event("a"));
        popup.show(event("b"));
        assert_eq!(popup.current().map(|e| e.id.as_str()), Some("b"));
    }

    #[test]
    fn view_details_links_and_hides() {
        let mut popup = AlertPopup::default();
        popup.show(event("quake 7/2&x"));
        assert_eq!(
            popup.view_details().as_deref(),
            Some("/earthquake-details?id=quake%207%2F2%26x")
        );
        assert!(!popup.is_visible());
    }

    #[test]
    fn view_details_when_hidden_is_noop() {
        let mut popup = AlertPopup::default();
        assert_eq!(popup.view_details(), None);
        assert!(!popup.is_visible());
    }
}
