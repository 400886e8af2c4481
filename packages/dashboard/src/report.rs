//! Outcome of a dashboard load.

use quake_map_analytics_models::EarthquakeSummary;
use quake_map_charts::RenderOutcome;
use quake_map_map::MarkerPlacement;
use serde::Serialize;

/// What happened to one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ChartStatus {
    /// Drawn into its target.
    Rendered,
    /// Target element absent.
    Skipped,
    /// The surface failed.
    Failed {
        /// Error message.
        message: String,
    },
}

impl From<RenderOutcome> for ChartStatus {
    fn from(outcome: RenderOutcome) -> Self {
        match outcome {
            RenderOutcome::Rendered => Self::Rendered,
            RenderOutcome::Skipped => Self::Skipped,
        }
    }
}

/// Status of each of the three charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsReport {
    /// Magnitude distribution.
    pub magnitude: ChartStatus,
    /// Monthly frequency.
    pub frequency: ChartStatus,
    /// Regional distribution.
    pub regional: ChartStatus,
}

/// What happened to the map markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum MarkerStatus {
    /// Markers placed.
    Placed(MarkerPlacement),
    /// Map element absent.
    Skipped,
    /// The map layer failed.
    Failed {
        /// Error message.
        message: String,
    },
}

/// Summary of one load: fetch result plus per-section outcomes.
///
/// When the fetch fails only `error` is set; the map and charts stay
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Number of records fetched.
    pub fetched: Option<usize>,
    /// Fetch error message.
    pub error: Option<String>,
    /// Aggregated summaries.
    pub summary: Option<EarthquakeSummary>,
    /// Chart outcomes.
    pub charts: Option<ChartsReport>,
    /// Marker outcome.
    pub markers: Option<MarkerStatus>,
}

impl LoadReport {
    /// A report for a failed fetch.
    #[must_use]
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Whether the fetch succeeded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.error.is_none()
    }
}
