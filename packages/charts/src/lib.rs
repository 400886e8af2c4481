#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart renderers for the earthquake summaries.
//!
//! Each renderer turns one summary structure into a fixed [`ChartConfig`]
//! and hands it to a [`ChartSurface`] under a target element id. A
//! surface that does not have the target simply skips the chart; that is
//! reported as [`RenderOutcome::Skipped`], not as an error.

pub mod frequency;
pub mod magnitude;
pub mod regional;

use quake_map_chart_models::ChartConfig;
use thiserror::Error;

pub use frequency::{FREQUENCY_CHART_ID, frequency_chart, render_frequency_chart};
pub use magnitude::{MAGNITUDE_CHART_ID, magnitude_chart, render_magnitude_chart};
pub use regional::{REGIONAL_CHART_ID, TOP_REGIONS, regional_chart, render_regional_chart};

/// Errors that can occur while handing a chart to a surface.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The surface failed to draw the chart.
    #[error("Failed to draw chart '{target}': {message}")]
    Surface {
        /// Target element id.
        target: String,
        /// Description of what went wrong.
        message: String,
    },
}

/// Something charts can be drawn onto (a page, a canvas registry, ...).
pub trait ChartSurface {
    /// Whether an element with the given id exists on this surface.
    fn has_target(&self, target: &str) -> bool;

    /// Draws `config` into the element `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError`] if the surface cannot draw the chart.
    fn draw(&mut self, target: &str, config: ChartConfig) -> Result<(), ChartError>;
}

/// What happened to a chart render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The chart was handed to the surface.
    Rendered,
    /// The target element does not exist; nothing was drawn.
    Skipped,
}

/// Draws `config` into `target` if the surface has it.
///
/// # Errors
///
/// Returns [`ChartError`] if the surface fails to draw.
pub fn render<S: ChartSurface + ?Sized>(
    surface: &mut S,
    target: &str,
    config: ChartConfig,
) -> Result<RenderOutcome, ChartError> {
    if !surface.has_target(target) {
        log::debug!("Chart target '{target}' not present, skipping");
        return Ok(RenderOutcome::Skipped);
    }

    surface.draw(target, config)?;
    Ok(RenderOutcome::Rendered)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use quake_map_chart_models::ChartConfig;

    use crate::{ChartError, ChartSurface};

    /// Records every drawn chart keyed by target.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub targets: Vec<&'static str>,
        pub drawn: BTreeMap<String, ChartConfig>,
        pub fail: bool,
    }

    impl ChartSurface for RecordingSurface {
        fn has_target(&self, target: &str) -> bool {
            self.targets.contains(&target)
        }

        fn draw(&mut self, target: &str, config: ChartConfig) -> Result<(), ChartError> {
            if self.fail {
                return Err(ChartError::Surface {
                    target: target.to_string(),
                    message: "canvas unavailable".to_string(),
                });
            }
            self.drawn.insert(target.to_string(), config);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use quake_map_analytics_models::MagnitudeHistogram;

    use super::test_support::RecordingSurface;
    use super::*;

    #[test]
    fn missing_target_is_skipped() {
        let mut surface = RecordingSurface::default();
        let outcome =
            render_magnitude_chart(&mut surface, MAGNITUDE_CHART_ID, &MagnitudeHistogram::new())
                .unwrap();
        assert_eq!(outcome, RenderOutcome::Skipped);
        assert!(surface.drawn.is_empty());
    }

    #[test]
    fn present_target_is_rendered() {
        let mut surface = RecordingSurface {
            targets: vec![MAGNITUDE_CHART_ID],
            ..RecordingSurface::default()
        };
        let outcome =
            render_magnitude_chart(&mut surface, MAGNITUDE_CHART_ID, &MagnitudeHistogram::new())
                .unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered);
        assert!(surface.drawn.contains_key(MAGNITUDE_CHART_ID));
    }

    #[test]
    fn surface_failure_is_returned() {
        let mut surface = RecordingSurface {
            targets: vec![MAGNITUDE_CHART_ID],
            fail: true,
            ..RecordingSurface::default()
        };
        let err =
            render_magnitude_chart(&mut surface, MAGNITUDE_CHART_ID, &MagnitudeHistogram::new())
                .unwrap_err();
        assert!(err.to_string().contains("magnitudeChart"));
    }
}
