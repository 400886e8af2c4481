//! Magnitude distribution bar chart.

use quake_map_analytics_models::MagnitudeHistogram;
use quake_map_chart_models::{
    Axis, ChartConfig, ChartData, ChartKind, ChartOptions, Colors, Dataset, Legend, Plugins,
    Scales, Title,
};

use crate::{ChartError, ChartSurface, RenderOutcome};

/// Element id the magnitude chart is drawn into.
pub const MAGNITUDE_CHART_ID: &str = "magnitudeChart";

/// Bar colors, one per bucket from mildest to strongest.
const BUCKET_COLORS: [&str; 5] = ["#2ecc71", "#f1c40f", "#e67e22", "#e74c3c", "#c0392b"];

/// Builds the magnitude distribution chart. Labels follow the fixed
/// bucket order, not the counts.
#[must_use]
pub fn magnitude_chart(histogram: &MagnitudeHistogram) -> ChartConfig {
    let (labels, data): (Vec<String>, Vec<u64>) = histogram
        .iter()
        .map(|(bucket, count)| (bucket.label().to_string(), count))
        .unzip();

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                label: Some("Number of Earthquakes".to_string()),
                background_color: Some(Colors::PerPoint(
                    BUCKET_COLORS.iter().map(ToString::to_string).collect(),
                )),
                border_color: Some("#fff".to_string()),
                border_width: Some(1),
                ..Dataset::new(data)
            }],
        },
        options: ChartOptions {
            responsive: true,
            plugins: Plugins {
                legend: Some(Legend {
                    display: Some(false),
                    position: None,
                }),
                title: Some(Title::shown("Earthquake Magnitude Distribution")),
            },
            scales: Some(Scales {
                x: Axis {
                    begin_at_zero: None,
                    title: Title::shown("Magnitude Range"),
                },
                y: Axis {
                    begin_at_zero: Some(true),
                    title: Title::shown("Number of Earthquakes"),
                },
            }),
        },
    }
}

/// Renders [`magnitude_chart`] into `target`.
///
/// # Errors
///
/// Returns [`ChartError`] if the surface fails to draw.
pub fn render_magnitude_chart<S: ChartSurface + ?Sized>(
    surface: &mut S,
    target: &str,
    histogram: &MagnitudeHistogram,
) -> Result<RenderOutcome, ChartError> {
    crate::render(surface, target, magnitude_chart(histogram))
}
