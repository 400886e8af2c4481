//! Monthly frequency line chart.

use quake_map_analytics_models::MonthlyCounts;
use quake_map_chart_models::{
    Axis, ChartConfig, ChartData, ChartKind, ChartOptions, Colors, Dataset, Plugins, Scales,
    Title,
};

use crate::{ChartError, ChartSurface, RenderOutcome};

/// Element id the frequency chart is drawn into.
pub const FREQUENCY_CHART_ID: &str = "frequencyChart";

/// Builds the monthly frequency chart with months in ascending order.
#[must_use]
pub fn frequency_chart(monthly: &MonthlyCounts) -> ChartConfig {
    let (labels, data): (Vec<String>, Vec<u64>) = monthly
        .iter()
        .map(|(month, count)| (month.to_string(), count))
        .unzip();

    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                label: Some("Earthquakes per Month".to_string()),
                border_color: Some("#3498db".to_string()),
                background_color: Some(Colors::Single("rgba(52, 152, 219, 0.1)".to_string())),
                fill: Some(true),
                tension: Some(0.4),
                ..Dataset::new(data)
            }],
        },
        options: ChartOptions {
            responsive: true,
            plugins: Plugins {
                legend: None,
                title: Some(Title::shown("Monthly Earthquake Frequency")),
            },
            scales: Some(Scales {
                x: Axis {
                    begin_at_zero: None,
                    title: Title::shown("Month"),
                },
                y: Axis {
                    begin_at_zero: Some(true),
                    title: Title::shown("Number of Earthquakes"),
                },
            }),
        },
    }
}

/// Renders [`frequency_chart`] into `target`.
///
/// # Errors
///
/// Returns [`ChartError`] if the surface fails to draw.
pub fn render_frequency_chart<S: ChartSurface + ?Sized>(
    surface: &mut S,
    target: &str,
    monthly: &MonthlyCounts,
) -> Result<RenderOutcome, ChartError> {
    crate::render(surface, target, frequency_chart(monthly))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_are_sorted_regardless_of_input_order() {
        let mut monthly = MonthlyCounts::new();
        for month in ["2025-03", "2023-12", "2025-01", "2023-12", "2024-06"] {
            monthly.increment(month.to_string());
        }

        let config = frequency_chart(&monthly);
        assert_eq!(config.kind, ChartKind::Line);
        assert_eq!(config.labels(), ["2023-12", "2024-06", "2025-01", "2025-03"]);
        assert_eq!(config.values(), [2, 1, 1, 1]);
    }

    #[test]
    fn empty_counts_produce_empty_series() {
        let config = frequency_chart(&MonthlyCounts::new());
        assert!(config.labels().is_empty());
        assert!(config.values().is_empty());
    }
}
