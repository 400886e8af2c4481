//! Regional distribution doughnut chart.

use quake_map_analytics_models::RegionalCounts;
use quake_map_chart_models::{
    ChartConfig, ChartData, ChartKind, ChartOptions, Colors, Dataset, Legend, LegendPosition,
    Plugins, Title,
};

use crate::{ChartError, ChartSurface, RenderOutcome};

/// Element id the regional chart is drawn into.
pub const REGIONAL_CHART_ID: &str = "regionalChart";

/// Number of regions shown.
pub const TOP_REGIONS: usize = 10;

const SLICE_COLORS: [&str; TOP_REGIONS] = [
    "#e74c3c", "#e67e22", "#f1c40f", "#2ecc71", "#3498db", "#9b59b6", "#1abc9c", "#d35400",
    "#34495e", "#16a085",
];

/// Builds the regional chart from the [`TOP_REGIONS`] busiest regions,
/// by descending count with ties kept in encounter order.
#[must_use]
pub fn regional_chart(regional: &RegionalCounts) -> ChartConfig {
    let (labels, data): (Vec<String>, Vec<u64>) = regional
        .top(TOP_REGIONS)
        .into_iter()
        .map(|entry| (entry.region, entry.count))
        .unzip();

    ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                background_color: Some(Colors::PerPoint(
                    SLICE_COLORS.iter().map(ToString::to_string).collect(),
                )),
                ..Dataset::new(data)
            }],
        },
        options: ChartOptions {
            responsive: true,
            plugins: Plugins {
                legend: Some(Legend {
                    display: None,
                    position: Some(LegendPosition::Right),
                }),
                title: Some(Title::shown("Top 10 Regions by Earthquake Frequency")),
            },
            scales: None,
        },
    }
}

/// Renders [`regional_chart`] into `target`.
///
/// # Errors
///
/// Returns [`ChartError`] if the surface fails to draw.
pub fn render_regional_chart<S: ChartSurface + ?Sized>(
    surface: &mut S,
    target: &str,
    regional: &RegionalCounts,
) -> Result<RenderOutcome, ChartError> {
    crate::render(surface, target, regional_chart(regional))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(regions: &[(&str, u64)]) -> RegionalCounts {
        let mut regional = RegionalCounts::new();
        for (region, n) in regions {
            for _ in 0..*n {
                regional.increment(region);
            }
        }
        regional
    }

    #[test]
    fn keeps_at_most_ten_regions_by_descending_count() {
        let names: Vec<String> = (0..15).map(|i| format!("Region {i:02}")).collect();
        let input: Vec<(&str, u64)> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), (i % 4) as u64 + 1))
            .collect();

        let config = regional_chart(&counts(&input));
        assert_eq!(config.labels().len(), TOP_REGIONS);
        assert!(config.values().windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn ties_keep_encounter_order() {
        let config = regional_chart(&counts(&[("Sindhupalchok", 2), ("Dolakha", 3), ("Gorkha", 2)]));
        assert_eq!(config.labels(), ["Dolakha", "Sindhupalchok", "Gorkha"]);
        assert_eq!(config.values(), [3, 2, 2]);
    }

    #[test]
    fn legend_sits_on_the_right_without_axes() {
        let config = regional_chart(&RegionalCounts::new());
        assert_eq!(config.kind, ChartKind::Doughnut);
        assert!(config.options.scales.is_none());
        assert_eq!(
            config.options.plugins.legend.and_then(|l| l.position),
            Some(LegendPosition::Right)
        );
    }
}
