#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Declarative chart configuration types.
//!
//! These mirror the configuration object accepted by Chart.js so a
//! serialized [`ChartConfig`] can be handed to the browser unchanged.
//! Optional fields are omitted from the JSON when unset.

use serde::{Deserialize, Serialize};

/// Chart kind (`type` in the Chart.js configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Vertical bar chart.
    Bar,
    /// Line chart.
    Line,
    /// Doughnut chart.
    Doughnut,
}

/// A complete chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart kind.
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// Labels and datasets.
    pub data: ChartData,
    /// Presentation options.
    pub options: ChartOptions,
}

impl ChartConfig {
    /// Labels of the chart's x axis (or slices, for doughnuts).
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    /// Values of the first dataset.
    #[must_use]
    pub fn values(&self) -> &[u64] {
        self.data
            .datasets
            .first()
            .map(|dataset| dataset.data.as_slice())
            .unwrap_or_default()
    }
}

/// Chart labels and the datasets plotted against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// One label per data point.
    pub labels: Vec<String>,
    /// Plotted series.
    pub datasets: Vec<Dataset>,
}

/// Either one color for the whole series or one per data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Colors {
    /// Same color for every point.
    Single(String),
    /// One color per point, cycled by the renderer.
    PerPoint(Vec<String>),
}

/// A plotted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Series name shown in tooltips and legends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Values, aligned with [`ChartData::labels`].
    pub data: Vec<u64>,
    /// Fill color(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Colors>,
    /// Outline color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    /// Outline width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    /// Whether the area under a line is filled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    /// Bezier curve tension for line charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl Dataset {
    /// Creates a dataset with only values set.
    #[must_use]
    pub const fn new(data: Vec<u64>) -> Self {
        Self {
            label: None,
            data,
            background_color: None,
            border_color: None,
            border_width: None,
            fill: None,
            tension: None,
        }
    }
}

/// Chart-wide presentation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Resize with the container.
    pub responsive: bool,
    /// Legend and title plugins.
    pub plugins: Plugins,
    /// Axis configuration (absent for doughnut charts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

/// Plugin options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugins {
    /// Legend configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    /// Chart title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

/// Where the legend is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    /// Above the chart.
    Top,
    /// Right of the chart.
    Right,
    /// Below the chart.
    Bottom,
    /// Left of the chart.
    Left,
}

/// Legend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    /// Whether the legend is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    /// Legend placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LegendPosition>,
}

/// A displayed title (chart or axis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Whether the title is shown.
    pub display: bool,
    /// Title text.
    pub text: String,
}

impl Title {
    /// Creates a visible title.
    #[must_use]
    pub fn shown(text: impl Into<String>) -> Self {
        Self {
            display: true,
            text: text.into(),
        }
    }
}

/// Cartesian axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scales {
    /// Horizontal axis.
    pub x: Axis,
    /// Vertical axis.
    pub y: Axis,
}

/// A single axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    /// Force the axis to start at zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    /// Axis title.
    pub title: Title,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_chart_js_shape() {
        let config = ChartConfig {
            kind: ChartKind::Bar,
            data: ChartData {
                labels: vec!["a".to_string()],
                datasets: vec![Dataset {
                    background_color: Some(Colors::PerPoint(vec!["#fff".to_string()])),
                    ..Dataset::new(vec![3])
                }],
            },
            options: ChartOptions {
                responsive: true,
                plugins: Plugins {
                    legend: None,
                    title: Some(Title::shown("T")),
                },
                scales: Some(Scales {
                    x: Axis {
                        begin_at_zero: None,
                        title: Title::shown("X"),
                    },
                    y: Axis {
                        begin_at_zero: Some(true),
                        title: Title::shown("Y"),
                    },
                }),
            },
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "bar",
                "data": {
                    "labels": ["a"],
                    "datasets": [{"data": [3], "backgroundColor": ["#fff"]}]
                },
                "options": {
                    "responsive": true,
                    "plugins": {"title": {"display": true, "text": "T"}},
                    "scales": {
                        "x": {"title": {"display": true, "text": "X"}},
                        "y": {"beginAtZero": true, "title": {"display": true, "text": "Y"}}
                    }
                }
            })
        );
    }

    #[test]
    fn values_of_empty_chart_are_empty() {
        let config = ChartConfig {
            kind: ChartKind::Doughnut,
            data: ChartData {
                labels: Vec::new(),
                datasets: Vec::new(),
            },
            options: ChartOptions {
                responsive: true,
                plugins: Plugins {
                    legend: None,
                    title: None,
                },
                scales: None,
            },
        };
        assert!(config.values().is_empty());
        assert!(config.labels().is_empty());
    }
}
