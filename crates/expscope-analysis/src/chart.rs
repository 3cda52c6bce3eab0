//! Chart specification structs.
//!
//! These carry everything a renderer needs and nothing it does not:
//! titles, axis labels and the data series. They serialize to JSON as
//! part of an [`crate::ExperimentReport`].

use serde::{Deserialize, Serialize};

/// One labelled group in a box/whisker plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub label: String,
    pub values: Vec<f64>,
}

/// Box/whisker plot: one box per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub groups: Vec<BoxGroup>,
}

/// Correlation heatmap. `values[y][x]` pairs `y_labels[y]` with
/// `x_labels[x]`; `None` marks a degenerate (constant) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Pie chart of label → count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// One series of per-category bar heights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Bar chart; `stacked` asks the renderer for stacked bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub x_labels: Vec<String>,
    pub series: Vec<BarSeries>,
    pub stacked: bool,
}

/// Violin plot: one density outline per group, drawn from the raw
/// samples. `show_box` and `show_points` ask the renderer to overlay
/// an inner box plot and the individual samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolinPlot {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub groups: Vec<BoxGroup>,
    pub show_box: bool,
    pub show_points: bool,
}

/// One named line of (x, y) points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Line chart with one or more series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<LineSeries>,
}
