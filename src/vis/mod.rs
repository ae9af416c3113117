//! Chart rendering for shaped report data.
//!
//! `ChartData` is the renderable form a report's shaping step produces;
//! [`render`] hands it to the plotters backend in the configured format.

use std::path::Path;

use chrono::NaiveDate;

use crate::core::error::Result;

pub mod config;
pub mod plotters;

pub use config::{OutputType, PlotKind, PlotSettings};

/// One named point cloud of a scatter chart
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub name: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// One named polyline of a line chart
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeriesData {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

/// Shaped, renderable chart data
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// One bar per category, in input order
    Bars {
        categories: Vec<String>,
        values: Vec<f64>,
        horizontal: bool,
    },
    /// One colored point cloud per group
    Scatter { groups: Vec<ScatterGroup> },
    /// One polyline per named series over dates
    Lines { series: Vec<LineSeriesData> },
    /// Row/column labeled matrix; `cells[r][c]` belongs to
    /// (`rows[r]`, `cols[c]`)
    Heatmap {
        rows: Vec<String>,
        cols: Vec<String>,
        cells: Vec<Vec<f64>>,
    },
}

/// Render chart data to a file in the format given by the settings
pub fn render<P: AsRef<Path>>(data: &ChartData, settings: &PlotSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    match (data, settings.output_type) {
        (
            ChartData::Bars {
                categories,
                values,
                horizontal,
            },
            OutputType::Png,
        ) => plotters::backend::plot_category_bars_png(categories, values, *horizontal, path, settings),
        (
            ChartData::Bars {
                categories,
                values,
                horizontal,
            },
            OutputType::Svg,
        ) => plotters::backend::plot_category_bars_svg(categories, values, *horizontal, path, settings),
        (ChartData::Scatter { groups }, OutputType::Png) => {
            plotters::backend::plot_scatter_groups_png(groups, path, settings)
        }
        (ChartData::Scatter { groups }, OutputType::Svg) => {
            plotters::backend::plot_scatter_groups_svg(groups, path, settings)
        }
        (ChartData::Lines { series }, OutputType::Png) => {
            plotters::backend::plot_line_series_png(series, path, settings)
        }
        (ChartData::Lines { series }, OutputType::Svg) => {
            plotters::backend::plot_line_series_svg(series, path, settings)
        }
        (ChartData::Heatmap { rows, cols, cells }, OutputType::Png) => {
            plotters::backend::plot_heatmap_png(rows, cols, cells, path, settings)
        }
        (ChartData::Heatmap { rows, cols, cells }, OutputType::Svg) => {
            plotters::backend::plot_heatmap_svg(rows, cols, cells, path, settings)
        }
    }
}
