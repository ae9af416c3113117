//! Chart rendering backed by Plotters.
//!
//! Every chart kind has one generic draw routine over `DrawingBackend`
//! and thin PNG/SVG entry points, so both formats share the same layout
//! code.

use std::path::Path;

use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::error::{Error, Result};
use crate::vis::config::PlotSettings;
use crate::vis::{LineSeriesData, ScatterGroup};

pub use self::backend::{
    plot_category_bars_png, plot_category_bars_svg, plot_heatmap_png, plot_heatmap_svg,
    plot_line_series_png, plot_line_series_svg, plot_scatter_groups_png, plot_scatter_groups_svg,
};

fn rgb(color: (u8, u8, u8)) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

// Padded value bounds for a bar axis: always includes zero so bars have a
// baseline, pads 5% beyond the extremes.
fn bar_bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b)).min(0.0);
    let max = values
        .iter()
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b))
        .max(0.0);
    pad_bounds(min, max)
}

fn pad_bounds(min: f64, max: f64) -> (f64, f64) {
    let range = max - min;
    if range == 0.0 {
        (min - 1.0, max + 1.0)
    } else {
        (min - range * 0.05, max + range * 0.05)
    }
}

fn draw_category_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    categories: &[String],
    values: &[f64],
    horizontal: bool,
    settings: &PlotSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if categories.is_empty() || categories.len() != values.len() {
        return Err(Error::Visualization(format!(
            "Bar chart needs matching non-empty labels and values, got {} and {}",
            categories.len(),
            values.len()
        )));
    }

    root.fill(&WHITE)?;

    let n = categories.len();
    let (v_min, v_max) = bar_bounds(values);

    if horizontal {
        let mut chart = ChartBuilder::on(root)
            .caption(&settings.title, ("sans-serif", 28).into_font())
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(160)
            .build_cartesian_2d(v_min..v_max, (0..n).into_segmented())?;

        let mut mesh = chart.configure_mesh();
        if !settings.show_grid {
            mesh.disable_mesh();
        }
        mesh.disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|value| segment_label(value, categories))
            .x_desc(&settings.x_label)
            .y_desc(&settings.y_label)
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (v, SegmentValue::Exact(i + 1)),
                ],
                rgb(settings.color_at(i)).filled(),
            )
        }))?;
    } else {
        let mut chart = ChartBuilder::on(root)
            .caption(&settings.title, ("sans-serif", 28).into_font())
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), v_min..v_max)?;

        let mut mesh = chart.configure_mesh();
        if !settings.show_grid {
            mesh.disable_mesh();
        }
        mesh.disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|value| segment_label(value, categories))
            .x_desc(&settings.x_label)
            .y_desc(&settings.y_label)
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), v),
                ],
                rgb(settings.color_at(i)).filled(),
            )
        }))?;
    }

    Ok(())
}

fn segment_label(value: &SegmentValue<usize>, categories: &[String]) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) if *i < categories.len() => {
            categories[*i].clone()
        }
        _ => String::new(),
    }
}

fn draw_scatter_groups<DB>(
    root: &DrawingArea<DB, Shift>,
    groups: &[ScatterGroup],
    settings: &PlotSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if groups.iter().all(|g| g.xs.is_empty()) {
        return Err(Error::Visualization("No data to plot".to_string()));
    }

    root.fill(&WHITE)?;

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for group in groups {
        for &x in &group.xs {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
        for &y in &group.ys {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    let (x_min, x_max) = pad_bounds(x_min, x_max);
    let (y_min, y_max) = pad_bounds(y_min, y_max);

    let mut chart = ChartBuilder::on(root)
        .caption(&settings.title, ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.x_desc(&settings.x_label)
        .y_desc(&settings.y_label)
        .draw()?;

    for (idx, group) in groups.iter().enumerate() {
        let color = rgb(settings.color_at(idx));
        let series = chart.draw_series(
            group
                .xs
                .iter()
                .zip(group.ys.iter())
                .map(|(&x, &y)| Circle::new((x, y), 4, color.filled())),
        )?;
        if settings.show_legend {
            series
                .label(&group.name)
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }
    }

    if settings.show_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_line_series<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &[LineSeriesData],
    settings: &PlotSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if series.iter().all(|s| s.dates.is_empty()) {
        return Err(Error::Visualization("No data to plot".to_string()));
    }

    root.fill(&WHITE)?;

    let mut d_min: Option<NaiveDate> = None;
    let mut d_max: Option<NaiveDate> = None;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for line in series {
        for &d in &line.dates {
            d_min = Some(d_min.map_or(d, |m| m.min(d)));
            d_max = Some(d_max.map_or(d, |m| m.max(d)));
        }
        for &v in &line.values {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    let (d_min, d_max) = match (d_min, d_max) {
        (Some(a), Some(b)) if a == b => (a - chrono::Duration::days(1), b + chrono::Duration::days(1)),
        (Some(a), Some(b)) => (a, b),
        _ => return Err(Error::Visualization("No data to plot".to_string())),
    };
    let (y_min, y_max) = pad_bounds(y_min, y_max);

    let mut chart = ChartBuilder::on(root)
        .caption(&settings.title, ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(d_min..d_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.x_desc(&settings.x_label)
        .y_desc(&settings.y_label)
        .draw()?;

    for (idx, line) in series.iter().enumerate() {
        let color = rgb(settings.color_at(idx));
        let drawn = chart.draw_series(LineSeries::new(
            line.dates
                .iter()
                .zip(line.values.iter())
                .map(|(&d, &v)| (d, v)),
            color.stroke_width(2),
        ))?;
        if settings.show_legend {
            drawn
                .label(&line.name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        // Point markers on each observation
        chart.draw_series(
            line.dates
                .iter()
                .zip(line.values.iter())
                .map(|(&d, &v)| Circle::new((d, v), 3, color.filled())),
        )?;
    }

    if settings.show_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_heatmap<DB>(
    root: &DrawingArea<DB, Shift>,
    rows: &[String],
    cols: &[String],
    cells: &[Vec<f64>],
    settings: &PlotSettings,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if rows.is_empty() || cols.is_empty() || cells.len() != rows.len() {
        return Err(Error::Visualization(
            "Heatmap needs a non-empty row-major matrix matching its labels".to_string(),
        ));
    }
    for row in cells {
        if row.len() != cols.len() {
            return Err(Error::Visualization(format!(
                "Heatmap row has {} cells, expected {}",
                row.len(),
                cols.len()
            )));
        }
    }

    root.fill(&WHITE)?;

    let n_rows = rows.len();
    let n_cols = cols.len();

    let flat = cells.iter().flatten().copied();
    let v_min = flat.clone().fold(f64::INFINITY, f64::min);
    let v_max = flat.fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(root)
        .caption(&settings.title, ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(120)
        .y_label_area_size(160)
        .build_cartesian_2d((0..n_cols).into_segmented(), (0..n_rows).into_segmented())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n_cols)
        .x_label_formatter(&|value| segment_label(value, cols))
        .y_labels(n_rows)
        // First data row reads from the top, as the matrix is written
        .y_label_formatter(&|value| match value {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) if *i < n_rows => {
                rows[n_rows - 1 - i].clone()
            }
            _ => String::new(),
        })
        .x_desc(&settings.x_label)
        .y_desc(&settings.y_label)
        .draw()?;

    let base = rgb(settings.color_at(0));
    chart.draw_series((0..n_rows).flat_map(|r| {
        let base = base;
        (0..n_cols).map(move |c| {
            let value = cells[r][c];
            let t = if v_max > v_min {
                (value - v_min) / (v_max - v_min)
            } else {
                0.5
            };
            let shade = RGBColor(
                (255.0 + (base.0 as f64 - 255.0) * t) as u8,
                (255.0 + (base.1 as f64 - 255.0) * t) as u8,
                (255.0 + (base.2 as f64 - 255.0) * t) as u8,
            );
            let y = n_rows - 1 - r;
            Rectangle::new(
                [
                    (SegmentValue::Exact(c), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(c + 1), SegmentValue::Exact(y + 1)),
                ],
                shade.filled(),
            )
        })
    }))?;

    // Numeric annotation in every cell
    let text_style = ("sans-serif", 13).into_font().color(&BLACK);
    chart.draw_series((0..n_rows).flat_map(|r| {
        let text_style = text_style.clone();
        (0..n_cols).map(move |c| {
            let y = n_rows - 1 - r;
            Text::new(
                format!("{:.0}", cells[r][c]),
                (SegmentValue::CenterOf(c), SegmentValue::CenterOf(y)),
                text_style.clone(),
            )
        })
    }))?;

    Ok(())
}

/// Backend module exposing PNG and SVG entry points per chart kind
pub mod backend {
    use super::*;

    /// Plot a categorical bar chart to PNG
    pub fn plot_category_bars_png<P: AsRef<Path>>(
        categories: &[String],
        values: &[f64],
        horizontal: bool,
        path: P,
        settings: &PlotSettings,
    ) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
            .into_drawing_area();
        draw_category_bars(&root, categories, values, horizontal, settings)?;
        root.present()?;
        Ok(())
    }

    /// Plot a categorical bar chart to SVG
    pub fn plot_category_bars_svg<P: AsRef<Path>>(
        categories: &[String],
        values: &[f64],
        horizontal: bool,
        path: P,
        settings: &PlotSettings,
    ) -> Result<()> {
        let root =
            SVGBackend::new(path.as_ref(), (settings.width, settings.height)).into_drawing_area();
        draw_category_bars(&root, categories, values, horizontal, settings)?;
        root.present()?;
        Ok(())
    }

    /// Plot grouped scatter data to PNG
    pub fn plot_scatter_groups_png<P: AsRef<Path>>(
        groups: &[ScatterGroup],
        path: P,
        settings: &PlotSettings,
    ) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
            .into_drawing_area();
        draw_scatter_groups(&root, groups, settings)?;
        root.present()?;
        Ok(())
    }

    /// Plot grouped scatter data to SVG
    pub fn plot_scatter_groups_svg<P: AsRef<Path>>(
        groups: &[ScatterGroup],
        path: P,
        settings: &PlotSettings,
    ) -> Result<()> {
        let root =
            SVGBackend::new(path.as_ref(), (settings.width, settings.height)).into_drawing_area();
        draw_scatter_groups(&root, groups, settings)?;
        root.present()?;
        Ok(())
    }

    /// Plot dated line series to PNG
    pub fn plot_line_series_png<P: AsRef<Path>>(
        series: &[LineSeriesData],
        path: P,
        settings: &PlotSettings,
    ) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
            .into_drawing_area();
        draw_line_series(&root, series, settings)?;
        root.present()?;
        Ok(())
    }

    /// Plot dated line series to SVG
    pub fn plot_line_series_svg<P: AsRef<Path>>(
        series: &[LineSeriesData],
        path: P,
        settings: &PlotSettings,
    ) -> Result<()> {
        let root =
            SVGBackend::new(path.as_ref(), (settings.width, settings.height)).into_drawing_area();
        draw_line_series(&root, series, settings)?;
        root.present()?;
        Ok(())
    }

    /// Plot an annotated heatmap to PNG
    pub fn plot_heatmap_png<P: AsRef<Path>>(
        rows: &[String],
        cols: &[String],
        cells: &[Vec<f64>],
        path: P,
        settings: &PlotSettings,
    ) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
            .into_drawing_area();
        draw_heatmap(&root, rows, cols, cells, settings)?;
        root.present()?;
        Ok(())
    }

    /// Plot an annotated heatmap to SVG
    pub fn plot_heatmap_svg<P: AsRef<Path>>(
        rows: &[String],
        cols: &[String],
        cells: &[Vec<f64>],
        path: P,
        settings: &PlotSettings,
    ) -> Result<()> {
        let root =
            SVGBackend::new(path.as_ref(), (settings.width, settings.height)).into_drawing_area();
        draw_heatmap(&root, rows, cols, cells, settings)?;
        root.present()?;
        Ok(())
    }
}
