//! Default render pipeline.
//!
//! Reserves space top-down: title, legend, axis gutters. Whatever remains is
//! handed to the series renderer as the series painter.

use tracing::debug;

use crate::charts::axis::{AxisPaint, render_axis};
use crate::charts::legend::{LegendItem, legend_items, render_legend};
use crate::charts::options::{ChartOption, GenericSeries, YAxisOption};
use crate::charts::title::render_title;
use crate::core::geometry::degrees_to_radians;
use crate::core::{AxisRange, Bounds, Point, RangeOptions, Side, solve_value_range};
use crate::error::{ChartError, ChartResult};
use crate::render::Painter;

/// Data points closer than this many pixels default to tick-aligned placement.
pub const BOUNDARY_GAP_MIN_SPACING: i32 = 40;

/// Which axis carries categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLayout {
    /// Categories along x, values along y (line, bar, candlestick).
    Vertical,
    /// Values along x, categories along y (horizontal bar).
    Horizontal,
}

/// Per-chart-type pipeline settings.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub layout: AxisLayout,
    /// Boundary-gap default for the category axis when the caller leaves it unset.
    pub boundary_gap: Option<bool>,
}

impl PipelineSettings {
    #[must_use]
    pub fn vertical() -> Self {
        Self {
            layout: AxisLayout::Vertical,
            boundary_gap: None,
        }
    }

    /// Bars and candles sit between ticks unless explicitly disabled.
    #[must_use]
    pub fn vertical_gapped() -> Self {
        Self {
            layout: AxisLayout::Vertical,
            boundary_gap: Some(true),
        }
    }

    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            layout: AxisLayout::Horizontal,
            boundary_gap: Some(true),
        }
    }
}

/// Output of [`default_render`].
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Interior region for series drawing.
    pub series_painter: Painter,
    /// The painter the pipeline ran on.
    pub parent: Painter,
    /// Horizontal axis: categories for vertical layouts, values for horizontal ones.
    pub x_range: AxisRange,
    /// Vertical axes by index: values for vertical layouts, one category axis for horizontal ones.
    pub y_ranges: Vec<AxisRange>,
}

impl RenderResult {
    /// Value range of y axis `index`.
    pub fn y_range(&self, index: usize) -> ChartResult<&AxisRange> {
        self.y_ranges
            .get(index)
            .ok_or_else(|| ChartError::options(format!("invalid y-axis index: {index}")))
    }

    /// Pixel of every sample of `values` in the series painter, nulls kept as null points.
    #[must_use]
    pub fn project(&self, values: &[Option<f64>], y_range: &AxisRange) -> Vec<Point> {
        let (width, height) = (self.series_painter.width(), self.series_painter.height());
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let x = self.x_range.index_center(index, width);
                match value.filter(|v| v.is_finite()) {
                    Some(v) => Point::new(x, y_range.value_to_y(v, height)),
                    None => Point::null(x),
                }
            })
            .collect()
    }
}

/// Paints the title and legend and returns the painter left below/beside them.
pub fn render_header(painter: &Painter, option: &ChartOption, series: &[LegendItem]) -> Painter {
    let title_box = render_title(painter, &option.title);
    let items = legend_items(&option.legend, series);
    let legend_box = render_legend(painter, &option.legend, &items);

    let (width, height) = (painter.width(), painter.height());
    let mut area = Bounds::new(0, 0, width, height);
    for reserved in [title_box, legend_box] {
        if reserved.is_zero() || !reserved.is_set {
            continue;
        }
        if reserved.width() >= reserved.height() || reserved.width() > width / 2 {
            if reserved.top + reserved.height() / 2 <= height / 2 {
                area.top = area.top.max(reserved.bottom);
            } else {
                area.bottom = area.bottom.min(reserved.top);
            }
        } else if reserved.left + reserved.width() / 2 <= width / 2 {
            area.left = area.left.max(reserved.right);
        } else {
            area.right = area.right.min(reserved.left);
        }
    }
    // Breathing room between the header and the plot.
    if area.top > 0 {
        area.top += 10;
    }
    area.bottom = area.bottom.max(area.top);
    area.right = area.right.max(area.left);
    debug!(?area, "header reserved");
    painter.sub_box(area)
}

/// Legend entries for generic series, colored from the theme.
#[must_use]
pub fn series_legend_items(painter: &Painter, series: &[GenericSeries]) -> Vec<LegendItem> {
    series
        .iter()
        .enumerate()
        .map(|(index, s)| LegendItem {
            name: s.name.clone(),
            color: s.color.unwrap_or_else(|| painter.theme().series_color(index)),
        })
        .collect()
}

/// Boundary-gap resolution: explicit setting, then chart-type default, then
/// `false` for dense data (`width / count ≤ 40`).
#[must_use]
pub fn resolve_boundary_gap(explicit: Option<bool>, chart_default: Option<bool>, width: i32, count: usize) -> bool {
    if let Some(explicit) = explicit {
        return explicit;
    }
    if let Some(default) = chart_default {
        return default;
    }
    !(count > 1 && width / count as i32 <= BOUNDARY_GAP_MIN_SPACING)
}

fn category_count(series: &[GenericSeries], labels: &[String]) -> usize {
    series
        .iter()
        .map(|s| s.values.len())
        .max()
        .unwrap_or(0)
        .max(labels.len())
}

fn category_labels(labels: &[String], count: usize) -> Vec<String> {
    let mut labels = labels.to_vec();
    labels.resize(count, String::new());
    labels
}

fn y_range_options(option: &ChartOption, axis: &YAxisOption, axis_size: i32) -> RangeOptions {
    RangeOptions {
        min: axis.min,
        max: axis.max,
        unit: axis.unit,
        label_count: axis.label_count,
        label_count_adjustment: axis.label_count_adjustment,
        padding_scale: axis.range_value_padding_scale,
        axis_size_px: Some(axis_size),
        formatter: axis.formatter.clone().or_else(|| option.value_formatter.clone()),
    }
}

fn x_axis_paint(option: &ChartOption, painter: &Painter, labels: Vec<String>, boundary_gap: bool) -> AxisPaint {
    let x_axis = &option.x_axis;
    AxisPaint {
        boundary_gap,
        font_style: x_axis.font_style.clone(),
        label_rotation: degrees_to_radians(x_axis.label_rotation),
        label_offset: x_axis.label_offset,
        label_count: x_axis.label_count,
        label_skip_count: x_axis.label_skip_count,
        tick_length: x_axis.tick_length,
        label_margin: x_axis.label_margin,
        stroke_color: x_axis.stroke_color.unwrap_or(painter.theme().axis_stroke_color),
        split_line_show: x_axis.split_line_show,
        title: x_axis.title.clone(),
        ..AxisPaint::new(x_axis.position, labels, painter)
    }
}

fn y_axis_paint(axis: &YAxisOption, painter: &Painter, range: &AxisRange, index: usize) -> AxisPaint {
    AxisPaint {
        font_style: axis.font_style.clone(),
        label_skip_count: axis.label_skip_count,
        tick_length: 0,
        label_margin: axis.label_margin,
        // Value axes rely on split lines; the spine is opt-in.
        stroke_width: if axis.spine_line_show.unwrap_or(false) { 1.0 } else { -1.0 },
        split_line_show: axis.split_line_show.unwrap_or(index == 0),
        title: axis.title.clone(),
        ..AxisPaint::for_range(axis.position.unwrap_or(Side::Left), range, painter)
    }
}

/// Runs the pipeline for an axis chart and returns the series region plus ranges.
pub fn default_render(
    painter: &Painter,
    option: &ChartOption,
    series: &[GenericSeries],
    settings: PipelineSettings,
) -> ChartResult<RenderResult> {
    let legend = series_legend_items(painter, series);
    let area = render_header(painter, option, &legend);
    match settings.layout {
        AxisLayout::Vertical => render_vertical(painter, &area, option, series, settings),
        AxisLayout::Horizontal => render_horizontal(painter, &area, option, series),
    }
}

fn render_vertical(
    parent: &Painter,
    area: &Painter,
    option: &ChartOption,
    series: &[GenericSeries],
    settings: PipelineSettings,
) -> ChartResult<RenderResult> {
    let (width, height) = (area.width(), area.height());
    let count = category_count(series, &option.x_axis.data);
    let labels = category_labels(&option.x_axis.data, count);
    let boundary_gap = resolve_boundary_gap(option.x_axis.boundary_gap, settings.boundary_gap, width, count);

    let x_shown = option.x_axis.show.unwrap_or(true);
    let x_paint = x_axis_paint(option, area, labels.clone(), boundary_gap);
    let x_height = if x_shown { x_paint.thickness(area) } else { 0 };
    let x_on_top = option.x_axis.position == Side::Top;
    let axis_size = (height - x_height).max(1);

    let y_axes = option.resolved_y_axes();
    let mut y_ranges = Vec::with_capacity(y_axes.len());
    for (index, axis) in y_axes.iter().enumerate() {
        let values = series
            .iter()
            .filter(|s| s.y_axis_index == index)
            .flat_map(GenericSeries::range_values);
        y_ranges.push(solve_value_range(values, &y_range_options(option, axis, axis_size))?);
    }

    let y_paints: Vec<(AxisPaint, bool)> = y_axes
        .iter()
        .zip(&y_ranges)
        .enumerate()
        .map(|(index, (axis, range))| (y_axis_paint(axis, area, range, index), axis.show.unwrap_or(true)))
        .collect();
    let gutter = |side: Side| -> i32 {
        y_paints
            .iter()
            .filter(|(paint, shown)| *shown && paint.position == side)
            .map(|(paint, _)| paint.thickness(area))
            .max()
            .unwrap_or(0)
    };
    let (left_width, right_width) = (gutter(Side::Left), gutter(Side::Right));
    let (plot_top, plot_bottom) = if x_on_top {
        (x_height, height)
    } else {
        (0, height - x_height)
    };
    debug!(width, height, x_height, left_width, right_width, "axis gutters measured");

    for (paint, shown) in &y_paints {
        if !shown {
            continue;
        }
        let region = match paint.position {
            Side::Right => Bounds::new(left_width, plot_top, width, plot_bottom),
            _ => Bounds::new(0, plot_top, width - right_width, plot_bottom),
        };
        render_axis(&area.sub_box(region), paint);
    }
    if x_shown {
        render_axis(
            &area.sub_box(Bounds::new(left_width, 0, width - right_width, height)),
            &x_paint,
        );
    }

    let series_painter = area.sub_box(Bounds::new(left_width, plot_top, width - right_width, plot_bottom));
    Ok(RenderResult {
        series_painter,
        parent: parent.clone(),
        x_range: AxisRange::category(labels, boundary_gap),
        y_ranges,
    })
}

fn render_horizontal(
    parent: &Painter,
    area: &Painter,
    option: &ChartOption,
    series: &[GenericSeries],
) -> ChartResult<RenderResult> {
    let (width, height) = (area.width(), area.height());
    let y_axis = option.resolved_y_axes().into_iter().next().unwrap_or_default();
    let count = category_count(series, &y_axis.data);
    let labels = category_labels(&y_axis.data, count);
    let category_range = AxisRange::category(labels, true);

    let x_axis = &option.x_axis;
    let x_options = RangeOptions {
        min: x_axis.min,
        max: x_axis.max,
        unit: x_axis.unit,
        label_count: x_axis.label_count,
        axis_size_px: Some(width),
        formatter: x_axis.formatter.clone().or_else(|| option.value_formatter.clone()),
        ..RangeOptions::default()
    };
    let values = series.iter().flat_map(GenericSeries::range_values);
    let x_range = solve_value_range(values, &x_options)?;

    let x_shown = x_axis.show.unwrap_or(true);
    let mut x_paint = x_axis_paint(option, area, x_range.labels.clone(), false);
    x_paint.position = Side::Bottom;
    x_paint.split_line_show = true;
    x_paint.label_count = Some(x_range.labels.len());
    x_paint.minimum_thickness = x_axis.minimum_axis_height;
    let x_height = if x_shown { x_paint.thickness(area) } else { 0 };

    let y_shown = y_axis.show.unwrap_or(true);
    let y_paint = AxisPaint {
        font_style: y_axis.font_style.clone(),
        label_margin: y_axis.label_margin,
        label_skip_count: y_axis.label_skip_count,
        title: y_axis.title.clone(),
        ..AxisPaint::for_range(Side::Left, &category_range, area)
    };
    let y_width = if y_shown { y_paint.thickness(area) } else { 0 };
    debug!(width, height, x_height, y_width, "horizontal axis gutters measured");

    if y_shown {
        render_axis(&area.sub_box(Bounds::new(0, 0, width, height - x_height)), &y_paint);
    }
    if x_shown {
        render_axis(&area.sub_box(Bounds::new(y_width, 0, width, height)), &x_paint);
    }

    Ok(RenderResult {
        series_painter: area.sub_box(Bounds::new(y_width, 0, width, height - x_height)),
        parent: parent.clone(),
        x_range,
        y_ranges: vec![category_range],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_data_defaults_to_tick_aligned() {
        assert!(!resolve_boundary_gap(None, None, 400, 20));
        assert!(resolve_boundary_gap(None, None, 400, 5));
        assert!(resolve_boundary_gap(None, None, 30, 1));
        assert!(resolve_boundary_gap(Some(true), None, 400, 20));
        assert!(!resolve_boundary_gap(Some(false), Some(true), 400, 5));
    }
}
