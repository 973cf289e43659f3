use tracing::debug;

use crate::charts::marks::{render_mark_lines, render_mark_points};
use crate::charts::options::{ChartOption, LineSeries, SeriesLabel, ToGenericSeries};
use crate::charts::pipeline::{PipelineSettings, RenderResult, default_render};
use crate::core::format::{ValueFormatter, format_value};
use crate::core::geometry::split_at_nulls;
use crate::core::{Color, FontStyle, Point};
use crate::error::ChartResult;
use crate::render::{Painter, Style};

pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_FILL_OPACITY: u8 = 200;
const SYMBOL_RADIUS: f64 = 3.0;
const LABEL_GAP: i32 = 5;

/// Line chart: axes through the default pipeline, then areas, lines, symbols, marks, labels.
pub fn render_line_chart(painter: &Painter, option: &ChartOption, series: &[LineSeries]) -> ChartResult<()> {
    let generic = series.to_generic_series();
    let result = default_render(painter, option, &generic, PipelineSettings::vertical())?;
    render_line_series(&result, series, option.value_formatter.as_ref())
}

/// Draws `series` into the series painter of `result`.
pub fn render_line_series(
    result: &RenderResult,
    series: &[LineSeries],
    value_formatter: Option<&ValueFormatter>,
) -> ChartResult<()> {
    let painter = &result.series_painter;
    let theme = painter.theme();
    let mut projected = Vec::with_capacity(series.len());
    for (index, s) in series.iter().enumerate() {
        let y_range = result.y_range(s.y_axis_index)?;
        let color = s.color.unwrap_or_else(|| theme.series_color(index));
        projected.push((s, color, result.project(&s.values, y_range)));
    }
    debug!(series = projected.len(), "line series projected");

    for (s, color, points) in &projected {
        if s.fill_area {
            let opacity = s.fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY);
            let alpha = (u16::from(color.a) * u16::from(opacity) / 255) as u8;
            fill_under(painter, points, s.smooth, color.with_alpha(alpha));
        }
    }

    for (s, color, points) in &projected {
        let width = s.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH);
        match s.smooth {
            Some(tension) => painter.smooth_line_stroke(points, tension, *color, width),
            None => painter.line_stroke(points, *color, width),
        }
    }

    for (s, color, points) in &projected {
        if s.symbol_show.unwrap_or(true) {
            painter.dots(points, SYMBOL_RADIUS, &Style::fill_stroke(theme.background, *color, 1.0));
        }
    }

    for (s, color, points) in &projected {
        let y_range = result.y_range(s.y_axis_index)?;
        let formatter = s.label.formatter.as_ref().or(value_formatter);
        render_mark_lines(painter, &s.mark_line, &s.values, y_range, *color, formatter)?;
        render_mark_points(painter, &s.mark_point, &s.values, points, *color, formatter)?;
    }

    for (s, _, points) in &projected {
        render_point_labels(painter, &s.label, &s.values, points, value_formatter)?;
    }
    Ok(())
}

/// Area between each null-free run and the bottom edge.
fn fill_under(painter: &Painter, points: &[Point], smooth: Option<f64>, color: Color) {
    let bottom = painter.height();
    for run in split_at_nulls(points) {
        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            continue;
        };
        if run.len() < 2 {
            continue;
        }
        let mut area = run.to_vec();
        area.push(Point::new(last.x, bottom));
        area.push(Point::new(first.x, bottom));
        match smooth {
            Some(tension) => painter.smooth_fill_chart_area(&area, tension, color),
            None => painter.fill_area(&area, color),
        }
    }
}

/// Values centered above their points.
pub(crate) fn render_point_labels(
    painter: &Painter,
    label: &SeriesLabel,
    values: &[Option<f64>],
    points: &[Point],
    value_formatter: Option<&ValueFormatter>,
) -> ChartResult<()> {
    if !label.is_shown() {
        return Ok(());
    }
    let font = label.font_style.inherit(&FontStyle {
        color: Some(painter.theme().text_color),
        ..FontStyle::default()
    });
    let formatter = label.formatter.as_ref().or(value_formatter);
    for (value, point) in values.iter().zip(points) {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            continue;
        };
        if point.is_null() {
            continue;
        }
        let text = format_value(formatter, value)?;
        let extent = painter.measure_text(&text, 0.0, &font);
        painter.text(&text, point.x - extent.width() / 2, point.y - LABEL_GAP, 0.0, &font);
    }
    Ok(())
}
