//! Mark points (pins) and mark lines anchored at series extrema.

use tracing::debug;

use crate::charts::options::{MarkType, SeriesMarkLine, SeriesMarkPoint};
use crate::core::format::{ValueFormatter, format_value};
use crate::core::{AxisRange, Color, FontStyle, Point};
use crate::error::ChartResult;
use crate::render::{Painter, Style};

pub const DEFAULT_SYMBOL_SIZE: i32 = 30;
const MARK_FONT_SIZE: f64 = 10.0;
const MARK_LINE_LABEL_GAP: i32 = 4;

/// Index and value of the first maximum or minimum, ignoring nulls.
///
/// Returns `None` for [`MarkType::Average`] and for series without finite values.
#[must_use]
pub fn extremum(values: &[Option<f64>], kind: MarkType) -> Option<(usize, f64)> {
    let finite = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|v| v.is_finite()).map(|v| (i, v)));
    match kind {
        MarkType::Max => finite.fold(None, |best, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        }),
        MarkType::Min => finite.fold(None, |best, (i, v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        }),
        MarkType::Average => None,
    }
}

/// Value a mark line sits at: the extremum or the mean of finite values.
#[must_use]
pub fn mark_line_value(values: &[Option<f64>], kind: MarkType) -> Option<f64> {
    match kind {
        MarkType::Average => {
            let (sum, count) = values
                .iter()
                .flatten()
                .filter(|v| v.is_finite())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            (count > 0).then(|| sum / count as f64)
        }
        _ => extremum(values, kind).map(|(_, value)| value),
    }
}

/// Pins over the extremum points of a series.
///
/// `points[i]` is the pixel of `values[i]`; null points are never marked.
pub fn render_mark_points(
    painter: &Painter,
    mark_point: &SeriesMarkPoint,
    values: &[Option<f64>],
    points: &[Point],
    color: Color,
    formatter: Option<&ValueFormatter>,
) -> ChartResult<()> {
    let size = mark_point.symbol_size.unwrap_or(DEFAULT_SYMBOL_SIZE);
    let font = FontStyle::new(MARK_FONT_SIZE, label_color_on(color));
    for &kind in &mark_point.data {
        if kind == MarkType::Average {
            debug!("average mark point has no anchor sample; skipped");
            continue;
        }
        let Some((index, value)) = extremum(values, kind) else {
            continue;
        };
        let Some(point) = points.get(index).filter(|p| !p.is_null()) else {
            continue;
        };
        let head = painter.pin(point.x, point.y, size, &Style::fill(color));
        let text = format_value(formatter, value)?;
        let extent = painter.measure_text(&text, 0.0, &font);
        painter.text(
            &text,
            head.x - extent.width() / 2,
            head.y + (MARK_FONT_SIZE / 2.0).round() as i32 - 1,
            0.0,
            &font,
        );
    }
    Ok(())
}

/// Dashed horizontal lines at the requested levels, labelled at the right end.
pub fn render_mark_lines(
    painter: &Painter,
    mark_line: &SeriesMarkLine,
    values: &[Option<f64>],
    y_range: &AxisRange,
    color: Color,
    formatter: Option<&ValueFormatter>,
) -> ChartResult<()> {
    let (width, height) = (painter.width(), painter.height());
    let font = FontStyle::new(MARK_FONT_SIZE, color);
    for &kind in &mark_line.data {
        let Some(value) = mark_line_value(values, kind) else {
            continue;
        };
        let y = y_range.value_to_y(value, height);
        painter.mark_line(0, y, width, color, 1.0);
        let text = format_value(formatter, value)?;
        let extent = painter.measure_text(&text, 0.0, &font);
        painter.text(&text, width - extent.width(), y - MARK_LINE_LABEL_GAP, 0.0, &font);
    }
    Ok(())
}

/// Text color readable on top of `background`.
#[must_use]
pub fn label_color_on(background: Color) -> Color {
    if background.is_light() {
        Color::rgb(70, 70, 70)
    } else {
        Color::WHITE
    }
}
