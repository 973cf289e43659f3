use tracing::debug;

use crate::charts::line::render_point_labels;
use crate::charts::marks::{render_mark_lines, render_mark_points};
use crate::charts::options::{BarSeries, ChartOption, ToGenericSeries};
use crate::charts::pipeline::{PipelineSettings, RenderResult, default_render};
use crate::core::format::ValueFormatter;
use crate::core::{AxisRange, Bounds, Point};
use crate::error::ChartResult;
use crate::render::{Painter, Style};

/// Share of a category section covered by its bars.
pub const BAR_GROUP_FRACTION: f64 = 0.8;

/// Horizontal slot of one bar inside its category section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSlot {
    pub offset: i32,
    pub width: i32,
}

/// Splits a `section`-pixel category among `count` bars.
///
/// Bars default to `floor(section · 0.8 / count)` pixels (at least 1); the
/// remaining space becomes `count + 1` equal margins.
#[must_use]
pub fn bar_slots(section: i32, count: usize, bar_width: Option<i32>) -> Vec<BarSlot> {
    if count == 0 {
        return Vec::new();
    }
    let k = count as i32;
    let width = bar_width
        .filter(|w| *w > 0)
        .unwrap_or_else(|| (f64::from(section) * BAR_GROUP_FRACTION / f64::from(k)).floor() as i32)
        .max(1);
    let margin = ((section - k * width) / (k + 1)).max(0);
    (0..k)
        .map(|j| BarSlot {
            offset: margin + j * (width + margin),
            width,
        })
        .collect()
}

/// Vertical bar chart.
pub fn render_bar_chart(painter: &Painter, option: &ChartOption, series: &[BarSeries]) -> ChartResult<()> {
    let generic = series.to_generic_series();
    let result = default_render(painter, option, &generic, PipelineSettings::vertical_gapped())?;
    render_bar_series(&result, series, option.value_formatter.as_ref())
}

/// Pixel of the zero baseline, clamped into the axis window.
pub(crate) fn baseline(range: &AxisRange, extent: i32) -> i32 {
    range.value_to_offset(0.0_f64.clamp(range.min, range.max), extent)
}

pub fn render_bar_series(
    result: &RenderResult,
    series: &[BarSeries],
    value_formatter: Option<&ValueFormatter>,
) -> ChartResult<()> {
    let painter = &result.series_painter;
    let theme = painter.theme();
    let (width, height) = (painter.width(), painter.height());
    let categories = result.x_range.tick_count.max(1);
    let section = width / categories as i32;
    let bar_width = series.iter().find_map(|s| s.bar_width);
    let slots = bar_slots(section, series.len(), bar_width);
    debug!(section, bars = slots.len(), "bar slots resolved");

    for (index, (s, slot)) in series.iter().zip(&slots).enumerate() {
        let y_range = result.y_range(s.y_axis_index)?;
        let color = s.color.unwrap_or_else(|| theme.series_color(index));
        let zero_y = height - baseline(y_range, height);
        let mut tops = Vec::with_capacity(s.values.len());
        for (i, value) in s.values.iter().enumerate() {
            let center = result.x_range.index_center(i, width);
            let left = center - section / 2 + slot.offset;
            let Some(value) = value.filter(|v| v.is_finite()) else {
                tops.push(Point::null(left + slot.width / 2));
                continue;
            };
            let y = y_range.value_to_y(value, height);
            let bar = Bounds::new(left, y.min(zero_y), left + slot.width, y.max(zero_y));
            painter.rounded_rect(
                bar,
                s.round_radius,
                value >= 0.0,
                value < 0.0,
                &Style::fill(color),
            );
            tops.push(Point::new(left + slot.width / 2, y));
        }

        let formatter = s.label.formatter.as_ref().or(value_formatter);
        render_mark_lines(painter, &s.mark_line, &s.values, y_range, color, formatter)?;
        render_mark_points(painter, &s.mark_point, &s.values, &tops, color, formatter)?;
        render_point_labels(painter, &s.label, &s.values, &tops, value_formatter)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_symmetric() {
        let slots = bar_slots(100, 2, None);
        assert_eq!(slots[0], BarSlot { offset: 6, width: 40 });
        assert_eq!(slots[1], BarSlot { offset: 52, width: 40 });
        assert_eq!(100 - (slots[1].offset + slots[1].width), 8);
    }

    #[test]
    fn tiny_sections_keep_one_pixel_bars() {
        let slots = bar_slots(2, 4, None);
        assert!(slots.iter().all(|s| s.width == 1));
    }
}
