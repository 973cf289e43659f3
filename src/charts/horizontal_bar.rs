use crate::charts::bar::{bar_slots, baseline};
use crate::charts::options::{ChartOption, HorizontalBarSeries, ToGenericSeries};
use crate::charts::pipeline::{PipelineSettings, RenderResult, default_render};
use crate::core::format::{ValueFormatter, format_value};
use crate::core::{Bounds, FontStyle};
use crate::error::ChartResult;
use crate::render::{Painter, Style};

const LABEL_GAP: i32 = 5;

/// Horizontal bar chart: categories up the y axis (first category at the bottom), values along x.
pub fn render_horizontal_bar_chart(
    painter: &Painter,
    option: &ChartOption,
    series: &[HorizontalBarSeries],
) -> ChartResult<()> {
    let generic = series.to_generic_series();
    let result = default_render(painter, option, &generic, PipelineSettings::horizontal())?;
    render_horizontal_bar_series(&result, series, option.value_formatter.as_ref())
}

pub fn render_horizontal_bar_series(
    result: &RenderResult,
    series: &[HorizontalBarSeries],
    value_formatter: Option<&ValueFormatter>,
) -> ChartResult<()> {
    let painter = &result.series_painter;
    let theme = painter.theme();
    let (width, height) = (painter.width(), painter.height());
    let category_range = result.y_range(0)?;
    let section = height / category_range.tick_count.max(1) as i32;
    let bar_height = series.iter().find_map(|s| s.bar_height);
    let slots = bar_slots(section, series.len(), bar_height);
    let zero_x = baseline(&result.x_range, width);

    for (index, (s, slot)) in series.iter().zip(&slots).enumerate() {
        let color = s.color.unwrap_or_else(|| theme.series_color(index));
        let font = s.label.font_style.inherit(&FontStyle {
            color: Some(theme.text_color),
            ..FontStyle::default()
        });
        let formatter = s.label.formatter.as_ref().or(value_formatter);
        // The first series sits at the bottom of each section, like category 0.
        for (i, value) in s.values.iter().enumerate() {
            let Some(value) = value.filter(|v| v.is_finite()) else {
                continue;
            };
            let center = height - category_range.index_center(i, height);
            let bottom = center + section / 2 - slot.offset;
            let top = bottom - slot.width;
            let x = result.x_range.value_to_offset(value, width);
            let bar = Bounds::new(x.min(zero_x), top, x.max(zero_x), bottom);
            paint_bar(painter, bar, s.round_radius, value >= 0.0, &Style::fill(color));

            if s.label.is_shown() {
                let text = format_value(formatter, value)?;
                let extent = painter.measure_text(&text, 0.0, &font);
                let baseline_y = top + (slot.width + extent.height()) / 2 - 1;
                let label_x = if value >= 0.0 {
                    bar.right + LABEL_GAP
                } else {
                    bar.left - LABEL_GAP - extent.width()
                };
                painter.text(&text, label_x, baseline_y, 0.0, &font);
            }
        }
    }
    Ok(())
}

/// Bar whose free end (right for positive values) is rounded by `radius`.
fn paint_bar(painter: &Painter, bar: Bounds, radius: i32, positive: bool, style: &Style) {
    let radius = radius.min(bar.height() / 2).min(bar.width() / 2).max(0);
    if radius == 0 {
        painter.rect(bar, style);
        return;
    }
    let (body, end) = if positive {
        (
            Bounds::new(bar.left, bar.top, bar.right - radius, bar.bottom),
            Bounds::new(bar.right - 2 * radius, bar.top, bar.right, bar.bottom),
        )
    } else {
        (
            Bounds::new(bar.left + radius, bar.top, bar.right, bar.bottom),
            Bounds::new(bar.left, bar.top, bar.left + 2 * radius, bar.bottom),
        )
    };
    painter.rect(body, style);
    // The end cap's inner corners are hidden under the body.
    painter.rounded_rect(end, radius, true, true, style);
}
