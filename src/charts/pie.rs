use std::f64::consts::{FRAC_PI_2, PI};

use tracing::debug;

use crate::charts::options::{ChartOption, PieSeriesList, ToGenericSeries};
use crate::charts::pipeline::{render_header, series_legend_items};
use crate::core::format::format_fixed_trimmed;
use crate::core::geometry::point_on_circle;
use crate::core::{Color, FontStyle, Offset, Point};
use crate::error::ChartResult;
use crate::render::{Painter, Style};

pub const DEFAULT_RADIUS_PERCENT: f64 = 40.0;
const LEADER_RADIAL: f64 = 10.0;
const LEADER_HORIZONTAL: i32 = 10;
const LABEL_GAP: i32 = 3;

/// One computed slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    /// Start angle in radians, 12 o'clock is `-π/2`.
    pub start: f64,
    /// Clockwise sweep in radians.
    pub delta: f64,
    /// Share of the total in percent.
    pub percent: f64,
}

/// Slice angles for `values`, starting at 12 o'clock and sweeping clockwise.
///
/// Non-positive and non-finite values get a zero sweep.
#[must_use]
pub fn pie_slices(series: &PieSeriesList) -> Vec<PieSlice> {
    let positive = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let total: f64 = series.series.iter().map(|s| positive(s.value)).sum();
    let mut start = -FRAC_PI_2;
    series
        .series
        .iter()
        .map(|s| {
            let value = positive(s.value);
            let share = if total > 0.0 { value / total } else { 0.0 };
            let slice = PieSlice {
                name: s.name.clone(),
                value: s.value,
                start,
                delta: 2.0 * PI * share,
                percent: share * 100.0,
            };
            start += slice.delta;
            slice
        })
        .collect()
}

fn resolve_radius(radius: Option<Offset>, extent: i32, default_percent: f64) -> f64 {
    match radius {
        Some(Offset::Px(px)) => f64::from(px.max(0)),
        Some(Offset::Percent(percent)) => f64::from(extent) * percent / 100.0,
        _ => f64::from(extent) * default_percent / 100.0,
    }
}

/// Label color for a slice: light slices get a darker shade.
fn label_color(slice: Color) -> Color {
    if slice.is_light() {
        slice.adjust_hsl(0.0, 0.0, -0.3)
    } else {
        slice
    }
}

pub fn render_pie_chart(painter: &Painter, option: &ChartOption, series: &PieSeriesList) -> ChartResult<()> {
    let legend = series_legend_items(painter, &series.to_generic_series());
    let area = render_header(painter, option, &legend);
    let (width, height) = (area.width(), area.height());
    let extent = width.min(height);
    let radius = resolve_radius(series.radius, extent, DEFAULT_RADIUS_PERCENT);
    let inner_radius = series
        .inner_radius
        .map_or(0.0, |inner| resolve_radius(Some(inner), extent, 0.0))
        .min(radius);
    let center = Point::new(width / 2, height / 2);
    let slices = pie_slices(series);
    debug!(radius, inner_radius, slices = slices.len(), "pie laid out");

    for (index, (slice, legend_item)) in slices.iter().zip(&legend).enumerate() {
        if slice.delta <= 0.0 {
            continue;
        }
        let color = series.series[index].color.unwrap_or(legend_item.color);
        area.sector(
            center,
            radius,
            inner_radius,
            slice.start,
            slice.delta,
            &Style::fill_stroke(color, area.theme().background, 1.0),
        );
    }

    if !series.label.show.unwrap_or(true) {
        return Ok(());
    }
    let base_font = series.label.font_style.clone();
    for (slice, legend_item) in slices.iter().zip(&legend) {
        if slice.delta <= 0.0 {
            continue;
        }
        let color = label_color(legend_item.color);
        let mid = slice.start + slice.delta / 2.0;
        let start = point_on_circle(center, radius, mid);
        let kink = point_on_circle(center, radius + LEADER_RADIAL, mid);
        let to_right = mid.cos() >= 0.0;
        let end_x = if to_right {
            kink.x + LEADER_HORIZONTAL
        } else {
            kink.x - LEADER_HORIZONTAL
        };
        let leader = Style::stroke(color, 1.0);
        area.line(start.x, start.y, kink.x, kink.y, &leader);
        area.line(kink.x, kink.y, end_x, kink.y, &leader);

        let text = format!("{}: {}%", slice.name, format_fixed_trimmed(slice.percent, 2));
        let font = base_font.inherit(&FontStyle {
            color: Some(color),
            ..FontStyle::default()
        });
        let measured = area.measure_text(&text, 0.0, &font);
        let x = if to_right {
            end_x + LABEL_GAP
        } else {
            end_x - LABEL_GAP - measured.width()
        };
        let y = kink.y + (font.size_or_default() / 2.0).round() as i32 - 1;
        area.text(&text, x, y, 0.0, &font);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn slices_start_at_twelve_and_cover_the_circle() {
        let slices = pie_slices(&PieSeriesList::new([("a", 1.0), ("b", 3.0)]));
        assert_relative_eq!(slices[0].start, -FRAC_PI_2);
        assert_relative_eq!(slices[0].delta, FRAC_PI_2);
        assert_relative_eq!(slices[1].start, 0.0);
        assert_relative_eq!(slices[0].delta + slices[1].delta, 2.0 * PI);
        assert_relative_eq!(slices[1].percent, 75.0);
    }
}
