use std::f64::consts::{FRAC_PI_2, PI};

use tracing::trace;

use crate::charts::options::{ChartOption, RadarIndicator, RadarSeriesList, ToGenericSeries};
use crate::charts::pipeline::{render_header, series_legend_items};
use crate::core::geometry::{point_on_circle, polygon_vertices};
use crate::core::{FontStyle, Point};
use crate::error::{ChartError, ChartResult};
use crate::render::{Painter, Style};

pub const RING_COUNT: usize = 5;
const RADIUS_FRACTION: f64 = 0.4;
const AREA_ALPHA: u8 = 40;
const NAME_GAP: i32 = 8;

/// `(v − min) / (max − min)`, clamped to `[0, 1]`; null values map to the center.
#[must_use]
pub fn radar_ratio(value: Option<f64>, indicator: &RadarIndicator) -> f64 {
    let span = indicator.max - indicator.min;
    match value {
        Some(v) if v.is_finite() && span > 0.0 => ((v - indicator.min) / span).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Vertices of one series polygon, indicator `i` on spoke `2π·i/N` from 12 o'clock.
#[must_use]
pub fn radar_points(center: Point, radius: f64, indicators: &[RadarIndicator], values: &[Option<f64>]) -> Vec<Point> {
    let count = indicators.len();
    indicators
        .iter()
        .enumerate()
        .map(|(i, indicator)| {
            let ratio = radar_ratio(values.get(i).copied().flatten(), indicator);
            point_on_circle(center, radius * ratio, -FRAC_PI_2 + 2.0 * PI * i as f64 / count as f64)
        })
        .collect()
}

pub fn render_radar_chart(painter: &Painter, option: &ChartOption, radar: &RadarSeriesList) -> ChartResult<()> {
    if radar.indicators.len() < 3 {
        return Err(ChartError::options("radar needs at least 3 indicators"));
    }
    let legend = series_legend_items(painter, &radar.to_generic_series());
    let area = render_header(painter, option, &legend);
    let theme = area.theme();
    let center = Point::new(area.width() / 2, area.height() / 2);
    let radius = f64::from(area.width().min(area.height())) * RADIUS_FRACTION;
    let sides = radar.indicators.len();

    let grid = Style::stroke(theme.axis_split_line_color, 1.0);
    for ring in 1..=RING_COUNT {
        area.polygon(center, radius * ring as f64 / RING_COUNT as f64, sides, &grid);
    }
    let outer = polygon_vertices(center, radius, sides);
    for vertex in &outer {
        area.line(center.x, center.y, vertex.x, vertex.y, &grid);
    }

    let font = FontStyle {
        color: Some(theme.text_color),
        ..FontStyle::default()
    };
    for (indicator, vertex) in radar.indicators.iter().zip(&outer) {
        let extent = area.measure_text(&indicator.name, 0.0, &font);
        let x = match vertex.x.cmp(&center.x) {
            std::cmp::Ordering::Less => vertex.x - NAME_GAP - extent.width(),
            std::cmp::Ordering::Equal => vertex.x - extent.width() / 2,
            std::cmp::Ordering::Greater => vertex.x + NAME_GAP,
        };
        let y = if vertex.y < center.y {
            vertex.y - NAME_GAP / 2
        } else {
            vertex.y + NAME_GAP / 2 + extent.height()
        };
        area.text(&indicator.name, x, y, 0.0, &font);
    }

    for (index, (series, item)) in radar.series.iter().zip(&legend).enumerate() {
        let color = series.color.unwrap_or(item.color);
        let points = radar_points(center, radius, &radar.indicators, &series.values);
        trace!(index, vertices = points.len(), "radar polygon");
        area.filled_polygon(
            &points,
            &Style::fill_stroke(color.with_alpha(AREA_ALPHA), color, 2.0),
        );
        area.dots(&points, 2.0, &Style::fill_stroke(theme.background, color, 1.0));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ratio_uses_indicator_window() {
        let indicator = RadarIndicator {
            name: "speed".into(),
            max: 150.0,
            min: 50.0,
        };
        assert_abs_diff_eq!(radar_ratio(Some(100.0), &indicator), 0.5);
        assert_abs_diff_eq!(radar_ratio(Some(400.0), &indicator), 1.0);
        assert_abs_diff_eq!(radar_ratio(None, &indicator), 0.0);
    }

    #[test]
    fn first_spoke_points_up() {
        let indicators = vec![RadarIndicator::new("a", 10.0); 4];
        let points = radar_points(Point::new(50, 50), 40.0, &indicators, &[Some(10.0), Some(5.0)]);
        assert_eq!(points[0], Point::new(50, 10));
        assert_eq!(points[1], Point::new(70, 50));
        assert_eq!(points[2], Point::new(50, 50));
    }
}
