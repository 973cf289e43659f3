use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use crate::charts::marks::label_color_on;
use crate::charts::options::{ChartOption, FunnelSeriesList, ToGenericSeries};
use crate::charts::pipeline::{render_header, series_legend_items};
use crate::core::format::format_fixed_trimmed;
use crate::core::{Color, FontStyle, Point};
use crate::error::ChartResult;
use crate::render::{Painter, Style};

const LAYER_GAP: i32 = 2;

/// One funnel layer after sorting.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelLayer {
    pub name: String,
    pub value: f64,
    pub color: Color,
    /// Share of the largest value, `0..=1`.
    pub ratio: f64,
}

/// Layers sorted by value, largest first; ties keep input order.
#[must_use]
pub fn funnel_layers(series: &FunnelSeriesList, colors: &[Color]) -> Vec<FunnelLayer> {
    let max = series
        .series
        .iter()
        .map(|s| s.value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let mut layers: Vec<FunnelLayer> = series
        .series
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let value = if s.value.is_finite() { s.value.max(0.0) } else { 0.0 };
            FunnelLayer {
                name: s.name.clone(),
                value,
                color: s
                    .color
                    .or_else(|| colors.get(index).copied())
                    .unwrap_or(Color::BLACK),
                ratio: if max > 0.0 { value / max } else { 0.0 },
            }
        })
        .collect();
    layers.sort_by_key(|layer| Reverse(OrderedFloat(layer.value)));
    layers
}

pub fn render_funnel_chart(painter: &Painter, option: &ChartOption, series: &FunnelSeriesList) -> ChartResult<()> {
    let legend = series_legend_items(painter, &series.to_generic_series());
    let colors: Vec<Color> = legend.iter().map(|item| item.color).collect();
    let area = render_header(painter, option, &legend);
    let layers = funnel_layers(series, &colors);
    if layers.is_empty() {
        return Ok(());
    }
    let (width, height) = (area.width(), area.height());
    let count = layers.len() as i32;
    let layer_height = ((height - LAYER_GAP * (count - 1)) / count).max(1);
    let center_x = width / 2;
    let half = |ratio: f64| (f64::from(width) * ratio / 2.0).round() as i32;

    for (index, layer) in layers.iter().enumerate() {
        let top = index as i32 * (layer_height + LAYER_GAP);
        let bottom = top + layer_height;
        let top_half = half(layer.ratio);
        // The last layer is a rectangle.
        let bottom_half = layers.get(index + 1).map_or(top_half, |next| half(next.ratio));
        let shape = [
            Point::new(center_x - top_half, top),
            Point::new(center_x + top_half, top),
            Point::new(center_x + bottom_half, bottom),
            Point::new(center_x - bottom_half, bottom),
        ];
        area.filled_polygon(&shape, &Style::fill(layer.color));

        if !series.label.show.unwrap_or(true) {
            continue;
        }
        let text = format!("{}({}%)", layer.name, format_fixed_trimmed(layer.ratio * 100.0, 2));
        let font = series.label.font_style.inherit(&FontStyle {
            color: Some(label_color_on(layer.color)),
            ..FontStyle::default()
        });
        let extent = area.measure_text(&text, 0.0, &font);
        let baseline = top + (layer_height + extent.height()) / 2 - 1;
        area.text(&text, center_x - extent.width() / 2, baseline, 0.0, &font);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_sort_descending_with_ratios() {
        let list = FunnelSeriesList::new([("visit", 60.0), ("show", 100.0), ("buy", 20.0)]);
        let layers = funnel_layers(&list, &[]);
        let names: Vec<&str> = layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["show", "visit", "buy"]);
        assert_eq!(layers[1].ratio, 0.6);
    }
}
