use tracing::debug;

use crate::charts::options::LegendOption;
use crate::core::{Align, Bounds, Color, FontStyle, Orient};
use crate::render::{Painter, Style};

pub const CHIP_WIDTH: i32 = 20;
pub const CHIP_HEIGHT: i32 = 10;
const CHIP_TEXT_GAP: i32 = 5;
const ITEM_GAP: i32 = 10;
const ROW_GAP: i32 = 5;

/// One legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub name: String,
    pub color: Color,
}

/// Items to show: the configured names, or every named series.
#[must_use]
pub fn legend_items(legend: &LegendOption, series: &[LegendItem]) -> Vec<LegendItem> {
    if legend.data.is_empty() {
        return series
            .iter()
            .filter(|item| !item.name.is_empty())
            .cloned()
            .collect();
    }
    legend
        .data
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let color = series
                .iter()
                .find(|item| &item.name == name)
                .or_else(|| series.get(index))
                .map(|item| item.color)
                .unwrap_or(Color::TRANSPARENT);
            LegendItem {
                name: name.clone(),
                color,
            }
        })
        .collect()
}

struct LaidOutItem<'a> {
    item: &'a LegendItem,
    x: i32,
    y: i32,
    text_width: i32,
}

/// Paints the legend and returns the box it occupies (zero when hidden).
///
/// Horizontal legends wrap into rows that fit the painter width; vertical
/// legends stack one item per row.
pub fn render_legend(painter: &Painter, legend: &LegendOption, items: &[LegendItem]) -> Bounds {
    if !legend.show.unwrap_or(true) || items.is_empty() {
        return Bounds::default();
    }
    let theme = painter.theme();
    let font = legend
        .font_style
        .inherit(&FontStyle::new(crate::core::DEFAULT_FONT_SIZE, theme.legend_text_color));
    let line_height = font.size_or_default().round() as i32;
    let row_height = line_height.max(CHIP_HEIGHT);
    let available = (painter.width() - legend.padding.left - legend.padding.right).max(0);

    let mut laid_out = Vec::with_capacity(items.len());
    let (mut x, mut y) = (0, 0);
    let mut content_width = 0;
    for item in items {
        let text_width = painter.measure_text(&item.name, 0.0, &font).width();
        let item_width = CHIP_WIDTH + CHIP_TEXT_GAP + text_width;
        match legend.orient {
            Orient::Horizontal => {
                if x > 0 && x + item_width > available {
                    x = 0;
                    y += row_height + ROW_GAP;
                }
            }
            Orient::Vertical => {
                if !laid_out.is_empty() {
                    x = 0;
                    y += row_height + ROW_GAP;
                }
            }
        }
        laid_out.push(LaidOutItem {
            item,
            x,
            y,
            text_width,
        });
        content_width = content_width.max(x + item_width);
        x += item_width + ITEM_GAP;
    }
    let content_height = y + row_height;

    let outer_width = content_width + legend.padding.left + legend.padding.right;
    let outer_height = content_height + legend.padding.top + legend.padding.bottom;
    let left = legend.left.resolve(painter.width(), outer_width);
    let top = legend.top.resolve(painter.height(), outer_height);
    debug!(items = items.len(), left, top, outer_width, outer_height, "legend laid out");

    let origin_x = left + legend.padding.left;
    let origin_y = top + legend.padding.top;
    for entry in &laid_out {
        let row_top = origin_y + entry.y;
        let (chip_left, text_left) = match legend.align {
            Align::Right => (
                origin_x + entry.x + entry.text_width + CHIP_TEXT_GAP,
                origin_x + entry.x,
            ),
            _ => (
                origin_x + entry.x,
                origin_x + entry.x + CHIP_WIDTH + CHIP_TEXT_GAP,
            ),
        };
        let chip_top = row_top + (row_height - CHIP_HEIGHT) / 2;
        painter.rounded_rect(
            Bounds::new(chip_left, chip_top, chip_left + CHIP_WIDTH, chip_top + CHIP_HEIGHT),
            2,
            true,
            true,
            &Style::fill(entry.item.color),
        );
        let baseline = row_top + (row_height + line_height) / 2 - 1;
        painter.text(&entry.item.name, text_left, baseline, 0.0, &font);
    }

    Bounds::new(left, top, left + outer_width, top + outer_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_names_take_colors_by_name() {
        let series = vec![
            LegendItem {
                name: "a".into(),
                color: Color::rgb(1, 1, 1),
            },
            LegendItem {
                name: "b".into(),
                color: Color::rgb(2, 2, 2),
            },
        ];
        let legend = LegendOption::names(["b"]);
        let items = legend_items(&legend, &series);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].color, Color::rgb(2, 2, 2));
    }
}
