//! Table renderer.
//!
//! Row heights depend on word wrapping, so the chart height is not known up
//! front: [`measure_table_height`] runs the layout against a recording
//! backend and the real pass uses the measured height.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::charts::options::{ChartOption, TableSeries};
use crate::charts::pipeline::render_header;
use crate::core::text::{LINE_HEIGHT_FACTOR, text_width, wrap_text};
use crate::core::{Align, Bounds, Color, DEFAULT_FONT_SIZE, FontStyle};
use crate::error::ChartResult;
use crate::render::{NullBackend, Painter, PainterOption, Style};

/// Column widths summing to `width`, proportional to `spans` (equal when unset).
#[must_use]
pub fn column_widths(width: i32, columns: usize, spans: &[usize]) -> Vec<i32> {
    if columns == 0 {
        return Vec::new();
    }
    let weights: Vec<usize> = (0..columns)
        .map(|i| spans.get(i).copied().filter(|s| *s > 0).unwrap_or(1))
        .collect();
    let total: usize = weights.iter().sum();
    let mut widths: Vec<i32> = weights
        .iter()
        .map(|w| (i64::from(width) * *w as i64 / total as i64) as i32)
        .collect();
    // Rounding leftovers go to the last column.
    let used: i32 = widths.iter().sum();
    if let Some(last) = widths.last_mut() {
        *last += width - used;
    }
    widths
}

struct CellLayout {
    lines: Vec<String>,
}

fn line_height(size: f64) -> i32 {
    (size * LINE_HEIGHT_FACTOR).round() as i32
}

fn text_block_height(lines: usize, size: f64) -> i32 {
    size.round() as i32 + line_height(size) * (lines.max(1) as i32 - 1)
}

/// Paints the table into `painter` and returns the bottom edge of the last row.
pub fn render_table(painter: &Painter, option: &ChartOption, table: &TableSeries) -> ChartResult<i32> {
    let area = render_header(painter, option, &[]);
    let theme = area.theme();
    let columns = table.column_count();
    let widths = column_widths(area.width(), columns, &table.spans);
    let padding = table.cell_padding;

    let header_font = table.header_font_style.inherit(&FontStyle::new(DEFAULT_FONT_SIZE, theme.title_color));
    let body_font = table.font_style.inherit(&FontStyle::new(DEFAULT_FONT_SIZE, theme.text_color));
    let header_background = table.header_background.unwrap_or(theme.axis_split_line_color);
    let row_backgrounds = if table.row_backgrounds.is_empty() {
        vec![Color::TRANSPARENT, theme.axis_split_line_color.with_alpha(90)]
    } else {
        table.row_backgrounds.clone()
    };

    let header = (!table.header.is_empty()).then_some(&table.header);
    let rows = header
        .into_iter()
        .map(|row| (row, &header_font, header_background))
        .chain(table.rows.iter().enumerate().map(|(index, row)| {
            (row, &body_font, row_backgrounds[index % row_backgrounds.len()])
        }));

    let mut top = 0;
    for (row, font, background) in rows {
        let size = font.size_or_default();
        let cells: Vec<CellLayout> = widths
            .iter()
            .enumerate()
            .map(|(col, width)| CellLayout {
                lines: wrap_text(
                    row.get(col).map_or("", String::as_str),
                    size,
                    f64::from((width - padding.left - padding.right).max(1)),
                ),
            })
            .collect();
        let tallest = cells.iter().map(|c| c.lines.len()).max().unwrap_or(1);
        let row_height = padding.top + text_block_height(tallest, size) + padding.bottom;

        if !background.is_transparent() {
            area.filled_rect(Bounds::new(0, top, area.width(), top + row_height), background);
        }
        let mut left = 0;
        for (col, (cell, width)) in cells.iter().zip(&widths).enumerate() {
            let inner = width - padding.left - padding.right;
            let align = table.text_aligns.get(col).copied().unwrap_or(Align::Left);
            for (i, line) in cell.lines.iter().enumerate() {
                let line_width = text_width(line, size).ceil() as i32;
                let x = match align {
                    Align::Left => left + padding.left,
                    Align::Center => left + padding.left + (inner - line_width) / 2,
                    Align::Right => left + width - padding.right - line_width,
                };
                let baseline = top + padding.top + size.round() as i32 + line_height(size) * i as i32;
                area.text(line, x, baseline, 0.0, font);
            }
            left += width;
        }
        top += row_height;
    }
    if top > 0 {
        area.line(0, top, area.width(), top, &Style::stroke(theme.axis_split_line_color, 1.0));
    }
    debug!(rows = table.rows.len(), columns, height = top, "table laid out");
    Ok(area.bounds().top - painter.bounds().top + top)
}

/// Canvas height the table needs: padding, header block and every row.
pub fn measure_table_height(option: &ChartOption, table: &TableSeries) -> ChartResult<i32> {
    let backend = Rc::new(RefCell::new(NullBackend::new(option.width, option.height.max(1))));
    let painter = Painter::with_backend(backend, option.output_format, option.font.clone())
        .child([PainterOption::Theme(option.theme())])
        .padded(option.padding);
    let bottom = render_table(&painter, option, table)?;
    Ok(option.padding.top + bottom + option.padding.bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_split_width_proportionally() {
        assert_eq!(column_widths(100, 3, &[1, 2, 1]), vec![25, 50, 25]);
        assert_eq!(column_widths(100, 3, &[]), vec![33, 33, 34]);
    }
}
