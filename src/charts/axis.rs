//! Axis painter: spine, ticks, labels, split lines and title.
//!
//! An axis is painted inside a painter that spans the whole side of the
//! plotting area it is attached to. The gutter (labels, ticks, title) is
//! carved from that side and its box is returned; split lines extend across
//! the rest of the painter.

use std::f64::consts::FRAC_PI_2;

use tracing::trace;

use crate::core::text;
use crate::core::{AxisRange, Bounds, Color, FontStyle, Side};
use crate::render::{Painter, Style};

/// Extra horizontal room kept between two x labels when fitting them.
pub const LABEL_FIT_GAP: i32 = 10;
const TITLE_MARGIN: i32 = 5;

/// Everything needed to paint one axis.
#[derive(Debug, Clone)]
pub struct AxisPaint {
    pub position: Side,
    pub labels: Vec<String>,
    /// Labels sit between ticks (one extra tick) instead of on them.
    pub boundary_gap: bool,
    pub font_style: FontStyle,
    /// Label rotation in radians.
    pub label_rotation: f64,
    /// Shift of every label along the axis, in pixels.
    pub label_offset: i32,
    pub label_count: Option<usize>,
    pub label_skip_count: usize,
    pub tick_length: i32,
    pub label_margin: i32,
    pub stroke_color: Color,
    /// A negative width suppresses the spine.
    pub stroke_width: f64,
    pub split_line_show: bool,
    pub split_line_color: Color,
    pub title: String,
    /// Lower bound on the gutter thickness.
    pub minimum_thickness: Option<i32>,
}

impl AxisPaint {
    /// Axis with the theme's colors and the given labels.
    #[must_use]
    pub fn new(position: Side, labels: Vec<String>, painter: &Painter) -> Self {
        let theme = painter.theme();
        Self {
            position,
            labels,
            boundary_gap: false,
            font_style: FontStyle::default(),
            label_rotation: 0.0,
            label_offset: 0,
            label_count: None,
            label_skip_count: 0,
            tick_length: 5,
            label_margin: 5,
            stroke_color: theme.axis_stroke_color,
            stroke_width: 1.0,
            split_line_show: false,
            split_line_color: theme.axis_split_line_color,
            title: String::new(),
            minimum_thickness: None,
        }
    }

    /// Value axis wiring for a solved range.
    #[must_use]
    pub fn for_range(position: Side, range: &AxisRange, painter: &Painter) -> Self {
        Self {
            boundary_gap: range.boundary_gap,
            ..Self::new(position, range.labels.clone(), painter)
        }
    }

    fn is_vertical(&self) -> bool {
        matches!(self.position, Side::Left | Side::Right)
    }

    fn font(&self, painter: &Painter) -> FontStyle {
        self.font_style.inherit(&FontStyle {
            color: Some(painter.theme().text_color),
            ..FontStyle::default()
        })
    }

    fn title_font(&self, painter: &Painter) -> FontStyle {
        self.font(painter)
    }

    fn spine_width(&self) -> i32 {
        if self.stroke_width > 0.0 {
            self.stroke_width.ceil() as i32
        } else {
            0
        }
    }

    fn label_extent(&self, painter: &Painter) -> Bounds {
        painter.measure_text_max(&self.labels, self.label_rotation, &self.font(painter))
    }

    fn title_extent(&self, painter: &Painter) -> i32 {
        if self.title.is_empty() {
            return 0;
        }
        painter.measure_text(&self.title, 0.0, &self.title_font(painter)).height() + TITLE_MARGIN
    }

    /// Gutter thickness perpendicular to the axis.
    #[must_use]
    pub fn thickness(&self, painter: &Painter) -> i32 {
        let labels = self.label_extent(painter);
        let label_depth = if self.is_vertical() {
            labels.width()
        } else {
            labels.height()
        };
        let thickness = self.spine_width().max(0)
            + self.tick_length.max(0)
            + self.label_margin.max(0)
            + label_depth
            + self.title_extent(painter);
        thickness.max(self.minimum_thickness.unwrap_or(0))
    }

    /// Indices of the labels to draw along an axis `length` pixels long.
    #[must_use]
    pub fn visible_label_indices(&self, painter: &Painter, length: i32) -> Vec<usize> {
        let count = self.labels.len();
        if self.label_skip_count > 0 {
            return skip_label_indices(count, self.label_skip_count);
        }
        let target = self.label_count.unwrap_or_else(|| {
            if self.is_vertical() {
                return count;
            }
            let widest = self.label_extent(painter).width() + LABEL_FIT_GAP;
            let fit = if widest > 0 {
                (length / widest).max(1) as usize
            } else {
                count
            };
            count.min(fit)
        });
        tick_label_indices(count, target)
    }
}

/// Indices `i` that are ticks when `target` of `count` labels are shown.
///
/// `i` is a tick iff `round(round(i / step) · step) == i` with
/// `step = (count − 1) / (target − 1)`.
#[must_use]
pub fn tick_label_indices(count: usize, target: usize) -> Vec<usize> {
    match (count, target) {
        (0, _) | (_, 0) => Vec::new(),
        (_, 1) => vec![0],
        _ if target >= count || count == 1 => (0..count).collect(),
        _ => {
            let step = (count - 1) as f64 / (target - 1) as f64;
            (0..count)
                .filter(|&i| {
                    let i_f = i as f64;
                    ((i_f / step).round() * step).round() == i_f
                })
                .collect()
        }
    }
}

/// Every `(skip + 1)`-th index plus the first and last.
#[must_use]
pub fn skip_label_indices(count: usize, skip: usize) -> Vec<usize> {
    (0..count)
        .filter(|&i| i % (skip + 1) == 0 || i + 1 == count)
        .collect()
}

/// Paints `axis` inside `painter` and returns the gutter box it occupies.
pub fn render_axis(painter: &Painter, axis: &AxisPaint) -> Bounds {
    let thickness = axis.thickness(painter);
    let (width, height) = (painter.width(), painter.height());
    let gutter = match axis.position {
        Side::Left => Bounds::new(0, 0, thickness, height),
        Side::Right => Bounds::new(width - thickness, 0, width, height),
        Side::Top => Bounds::new(0, 0, width, thickness),
        Side::Bottom => Bounds::new(0, height - thickness, width, height),
    };
    if axis.is_vertical() {
        paint_vertical(painter, axis, gutter);
    } else {
        paint_horizontal(painter, axis, gutter);
    }
    gutter
}

fn paint_horizontal(painter: &Painter, axis: &AxisPaint, gutter: Bounds) {
    let width = painter.width();
    let count = axis.labels.len();
    let positions = if axis.boundary_gap {
        crate::core::divide_positions(width, count + 1)
    } else {
        crate::core::divide_positions(width, count)
    };
    let at_bottom = axis.position == Side::Bottom;
    let spine_y = if at_bottom { gutter.top } else { gutter.bottom };
    let direction = if at_bottom { 1 } else { -1 };

    if axis.split_line_show {
        let split = Style::stroke(axis.split_line_color, 1.0);
        for &x in positions.iter().skip(1) {
            if at_bottom {
                painter.line(x, 0, x, gutter.top, &split);
            } else {
                painter.line(x, gutter.bottom, x, painter.height(), &split);
            }
        }
    }

    let stroke = Style::stroke(axis.stroke_color, axis.stroke_width);
    if axis.stroke_width > 0.0 {
        painter.line(0, spine_y, width, spine_y, &stroke);
        if axis.tick_length > 0 {
            for &x in &positions {
                painter.line(x, spine_y, x, spine_y + direction * axis.tick_length, &stroke);
            }
        }
    }

    let font = axis.font(painter);
    let label_offset = axis.spine_width() + axis.tick_length.max(0) + axis.label_margin.max(0);
    for index in axis.visible_label_indices(painter, width) {
        let label = &axis.labels[index];
        let center = match (axis.boundary_gap, positions.get(index), positions.get(index + 1)) {
            (true, Some(start), Some(end)) => (start + end) / 2,
            (_, Some(start), _) => *start,
            _ => continue,
        };
        let extent = painter.measure_text(label, axis.label_rotation, &font);
        let x = center - extent.width() / 2 + axis.label_offset;
        // Rotated labels pivot on their baseline start, one line below the spine side.
        let depth = if axis.label_rotation == 0.0 {
            extent.height()
        } else {
            painter.measure_text(label, 0.0, &font).height()
        };
        let y = if at_bottom {
            spine_y + label_offset + depth
        } else {
            spine_y - label_offset
        };
        trace!(index, x, y, label = %label, "x-axis label placed");
        painter.text(label, x, y, axis.label_rotation, &font);
    }

    if !axis.title.is_empty() {
        let title_font = axis.title_font(painter);
        let extent = painter.measure_text(&axis.title, 0.0, &title_font);
        let x = (width - extent.width()) / 2;
        let y = if at_bottom {
            gutter.bottom - (extent.height() - title_font.size_or_default().round() as i32).max(0)
        } else {
            gutter.top + extent.height()
        };
        painter.text(&axis.title, x, y, 0.0, &title_font);
    }
}

fn paint_vertical(painter: &Painter, axis: &AxisPaint, gutter: Bounds) {
    let height = painter.height();
    let count = axis.labels.len();
    let positions = if axis.boundary_gap {
        crate::core::divide_positions(height, count + 1)
    } else {
        crate::core::divide_positions(height, count)
    };
    let on_left = axis.position == Side::Left;
    let spine_x = if on_left { gutter.right } else { gutter.left };
    let direction = if on_left { -1 } else { 1 };

    // Index 0 sits at the bottom.
    let to_y = |offset: i32| height - offset;

    if axis.split_line_show {
        let split = Style::stroke(axis.split_line_color, 1.0);
        for &offset in &positions {
            let y = to_y(offset);
            if on_left {
                painter.line(gutter.right, y, painter.width(), y, &split);
            } else {
                painter.line(0, y, gutter.left, y, &split);
            }
        }
    }

    let stroke = Style::stroke(axis.stroke_color, axis.stroke_width);
    if axis.stroke_width > 0.0 {
        painter.line(spine_x, 0, spine_x, height, &stroke);
        if axis.tick_length > 0 {
            for &offset in &positions {
                let y = to_y(offset);
                painter.line(spine_x, y, spine_x + direction * axis.tick_length, y, &stroke);
            }
        }
    }

    let font = axis.font(painter);
    let font_size = font.size_or_default();
    let label_gap = axis.spine_width() + axis.tick_length.max(0) + axis.label_margin.max(0);
    for index in axis.visible_label_indices(painter, height) {
        let label = &axis.labels[index];
        let offset = match (axis.boundary_gap, positions.get(index), positions.get(index + 1)) {
            (true, Some(start), Some(end)) => (start + end) / 2,
            (_, Some(start), _) => *start,
            _ => continue,
        };
        let extent = painter.measure_text(label, axis.label_rotation, &font);
        let x = if on_left {
            spine_x - label_gap - extent.width()
        } else {
            spine_x + label_gap
        };
        let y = to_y(offset) + (font_size / 2.0).round() as i32 - 1 - axis.label_offset;
        trace!(index, x, y, label = %label, "y-axis label placed");
        painter.text(label, x, y, axis.label_rotation, &font);
    }

    if !axis.title.is_empty() {
        let title_font = axis.title_font(painter);
        let extent = text::measure_text(&axis.title, title_font.size_or_default());
        let y = (height + extent.0) / 2;
        let x = if on_left {
            gutter.left + extent.1
        } else {
            gutter.right - TITLE_MARGIN
        };
        painter.text(&axis.title, x, y, -FRAC_PI_2, &title_font);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_indices_spread_evenly() {
        assert_eq!(tick_label_indices(11, 6), vec![0, 2, 4, 6, 8, 10]);
        assert_eq!(tick_label_indices(3, 5), vec![0, 1, 2]);
        assert_eq!(tick_label_indices(4, 1), vec![0]);
    }

    #[test]
    fn skip_keeps_first_and_last() {
        assert_eq!(skip_label_indices(6, 1), vec![0, 2, 4, 5]);
    }
}
