use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use crate::core::format::ValueFormatter;
use crate::core::geometry::{midpoint, polygon_vertices, split_at_nulls};
use crate::core::text::{self, LINE_HEIGHT_FACTOR};
use crate::core::{Bounds, Color, FontStyle, Point, Theme};
use crate::error::ChartResult;
use crate::render::{DrawStats, OutputFormat, SharedBackend, new_backend};

/// Radius of the dot drawn for an isolated point of a stroked polyline.
const ISOLATED_POINT_RADIUS: f64 = 2.0;

/// Explicit draw style passed to every primitive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub fill_color: Color,
    pub dash_array: SmallVec<[f64; 4]>,
}

impl Style {
    #[must_use]
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke_color: color,
            stroke_width: width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fill(color: Color) -> Self {
        Self {
            fill_color: color,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fill_stroke(fill: Color, stroke: Color, width: f64) -> Self {
        Self {
            stroke_color: stroke,
            stroke_width: width,
            fill_color: fill,
            dash_array: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_dash(mut self, dash_array: &[f64]) -> Self {
        self.dash_array = dash_array.iter().copied().collect();
        self
    }

    fn has_fill(&self) -> bool {
        !self.fill_color.is_transparent()
    }

    fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0 && !self.stroke_color.is_transparent()
    }
}

/// Child painter option.
#[derive(Debug, Clone)]
pub enum PainterOption {
    /// Shrinks the box inward.
    Padding(Bounds),
    /// Replaces the box (parent coordinates) unless it is zero.
    Box(Bounds),
    Theme(Arc<Theme>),
    Font(String),
    Formatter(ValueFormatter),
}

/// Direction an arrow glyph points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Translated drawing surface over a shared backend.
///
/// All coordinates passed to the primitives are relative to the painter's
/// box. Drawing outside the box is allowed; the backend clips at the canvas.
#[derive(Clone)]
pub struct Painter {
    backend: SharedBackend,
    format: OutputFormat,
    bounds: Bounds,
    theme: Arc<Theme>,
    font: Option<String>,
    formatter: Option<ValueFormatter>,
}

impl std::fmt::Debug for Painter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painter")
            .field("format", &self.format)
            .field("bounds", &self.bounds)
            .field("theme", &self.theme.name)
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

impl Painter {
    /// Root painter covering a `width × height` canvas.
    pub fn new(
        format: OutputFormat,
        width: i32,
        height: i32,
        font: Option<String>,
    ) -> ChartResult<Self> {
        let backend = new_backend(format, width, height)?;
        Ok(Self::with_backend(backend, format, font))
    }

    /// Root painter over an existing backend.
    #[must_use]
    pub fn with_backend(backend: SharedBackend, format: OutputFormat, font: Option<String>) -> Self {
        let (width, height) = {
            let backend = backend.borrow();
            (backend.width(), backend.height())
        };
        Self {
            backend,
            format,
            bounds: Bounds::new(0, 0, width, height),
            theme: Theme::light(),
            font,
            formatter: None,
        }
    }

    /// A painter sharing this painter's backend, adjusted by `options`.
    #[must_use]
    pub fn child<I>(&self, options: I) -> Painter
    where
        I: IntoIterator<Item = PainterOption>,
    {
        let mut child = self.clone();
        for option in options {
            match option {
                PainterOption::Padding(padding) => child.bounds = child.bounds.padded(padding),
                PainterOption::Box(bounds) => {
                    if !bounds.is_zero() {
                        child.bounds = bounds.translated(child.bounds.left, child.bounds.top);
                    }
                }
                PainterOption::Theme(theme) => child.theme = theme,
                PainterOption::Font(font) => child.font = Some(font),
                PainterOption::Formatter(formatter) => child.formatter = Some(formatter),
            }
        }
        child
    }

    #[must_use]
    pub fn padded(&self, padding: Bounds) -> Painter {
        self.child([PainterOption::Padding(padding)])
    }

    /// Child covering `bounds`, given in this painter's coordinates.
    #[must_use]
    pub fn sub_box(&self, bounds: Bounds) -> Painter {
        self.child([PainterOption::Box(bounds)])
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[must_use]
    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    #[must_use]
    pub fn font(&self) -> Option<&str> {
        self.font.as_deref()
    }

    #[must_use]
    pub fn formatter(&self) -> Option<&ValueFormatter> {
        self.formatter.as_ref()
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    #[must_use]
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Draw-call counters of the shared backend.
    #[must_use]
    pub fn stats(&self) -> DrawStats {
        self.backend.borrow().stats()
    }

    /// Serializes the whole canvas.
    pub fn bytes(&self) -> ChartResult<Vec<u8>> {
        let mut out = Vec::new();
        self.backend.borrow_mut().save(&mut out)?;
        Ok(out)
    }

    fn abs(&self, x: i32, y: i32) -> (i32, i32) {
        (x + self.bounds.left, y + self.bounds.top)
    }

    fn apply_style(&self, style: &Style) {
        let mut backend = self.backend.borrow_mut();
        backend.set_stroke_color(style.stroke_color);
        backend.set_stroke_width(style.stroke_width);
        backend.set_fill_color(style.fill_color);
        backend.set_stroke_dash_array(&style.dash_array);
    }

    fn paint(&self, style: &Style) {
        let mut backend = self.backend.borrow_mut();
        match (style.has_fill(), style.has_stroke()) {
            (true, true) => backend.fill_stroke(),
            (true, false) => backend.fill(),
            (false, _) => backend.stroke(),
        }
    }

    fn move_to(&self, point: Point) {
        let (x, y) = self.abs(point.x, point.y);
        self.backend.borrow_mut().move_to(x, y);
    }

    fn line_to(&self, point: Point) {
        let (x, y) = self.abs(point.x, point.y);
        self.backend.borrow_mut().line_to(x, y);
    }

    fn quad_to(&self, control: Point, end: Point) {
        let (cx, cy) = self.abs(control.x, control.y);
        let (x, y) = self.abs(end.x, end.y);
        self.backend.borrow_mut().quad_curve_to(cx, cy, x, y);
    }

    fn arc(&self, center: Point, rx: f64, ry: f64, start: f64, delta: f64) {
        let (cx, cy) = self.abs(center.x, center.y);
        self.backend
            .borrow_mut()
            .arc_to(cx, cy, rx, ry, start, delta);
    }

    fn close(&self) {
        self.backend.borrow_mut().close();
    }

    /// Paints the full canvas. With `inside`, the fill covers this painter's box instead.
    pub fn set_background(&self, width: i32, height: i32, color: Color, inside: bool) {
        let (left, top) = if inside {
            (self.bounds.left, self.bounds.top)
        } else {
            (0, 0)
        };
        self.apply_style(&Style::fill(color));
        let mut backend = self.backend.borrow_mut();
        backend.move_to(left, top);
        backend.line_to(left + width, top);
        backend.line_to(left + width, top + height);
        backend.line_to(left, top + height);
        backend.close();
        backend.fill();
    }

    pub fn line(&self, x1: i32, y1: i32, x2: i32, y2: i32, style: &Style) {
        self.apply_style(style);
        self.move_to(Point::new(x1, y1));
        self.line_to(Point::new(x2, y2));
        self.backend.borrow_mut().stroke();
    }

    /// Rectangle painted according to `style` (fill, stroke or both).
    pub fn rect(&self, bounds: Bounds, style: &Style) {
        self.apply_style(style);
        self.rect_path(bounds);
        self.paint(style);
    }

    pub fn filled_rect(&self, bounds: Bounds, color: Color) {
        self.rect(bounds, &Style::fill(color));
    }

    fn rect_path(&self, bounds: Bounds) {
        self.move_to(Point::new(bounds.left, bounds.top));
        self.line_to(Point::new(bounds.right, bounds.top));
        self.line_to(Point::new(bounds.right, bounds.bottom));
        self.line_to(Point::new(bounds.left, bounds.bottom));
        self.close();
    }

    /// Rectangle with rounded top and/or bottom corners.
    pub fn rounded_rect(
        &self,
        bounds: Bounds,
        radius: i32,
        round_top: bool,
        round_bottom: bool,
        style: &Style,
    ) {
        let radius = radius.min(bounds.width() / 2).min(bounds.height() / 2).max(0);
        if radius == 0 || !(round_top || round_bottom) {
            self.rect(bounds, style);
            return;
        }
        let r = f64::from(radius);
        let Bounds {
            left,
            top,
            right,
            bottom,
            ..
        } = bounds;
        self.apply_style(style);
        if round_top {
            self.move_to(Point::new(left, top + radius));
            self.arc(Point::new(left + radius, top + radius), r, r, PI, FRAC_PI_2);
            self.line_to(Point::new(right - radius, top));
            self.arc(Point::new(right - radius, top + radius), r, r, -FRAC_PI_2, FRAC_PI_2);
        } else {
            self.move_to(Point::new(left, top));
            self.line_to(Point::new(right, top));
        }
        if round_bottom {
            self.line_to(Point::new(right, bottom - radius));
            self.arc(Point::new(right - radius, bottom - radius), r, r, 0.0, FRAC_PI_2);
            self.line_to(Point::new(left + radius, bottom));
            self.arc(Point::new(left + radius, bottom - radius), r, r, FRAC_PI_2, FRAC_PI_2);
        } else {
            self.line_to(Point::new(right, bottom));
            self.line_to(Point::new(left, bottom));
        }
        self.close();
        self.paint(style);
    }

    pub fn circle(&self, radius: f64, x: i32, y: i32, style: &Style) {
        self.apply_style(style);
        let (x, y) = self.abs(x, y);
        self.backend.borrow_mut().circle(radius, x, y);
    }

    /// A dot at every non-null point.
    pub fn dots(&self, points: &[Point], radius: f64, style: &Style) {
        self.apply_style(style);
        let mut backend = self.backend.borrow_mut();
        for point in points.iter().filter(|p| !p.is_null()) {
            backend.circle(
                radius,
                point.x + self.bounds.left,
                point.y + self.bounds.top,
            );
        }
    }

    /// Regular polygon outline with the first vertex at 12 o'clock.
    pub fn polygon(&self, center: Point, radius: f64, sides: usize, style: &Style) {
        let vertices = polygon_vertices(center, radius, sides);
        self.polyline_polygon(&vertices, style);
    }

    /// Closed outline through `points`.
    pub fn polyline_polygon(&self, points: &[Point], style: &Style) {
        self.closed_path(points, &Style {
            fill_color: Color::TRANSPARENT,
            ..style.clone()
        });
    }

    /// Closed polygon painted according to `style`.
    pub fn filled_polygon(&self, points: &[Point], style: &Style) {
        self.closed_path(points, style);
    }

    fn closed_path(&self, points: &[Point], style: &Style) {
        let mut iter = points.iter().filter(|p| !p.is_null());
        let Some(first) = iter.next() else {
            return;
        };
        self.apply_style(style);
        self.move_to(*first);
        for point in iter {
            self.line_to(*point);
        }
        self.close();
        self.paint(style);
    }

    /// Teardrop pin with its tip at `(x, y)` and a round head `width` wide.
    ///
    /// Returns the head center so callers can label it.
    pub fn pin(&self, x: i32, y: i32, width: i32, style: &Style) -> Point {
        let radius = f64::from(width.max(2)) / 2.0;
        let distance = radius * 2.0;
        let center = Point::new(x, y - distance.round() as i32);
        let half_spread = (radius / distance).acos();
        let start = FRAC_PI_2 + half_spread;
        let (sx, sy) = (
            (f64::from(center.x) + radius * start.cos()).round() as i32,
            (f64::from(center.y) + radius * start.sin()).round() as i32,
        );
        self.apply_style(style);
        self.move_to(Point::new(x, y));
        self.line_to(Point::new(sx, sy));
        self.arc(center, radius, radius, start, 2.0 * PI - 2.0 * half_spread);
        self.close();
        self.paint(style);
        center
    }

    /// Triangle glyph inside the `width × height` box centred on `(x, y)`.
    pub fn arrow(
        &self,
        direction: ArrowDirection,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        style: &Style,
    ) {
        let (half_w, half_h) = (width / 2, height / 2);
        let points = match direction {
            ArrowDirection::Right => [
                Point::new(x - half_w, y - half_h),
                Point::new(x + half_w, y),
                Point::new(x - half_w, y + half_h),
            ],
            ArrowDirection::Left => [
                Point::new(x + half_w, y - half_h),
                Point::new(x - half_w, y),
                Point::new(x + half_w, y + half_h),
            ],
            ArrowDirection::Up => [
                Point::new(x - half_w, y + half_h),
                Point::new(x, y - half_h),
                Point::new(x + half_w, y + half_h),
            ],
            ArrowDirection::Down => [
                Point::new(x - half_w, y - half_h),
                Point::new(x, y + half_h),
                Point::new(x + half_w, y - half_h),
            ],
        };
        self.filled_polygon(&points, style);
    }

    /// Dot at `(x, y)`, dashed segment `width` long and a right-arrow end.
    pub fn mark_line(&self, x: i32, y: i32, width: i32, color: Color, stroke_width: f64) {
        let arrow_size = 8;
        self.circle(3.0, x, y, &Style::fill(color));
        self.line(
            x,
            y,
            x + width - arrow_size,
            y,
            &Style::stroke(color, stroke_width).with_dash(&[4.0, 2.0]),
        );
        self.arrow(
            ArrowDirection::Right,
            x + width - arrow_size / 2,
            y,
            arrow_size,
            arrow_size,
            &Style::fill(color),
        );
    }

    /// Pie or ring slice from `start` sweeping `delta` radians clockwise.
    pub fn sector(
        &self,
        center: Point,
        radius: f64,
        inner_radius: f64,
        start: f64,
        delta: f64,
        style: &Style,
    ) {
        if radius <= 0.0 || delta <= 0.0 {
            return;
        }
        let delta = delta.min(2.0 * PI);
        let full = delta >= 2.0 * PI - 1e-9;
        self.apply_style(style);
        if inner_radius > 0.0 {
            self.arc(center, radius, radius, start, delta);
            if full {
                self.close();
            }
            self.arc(center, inner_radius, inner_radius, start + delta, -delta);
            self.close();
        } else if full {
            self.arc(center, radius, radius, start, delta);
            self.close();
        } else {
            self.move_to(center);
            self.arc(center, radius, radius, start, delta);
            self.close();
        }
        self.paint(style);
    }

    /// Straight polyline split at null points; isolated points become dots.
    pub fn line_stroke(&self, points: &[Point], color: Color, stroke_width: f64) {
        self.polyline(points, &Style::stroke(color, stroke_width));
    }

    /// [`Painter::line_stroke`] with a full style (dashes).
    pub fn polyline(&self, points: &[Point], style: &Style) {
        self.stroke_segments(points, style, 0.0);
    }

    /// Polyline with corners rounded by quadratic Béziers.
    ///
    /// `tension` in `[0, 1]` (clamped) moves the curve ends from the vertex
    /// toward the neighbouring segment midpoints; the vertex is the control
    /// point. `0` draws straight segments.
    pub fn smooth_line_stroke(&self, points: &[Point], tension: f64, color: Color, stroke_width: f64) {
        self.stroke_segments(points, &Style::stroke(color, stroke_width), tension);
    }

    fn stroke_segments(&self, points: &[Point], style: &Style, tension: f64) {
        for segment in split_at_nulls(points) {
            if segment.len() == 1 {
                trace!(x = segment[0].x, "isolated point drawn as dot");
                self.circle(
                    ISOLATED_POINT_RADIUS,
                    segment[0].x,
                    segment[0].y,
                    &Style::fill(style.stroke_color),
                );
                continue;
            }
            self.apply_style(style);
            self.curve_path(segment, tension);
            self.backend.borrow_mut().stroke();
        }
    }

    fn curve_path(&self, points: &[Point], tension: f64) {
        let tension = if tension.is_finite() {
            tension.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.move_to(*first);
        if tension == 0.0 || points.len() < 3 {
            for point in rest {
                self.line_to(*point);
            }
            return;
        }
        for window in points.windows(3) {
            let (prev, vertex, next) = (window[0], window[1], window[2]);
            let entry = toward(vertex, midpoint(prev, vertex), tension);
            let exit = toward(vertex, midpoint(vertex, next), tension);
            self.line_to(entry);
            self.quad_to(vertex, exit);
        }
        if let Some(last) = points.last() {
            self.line_to(*last);
        }
    }

    /// Filled polygon per null-free run of `points`; runs of one point are discarded.
    pub fn fill_area(&self, points: &[Point], color: Color) {
        let style = Style::fill(color);
        for segment in split_at_nulls(points) {
            if segment.len() < 2 {
                continue;
            }
            self.closed_path(segment, &style);
        }
    }

    /// Fills an area whose last two points are the bottom corners.
    ///
    /// The top edge (all points but the corners) is smoothed with `tension`;
    /// the corners stay sharp.
    pub fn smooth_fill_chart_area(&self, points: &[Point], tension: f64, color: Color) {
        if points.len() < 3 || points.iter().any(|p| p.is_null()) {
            self.fill_area(points, color);
            return;
        }
        let (top, corners) = points.split_at(points.len() - 2);
        let style = Style::fill(color);
        self.apply_style(&style);
        self.curve_path(top, tension);
        for corner in corners {
            self.line_to(*corner);
        }
        self.close();
        self.backend.borrow_mut().fill();
    }

    fn apply_font(&self, font: &FontStyle) -> f64 {
        let size = font.size_or_default();
        let color = font.color.unwrap_or(self.theme.text_color);
        let family = font.font.as_deref().or(self.font.as_deref());
        let mut backend = self.backend.borrow_mut();
        backend.set_font(family);
        backend.set_font_size(size);
        backend.set_font_color(color);
        size
    }

    /// Draws `body` with its baseline at `(x, y)`, rotated by `radians` around that origin.
    pub fn text(&self, body: &str, x: i32, y: i32, radians: f64, font: &FontStyle) {
        if body.is_empty() {
            return;
        }
        self.apply_font(font);
        let (x, y) = self.abs(x, y);
        let mut backend = self.backend.borrow_mut();
        if radians != 0.0 {
            backend.set_text_rotation(radians);
        }
        backend.text(body, x, y);
        if radians != 0.0 {
            backend.clear_text_rotation();
        }
    }

    /// Draws each line of `body` below the previous one; `(x, y)` is the first baseline.
    pub fn multiline_text(&self, body: &str, x: i32, y: i32, font: &FontStyle) {
        let line_height = font.size_or_default() * LINE_HEIGHT_FACTOR;
        for (i, line) in body.lines().enumerate() {
            let offset = (line_height * i as f64).round() as i32;
            self.text(line, x, y + offset, 0.0, font);
        }
    }

    /// Word-wraps `body` into `width` pixels with the box top-left at `(x, y)`.
    ///
    /// Returns the box occupied by the text, relative to this painter.
    pub fn text_fit(&self, body: &str, x: i32, y: i32, width: i32, font: &FontStyle) -> Bounds {
        let size = font.size_or_default();
        let lines = text::wrap_text(body, size, f64::from(width));
        let line_height = (size * LINE_HEIGHT_FACTOR).round() as i32;
        let mut max_width = 0;
        for (i, line) in lines.iter().enumerate() {
            let line_top = y + line_height * i as i32;
            self.text(line, x, line_top + size.round() as i32, 0.0, font);
            max_width = max_width.max(text::text_width(line, size).ceil() as i32);
        }
        let height = if lines.is_empty() {
            0
        } else {
            size.round() as i32 + line_height * (lines.len() as i32 - 1)
        };
        Bounds::new(x, y, x + max_width, y + height)
    }

    /// Bounding box of `body` rendered with `font` and rotated by `radians`.
    #[must_use]
    pub fn measure_text(&self, body: &str, radians: f64, font: &FontStyle) -> Bounds {
        let (width, height) = text::measure_text(body, font.size_or_default());
        let (width, height) = text::rotated_extent(width, height, radians);
        Bounds::new(0, 0, width, height)
    }

    /// Width and height of the widest/tallest of `bodies`.
    #[must_use]
    pub fn measure_text_max(&self, bodies: &[String], radians: f64, font: &FontStyle) -> Bounds {
        bodies
            .iter()
            .map(|body| self.measure_text(body, radians, font))
            .fold(Bounds::new(0, 0, 0, 0), |acc, b| {
                Bounds::new(0, 0, acc.right.max(b.right), acc.bottom.max(b.bottom))
            })
    }
}

fn toward(from: Point, to: Point, fraction: f64) -> Point {
    Point::new(
        (f64::from(from.x) + fraction * f64::from(to.x - from.x)).round() as i32,
        (f64::from(from.y) + fraction * f64::from(to.y - from.y)).round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_option_is_relative_to_parent() {
        let root = Painter::new(OutputFormat::Svg, 200, 100, None).expect("painter");
        let padded = root.padded(Bounds::uniform(10));
        let inner = padded.sub_box(Bounds::new(5, 5, 50, 40));
        assert_eq!(inner.bounds(), Bounds::new(15, 15, 60, 50));
        assert_eq!(padded.bounds(), Bounds::new(10, 10, 190, 90));
    }

    #[test]
    fn zero_box_keeps_parent_box() {
        let root = Painter::new(OutputFormat::Svg, 200, 100, None).expect("painter");
        let child = root.child([PainterOption::Box(Bounds::default())]);
        assert_eq!(child.bounds(), root.bounds());
    }

    #[test]
    fn toward_interpolates() {
        assert_eq!(toward(Point::new(0, 0), Point::new(10, 20), 0.5), Point::new(5, 10));
    }
}
