use std::f64::consts::PI;
use std::fmt::Write as _;
use std::io::Write;

use smallvec::SmallVec;

use crate::core::format::format_fixed_trimmed;
use crate::core::{Bounds, Color, DEFAULT_FONT_SIZE, text};
use crate::error::ChartResult;
use crate::render::{DrawStats, DrawingBackend, ellipse_point};

const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// SVG serializer.
///
/// Every stroke or fill of the current path becomes one `<path>` element;
/// circles and text become `<circle>` and `<text>`. Coordinates are integers.
#[derive(Debug)]
pub struct SvgBackend {
    width: i32,
    height: i32,
    elements: String,
    path: String,
    stroke_color: Color,
    fill_color: Color,
    stroke_width: f64,
    dash_array: SmallVec<[f64; 4]>,
    font: Option<String>,
    font_size: f64,
    font_color: Color,
    text_rotation: f64,
    stats: DrawStats,
}

impl SvgBackend {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            elements: String::new(),
            path: String::new(),
            stroke_color: Color::TRANSPARENT,
            fill_color: Color::TRANSPARENT,
            stroke_width: 0.0,
            dash_array: SmallVec::new(),
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            font_color: Color::BLACK,
            text_rotation: 0.0,
            stats: DrawStats::default(),
        }
    }

    /// The document serialized so far.
    #[must_use]
    pub fn document(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>",
            w = self.width,
            h = self.height,
            body = self.elements,
        )
    }

    fn push_command(&mut self, command: &str) {
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path.push_str(command);
    }

    fn emit_path(&mut self, fill: bool, stroke: bool) {
        if self.path.is_empty() {
            return;
        }
        let style = self.shape_style(fill, stroke);
        let _ = writeln!(self.elements, "<path d=\"{}\" style=\"{style}\"/>", self.path);
        self.path.clear();
    }

    fn shape_style(&self, fill: bool, stroke: bool) -> String {
        let mut style = String::new();
        if stroke && self.stroke_width > 0.0 && !self.stroke_color.is_transparent() {
            let _ = write!(
                style,
                "stroke-width:{};stroke:{}",
                format_fixed_trimmed(self.stroke_width, 2),
                self.stroke_color
            );
            if !self.dash_array.is_empty() {
                let dashes: Vec<String> = self
                    .dash_array
                    .iter()
                    .map(|d| format_fixed_trimmed(*d, 2))
                    .collect();
                let _ = write!(style, ";stroke-dasharray:{}", dashes.join(","));
            }
        } else {
            style.push_str("stroke:none");
        }
        if fill && !self.fill_color.is_transparent() {
            let _ = write!(style, ";fill:{}", self.fill_color);
        } else {
            style.push_str(";fill:none");
        }
        style
    }
}

impl DrawingBackend for SvgBackend {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.stats.moves += 1;
        self.push_command(&format!("M {x} {y}"));
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.push_command(&format!("L {x} {y}"));
    }

    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32) {
        self.push_command(&format!("Q {cx} {cy} {x} {y}"));
    }

    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start_angle: f64, delta: f64) {
        if delta == 0.0 {
            return;
        }
        let (sx, sy) = ellipse_point(cx, cy, rx, ry, start_angle);
        if self.path.is_empty() {
            self.move_to(sx, sy);
        } else {
            self.line_to(sx, sy);
        }
        // A single SVG arc cannot describe a closed ellipse.
        let delta = delta.clamp(-2.0 * PI, 2.0 * PI);
        let segments = if delta.abs() > PI + 1e-9 { 2 } else { 1 };
        let part = delta / f64::from(segments);
        let sweep = u8::from(delta > 0.0);
        let (rx_text, ry_text) = (format_fixed_trimmed(rx, 2), format_fixed_trimmed(ry, 2));
        for i in 1..=segments {
            let (ex, ey) = ellipse_point(cx, cy, rx, ry, start_angle + part * f64::from(i));
            self.push_command(&format!("A {rx_text} {ry_text} 0 0 {sweep} {ex} {ey}"));
        }
    }

    fn close(&mut self) {
        if !self.path.is_empty() {
            self.push_command("Z");
        }
    }

    fn stroke(&mut self) {
        if !self.path.is_empty() {
            self.stats.strokes += 1;
        }
        self.emit_path(false, true);
    }

    fn fill(&mut self) {
        if !self.path.is_empty() {
            self.stats.fills += 1;
        }
        self.emit_path(true, false);
    }

    fn fill_stroke(&mut self) {
        if !self.path.is_empty() {
            self.stats.fills += 1;
            self.stats.strokes += 1;
        }
        self.emit_path(true, true);
    }

    fn circle(&mut self, radius: f64, x: i32, y: i32) {
        self.stats.circles += 1;
        let style = self.shape_style(true, true);
        let _ = writeln!(
            self.elements,
            "<circle cx=\"{x}\" cy=\"{y}\" r=\"{}\" style=\"{style}\"/>",
            format_fixed_trimmed(radius, 2)
        );
    }

    fn text(&mut self, body: &str, x: i32, y: i32) {
        if body.is_empty() {
            return;
        }
        self.stats.texts += 1;
        let family = self.font.as_deref().unwrap_or(DEFAULT_FONT_FAMILY);
        let mut element = format!(
            "<text x=\"{x}\" y=\"{y}\" style=\"stroke:none;fill:{};font-size:{}px;font-family:'{}'\"",
            self.font_color,
            format_fixed_trimmed(self.font_size, 1),
            escape(family),
        );
        if self.text_rotation != 0.0 {
            let degrees = self.text_rotation.to_degrees();
            let _ = write!(
                element,
                " transform=\"rotate({},{x},{y})\"",
                format_fixed_trimmed(degrees, 2)
            );
        }
        let _ = writeln!(element, ">{}</text>", escape(body));
        self.elements.push_str(&element);
    }

    fn set_text_rotation(&mut self, radians: f64) {
        self.text_rotation = if radians.is_finite() { radians } else { 0.0 };
    }

    fn measure_text(&self, body: &str) -> Bounds {
        let (width, height) = text::measure_text(body, self.font_size);
        Bounds::new(0, 0, width, height)
    }

    fn set_font(&mut self, font: Option<&str>) {
        self.font = font.map(str::to_owned);
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn set_font_color(&mut self, color: Color) {
        self.font_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width;
    }

    fn set_stroke_dash_array(&mut self, dash_array: &[f64]) {
        self.dash_array = dash_array.iter().copied().collect();
    }

    fn stats(&self) -> DrawStats {
        self.stats
    }

    fn save(&mut self, out: &mut dyn Write) -> ChartResult<()> {
        out.write_all(self.document().as_bytes())?;
        Ok(())
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_emits_one_path_element() {
        let mut backend = SvgBackend::new(100, 50);
        backend.set_stroke_color(Color::rgb(255, 0, 0));
        backend.set_stroke_width(2.0);
        backend.move_to(0, 0);
        backend.line_to(10, 10);
        backend.stroke();
        let svg = backend.document();
        assert!(svg.contains("viewBox=\"0 0 100 50\""));
        assert!(svg.contains("<path d=\"M 0 0 L 10 10\" style=\"stroke-width:2;stroke:rgb(255,0,0);fill:none\"/>"));
        assert_eq!(backend.stats().strokes, 1);
    }

    #[test]
    fn full_circle_arc_is_split() {
        let mut backend = SvgBackend::new(100, 100);
        backend.arc_to(50, 50, 10.0, 10.0, 0.0, 2.0 * PI);
        backend.close();
        backend.fill();
        let svg = backend.document();
        assert_eq!(svg.matches(" A ").count(), 2);
    }

    #[test]
    fn text_is_escaped() {
        let mut backend = SvgBackend::new(10, 10);
        backend.text("a<b & c", 1, 2);
        assert!(backend.document().contains(">a&lt;b &amp; c</text>"));
    }
}
