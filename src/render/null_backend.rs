use std::io::Write;

use crate::core::{Bounds, Color, DEFAULT_FONT_SIZE, text};
use crate::error::ChartResult;
use crate::render::{DrawStats, DrawingBackend};

/// Backend that only counts draw calls and records text bodies.
///
/// Used for measurement passes (for example the first table pass) and by tests
/// that assert on structure instead of serialized output.
#[derive(Debug, Default)]
pub struct NullBackend {
    width: i32,
    height: i32,
    path_len: usize,
    font_size: f64,
    stats: DrawStats,
    texts: Vec<String>,
    stroke_colors: Vec<Color>,
    current_stroke: Color,
}

impl NullBackend {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            font_size: DEFAULT_FONT_SIZE,
            ..Self::default()
        }
    }

    /// Every text body drawn, in draw order.
    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Stroke color of every non-empty stroke, in draw order.
    #[must_use]
    pub fn stroke_colors(&self) -> &[Color] {
        &self.stroke_colors
    }

    fn consume_path(&mut self) -> bool {
        let had_path = self.path_len > 0;
        self.path_len = 0;
        had_path
    }
}

impl DrawingBackend for NullBackend {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn move_to(&mut self, _x: i32, _y: i32) {
        self.stats.moves += 1;
        self.path_len += 1;
    }

    fn line_to(&mut self, _x: i32, _y: i32) {
        self.path_len += 1;
    }

    fn quad_curve_to(&mut self, _cx: i32, _cy: i32, _x: i32, _y: i32) {
        self.path_len += 1;
    }

    fn arc_to(&mut self, _cx: i32, _cy: i32, _rx: f64, _ry: f64, _start: f64, delta: f64) {
        if delta != 0.0 {
            if self.path_len == 0 {
                self.stats.moves += 1;
            }
            self.path_len += 1;
        }
    }

    fn close(&mut self) {}

    fn stroke(&mut self) {
        if self.consume_path() {
            self.stats.strokes += 1;
            self.stroke_colors.push(self.current_stroke);
        }
    }

    fn fill(&mut self) {
        if self.consume_path() {
            self.stats.fills += 1;
        }
    }

    fn fill_stroke(&mut self) {
        if self.consume_path() {
            self.stats.fills += 1;
            self.stats.strokes += 1;
            self.stroke_colors.push(self.current_stroke);
        }
    }

    fn circle(&mut self, _radius: f64, _x: i32, _y: i32) {
        self.stats.circles += 1;
    }

    fn text(&mut self, body: &str, _x: i32, _y: i32) {
        if body.is_empty() {
            return;
        }
        self.stats.texts += 1;
        self.texts.push(body.to_owned());
    }

    fn set_text_rotation(&mut self, _radians: f64) {}

    fn measure_text(&self, body: &str) -> Bounds {
        let (width, height) = text::measure_text(body, self.font_size);
        Bounds::new(0, 0, width, height)
    }

    fn set_font(&mut self, _font: Option<&str>) {}

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn set_font_color(&mut self, _color: Color) {}

    fn set_stroke_color(&mut self, color: Color) {
        self.current_stroke = color;
    }

    fn set_fill_color(&mut self, _color: Color) {}

    fn set_stroke_width(&mut self, _width: f64) {}

    fn set_stroke_dash_array(&mut self, _dash_array: &[f64]) {}

    fn stats(&self) -> DrawStats {
        self.stats
    }

    fn save(&mut self, _out: &mut dyn Write) -> ChartResult<()> {
        Ok(())
    }
}
