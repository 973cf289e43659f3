mod null_backend;
mod painter;
mod svg_backend;

pub use null_backend::NullBackend;
pub use painter::{ArrowDirection, Painter, PainterOption, Style};
pub use svg_backend::SvgBackend;

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{Bounds, Color};
use crate::error::{ChartError, ChartResult};

/// Serialized output produced by [`Painter::bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
}

impl OutputFormat {
    /// Parses `svg`, `png`, `jpg` or `jpeg` case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_raster(self) -> bool {
        !matches!(self, Self::Svg)
    }
}

/// Draw-call counters every backend maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    pub moves: usize,
    pub strokes: usize,
    pub fills: usize,
    pub circles: usize,
    pub texts: usize,
}

/// Contract implemented by any drawing backend.
///
/// Calls follow a path model: `move_to`/`line_to`/`quad_curve_to`/`arc_to`
/// build the current path and `stroke`/`fill`/`fill_stroke` consume it with the
/// current style. `circle` and `text` draw immediately. Coordinates are
/// absolute canvas pixels.
pub trait DrawingBackend {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn move_to(&mut self, x: i32, y: i32);
    fn line_to(&mut self, x: i32, y: i32);
    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32);
    /// Elliptical arc around `(cx, cy)` from `start_angle` sweeping `delta` radians
    /// (positive is clockwise on screen).
    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start_angle: f64, delta: f64);
    fn close(&mut self);

    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_stroke(&mut self);

    fn circle(&mut self, radius: f64, x: i32, y: i32);

    /// Draws `body` with its baseline origin at `(x, y)`, rotated by the current text rotation.
    fn text(&mut self, body: &str, x: i32, y: i32);
    fn set_text_rotation(&mut self, radians: f64);
    fn clear_text_rotation(&mut self) {
        self.set_text_rotation(0.0);
    }
    fn measure_text(&self, body: &str) -> Bounds;

    fn set_font(&mut self, font: Option<&str>);
    fn set_font_size(&mut self, size: f64);
    fn set_font_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_width(&mut self, width: f64);
    fn set_stroke_dash_array(&mut self, dash_array: &[f64]);

    fn stats(&self) -> DrawStats;

    /// Serializes everything drawn so far.
    fn save(&mut self, out: &mut dyn Write) -> ChartResult<()>;
}

/// Backend handle shared by a painter tree.
pub type SharedBackend = Rc<RefCell<dyn DrawingBackend>>;

/// Creates the backend serving `format`.
///
/// Raster formats need the `cairo-backend` feature.
pub fn new_backend(format: OutputFormat, width: i32, height: i32) -> ChartResult<SharedBackend> {
    if width <= 0 || height <= 0 {
        return Err(ChartError::InvalidViewport {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        });
    }
    match format {
        OutputFormat::Svg => Ok(Rc::new(RefCell::new(SvgBackend::new(width, height)))),
        #[cfg(feature = "cairo-backend")]
        OutputFormat::Png | OutputFormat::Jpg => {
            Ok(Rc::new(RefCell::new(CairoBackend::new(width, height, format)?)))
        }
        #[cfg(not(feature = "cairo-backend"))]
        OutputFormat::Png | OutputFormat::Jpg => Err(ChartError::backend(format!(
            "{format:?} output requires the `cairo-backend` feature"
        ))),
    }
}

/// Shared path-builder helper: point on an ellipse.
pub(crate) fn ellipse_point(cx: i32, cy: i32, rx: f64, ry: f64, angle: f64) -> (i32, i32) {
    (
        (f64::from(cx) + rx * angle.cos()).round() as i32,
        (f64::from(cy) + ry * angle.sin()).round() as i32,
    )
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::CairoBackend;
