use std::f64::consts::PI;
use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use smallvec::SmallVec;

use crate::core::{Bounds, Color, DEFAULT_FONT_SIZE, text};
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawStats, DrawingBackend, OutputFormat};

const DEFAULT_FONT_FAMILY: &str = "Sans";
const JPEG_QUALITY: u8 = 90;

/// Cairo + Pango + PangoCairo raster backend.
///
/// Draws onto an ARGB32 image surface. `save` writes PNG directly or JPEG by
/// re-encoding the PNG through `image`. The first cairo failure is kept and
/// returned from `save`.
#[derive(Debug)]
pub struct CairoBackend {
    surface: ImageSurface,
    context: Context,
    format: OutputFormat,
    path_len: usize,
    stroke_color: Color,
    fill_color: Color,
    stroke_width: f64,
    dash_array: SmallVec<[f64; 4]>,
    font: Option<String>,
    font_size: f64,
    font_color: Color,
    text_rotation: f64,
    stats: DrawStats,
    error: Option<String>,
}

impl CairoBackend {
    pub fn new(width: i32, height: i32, format: OutputFormat) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidViewport {
                width: width.max(0) as u32,
                height: height.max(0) as u32,
            });
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            surface,
            context,
            format,
            path_len: 0,
            stroke_color: Color::TRANSPARENT,
            fill_color: Color::TRANSPARENT,
            stroke_width: 0.0,
            dash_array: SmallVec::new(),
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            font_color: Color::BLACK,
            text_rotation: 0.0,
            stats: DrawStats::default(),
            error: None,
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    fn record(&mut self, result: Result<(), cairo::Error>, what: &str) {
        if let Err(err) = result {
            if self.error.is_none() {
                self.error = Some(format!("{what}: {err}"));
            }
        }
    }

    fn stroke_enabled(&self) -> bool {
        self.stroke_width > 0.0 && !self.stroke_color.is_transparent()
    }

    fn apply_stroke_style(&self) {
        apply_color(&self.context, self.stroke_color);
        self.context.set_line_width(self.stroke_width);
        self.context.set_dash(&self.dash_array, 0.0);
    }

    fn paint_path(&mut self, fill: bool, stroke: bool) {
        if self.path_len == 0 {
            return;
        }
        self.path_len = 0;
        let fill = fill && !self.fill_color.is_transparent();
        let stroke = stroke && self.stroke_enabled();
        if fill {
            self.stats.fills += 1;
            apply_color(&self.context, self.fill_color);
            let result = if stroke {
                self.context.fill_preserve()
            } else {
                self.context.fill()
            };
            self.record(result, "failed to fill path");
        }
        if stroke {
            self.stats.strokes += 1;
            self.apply_stroke_style();
            let result = self.context.stroke();
            self.record(result, "failed to stroke path");
        }
        self.context.new_path();
    }

    fn encode_png(&self) -> ChartResult<Vec<u8>> {
        self.surface.flush();
        let mut png = Vec::new();
        self.surface
            .write_to_png(&mut png)
            .map_err(|err| ChartError::backend(format!("failed to encode png: {err}")))?;
        Ok(png)
    }
}

impl DrawingBackend for CairoBackend {
    fn width(&self) -> i32 {
        self.surface.width()
    }

    fn height(&self) -> i32 {
        self.surface.height()
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.stats.moves += 1;
        self.path_len += 1;
        self.context.move_to(f64::from(x), f64::from(y));
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.path_len += 1;
        self.context.line_to(f64::from(x), f64::from(y));
    }

    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32) {
        let Ok((x0, y0)) = self.context.current_point() else {
            self.move_to(x, y);
            return;
        };
        self.path_len += 1;
        let (cx, cy, x, y) = (f64::from(cx), f64::from(cy), f64::from(x), f64::from(y));
        // Cairo only has cubic curves; elevate the quadratic.
        self.context.curve_to(
            x0 + 2.0 / 3.0 * (cx - x0),
            y0 + 2.0 / 3.0 * (cy - y0),
            x + 2.0 / 3.0 * (cx - x),
            y + 2.0 / 3.0 * (cy - y),
            x,
            y,
        );
    }

    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start_angle: f64, delta: f64) {
        if delta == 0.0 || rx <= 0.0 || ry <= 0.0 {
            return;
        }
        if self.path_len == 0 {
            self.stats.moves += 1;
        }
        self.path_len += 1;
        let delta = delta.clamp(-2.0 * PI, 2.0 * PI);
        let result = self.context.save();
        self.record(result, "failed to save cairo state");
        self.context.translate(f64::from(cx), f64::from(cy));
        self.context.scale(rx, ry);
        if delta > 0.0 {
            self.context.arc(0.0, 0.0, 1.0, start_angle, start_angle + delta);
        } else {
            self.context
                .arc_negative(0.0, 0.0, 1.0, start_angle, start_angle + delta);
        }
        let result = self.context.restore();
        self.record(result, "failed to restore cairo state");
    }

    fn close(&mut self) {
        if self.path_len > 0 {
            self.context.close_path();
        }
    }

    fn stroke(&mut self) {
        self.paint_path(false, true);
    }

    fn fill(&mut self) {
        self.paint_path(true, false);
    }

    fn fill_stroke(&mut self) {
        self.paint_path(true, true);
    }

    fn circle(&mut self, radius: f64, x: i32, y: i32) {
        self.stats.circles += 1;
        self.context.new_path();
        self.context
            .arc(f64::from(x), f64::from(y), radius, 0.0, 2.0 * PI);
        if !self.fill_color.is_transparent() {
            apply_color(&self.context, self.fill_color);
            let result = self.context.fill_preserve();
            self.record(result, "failed to fill circle");
        }
        if self.stroke_enabled() {
            self.apply_stroke_style();
            let result = self.context.stroke_preserve();
            self.record(result, "failed to stroke circle");
        }
        self.context.new_path();
    }

    fn text(&mut self, body: &str, x: i32, y: i32) {
        if body.is_empty() {
            return;
        }
        self.stats.texts += 1;
        let layout = pangocairo::functions::create_layout(&self.context);
        let family = self.font.as_deref().unwrap_or(DEFAULT_FONT_FAMILY);
        let font_description = FontDescription::from_string(&format!("{family} {}", self.font_size));
        layout.set_font_description(Some(&font_description));
        layout.set_text(body);

        let result = self.context.save();
        self.record(result, "failed to save cairo state");
        self.context.new_path();
        self.context.translate(f64::from(x), f64::from(y));
        if self.text_rotation != 0.0 {
            self.context.rotate(self.text_rotation);
        }
        let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);
        self.context.move_to(0.0, -baseline);
        apply_color(&self.context, self.font_color);
        pangocairo::functions::show_layout(&self.context, &layout);
        let result = self.context.restore();
        self.record(result, "failed to restore cairo state");
        self.context.new_path();
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
        if let Some(err) = &self.error {
            return Err(ChartError::backend(err.clone()));
        }
        let png = self.encode_png()?;
        match self.format {
            OutputFormat::Jpg => {
                let decoded = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
                    .map_err(|err| ChartError::backend(format!("failed to decode png: {err}")))?;
                let rgb = decoded.to_rgb8();
                let mut encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut *out, JPEG_QUALITY);
                encoder
                    .encode_image(&rgb)
                    .map_err(|err| ChartError::backend(format!("failed to encode jpeg: {err}")))?;
            }
            OutputFormat::Png | OutputFormat::Svg => out.write_all(&png)?,
        }
        Ok(())
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(
        f64::from(color.r) / 255.0,
        f64::from(color.g) / 255.0,
        f64::from(color.b) / 255.0,
        color.alpha_f64(),
    );
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::backend(format!("{prefix}: {err}"))
}
