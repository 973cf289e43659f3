use crate::charts::options::TitleOption;
use crate::core::{Bounds, FontStyle, Offset};
use crate::render::Painter;

pub const TITLE_FONT_SIZE: f64 = 18.0;
pub const SUBTEXT_FONT_SIZE: f64 = 12.0;
const SUBTEXT_GAP: i32 = 5;

/// Paints the title block and returns the box it occupies.
///
/// An invisible title occupies nothing (a zero box).
pub fn render_title(painter: &Painter, title: &TitleOption) -> Bounds {
    if !title.is_visible() {
        return Bounds::default();
    }
    let theme = painter.theme();
    let font = title.font_style.inherit(&FontStyle::new(TITLE_FONT_SIZE, theme.title_color));
    let sub_font = title
        .subtext_font_style
        .inherit(&FontStyle::new(SUBTEXT_FONT_SIZE, theme.text_color));

    let text_box = painter.measure_text(&title.text, 0.0, &font);
    let sub_box = painter.measure_text(&title.subtext, 0.0, &sub_font);
    let content_width = text_box.width().max(sub_box.width());
    let mut content_height = text_box.height();
    if !title.subtext.is_empty() {
        if content_height > 0 {
            content_height += SUBTEXT_GAP;
        }
        content_height += sub_box.height();
    }

    let left = title.left.resolve(painter.width(), content_width);
    let top = title
        .top
        .unwrap_or(Offset::Top)
        .resolve(painter.height(), content_height);

    // Lines of a centered or right-aligned block follow the block alignment.
    let line_left = |width: i32| match title.left {
        Offset::Center => left + (content_width - width) / 2,
        Offset::Right => left + content_width - width,
        _ => left,
    };

    let mut y = top;
    if !title.text.is_empty() {
        let baseline = y + font.size_or_default().round() as i32;
        painter.multiline_text(&title.text, line_left(text_box.width()), baseline, &font);
        y += text_box.height() + SUBTEXT_GAP;
    }
    if !title.subtext.is_empty() {
        let baseline = y + sub_font.size_or_default().round() as i32;
        painter.multiline_text(&title.subtext, line_left(sub_box.width()), baseline, &sub_font);
    }

    Bounds::new(left, top, left + content_width, top + content_height)
}
