//! Deterministic text measurement.
//!
//! Layout must not depend on which fonts happen to be installed, so extents
//! are estimated from per-character advance units instead of real glyph
//! metrics. Every back-end measures through these helpers.

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

fn advance_units(ch: char) -> f64 {
    match ch {
        '0'..='9' => 0.56,
        '.' | ',' | ':' | ';' | '\'' | '|' | '!' | 'i' | 'l' | 'j' => 0.28,
        '-' | '+' | '%' | '(' | ')' | '[' | ']' | 'f' | 't' | 'r' => 0.36,
        ' ' => 0.28,
        'm' | 'w' | 'M' | 'W' => 0.84,
        'A'..='Z' => 0.68,
        c if c.is_ascii() => 0.54,
        // CJK and symbol glyphs are roughly square.
        _ => 1.0,
    }
}

/// Width in pixels of a single line of text.
#[must_use]
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().map(advance_units).sum::<f64>() * font_size
}

/// `(width, height)` of possibly multi-line text, rounded up to whole pixels.
#[must_use]
pub fn measure_text(text: &str, font_size: f64) -> (i32, i32) {
    if text.is_empty() {
        return (0, 0);
    }
    let mut width: f64 = 0.0;
    let mut lines = 0usize;
    for line in text.lines() {
        width = width.max(text_width(line, font_size));
        lines += 1;
    }
    let lines = lines.max(1);
    let height = if lines == 1 {
        font_size
    } else {
        font_size + (lines - 1) as f64 * font_size * LINE_HEIGHT_FACTOR
    };
    (width.ceil() as i32, height.ceil() as i32)
}

/// Bounding `(width, height)` of a `width × height` box rotated by `radians`.
#[must_use]
pub fn rotated_extent(width: i32, height: i32, radians: f64) -> (i32, i32) {
    if radians == 0.0 {
        return (width, height);
    }
    let (sin, cos) = radians.sin_cos();
    let w = f64::from(width);
    let h = f64::from(height);
    (
        ceil_px(w * cos.abs() + h * sin.abs()),
        ceil_px(w * sin.abs() + h * cos.abs()),
    )
}

// Trig noise (cos(π/2) ≈ 6e-17) must not add a whole pixel.
fn ceil_px(value: f64) -> i32 {
    (value - 1e-6).ceil() as i32
}

/// Greedy word wrap so that no line exceeds `max_width` pixels.
///
/// Words longer than `max_width` are split by character.
#[must_use]
pub fn wrap_text(text: &str, font_size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, font_size) <= max_width {
                current = word.to_owned();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if text_width(&current, font_size) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_height_uses_line_factor() {
        let (_, single) = measure_text("abc", 10.0);
        let (_, double) = measure_text("abc\ndef", 10.0);
        assert_eq!(single, 10);
        assert_eq!(double, 22);
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("alpha beta gamma delta", 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 60.0, "{line}");
        }
    }

    #[test]
    fn right_angle_rotation_swaps_extent() {
        assert_eq!(rotated_extent(40, 10, std::f64::consts::FRAC_PI_2), (10, 40));
    }
}
