use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color with 8-bit channels.
///
/// The all-zero color doubles as "unset": option structs use it to defer to
/// the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Returns `true` when every channel is zero, i.e. the color is unset.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0 && self.a == 0
    }

    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::rgba(self.r, self.g, self.b, alpha)
    }

    /// Returns `self` unless it is unset, in which case `fallback` is used.
    #[must_use]
    pub const fn or(self, fallback: Self) -> Self {
        if self.is_zero() { fallback } else { self }
    }

    /// Alpha channel as a `0..=1` float.
    #[must_use]
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Relative luminance in `0..=1` (sRGB weights, alpha ignored).
    #[must_use]
    pub fn luminance(self) -> f64 {
        (0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b))
            / 255.0
    }

    #[must_use]
    pub fn is_light(self) -> bool {
        self.luminance() > 0.5
    }

    /// Shifts hue (degrees), saturation and lightness (both `-1..=1`).
    ///
    /// Hue wraps around; saturation and lightness are clamped to `[0, 1]`.
    #[must_use]
    pub fn adjust_hsl(self, delta_hue: f64, delta_saturation: f64, delta_lightness: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        let h = (h + delta_hue).rem_euclid(360.0);
        let s = (s + delta_saturation).clamp(0.0, 1.0);
        let l = (l + delta_lightness).clamp(0.0, 1.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self::rgba(r, g, b, self.a)
    }

    /// Hue in degrees, saturation and lightness in `0..=1`.
    #[must_use]
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;
        if delta <= f64::EPSILON {
            return (0.0, 0.0, l);
        }
        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };
        let h = if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        (h * 60.0, s, l)
    }

    /// Parses `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(..)`, `rgba(..)` and a few keywords.
    pub fn parse(input: &str) -> ChartResult<Self> {
        let value = input.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid_color(input));
        }
        let lower = value.to_ascii_lowercase();
        match lower.as_str() {
            "transparent" | "none" => return Ok(Self::TRANSPARENT),
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            _ => {}
        }
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args).ok_or_else(|| invalid_color(input));
        }
        Err(invalid_color(input))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({},{},{})", self.r, self.g, self.b)
        } else {
            let alpha = format!("{:.2}", self.alpha_f64());
            let alpha = alpha.trim_end_matches('0').trim_end_matches('.');
            let alpha = if alpha.is_empty() { "0" } else { alpha };
            write!(f, "rgba({},{},{},{alpha})", self.r, self.g, self.b)
        }
    }
}

impl std::str::FromStr for Color {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid_color(input: &str) -> ChartError {
    ChartError::InvalidData(format!("invalid color `{input}`"))
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nibble = |c: u8| (c as char).to_digit(16).map(|v| v as u8);
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])?;
            let g = nibble(bytes[1])?;
            let b = nibble(bytes[2])?;
            Some(Color::rgb(r * 17, g * 17, b * 17))
        }
        6 | 8 => {
            let byte = |i: usize| Some(nibble(bytes[i])? * 16 + nibble(bytes[i + 1])?);
            let a = if bytes.len() == 8 { byte(6)? } else { 255 };
            Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, a))
        }
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        None => 255,
        Some(raw) => {
            let value = raw.parse::<f64>().ok()?;
            // Fractional alpha follows CSS; larger values are taken as a byte.
            if value <= 1.0 {
                (value.max(0.0) * 255.0).round() as u8
            } else {
                value.min(255.0).round() as u8
            }
        }
    };
    Some(Color::rgba(r, g, b, a))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r1), to_byte(g1), to_byte(b1))
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hsl_round_trip_keeps_color() {
        for color in [
            Color::rgb(84, 112, 198),
            Color::rgb(238, 102, 102),
            Color::rgb(145, 204, 117),
            Color::rgb(10, 10, 10),
        ] {
            assert_eq!(color.adjust_hsl(0.0, 0.0, 0.0), color);
        }
    }

    #[test]
    fn lightness_adjustment_is_clamped() {
        assert_eq!(Color::rgb(120, 30, 30).adjust_hsl(0.0, 0.0, 2.0), Color::WHITE);
        assert_eq!(Color::rgb(120, 30, 30).adjust_hsl(0.0, 0.0, -2.0), Color::BLACK);
    }
}
