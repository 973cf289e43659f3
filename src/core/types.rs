use serde::{Deserialize, Serialize};

use crate::core::Color;

/// Default font size (pt) used when a `FontStyle` leaves it unset.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Integer pixel coordinate.
///
/// A point whose `y` equals [`Point::NULL_Y`] marks a break in a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const NULL_Y: i32 = i32::MAX;

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// A break marker at horizontal position `x`.
    #[must_use]
    pub const fn null(x: i32) -> Self {
        Self { x, y: Self::NULL_Y }
    }

    #[must_use]
    pub const fn is_null(self) -> bool {
        self.y == Self::NULL_Y
    }
}

/// Rectangular region in pixels.
///
/// Used both as a drawable region (`right`/`bottom` exclusive edges) and as a
/// four-sided padding value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    #[serde(default)]
    pub is_set: bool,
}

impl Bounds {
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            is_set: true,
        }
    }

    /// Same value on all four sides, typically a padding.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub const fn width(self) -> i32 {
        self.right - self.left
    }

    #[must_use]
    pub const fn height(self) -> i32 {
        self.bottom - self.top
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }

    /// Shrinks the box inward by a four-sided padding. Never inverts the box.
    #[must_use]
    pub fn padded(self, padding: Bounds) -> Self {
        let left = self.left + padding.left;
        let top = self.top + padding.top;
        let right = (self.right - padding.right).max(left);
        let bottom = (self.bottom - padding.bottom).max(top);
        Self::new(left, top, right, bottom)
    }

    /// Moves the box by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    #[must_use]
    pub fn intersects(self, other: Bounds) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    #[must_use]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    #[must_use]
    pub fn union(self, other: Bounds) -> Self {
        if !self.is_set {
            return other;
        }
        if !other.is_set {
            return self;
        }
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// Either an absolute pixel offset or a symbolic position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Offset {
    Px(i32),
    Percent(f64),
    #[default]
    Left,
    Center,
    Right,
    Top,
    Bottom,
}

impl Offset {
    /// Parses `"left"`, `"center"`, `"right"`, `"top"`, `"bottom"`, `"N%"` or a plain integer.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "middle" => Some(Self::Center),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => {
                if let Some(percent) = value.strip_suffix('%') {
                    return percent.trim().parse::<f64>().ok().map(Self::Percent);
                }
                let value = value.strip_suffix("px").unwrap_or(value);
                value.parse::<f64>().ok().map(|v| Self::Px(v.round() as i32))
            }
        }
    }

    /// Resolves the offset of a `content`-sized item inside `available` pixels.
    #[must_use]
    pub fn resolve(self, available: i32, content: i32) -> i32 {
        match self {
            Self::Px(value) => value,
            Self::Percent(percent) => (f64::from(available) * percent / 100.0).round() as i32,
            Self::Left | Self::Top => 0,
            Self::Center => (available - content) / 2,
            Self::Right | Self::Bottom => available - content,
        }
    }
}

/// Horizontal alignment of text or legend items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// Layout orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orient {
    #[default]
    Horizontal,
    Vertical,
}

/// Side of the drawing area an element is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    #[default]
    Top,
    Bottom,
}

/// Font family, size and color. Unset fields inherit from the painter and theme.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FontStyle {
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub color: Option<Color>,
}

impl FontStyle {
    #[must_use]
    pub fn new(size: f64, color: Color) -> Self {
        Self {
            font: None,
            size: Some(size),
            color: Some(color),
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Effective size, falling back to [`DEFAULT_FONT_SIZE`] for unset or invalid sizes.
    #[must_use]
    pub fn size_or_default(&self) -> f64 {
        match self.size {
            Some(size) if size.is_finite() && size > 0.0 => size,
            _ => DEFAULT_FONT_SIZE,
        }
    }

    /// Fills unset fields from `defaults`.
    #[must_use]
    pub fn inherit(&self, defaults: &FontStyle) -> FontStyle {
        FontStyle {
            font: self.font.clone().or_else(|| defaults.font.clone()),
            size: self.size.or(defaults.size),
            color: match self.color {
                Some(color) if !color.is_zero() => Some(color),
                _ => defaults.color,
            },
        }
    }
}
