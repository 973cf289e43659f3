use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Color;

pub const THEME_LIGHT: &str = "light";
pub const THEME_DARK: &str = "dark";
pub const THEME_VINTAGE: &str = "vintage";
pub const THEME_ANT: &str = "ant";
pub const THEME_GRAFANA: &str = "grafana";

/// Palette used by every painter of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub is_dark: bool,
    pub background: Color,
    pub text_color: Color,
    pub title_color: Color,
    pub axis_stroke_color: Color,
    pub axis_split_line_color: Color,
    pub legend_text_color: Color,
    pub series_colors: Vec<Color>,
    pub up_color: Color,
    pub down_color: Color,
    pub neutral_color: Color,
}

impl Theme {
    /// Color for series `index`, cycling through the palette.
    #[must_use]
    pub fn series_color(&self, index: usize) -> Color {
        if self.series_colors.is_empty() {
            return self.text_color;
        }
        self.series_colors[index % self.series_colors.len()]
    }

    /// Looks up a registered theme, falling back to the light theme.
    #[must_use]
    pub fn get(name: &str) -> Arc<Theme> {
        let registry = registry();
        if let Some(theme) = registry.get(&name.to_ascii_lowercase()) {
            return Arc::clone(theme);
        }
        if !name.is_empty() {
            warn!(theme = name, "unknown theme; using light theme");
        }
        Arc::clone(&registry[THEME_LIGHT])
    }

    #[must_use]
    pub fn light() -> Arc<Theme> {
        Self::get(THEME_LIGHT)
    }

    #[must_use]
    pub fn dark() -> Arc<Theme> {
        Self::get(THEME_DARK)
    }
}

/// Names of the built-in themes in registration order.
#[must_use]
pub fn theme_names() -> Vec<&'static str> {
    registry().keys().map(String::as_str).collect()
}

fn registry() -> &'static IndexMap<String, Arc<Theme>> {
    static REGISTRY: OnceLock<IndexMap<String, Arc<Theme>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        [light(), dark(), vintage(), ant(), grafana()]
            .into_iter()
            .map(|theme| (theme.name.clone(), Arc::new(theme)))
            .collect()
    })
}

fn hex(value: u32) -> Color {
    Color::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

fn default_series_colors() -> Vec<Color> {
    [
        0x5470c6, 0x91cc75, 0xfac858, 0xee6666, 0x73c0de, 0x3ba272, 0xfc8452, 0x9a60b4, 0xea7ccc,
    ]
    .into_iter()
    .map(hex)
    .collect()
}

fn light() -> Theme {
    Theme {
        name: THEME_LIGHT.to_owned(),
        is_dark: false,
        background: Color::WHITE,
        text_color: hex(0x464646),
        title_color: hex(0x464646),
        axis_stroke_color: hex(0x6e7079),
        axis_split_line_color: hex(0xe0e6f1),
        legend_text_color: hex(0x464646),
        series_colors: default_series_colors(),
        up_color: hex(0x2aa16b),
        down_color: hex(0xdc4b4b),
        neutral_color: hex(0x8c8c8c),
    }
}

fn dark() -> Theme {
    Theme {
        name: THEME_DARK.to_owned(),
        is_dark: true,
        background: hex(0x100c2a),
        text_color: hex(0xeeeeee),
        title_color: hex(0xeeeeee),
        axis_stroke_color: hex(0xb9b8ce),
        axis_split_line_color: hex(0x484753),
        legend_text_color: hex(0xeeeeee),
        series_colors: [
            0x4992ff, 0x7cffb2, 0xfddd60, 0xff6e76, 0x58d9f9, 0x05c091, 0xff8a45, 0x8d48e3,
            0xdd79ff,
        ]
        .into_iter()
        .map(hex)
        .collect(),
        up_color: hex(0x26c281),
        down_color: hex(0xff5c5c),
        neutral_color: hex(0xa6a6a6),
    }
}

fn vintage() -> Theme {
    Theme {
        name: THEME_VINTAGE.to_owned(),
        is_dark: false,
        background: hex(0xfef8ef),
        text_color: hex(0x333333),
        title_color: hex(0x333333),
        axis_stroke_color: hex(0x888888),
        axis_split_line_color: hex(0xe6dccb),
        legend_text_color: hex(0x333333),
        series_colors: [
            0xd87c7c, 0x919e8b, 0xd7ab82, 0x6e7074, 0x61a0a8, 0xefa18d, 0x787464, 0xcc7e63,
            0x724e58, 0x4b565b,
        ]
        .into_iter()
        .map(hex)
        .collect(),
        up_color: hex(0x919e8b),
        down_color: hex(0xd87c7c),
        neutral_color: hex(0x787464),
    }
}

fn ant() -> Theme {
    Theme {
        name: THEME_ANT.to_owned(),
        is_dark: false,
        background: Color::WHITE,
        text_color: hex(0x595959),
        title_color: hex(0x262626),
        axis_stroke_color: hex(0xbfbfbf),
        axis_split_line_color: hex(0xf0f0f0),
        legend_text_color: hex(0x595959),
        series_colors: [
            0x5b8ff9, 0x5ad8a6, 0x5d7092, 0xf6bd16, 0x6f5ef9, 0x6dc8ec, 0x945fb9, 0xff9845,
        ]
        .into_iter()
        .map(hex)
        .collect(),
        up_color: hex(0x52c41a),
        down_color: hex(0xf5222d),
        neutral_color: hex(0x8c8c8c),
    }
}

fn grafana() -> Theme {
    Theme {
        name: THEME_GRAFANA.to_owned(),
        is_dark: true,
        background: hex(0x111217),
        text_color: hex(0xd8d9da),
        title_color: hex(0xd8d9da),
        axis_stroke_color: hex(0x8e8e8e),
        axis_split_line_color: hex(0x2c2d33),
        legend_text_color: hex(0xd8d9da),
        series_colors: [
            0x7eb26d, 0xeab839, 0x6ed0e0, 0xef843c, 0xe24d42, 0x1f78c1, 0xba43a9, 0x705da0,
        ]
        .into_iter()
        .map(hex)
        .collect(),
        up_color: hex(0x73bf69),
        down_color: hex(0xf2495c),
        neutral_color: hex(0x8e8e8e),
    }
}
