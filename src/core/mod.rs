pub mod candlestick;
pub mod color;
pub mod format;
pub mod geometry;
pub mod range;
pub mod text;
pub mod theme;
pub mod types;

pub use candlestick::{
    Candle, OhlcField, OhlcSample, aggregate_candlestick, aggregate_labels, validate_ohlc_data,
};
pub use color::Color;
pub use format::{ValueFormatter, humanize, humanize_default};
pub use range::{AxisKind, AxisRange, RangeOptions, divide_positions, solve_value_range};
pub use theme::Theme;
pub use types::{Align, Bounds, DEFAULT_FONT_SIZE, FontStyle, Offset, Orient, Point, Side};
