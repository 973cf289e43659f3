//! Candlestick analytics layered over the core data model.
//!
//! Nothing here draws; the candlestick renderer consumes these results.

pub mod indicators;
pub mod pattern_labels;
pub mod patterns;

pub use indicators::{TrendKind, TrendLine, bollinger_bands, compute_trend_line, ema, linear_regression, sma};
pub use pattern_labels::{
    CandleLabel, LabelRequest, PlacedLabel, majority_sentiment, pattern_label_text, place_labels,
    resolve_candle_labels,
};
pub use patterns::{
    CandlestickPattern, PatternConfig, PatternDetection, PatternFormatter, PatternScan,
    PatternSentiment, merge_patterns, scan_for_candlestick_patterns,
};
