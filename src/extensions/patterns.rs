//! Candlestick pattern detection.
//!
//! Fourteen single-, two- and three-candle patterns. Detectors read their
//! thresholds from [`PatternConfig`]; any sample that fails OHLC validation
//! makes the detectors touching it return `false`.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

#[cfg(feature = "parallel-scan")]
use rayon::prelude::*;

use crate::core::{Candle, OhlcSample};

pub const DEFAULT_DOJI_THRESHOLD: f64 = 0.05;
pub const DEFAULT_SHADOW_TOLERANCE: f64 = 0.01;
pub const DEFAULT_SHADOW_RATIO: f64 = 2.0;
pub const DEFAULT_ENGULFING_MIN_SIZE: f64 = 1.0;

/// The opposite shadow may be at most this fraction of the long shadow.
const SHORT_SHADOW_FRACTION: f64 = 0.3;
/// Shooting stars keep the body within the lower third of the range.
const LOWER_THIRD: f64 = 0.33;
/// Star middle candle body limit relative to the first body.
const STAR_BODY_FRACTION: f64 = 0.3;
/// Star third candle body minimum relative to the first body.
const STAR_CONFIRM_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlestickPattern {
    Doji,
    Hammer,
    InvertedHammer,
    ShootingStar,
    GravestoneDoji,
    DragonflyDoji,
    BullishMarubozu,
    BearishMarubozu,
    EngulfingBull,
    EngulfingBear,
    PiercingLine,
    DarkCloudCover,
    MorningStar,
    EveningStar,
}

/// Market direction a pattern suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl CandlestickPattern {
    pub const ALL: [CandlestickPattern; 14] = [
        Self::Doji,
        Self::Hammer,
        Self::InvertedHammer,
        Self::ShootingStar,
        Self::GravestoneDoji,
        Self::DragonflyDoji,
        Self::BullishMarubozu,
        Self::BearishMarubozu,
        Self::EngulfingBull,
        Self::EngulfingBear,
        Self::PiercingLine,
        Self::DarkCloudCover,
        Self::MorningStar,
        Self::EveningStar,
    ];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Doji => "Doji",
            Self::Hammer => "Hammer",
            Self::InvertedHammer => "Inverted Hammer",
            Self::ShootingStar => "Shooting Star",
            Self::GravestoneDoji => "Gravestone Doji",
            Self::DragonflyDoji => "Dragonfly Doji",
            Self::BullishMarubozu => "Bullish Marubozu",
            Self::BearishMarubozu => "Bearish Marubozu",
            Self::EngulfingBull => "Bullish Engulfing",
            Self::EngulfingBear => "Bearish Engulfing",
            Self::PiercingLine => "Piercing Line",
            Self::DarkCloudCover => "Dark Cloud Cover",
            Self::MorningStar => "Morning Star",
            Self::EveningStar => "Evening Star",
        }
    }

    /// Candles the pattern spans, ending at the detection index.
    #[must_use]
    pub const fn min_candles(self) -> usize {
        match self {
            Self::EngulfingBull | Self::EngulfingBear | Self::PiercingLine | Self::DarkCloudCover => {
                2
            }
            Self::MorningStar | Self::EveningStar => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub const fn sentiment(self) -> PatternSentiment {
        match self {
            Self::Hammer
            | Self::InvertedHammer
            | Self::DragonflyDoji
            | Self::BullishMarubozu
            | Self::EngulfingBull
            | Self::PiercingLine
            | Self::MorningStar => PatternSentiment::Bullish,
            Self::ShootingStar
            | Self::GravestoneDoji
            | Self::BearishMarubozu
            | Self::EngulfingBear
            | Self::DarkCloudCover
            | Self::EveningStar => PatternSentiment::Bearish,
            Self::Doji => PatternSentiment::Neutral,
        }
    }

    fn detect(self, candles: &[Option<Candle>], index: usize, config: &PatternConfig) -> bool {
        let needed = self.min_candles();
        if index + 1 < needed {
            return false;
        }
        let window = &candles[index + 1 - needed..=index];
        let Some(window) = window.iter().copied().collect::<Option<SmallVec<[Candle; 3]>>>()
        else {
            return false;
        };
        let t = Thresholds::from(config);
        match (self, window.as_slice()) {
            (Self::Doji, [c]) => is_doji(*c, &t),
            (Self::Hammer, [c]) => is_hammer(*c, &t),
            (Self::InvertedHammer, [c]) => is_inverted_hammer(*c, &t),
            (Self::ShootingStar, [c]) => is_shooting_star(*c, &t),
            (Self::GravestoneDoji, [c]) => is_gravestone_doji(*c, &t),
            (Self::DragonflyDoji, [c]) => is_dragonfly_doji(*c, &t),
            (Self::BullishMarubozu, [c]) => is_marubozu(*c, &t) && c.is_bullish(),
            (Self::BearishMarubozu, [c]) => is_marubozu(*c, &t) && c.is_bearish(),
            (Self::EngulfingBull, [prev, cur]) => is_bullish_engulfing(*prev, *cur, &t),
            (Self::EngulfingBear, [prev, cur]) => is_bearish_engulfing(*prev, *cur, &t),
            (Self::PiercingLine, [prev, cur]) => is_piercing_line(*prev, *cur),
            (Self::DarkCloudCover, [prev, cur]) => is_dark_cloud_cover(*prev, *cur),
            (Self::MorningStar, [first, middle, last]) => is_morning_star(*first, *middle, *last),
            (Self::EveningStar, [first, middle, last]) => is_evening_star(*first, *middle, *last),
            _ => false,
        }
    }
}

impl fmt::Display for CandlestickPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PatternDetection {
    pub index: usize,
    pub name: &'static str,
    pub pattern: CandlestickPattern,
}

/// Detections per sample index, indices ascending.
pub type PatternScan = IndexMap<usize, SmallVec<[PatternDetection; 4]>>;

type PatternFormatterFn = dyn Fn(&[PatternDetection]) -> String + Send + Sync;

/// Custom text for a candle's pattern badge.
#[derive(Clone)]
pub struct PatternFormatter(Arc<PatternFormatterFn>);

impl PatternFormatter {
    pub fn new<F>(formatter: F) -> Self
    where
        F: Fn(&[PatternDetection]) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(formatter))
    }

    #[must_use]
    pub fn format(&self, detections: &[PatternDetection]) -> String {
        (self.0)(detections)
    }
}

impl fmt::Debug for PatternFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PatternFormatter(..)")
    }
}

/// Enabled patterns and detection thresholds.
///
/// A threshold counts as set when it is positive; otherwise its default applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default)]
    pub enabled_patterns: Vec<CandlestickPattern>,
    #[serde(default)]
    pub doji_threshold: Option<f64>,
    #[serde(default)]
    pub shadow_tolerance: Option<f64>,
    #[serde(default)]
    pub shadow_ratio: Option<f64>,
    #[serde(default)]
    pub engulfing_min_size: Option<f64>,
    /// Pattern labels replace user labels at the same index.
    #[serde(default)]
    pub prefer_pattern_labels: bool,
    #[serde(skip)]
    pub pattern_formatter: Option<PatternFormatter>,
}

impl PatternConfig {
    #[must_use]
    pub fn new(enabled_patterns: impl Into<Vec<CandlestickPattern>>) -> Self {
        Self {
            enabled_patterns: enabled_patterns.into(),
            ..Self::default()
        }
    }

    /// Every pattern enabled with default thresholds.
    #[must_use]
    pub fn all() -> Self {
        Self::new(CandlestickPattern::ALL)
    }

    #[must_use]
    pub fn with_doji_threshold(mut self, value: f64) -> Self {
        self.doji_threshold = Some(value);
        self
    }

    #[must_use]
    pub fn with_shadow_tolerance(mut self, value: f64) -> Self {
        self.shadow_tolerance = Some(value);
        self
    }

    #[must_use]
    pub fn with_shadow_ratio(mut self, value: f64) -> Self {
        self.shadow_ratio = Some(value);
        self
    }

    #[must_use]
    pub fn with_engulfing_min_size(mut self, value: f64) -> Self {
        self.engulfing_min_size = Some(value);
        self
    }

    #[must_use]
    pub fn effective_doji_threshold(&self) -> f64 {
        positive_or(self.doji_threshold, DEFAULT_DOJI_THRESHOLD)
    }

    #[must_use]
    pub fn effective_shadow_tolerance(&self) -> f64 {
        positive_or(self.shadow_tolerance, DEFAULT_SHADOW_TOLERANCE)
    }

    #[must_use]
    pub fn effective_shadow_ratio(&self) -> f64 {
        positive_or(self.shadow_ratio, DEFAULT_SHADOW_RATIO)
    }

    #[must_use]
    pub fn effective_engulfing_min_size(&self) -> f64 {
        positive_or(self.engulfing_min_size, DEFAULT_ENGULFING_MIN_SIZE)
    }
}

impl PartialEq for PatternConfig {
    fn eq(&self, other: &Self) -> bool {
        self.enabled_patterns == other.enabled_patterns
            && self.doji_threshold == other.doji_threshold
            && self.shadow_tolerance == other.shadow_tolerance
            && self.shadow_ratio == other.shadow_ratio
            && self.engulfing_min_size == other.engulfing_min_size
            && self.prefer_pattern_labels == other.prefer_pattern_labels
            && self.pattern_formatter.is_some() == other.pattern_formatter.is_some()
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

fn set_value(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Combines two configs.
///
/// Enabled patterns are the union in `a`-then-`b` order without duplicates.
/// Thresholds take `a`'s value when set, else `b`'s. The label preference and
/// formatter come from `a`, falling back to `b`'s formatter when `a` has none.
#[must_use]
pub fn merge_patterns(
    a: Option<&PatternConfig>,
    b: Option<&PatternConfig>,
) -> Option<PatternConfig> {
    let (a, b) = match (a, b) {
        (None, None) => return None,
        (Some(only), None) | (None, Some(only)) => return Some(only.clone()),
        (Some(a), Some(b)) => (a, b),
    };
    let mut enabled_patterns: Vec<CandlestickPattern> = Vec::new();
    for pattern in a.enabled_patterns.iter().chain(&b.enabled_patterns) {
        if !enabled_patterns.contains(pattern) {
            enabled_patterns.push(*pattern);
        }
    }
    Some(PatternConfig {
        enabled_patterns,
        doji_threshold: set_value(a.doji_threshold).or(b.doji_threshold),
        shadow_tolerance: set_value(a.shadow_tolerance).or(b.shadow_tolerance),
        shadow_ratio: set_value(a.shadow_ratio).or(b.shadow_ratio),
        engulfing_min_size: set_value(a.engulfing_min_size).or(b.engulfing_min_size),
        prefer_pattern_labels: a.prefer_pattern_labels,
        pattern_formatter: a.pattern_formatter.clone(),
    })
}

/// Detects every enabled pattern at every index.
///
/// Result keys ascend by index; detections at one index follow the order of
/// `config.enabled_patterns`. Invalid samples are skipped.
#[must_use]
pub fn scan_for_candlestick_patterns(samples: &[OhlcSample], config: &PatternConfig) -> PatternScan {
    let candles: Vec<Option<Candle>> = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let candle = sample.candle();
            if candle.is_none() {
                debug!(index, "skipping invalid ohlc sample in pattern scan");
            }
            candle
        })
        .collect();

    let mut enabled: SmallVec<[CandlestickPattern; 14]> = SmallVec::new();
    for pattern in &config.enabled_patterns {
        if !enabled.contains(pattern) {
            enabled.push(*pattern);
        }
    }

    let detect_at = |index: usize| -> Option<(usize, SmallVec<[PatternDetection; 4]>)> {
        let found: SmallVec<[PatternDetection; 4]> = enabled
            .iter()
            .filter(|pattern| pattern.detect(&candles, index, config))
            .map(|pattern| PatternDetection {
                index,
                name: pattern.display_name(),
                pattern: *pattern,
            })
            .collect();
        (!found.is_empty()).then_some((index, found))
    };

    // Indexed collection keeps index order in both paths.
    #[cfg(feature = "parallel-scan")]
    let found: Vec<_> = (0..candles.len())
        .into_par_iter()
        .filter_map(detect_at)
        .collect();
    #[cfg(not(feature = "parallel-scan"))]
    let found: Vec<_> = (0..candles.len()).filter_map(detect_at).collect();

    found.into_iter().collect()
}

/// Resolved thresholds for one scan.
struct Thresholds {
    doji: f64,
    shadow_tolerance: f64,
    shadow_ratio: f64,
    engulfing_min_size: f64,
}

impl From<&PatternConfig> for Thresholds {
    fn from(config: &PatternConfig) -> Self {
        Self {
            doji: config.effective_doji_threshold(),
            shadow_tolerance: config.effective_shadow_tolerance(),
            shadow_ratio: config.effective_shadow_ratio(),
            engulfing_min_size: config.effective_engulfing_min_size(),
        }
    }
}

fn is_doji(c: Candle, t: &Thresholds) -> bool {
    let range = c.range();
    range > 0.0 && c.body() / range <= t.doji
}

fn is_hammer(c: Candle, t: &Thresholds) -> bool {
    let lower = c.lower_shadow();
    c.range() > 0.0
        && lower > 0.0
        && lower >= t.shadow_ratio * c.body()
        && c.upper_shadow() <= SHORT_SHADOW_FRACTION * lower
}

fn is_inverted_hammer(c: Candle, t: &Thresholds) -> bool {
    let upper = c.upper_shadow();
    c.range() > 0.0
        && upper > 0.0
        && upper >= t.shadow_ratio * c.body()
        && c.lower_shadow() <= SHORT_SHADOW_FRACTION * upper
}

fn is_shooting_star(c: Candle, t: &Thresholds) -> bool {
    is_inverted_hammer(c, t) && (c.body_bottom() - c.low) / c.range() <= LOWER_THIRD
}

fn is_gravestone_doji(c: Candle, t: &Thresholds) -> bool {
    let mid = c.body_mid();
    let upper = c.high - mid;
    let lower = mid - c.low;
    is_doji(c, t)
        && upper > 0.0
        && upper >= t.shadow_ratio * c.body()
        && lower <= SHORT_SHADOW_FRACTION * upper
}

fn is_dragonfly_doji(c: Candle, t: &Thresholds) -> bool {
    let mid = c.body_mid();
    let upper = c.high - mid;
    let lower = mid - c.low;
    is_doji(c, t)
        && lower > 0.0
        && lower >= t.shadow_ratio * c.body()
        && upper <= SHORT_SHADOW_FRACTION * lower
}

fn is_marubozu(c: Candle, t: &Thresholds) -> bool {
    let range = c.range();
    range > 0.0
        && c.body() > 0.0
        && (c.upper_shadow() + c.lower_shadow()) / range <= t.shadow_tolerance
}

fn is_bullish_engulfing(prev: Candle, cur: Candle, t: &Thresholds) -> bool {
    prev.is_bearish()
        && cur.is_bullish()
        && cur.body_top() > prev.body_top()
        && cur.body_bottom() < prev.body_bottom()
        && cur.body() >= t.engulfing_min_size * prev.body()
}

fn is_bearish_engulfing(prev: Candle, cur: Candle, t: &Thresholds) -> bool {
    prev.is_bullish()
        && cur.is_bearish()
        && cur.body_top() > prev.body_top()
        && cur.body_bottom() < prev.body_bottom()
        && cur.body() >= t.engulfing_min_size * prev.body()
}

fn is_piercing_line(prev: Candle, cur: Candle) -> bool {
    prev.is_bearish()
        && cur.is_bullish()
        && cur.open < prev.close
        && cur.close > prev.body_mid()
        && cur.close < prev.open
}

fn is_dark_cloud_cover(prev: Candle, cur: Candle) -> bool {
    prev.is_bullish()
        && cur.is_bearish()
        && cur.open > prev.close
        && cur.close < prev.body_mid()
        && cur.close > prev.open
}

fn is_morning_star(first: Candle, middle: Candle, last: Candle) -> bool {
    let first_body = first.body();
    first.is_bearish()
        && middle.body() <= STAR_BODY_FRACTION * first_body
        && middle.body_top() < first.close
        && last.is_bullish()
        && last.body() >= STAR_CONFIRM_FRACTION * first_body
        && last.open > middle.body_top()
        && last.close > first.body_mid()
}

fn is_evening_star(first: Candle, middle: Candle, last: Candle) -> bool {
    let first_body = first.body();
    first.is_bullish()
        && middle.body() <= STAR_BODY_FRACTION * first_body
        && middle.body_bottom() > first.close
        && last.is_bearish()
        && last.body() >= STAR_CONFIRM_FRACTION * first_body
        && last.open < middle.body_bottom()
        && last.close < first.body_mid()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle::new(open, high, low, close).expect("valid candle")
    }

    #[test]
    fn hammer_has_long_lower_shadow() {
        let t = Thresholds::from(&PatternConfig::default());
        assert!(is_hammer(candle(10.0, 10.5, 5.0, 10.4), &t));
        assert!(!is_hammer(candle(10.0, 14.0, 5.0, 10.4), &t));
    }

    #[test]
    fn shooting_star_needs_body_near_low() {
        let t = Thresholds::from(&PatternConfig::default());
        assert!(is_shooting_star(candle(10.0, 15.0, 9.9, 10.3), &t));
    }

    #[test]
    fn morning_star_confirms_above_first_midpoint() {
        let first = candle(20.0, 20.5, 14.5, 15.0);
        let middle = candle(14.0, 14.5, 13.5, 14.2);
        let last = candle(14.8, 19.5, 14.6, 19.0);
        assert!(is_morning_star(first, middle, last));
        assert!(!is_evening_star(first, middle, last));
    }

    #[test]
    fn non_positive_threshold_falls_back_to_default() {
        let config = PatternConfig::default().with_doji_threshold(0.0);
        assert_eq!(config.effective_doji_threshold(), DEFAULT_DOJI_THRESHOLD);
    }
}
