use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

/// Raw OHLC sample as supplied by callers.
///
/// `None` in any field marks the sample as missing. Partially missing samples
/// are treated as invalid and skipped by analytics and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OhlcSample {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl OhlcSample {
    #[must_use]
    pub const fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
        }
    }

    /// A fully missing sample.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            open: None,
            high: None,
            low: None,
            close: None,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        validate_ohlc_data(self)
    }

    /// Validated view of this sample, `None` when it fails [`validate_ohlc_data`].
    #[must_use]
    pub fn candle(&self) -> Option<Candle> {
        match (self.open, self.high, self.low, self.close) {
            (Some(open), Some(high), Some(low), Some(close)) => {
                Candle::new(open, high, low, close).ok()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn field(&self, field: OhlcField) -> Option<f64> {
        match field {
            OhlcField::Open => self.open,
            OhlcField::High => self.high,
            OhlcField::Low => self.low,
            OhlcField::Close => self.close,
        }
    }
}

impl From<Candle> for OhlcSample {
    fn from(candle: Candle) -> Self {
        Self::new(candle.open, candle.high, candle.low, candle.close)
    }
}

/// `true` when no field is missing and `low ≤ min(open, close) ≤ max(open, close) ≤ high`.
#[must_use]
pub fn validate_ohlc_data(sample: &OhlcSample) -> bool {
    let (Some(open), Some(high), Some(low), Some(close)) =
        (sample.open, sample.high, sample.low, sample.close)
    else {
        return false;
    };
    if !(open.is_finite() && high.is_finite() && low.is_finite() && close.is_finite()) {
        return false;
    }
    low <= open.min(close) && open.max(close) <= high && low <= high
}

/// A validated OHLC candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Builds a validated candle.
    ///
    /// Invariants:
    /// - all values are finite
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        if !open.is_finite() || !high.is_finite() || !low.is_finite() || !close.is_finite() {
            return Err(ChartError::InvalidData(
                "ohlc values must be finite".to_owned(),
            ));
        }
        if low > high {
            return Err(ChartError::InvalidData(
                "ohlc low must be <= high".to_owned(),
            ));
        }
        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "ohlc open/close must be within low/high range".to_owned(),
            ));
        }
        Ok(Self {
            open,
            high,
            low,
            close,
        })
    }

    /// Close strictly above open.
    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close > self.open
    }

    /// Close strictly below open.
    #[must_use]
    pub fn is_bearish(self) -> bool {
        self.close < self.open
    }

    /// Up-colored when rendering (`close >= open`).
    #[must_use]
    pub fn is_up(self) -> bool {
        self.close >= self.open
    }

    #[must_use]
    pub fn body(self) -> f64 {
        (self.close - self.open).abs()
    }

    #[must_use]
    pub fn range(self) -> f64 {
        self.high - self.low
    }

    #[must_use]
    pub fn body_top(self) -> f64 {
        self.open.max(self.close)
    }

    #[must_use]
    pub fn body_bottom(self) -> f64 {
        self.open.min(self.close)
    }

    #[must_use]
    pub fn body_mid(self) -> f64 {
        (self.open + self.close) / 2.0
    }

    #[must_use]
    pub fn upper_shadow(self) -> f64 {
        self.high - self.body_top()
    }

    #[must_use]
    pub fn lower_shadow(self) -> f64 {
        self.body_bottom() - self.low
    }

    #[must_use]
    pub fn field(self, field: OhlcField) -> f64 {
        match field {
            OhlcField::Open => self.open,
            OhlcField::High => self.high,
            OhlcField::Low => self.low,
            OhlcField::Close => self.close,
        }
    }
}

/// One of the four price fields of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OhlcField {
    Open,
    High,
    Low,
    #[default]
    Close,
}

/// Extracts `field` from every sample; invalid samples map to `None`.
#[must_use]
pub fn field_values(samples: &[OhlcSample], field: OhlcField) -> Vec<Option<f64>> {
    samples
        .iter()
        .map(|sample| sample.candle().map(|candle| candle.field(field)))
        .collect()
}

/// Folds every `period` consecutive samples into one.
///
/// Each window yields `open = first.open`, `close = last.close`,
/// `high = max(high)` and `low = min(low)` over its valid samples. A window
/// without any valid sample becomes a null sample so indices stay aligned.
/// `period <= 1` returns the input unchanged.
#[must_use]
pub fn aggregate_candlestick(samples: &[OhlcSample], period: usize) -> Vec<OhlcSample> {
    if period <= 1 {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity(samples.len().div_ceil(period));
    for window in samples.chunks(period) {
        let mut valid = window.iter().filter_map(OhlcSample::candle);
        let Some(first) = valid.next() else {
            debug!(period, "aggregation window has no valid samples");
            out.push(OhlcSample::null());
            continue;
        };
        let folded = valid.fold(first, |acc, candle| Candle {
            open: acc.open,
            high: acc.high.max(candle.high),
            low: acc.low.min(candle.low),
            close: candle.close,
        });
        out.push(folded.into());
    }
    out
}

/// Keeps the first label of every aggregation window.
#[must_use]
pub fn aggregate_labels(labels: &[String], period: usize) -> Vec<String> {
    if period <= 1 {
        return labels.to_vec();
    }
    labels
        .chunks(period)
        .filter_map(|window| window.first().cloned())
        .collect()
}

/// `(min(low), max(high))` over valid samples.
#[must_use]
pub fn price_extent(samples: &[OhlcSample]) -> Option<(f64, f64)> {
    samples
        .iter()
        .filter_map(OhlcSample::candle)
        .fold(None, |acc, candle| match acc {
            None => Some((candle.low, candle.high)),
            Some((low, high)) => Some((low.min(candle.low), high.max(candle.high))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_null_sample_is_invalid() {
        let sample = OhlcSample {
            close: None,
            ..OhlcSample::new(1.0, 2.0, 0.5, 1.5)
        };
        assert!(!sample.is_valid());
        assert!(sample.candle().is_none());
    }

    #[test]
    fn aggregation_keeps_trailing_partial_window() {
        let samples = [
            OhlcSample::new(1.0, 2.0, 0.5, 1.5),
            OhlcSample::new(1.5, 3.0, 1.0, 2.5),
            OhlcSample::new(2.5, 2.8, 2.0, 2.2),
        ];
        let aggregated = aggregate_candlestick(&samples, 2);
        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated[1], samples[2]);
    }

    #[test]
    fn window_of_invalid_samples_stays_null() {
        let samples = [OhlcSample::null(), OhlcSample::new(5.0, 1.0, 2.0, 3.0)];
        assert_eq!(aggregate_candlestick(&samples, 2), vec![OhlcSample::null()]);
    }
}
