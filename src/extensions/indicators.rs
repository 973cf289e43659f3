//! Trend lines computed over a price field.
//!
//! Every function maps an input series of optional values onto an output of
//! the same length. `None` marks an index where the indicator is undefined
//! (series head before the first full window, or a missing input sample);
//! renderers break the line there instead of drawing partial values.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::Color;

/// Number of standard deviations spanned by Bollinger bands.
pub const BOLLINGER_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendKind {
    Sma,
    Ema,
    Linear,
    BollingerUpper,
    BollingerLower,
}

/// Trend-line descriptor attached to a candlestick field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub kind: TrendKind,
    /// Window length; ignored by [`TrendKind::Linear`].
    #[serde(default)]
    pub period: usize,
    #[serde(default)]
    pub color: Option<Color>,
    /// Dashed lines use the `[4, 2]` dash pattern.
    #[serde(default)]
    pub dashed: bool,
    #[serde(default)]
    pub stroke_width: Option<f64>,
}

impl TrendLine {
    #[must_use]
    pub fn new(kind: TrendKind, period: usize) -> Self {
        Self {
            kind,
            period,
            color: None,
            dashed: false,
            stroke_width: None,
        }
    }

    #[must_use]
    pub fn sma(period: usize) -> Self {
        Self::new(TrendKind::Sma, period)
    }

    #[must_use]
    pub fn ema(period: usize) -> Self {
        Self::new(TrendKind::Ema, period)
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

/// Dispatches to the indicator named by `trend_line.kind`.
#[must_use]
pub fn compute_trend_line(values: &[Option<f64>], trend_line: &TrendLine) -> Vec<Option<f64>> {
    match trend_line.kind {
        TrendKind::Sma => sma(values, trend_line.period),
        TrendKind::Ema => ema(values, trend_line.period),
        TrendKind::Linear => linear_regression(values),
        TrendKind::BollingerUpper => bollinger_bands(values, trend_line.period).0,
        TrendKind::BollingerLower => bollinger_bands(values, trend_line.period).1,
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Simple moving average over the last `period` valid values.
#[must_use]
pub fn sma(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    windowed(values, period, |window| {
        window.iter().sum::<f64>() / window.len() as f64
    })
}

/// Exponential moving average with `α = 2 / (period + 1)`.
///
/// The first defined value is the SMA of the first `period` valid values.
#[must_use]
pub fn ema(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut seed_sum = 0.0;
    let mut seen = 0usize;
    let mut current: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(value) = finite(*value) else {
            continue;
        };
        match current {
            Some(previous) => {
                let next = alpha * value + (1.0 - alpha) * previous;
                current = Some(next);
                out[i] = Some(next);
            }
            None => {
                seed_sum += value;
                seen += 1;
                if seen == period && i + 1 >= period {
                    let seed = seed_sum / period as f64;
                    current = Some(seed);
                    out[i] = Some(seed);
                }
            }
        }
    }
    out
}

/// Upper and lower Bollinger bands: `SMA ± 2σ` over each window.
///
/// σ is the population standard deviation of the window.
#[must_use]
pub fn bollinger_bands(values: &[Option<f64>], period: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let deviation = windowed(values, period, |window| {
        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        variance.sqrt()
    });
    let mean = sma(values, period);
    let upper = mean
        .iter()
        .zip(&deviation)
        .map(|(m, d)| Some((*m)? + BOLLINGER_WIDTH * (*d)?))
        .collect();
    let lower = mean
        .iter()
        .zip(&deviation)
        .map(|(m, d)| Some((*m)? - BOLLINGER_WIDTH * (*d)?))
        .collect();
    (upper, lower)
}

/// Least-squares line over all valid `(index, value)` pairs, evaluated at every index.
///
/// Fewer than two valid values yields no line.
#[must_use]
pub fn linear_regression(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| finite(*v).map(|v| (i as f64, v)))
        .collect();
    if points.len() < 2 {
        return vec![None; values.len()];
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let covariance: f64 = points.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let variance: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    let slope = if variance == 0.0 { 0.0 } else { covariance / variance };
    let intercept = mean_y - slope * mean_x;
    (0..values.len())
        .map(|i| Some(intercept + slope * i as f64))
        .collect()
}

/// Applies `reduce` to the last `period` valid values ending at each valid index.
fn windowed<F>(values: &[Option<f64>], period: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let mut window: VecDeque<f64> = VecDeque::with_capacity(period + 1);
    for (i, value) in values.iter().enumerate() {
        let Some(value) = finite(*value) else {
            continue;
        };
        window.push_back(value);
        if window.len() > period {
            window.pop_front();
        }
        if window.len() == period && i + 1 >= period {
            out[i] = Some(reduce(window.make_contiguous()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_skips_missing_values() {
        let values = [Some(1.0), None, Some(3.0), Some(5.0)];
        assert_eq!(sma(&values, 2), vec![None, None, Some(2.0), Some(4.0)]);
    }

    #[test]
    fn zero_period_is_undefined_everywhere() {
        assert_eq!(sma(&[Some(1.0)], 0), vec![None]);
        assert_eq!(ema(&[Some(1.0)], 0), vec![None]);
    }
}
