use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::format::{ValueFormatter, format_value};
use crate::error::ChartResult;

/// Default target number of labels on a value axis.
pub const DEFAULT_LABEL_COUNT: usize = 6;
/// Upper bound on ticks emitted by the solver.
pub const MAX_TICK_COUNT: usize = 12;
/// Minimum vertical distance between value labels when the axis size is known.
pub const MIN_LABEL_SPACING_PX: i32 = 20;

const NICE_MULTIPLIERS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];
const MAX_STEP_DECIMALS: usize = 10;
const MAX_UNIT_ATTEMPTS: usize = 64;

/// Hints controlling [`solve_value_range`].
#[derive(Debug, Clone, Default)]
pub struct RangeOptions {
    /// Forced axis minimum.
    pub min: Option<f64>,
    /// Forced axis maximum.
    pub max: Option<f64>,
    /// Suggested step; the solver uses the smallest integer multiple that fits.
    pub unit: Option<f64>,
    /// Target number of labels (ticks).
    pub label_count: Option<usize>,
    /// Added to the target label count after defaults are resolved.
    pub label_count_adjustment: i32,
    /// Window inflation factor; `1.0` leaves the data span untouched.
    pub padding_scale: Option<f64>,
    /// Pixels available along the axis, used to cap label density.
    pub axis_size_px: Option<i32>,
    pub formatter: Option<ValueFormatter>,
}

impl RangeOptions {
    #[must_use]
    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_label_count(mut self, label_count: usize) -> Self {
        self.label_count = Some(label_count);
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: f64) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub fn with_padding_scale(mut self, padding_scale: f64) -> Self {
        self.padding_scale = Some(padding_scale);
        self
    }

    #[must_use]
    pub fn with_axis_size(mut self, axis_size_px: i32) -> Self {
        self.axis_size_px = Some(axis_size_px);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Option<ValueFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Largest interval count the available pixels can carry.
    fn max_feasible_intervals(&self) -> usize {
        let cap = MAX_TICK_COUNT - 1;
        match self.axis_size_px {
            Some(size) if size > 0 => ((size / MIN_LABEL_SPACING_PX).max(1) as usize).min(cap),
            _ => cap,
        }
    }

    fn target_intervals(&self) -> usize {
        let base = self.label_count.unwrap_or(DEFAULT_LABEL_COUNT) as i64;
        let adjusted = (base + i64::from(self.label_count_adjustment)).max(2) as usize;
        (adjusted - 1).clamp(1, self.max_feasible_intervals())
    }
}

/// Whether an axis maps continuous values or discrete categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisKind {
    #[default]
    Value,
    Category,
}

/// Solved axis: bounds, step and formatted labels.
///
/// For value axes `labels.len() == tick_count`, `min < max` and
/// `(max - min)` is an integer multiple of `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub kind: AxisKind,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub tick_count: usize,
    pub labels: Vec<String>,
    /// Category axes only: data sits between ticks instead of on them.
    pub boundary_gap: bool,
}

impl AxisRange {
    /// Builds a category axis over `labels`.
    #[must_use]
    pub fn category(labels: Vec<String>, boundary_gap: bool) -> Self {
        let count = labels.len();
        Self {
            kind: AxisKind::Category,
            min: 0.0,
            max: count.saturating_sub(1).max(1) as f64,
            step: 1.0,
            tick_count: count,
            labels,
            boundary_gap,
        }
    }

    #[must_use]
    pub fn is_category(&self) -> bool {
        self.kind == AxisKind::Category
    }

    /// Number of divider positions produced by [`AxisRange::divide`].
    #[must_use]
    pub fn divide_count(&self) -> usize {
        if self.boundary_gap {
            self.tick_count + 1
        } else {
            self.tick_count
        }
    }

    /// Evenly spaced tick positions across `[0, total]`, both ends inclusive.
    #[must_use]
    pub fn divide(&self, total: i32) -> Vec<i32> {
        divide_positions(total, self.divide_count())
    }

    /// Pixel offset of the center of data index `index` along an axis of `total` pixels.
    #[must_use]
    pub fn index_center(&self, index: usize, total: i32) -> i32 {
        let positions = self.divide(total);
        match (positions.get(index), positions.get(index + 1)) {
            (Some(start), Some(end)) if self.boundary_gap => (start + end) / 2,
            (Some(start), _) => *start,
            _ => total,
        }
    }

    /// Offset of `value` from the axis origin (min) along `total` pixels.
    #[must_use]
    pub fn value_to_offset(&self, value: f64, total: i32) -> i32 {
        let span = self.max - self.min;
        if span <= 0.0 || !value.is_finite() {
            return 0;
        }
        ((value - self.min) / span * f64::from(total)).round() as i32
    }

    /// Inverted-y pixel of `value` inside a region `height` pixels tall.
    #[must_use]
    pub fn value_to_y(&self, value: f64, height: i32) -> i32 {
        height - self.value_to_offset(value, height)
    }

    /// Tick values from `min` to `max` inclusive (value axes).
    #[must_use]
    pub fn tick_values(&self) -> Vec<f64> {
        let decimals = step_decimals(self.step).unwrap_or(MAX_STEP_DECIMALS);
        (0..self.tick_count)
            .map(|i| round_to(self.min + self.step * i as f64, decimals))
            .collect()
    }
}

/// `count` evenly spaced integer positions covering `[0, total]`.
#[must_use]
pub fn divide_positions(total: i32, count: usize) -> Vec<i32> {
    match count {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let last = (count - 1) as f64;
            (0..count)
                .map(|i| (f64::from(total) * i as f64 / last).round() as i32)
                .collect()
        }
    }
}

/// Computes a human-readable value axis for `values` under `options`.
///
/// Non-finite samples are skipped. An empty sample set degrades to `[0, 1]`.
pub fn solve_value_range<I>(values: I, options: &RangeOptions) -> ChartResult<AxisRange>
where
    I: IntoIterator<Item = f64>,
{
    let (data_min, data_max) = finite_extent(values).unwrap_or_else(|| {
        debug!("no finite samples for value axis; using [0, 1]");
        (0.0, 1.0)
    });

    let (mut forced_min, mut forced_max) = (finite(options.min), finite(options.max));
    if let (Some(min), Some(max)) = (forced_min, forced_max) {
        if min > max {
            warn!(min, max, "axis minimum exceeds maximum; swapping bounds");
            forced_min = Some(max);
            forced_max = Some(min);
        }
    }

    let (mut lower, mut upper) = (forced_min.unwrap_or(data_min), forced_max.unwrap_or(data_max));
    if lower > upper {
        // A forced bound on one side can land beyond the data on the other.
        if forced_min.is_some() {
            upper = lower;
        } else {
            lower = upper;
        }
    }
    if lower == upper {
        (lower, upper) = widen_degenerate(lower, forced_min.is_some(), forced_max.is_some());
    }

    if forced_min.is_none() || forced_max.is_none() {
        (lower, upper) = apply_padding(
            lower,
            upper,
            options.padding_scale.unwrap_or(1.0),
            forced_min.is_none(),
            forced_max.is_none(),
        );
    }

    let target_intervals = options.target_intervals();
    let (min, max, step) = match (forced_min, forced_max) {
        (Some(min), Some(max)) if max > min => (min, max, (max - min) / target_intervals as f64),
        _ => {
            let step = choose_step(lower, upper, target_intervals, options);
            let (min, max) = snap_bounds(lower, upper, step, forced_min, forced_max);
            (min, max, step)
        }
    };

    let tick_count = (((max - min) / step).round() as usize + 1).max(2);
    let short_decimals = step_decimals(step);
    let decimals = short_decimals.unwrap_or(MAX_STEP_DECIMALS);
    let mut labels = Vec::with_capacity(tick_count);
    for i in 0..tick_count {
        let value = round_to(min + step * i as f64, decimals);
        labels.push(format_value(options.formatter.as_ref(), value)?);
    }
    // Bounds stay exact multiples of a step that has no short decimal form.
    let (min, max) = match short_decimals {
        Some(decimals) => (round_to(min, decimals), round_to(max, decimals)),
        None => (min, max),
    };

    Ok(AxisRange {
        kind: AxisKind::Value,
        min,
        max,
        step,
        tick_count,
        labels,
        boundary_gap: false,
    })
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn finite_extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

fn widen_degenerate(value: f64, min_forced: bool, max_forced: bool) -> (f64, f64) {
    if max_forced && !min_forced {
        return if value > 0.0 { (0.0, value) } else { (value - 1.0, value) };
    }
    if min_forced && !max_forced {
        return if value < 0.0 { (value, 0.0) } else { (value, value + 1.0) };
    }
    if value > 0.0 {
        (0.0, value)
    } else if value < 0.0 {
        (value, 0.0)
    } else {
        (0.0, 1.0)
    }
}

fn apply_padding(lower: f64, upper: f64, scale: f64, pad_min: bool, pad_max: bool) -> (f64, f64) {
    if !scale.is_finite() || scale <= 1.0 {
        return (lower, upper);
    }
    let extra = (upper - lower) * (scale - 1.0) / 2.0;
    let mut padded_lower = if pad_min { lower - extra } else { lower };
    let mut padded_upper = if pad_max { upper + extra } else { upper };
    if lower >= 0.0 {
        padded_lower = padded_lower.max(0.0);
    }
    if upper <= 0.0 {
        padded_upper = padded_upper.min(0.0);
    }
    (padded_lower, padded_upper)
}

fn choose_step(lower: f64, upper: f64, target_intervals: usize, options: &RangeOptions) -> f64 {
    let span = upper - lower;
    let max_intervals = options.max_feasible_intervals();

    if let Some(unit) = finite(options.unit).filter(|u| *u > 0.0) {
        let mut multiplier = (span / (unit * max_intervals as f64)).floor().max(1.0);
        for _ in 0..MAX_UNIT_ATTEMPTS {
            let step = unit * multiplier;
            if !step.is_finite() {
                break;
            }
            if interval_count(lower, upper, step) <= max_intervals {
                return step;
            }
            // +1 below `max_intervals`, geometric above it so huge ratios still converge.
            let next = (multiplier + 1.0).max((multiplier * (1.0 + 1.0 / max_intervals as f64)).ceil());
            if next <= multiplier {
                break;
            }
            multiplier = next;
        }
        debug!(unit, span, "unit hint does not fit the axis, using a nice step");
    }

    let mut step = nice_step_at_least(span / target_intervals as f64);
    while interval_count(lower, upper, step) > max_intervals {
        step = nice_step_at_least(step * 1.000_001);
    }
    step
}

fn interval_count(lower: f64, upper: f64, step: f64) -> usize {
    ((upper / step).ceil() - (lower / step).floor()).max(1.0) as usize
}

/// Smallest value of the form `{1, 2, 2.5, 5} · 10^k` that is ≥ `raw`.
#[must_use]
pub fn nice_step_at_least(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let multiplier = NICE_MULTIPLIERS
        .iter()
        .copied()
        .find(|m| residual <= m * (1.0 + 1e-9))
        .unwrap_or(10.0);
    multiplier * magnitude
}

fn snap_bounds(
    lower: f64,
    upper: f64,
    step: f64,
    forced_min: Option<f64>,
    forced_max: Option<f64>,
) -> (f64, f64) {
    const EPS: f64 = 1e-9;
    match (forced_min, forced_max) {
        (Some(min), None) => {
            let intervals = ((upper - min) / step - EPS).ceil().max(1.0);
            (min, min + intervals * step)
        }
        (None, Some(max)) => {
            let intervals = ((max - lower) / step - EPS).ceil().max(1.0);
            (max - intervals * step, max)
        }
        _ => {
            let min = (lower / step + EPS).floor() * step;
            let mut max = (upper / step - EPS).ceil() * step;
            if max <= min {
                max = min + step;
            }
            (min, max)
        }
    }
}

/// Fraction digits needed to write `step` exactly, or `None` past [`MAX_STEP_DECIMALS`].
fn step_decimals(step: f64) -> Option<usize> {
    if !step.is_finite() || step <= 0.0 {
        return Some(0);
    }
    let mut scaled = step;
    for decimals in 0..=MAX_STEP_DECIMALS {
        if (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0) {
            return Some(decimals);
        }
        scaled *= 10.0;
    }
    None
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_step_prefers_one_two_two_and_a_half_five() {
        assert_eq!(nice_step_at_least(7.8), 10.0);
        assert_eq!(nice_step_at_least(1.9), 2.0);
        assert_eq!(nice_step_at_least(2.2), 2.5);
        assert_eq!(nice_step_at_least(0.04), 0.05);
        assert_eq!(nice_step_at_least(5.0), 5.0);
    }

    #[test]
    fn step_decimals_counts_fraction_digits() {
        assert_eq!(step_decimals(10.0), Some(0));
        assert_eq!(step_decimals(2.5), Some(1));
        assert_eq!(step_decimals(0.05), Some(2));
        assert_eq!(step_decimals(5.579965627366264e-5), None);
    }

    #[test]
    fn padding_never_crosses_zero_for_single_signed_data() {
        assert_eq!(apply_padding(10.0, 20.0, 5.0, true, true), (0.0, 40.0));
        assert_eq!(apply_padding(-20.0, -10.0, 5.0, true, true), (-40.0, 0.0));
    }

    #[test]
    fn divide_positions_are_inclusive() {
        assert_eq!(divide_positions(100, 5), vec![0, 25, 50, 75, 100]);
        assert_eq!(divide_positions(10, 2), vec![0, 10]);
    }
}
