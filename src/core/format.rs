use std::fmt;
use std::sync::Arc;

use crate::error::{ChartError, ChartResult};

const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "k")];

/// Formats a value in humanized short form.
///
/// Values with magnitude ≥ 1000 are scaled and suffixed with `k`, `M`, `G`
/// or `T`. Trailing fractional zeros are dropped unless `strict_fractional`.
#[must_use]
pub fn humanize(value: f64, fraction_digits: usize, strict_fractional: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    let mut unit = SUFFIXES
        .iter()
        .position(|(threshold, _)| magnitude >= *threshold);

    loop {
        let (scale, suffix) = unit.map_or((1.0, ""), |i| SUFFIXES[i]);
        let body = format!("{:.*}", fraction_digits, value / scale);
        let rounded = body.parse::<f64>().unwrap_or(0.0);
        // Rounding can carry into the next unit (999.999 -> "1000.00").
        if rounded.abs() >= 1000.0 {
            let next = match unit {
                None => Some(SUFFIXES.len() - 1),
                Some(0) => None,
                Some(i) => Some(i - 1),
            };
            if let Some(next) = next {
                unit = Some(next);
                continue;
            }
        }
        if rounded == 0.0 {
            return if strict_fractional {
                format!("{:.*}", fraction_digits, 0.0)
            } else {
                "0".to_owned()
            };
        }
        let body = if strict_fractional {
            body
        } else {
            trim_fraction(&body)
        };
        return format!("{body}{suffix}");
    }
}

/// Default axis label formatter: humanized with two fractional digits.
#[must_use]
pub fn humanize_default(value: f64) -> String {
    humanize(value, 2, false)
}

/// Parses the output of [`humanize`] back into a number.
#[must_use]
pub fn parse_humanized(text: &str) -> Option<f64> {
    let text = text.trim();
    for (scale, suffix) in SUFFIXES {
        if let Some(body) = text.strip_suffix(suffix) {
            return body.parse::<f64>().ok().map(|v| v * scale);
        }
    }
    text.parse::<f64>().ok()
}

/// Formats `value` with at most `fraction_digits` digits, trimming trailing zeros.
#[must_use]
pub fn format_fixed_trimmed(value: f64, fraction_digits: usize) -> String {
    let body = format!("{:.*}", fraction_digits, value);
    let trimmed = trim_fraction(&body);
    if trimmed == "-0" { "0".to_owned() } else { trimmed }
}

fn trim_fraction(body: &str) -> String {
    if !body.contains('.') {
        return body.to_owned();
    }
    body.trim_end_matches('0').trim_end_matches('.').to_owned()
}

type FormatterFn = dyn Fn(f64) -> Result<String, String> + Send + Sync;

/// User-supplied value formatter shared by axes, labels and marks.
///
/// A callback failure surfaces as [`ChartError::Format`].
#[derive(Clone)]
pub struct ValueFormatter(Arc<FormatterFn>);

impl ValueFormatter {
    pub fn new<F>(formatter: F) -> Self
    where
        F: Fn(f64) -> Result<String, String> + Send + Sync + 'static,
    {
        Self(Arc::new(formatter))
    }

    /// Wraps an infallible formatting function.
    pub fn infallible<F>(formatter: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        Self::new(move |value| Ok(formatter(value)))
    }

    /// Replaces `{value}` in `template` with the humanized value.
    #[must_use]
    pub fn template(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::infallible(move |value| template.replace("{value}", &humanize_default(value)))
    }

    pub fn format(&self, value: f64) -> ChartResult<String> {
        (self.0)(value).map_err(ChartError::Format)
    }
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueFormatter(..)")
    }
}

/// Formats with `formatter` when present, otherwise with [`humanize_default`].
pub fn format_value(formatter: Option<&ValueFormatter>, value: f64) -> ChartResult<String> {
    match formatter {
        Some(formatter) => formatter.format(value),
        None => Ok(humanize_default(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_applies_suffixes() {
        assert_eq!(humanize(0.0, 2, false), "0");
        assert_eq!(humanize(12.5, 2, false), "12.5");
        assert_eq!(humanize(1234.5678, 2, false), "1.23k");
        assert_eq!(humanize(-2_500_000.0, 2, false), "-2.5M");
        assert_eq!(humanize(3e9, 2, false), "3G");
        assert_eq!(humanize(4.2e12, 2, false), "4.2T");
    }

    #[test]
    fn humanize_carries_rounding_into_next_unit() {
        assert_eq!(humanize(999.999, 2, false), "1k");
        assert_eq!(humanize(999_999.9, 2, false), "1M");
    }

    #[test]
    fn strict_mode_keeps_trailing_zeros() {
        assert_eq!(humanize(10.0, 2, true), "10.00");
        assert_eq!(humanize(1500.0, 1, true), "1.5k");
    }

    #[test]
    fn tiny_negative_values_do_not_render_negative_zero() {
        assert_eq!(humanize(-0.001, 2, false), "0");
        assert_eq!(format_fixed_trimmed(-0.0001, 2), "0");
    }
}
