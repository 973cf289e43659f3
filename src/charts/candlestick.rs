//! Candlestick renderer: candles, per-field overlays and pattern badges.

use tracing::{debug, trace};

use crate::charts::marks::{render_mark_lines, render_mark_points};
use crate::charts::options::{
    CandleStyle, CandlestickSeries, ChartOption, DEFAULT_CANDLE_WIDTH_FRACTION, DEFAULT_WICK_WIDTH,
    ToGenericSeries,
};
use crate::charts::pipeline::{PipelineSettings, RenderResult, default_render};
use crate::core::candlestick::field_values;
use crate::core::format::ValueFormatter;
use crate::core::{AxisRange, Bounds, Candle, FontStyle, Point};
use crate::error::ChartResult;
use crate::extensions::indicators::compute_trend_line;
use crate::extensions::pattern_labels::{
    BADGE_PADDING, LabelRequest, badge_colors, place_labels, resolve_candle_labels,
};
use crate::extensions::patterns::{PatternScan, scan_for_candlestick_patterns};
use crate::render::{Painter, Style};

pub const BADGE_FONT_SIZE: f64 = 10.0;
const BADGE_RADIUS: i32 = 3;
const TREND_DASH: [f64; 2] = [4.0, 2.0];

/// Horizontal placement of every candle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleLayout {
    /// Width shared by all series at one index, `floor(W · fraction / N)`.
    pub candle_width: i32,
    /// Width of one series' candle, `floor(candle_width / S)`.
    pub series_candle_width: i32,
    /// `centers[series][index]` in series-painter pixels.
    pub centers: Vec<Vec<i32>>,
}

/// Lays out `series_count` candles per index across `width` pixels.
///
/// A single series is centered on its section. Several series share the
/// section with equal leading and trailing margins; `candle_margin` (a
/// fraction of the section) sets the gap between them, otherwise gaps and
/// margins are equal.
#[must_use]
pub fn candle_layout(
    width: i32,
    x_range: &AxisRange,
    sample_count: usize,
    series_count: usize,
    width_fraction: f64,
    candle_margin: Option<f64>,
) -> CandleLayout {
    let samples = sample_count.max(1) as i32;
    let series = series_count.max(1) as i32;
    let fraction = if width_fraction.is_finite() && width_fraction > 0.0 {
        width_fraction.min(1.0)
    } else {
        DEFAULT_CANDLE_WIDTH_FRACTION
    };
    let candle_width = ((f64::from(width) * fraction / f64::from(samples)).floor() as i32).max(1);
    let series_candle_width = (candle_width / series).max(1);

    let positions = x_range.divide(width);
    let section_of = |index: usize| -> (i32, i32) {
        match (positions.get(index), positions.get(index + 1)) {
            (Some(start), Some(end)) if x_range.boundary_gap => (*start, end - start),
            _ => {
                let section = width / samples;
                (x_range.index_center(index, width) - section / 2, section)
            }
        }
    };

    let centers = (0..series)
        .map(|j| {
            (0..sample_count)
                .map(|i| {
                    let (start, section) = section_of(i);
                    if series == 1 {
                        return start + section / 2;
                    }
                    let occupied = series * series_candle_width;
                    let gap = match candle_margin {
                        Some(m) if m.is_finite() && m >= 0.0 => (f64::from(section) * m).round() as i32,
                        _ => ((section - occupied) / (series + 1)).max(0),
                    };
                    let lead = ((section - occupied - (series - 1) * gap) / 2).max(0);
                    start + lead + j * (series_candle_width + gap) + series_candle_width / 2
                })
                .collect()
        })
        .collect();

    CandleLayout {
        candle_width,
        series_candle_width,
        centers,
    }
}

pub fn render_candlestick_chart(
    painter: &Painter,
    option: &ChartOption,
    series: &[CandlestickSeries],
) -> ChartResult<()> {
    let generic = series.to_generic_series();
    let result = default_render(painter, option, &generic, PipelineSettings::vertical_gapped())?;
    render_candlestick_series(&result, series, option.value_formatter.as_ref())
}

pub fn render_candlestick_series(
    result: &RenderResult,
    series: &[CandlestickSeries],
    value_formatter: Option<&ValueFormatter>,
) -> ChartResult<()> {
    let painter = &result.series_painter;
    let sample_count = series.iter().map(|s| s.data.len()).max().unwrap_or(0);
    let first = series.first();
    let layout = candle_layout(
        painter.width(),
        &result.x_range,
        sample_count,
        series.len(),
        first
            .and_then(|s| s.candle_width)
            .unwrap_or(DEFAULT_CANDLE_WIDTH_FRACTION),
        first.and_then(|s| s.candle_margin),
    );
    debug!(
        samples = sample_count,
        series = series.len(),
        candle_width = layout.candle_width,
        "candles laid out"
    );

    for (j, s) in series.iter().enumerate() {
        let y_range = result.y_range(s.y_axis_index)?;
        let centers = &layout.centers[j];
        paint_candles(painter, s, y_range, centers, layout.series_candle_width);
        paint_overlays(painter, s, y_range, centers, j, value_formatter)?;
    }
    for (j, s) in series.iter().enumerate() {
        let y_range = result.y_range(s.y_axis_index)?;
        paint_pattern_badges(painter, s, y_range, &layout.centers[j]);
    }
    Ok(())
}

fn paint_candles(
    painter: &Painter,
    series: &CandlestickSeries,
    y_range: &AxisRange,
    centers: &[i32],
    candle_width: i32,
) {
    let theme = painter.theme();
    let height = painter.height();
    let up = series.up_color.unwrap_or(theme.up_color);
    let down = series.down_color.unwrap_or(theme.down_color);
    let wick_width = series.wick_width.unwrap_or(DEFAULT_WICK_WIDTH);
    let half = candle_width / 2;
    let cap = (candle_width / 3).max(1);
    let y = |value: f64| y_range.value_to_y(value, height);

    let mut skipped = 0usize;
    for (index, (sample, &x)) in series.data.iter().zip(centers).enumerate() {
        let Some(candle) = sample.candle() else {
            skipped += 1;
            continue;
        };
        let color = if candle.is_up() { up } else { down };
        let wick = Style::stroke(color, wick_width);

        if series.shows_wick() || series.candle_style == CandleStyle::Ohlc {
            painter.line(x, y(candle.high), x, y(candle.low), &wick);
            if series.candle_style != CandleStyle::Ohlc {
                painter.line(x - cap / 2, y(candle.high), x + cap - cap / 2, y(candle.high), &wick);
                painter.line(x - cap / 2, y(candle.low), x + cap - cap / 2, y(candle.low), &wick);
            }
        }

        let body = body_bounds(candle, x, half, candle_width, &y);
        match series.candle_style {
            CandleStyle::Filled => painter.rect(body, &Style::fill(color)),
            CandleStyle::Traditional if candle.is_up() => {
                painter.rect(body, &Style::fill_stroke(theme.background, color, wick_width));
            }
            CandleStyle::Traditional => painter.rect(body, &Style::fill(color)),
            CandleStyle::Ohlc => {
                let tick = Style::stroke(color, wick_width.max(1.0));
                painter.line(x - half, y(candle.open), x, y(candle.open), &tick);
                painter.line(x, y(candle.close), x - half + candle_width, y(candle.close), &tick);
            }
        }
        trace!(index, x, up = candle.is_up(), "candle painted");
    }
    if skipped > 0 {
        debug!(series = %series.name, skipped, "invalid OHLC samples skipped");
    }
}

/// Body rectangle, at least one pixel tall so flat candles stay visible.
fn body_bounds(candle: Candle, x: i32, half: i32, width: i32, y: &impl Fn(f64) -> i32) -> Bounds {
    let top = y(candle.body_top());
    let bottom = y(candle.body_bottom()).max(top + 1);
    Bounds::new(x - half, top, x - half + width, bottom)
}

fn paint_overlays(
    painter: &Painter,
    series: &CandlestickSeries,
    y_range: &AxisRange,
    centers: &[i32],
    series_index: usize,
    value_formatter: Option<&ValueFormatter>,
) -> ChartResult<()> {
    let theme = painter.theme();
    let height = painter.height();
    let project = |values: &[Option<f64>]| -> Vec<Point> {
        values
            .iter()
            .zip(centers)
            .map(|(value, &x)| match value.filter(|v| v.is_finite()) {
                Some(v) => Point::new(x, y_range.value_to_y(v, height)),
                None => Point::null(x),
            })
            .collect()
    };

    let mut line_index = series_index;
    for overlay in &series.overlays {
        let values = field_values(&series.data, overlay.field);
        for trend_line in &overlay.trend_lines {
            line_index += 1;
            let color = trend_line.color.unwrap_or_else(|| theme.series_color(line_index));
            let mut style = Style::stroke(color, trend_line.stroke_width.unwrap_or(1.0));
            if trend_line.dashed {
                style = style.with_dash(&TREND_DASH);
            }
            let trend = compute_trend_line(&values, trend_line);
            painter.polyline(&project(&trend), &style);
        }

        let color = series.up_color.unwrap_or(theme.up_color);
        let points = project(&values);
        render_mark_lines(painter, &overlay.mark_line, &values, y_range, color, value_formatter)?;
        render_mark_points(painter, &overlay.mark_point, &values, &points, color, value_formatter)?;
    }
    Ok(())
}

fn pattern_scan(series: &CandlestickSeries) -> PatternScan {
    match &series.pattern_config {
        Some(config) => scan_for_candlestick_patterns(&series.data, config),
        None => PatternScan::default(),
    }
}

fn paint_pattern_badges(painter: &Painter, series: &CandlestickSeries, y_range: &AxisRange, centers: &[i32]) {
    let scan = pattern_scan(series);
    let labels = resolve_candle_labels(
        &series.data,
        &scan,
        series.pattern_config.as_ref(),
        |index, sample| {
            series
                .label_formatter
                .as_ref()
                .and_then(|formatter| formatter.label(index, sample))
        },
    );
    if labels.is_empty() {
        return;
    }
    let height = painter.height();
    let requests = labels
        .into_iter()
        .filter_map(|label| {
            let x = *centers.get(label.index)?;
            let candle = series.data.get(label.index)?.candle()?;
            Some(LabelRequest {
                index: label.index,
                x: f64::from(x),
                anchor_y: y_range.value_to_y(candle.high, height),
                label,
            })
        })
        .collect();

    let theme = painter.theme();
    for placed in place_labels(requests, BADGE_FONT_SIZE) {
        let colors = badge_colors(placed.sentiment, theme);
        painter.rounded_rect(
            placed.bounds,
            BADGE_RADIUS,
            true,
            true,
            &Style::fill_stroke(colors.background, colors.border, 1.0),
        );
        let font = FontStyle::new(BADGE_FONT_SIZE, colors.text);
        painter.multiline_text(
            &placed.text,
            placed.bounds.left + BADGE_PADDING,
            placed.bounds.top + BADGE_PADDING + BADGE_FONT_SIZE.round() as i32,
            &font,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_series_centers_on_sections() {
        let range = AxisRange::category(vec!["a".into(), "b".into()], true);
        let layout = candle_layout(200, &range, 2, 1, 0.8, None);
        assert_eq!(layout.candle_width, 80);
        assert_eq!(layout.centers, vec![vec![50, 150]]);
    }

    #[test]
    fn series_share_section_with_equal_margins() {
        let range = AxisRange::category(vec!["a".into()], true);
        let layout = candle_layout(100, &range, 1, 2, 0.8, None);
        assert_eq!(layout.series_candle_width, 40);
        // Gaps: (100 - 80) / 3 = 6, lead = (100 - 80 - 6) / 2 = 7.
        assert_eq!(layout.centers, vec![vec![27], vec![73]]);
    }
}
