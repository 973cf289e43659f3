use statchart::charts::options::ToGenericSeries;
use statchart::charts::pipeline::PipelineSettings;
use statchart::charts::{CandleStyle, CandlestickSeries, ChartOption, SeriesList, default_render};
use statchart::core::{OhlcSample, aggregate_candlestick, aggregate_labels, validate_ohlc_data};
use statchart::extensions::TrendLine;
use statchart::render::{OutputFormat, Painter};
use statchart::render_chart_bytes;

fn sample((open, high, low, close): (f64, f64, f64, f64)) -> OhlcSample {
    OhlcSample::new(open, high, low, close)
}

fn basic_samples() -> Vec<OhlcSample> {
    [
        (100.0, 110.0, 95.0, 105.0),
        (105.0, 115.0, 100.0, 112.0),
        (112.0, 118.0, 108.0, 115.0),
        (115.0, 120.0, 105.0, 108.0),
        (108.0, 113.0, 105.0, 109.0),
    ]
    .into_iter()
    .map(sample)
    .collect()
}

fn basic_option() -> ChartOption {
    ChartOption::new(SeriesList::Candlestick(vec![CandlestickSeries::new(
        "price",
        basic_samples(),
    )]))
    .with_size(800, 600)
    .with_x_labels(["Jan", "Feb", "Mar", "Apr", "May"])
}

#[test]
fn basic_candlestick_directions() {
    let candles: Vec<_> = basic_samples()
        .iter()
        .map(|s| s.candle().expect("valid"))
        .collect();
    assert_eq!(candles.len(), 5);
    assert!(candles[2].is_bullish());
    assert!(candles[3].is_bearish());
    assert!(candles[4].is_bullish());
}

#[test]
fn basic_candlestick_axes() {
    let option = basic_option();
    let painter = Painter::new(OutputFormat::Svg, 800, 600, None).expect("painter");
    let SeriesList::Candlestick(series) = &option.series else {
        unreachable!("candlestick option");
    };
    let result = default_render(
        &painter,
        &option,
        &series.to_generic_series(),
        PipelineSettings::vertical_gapped(),
    )
    .expect("pipeline");

    assert_eq!(result.x_range.tick_count, 5);
    assert!(result.x_range.boundary_gap);
    let y = result.y_range(0).expect("y axis");
    assert_eq!((y.min, y.max), (95.0, 120.0));
}

#[test]
fn basic_candlestick_renders_every_candle() {
    let svg = String::from_utf8(render_chart_bytes(&basic_option()).expect("render")).expect("utf8");
    let up = "fill:rgb(42,161,107)";
    let down = "fill:rgb(220,75,75)";
    // Four bullish or flat bodies, one bearish body.
    assert_eq!(svg.matches(up).count(), 4);
    assert_eq!(svg.matches(down).count(), 1);
    for month in ["Jan", "Feb", "Mar", "Apr", "May"] {
        assert!(svg.contains(&format!(">{month}</text>")), "missing {month}");
    }
}

#[test]
fn invalid_samples_are_skipped_not_fatal() {
    let mut samples = basic_samples();
    samples[1] = OhlcSample {
        high: None,
        ..samples[1]
    };
    samples[3] = OhlcSample::new(100.0, 90.0, 95.0, 99.0);
    let option = ChartOption::new(SeriesList::Candlestick(vec![CandlestickSeries::new(
        "price", samples,
    )]));
    assert!(render_chart_bytes(&option).is_ok());
}

#[test]
fn every_candle_style_renders() {
    for style in [CandleStyle::Filled, CandleStyle::Traditional, CandleStyle::Ohlc] {
        let mut series = CandlestickSeries::new("price", basic_samples());
        series.candle_style = style;
        let series = series.with_trend_line(TrendLine::sma(2).dashed());
        let option = ChartOption::new(SeriesList::Candlestick(vec![series]));
        let svg = String::from_utf8(render_chart_bytes(&option).expect("render")).expect("utf8");
        assert!(svg.contains("stroke-dasharray:4,2"), "{style:?} lost its trend line");
    }
}

#[test]
fn aggregation_folds_windows() {
    let samples: Vec<OhlcSample> = [
        (100.0, 110.0, 95.0, 105.0),
        (105.0, 115.0, 100.0, 112.0),
        (112.0, 118.0, 108.0, 115.0),
        (115.0, 120.0, 110.0, 118.0),
        (118.0, 124.0, 115.0, 122.0),
        (122.0, 128.0, 118.0, 125.0),
    ]
    .into_iter()
    .map(sample)
    .collect();

    let folded = aggregate_candlestick(&samples, 2);
    let field = |f: fn(&OhlcSample) -> Option<f64>| -> Vec<f64> {
        folded.iter().map(|s| f(s).expect("valid")).collect()
    };
    assert_eq!(field(|s| s.open), [100.0, 112.0, 118.0]);
    assert_eq!(field(|s| s.close), [112.0, 118.0, 125.0]);
    assert_eq!(field(|s| s.high), [115.0, 120.0, 128.0]);
    assert_eq!(field(|s| s.low), [95.0, 108.0, 115.0]);
}

#[test]
fn aggregated_labels_shrink_to_window_count() {
    let labels: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).to_vec();
    assert_eq!(aggregate_labels(&labels, 2), ["a", "c", "e"]);
    assert_eq!(aggregate_labels(&labels, 1), labels);
}

#[test]
fn all_invalid_window_stays_aligned() {
    let samples = [OhlcSample::null(), OhlcSample::null(), sample((1.0, 2.0, 0.5, 1.5))];
    let folded = aggregate_candlestick(&samples, 2);
    assert_eq!(folded.len(), 2);
    assert!(!folded[0].is_valid());
    assert!(folded[1].is_valid());
}

mod properties {
    use proptest::prelude::*;
    use statchart::core::{OhlcSample, aggregate_candlestick, validate_ohlc_data};

    fn valid_sample() -> impl Strategy<Value = OhlcSample> {
        (1.0f64..1_000.0, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..50.0, 0.0f64..50.0).prop_map(
            |(base, open_at, close_at, above, below)| {
                let low = base - below;
                let high = base + above;
                let open = (low + (high - low) * open_at).min(high);
                let close = (low + (high - low) * close_at).min(high);
                OhlcSample::new(open, high, low, close)
            },
        )
    }

    proptest! {
        #[test]
        fn validity_matches_ordering_rule(
            open in prop::option::of(-100.0f64..100.0),
            high in prop::option::of(-100.0f64..100.0),
            low in prop::option::of(-100.0f64..100.0),
            close in prop::option::of(-100.0f64..100.0),
        ) {
            let sample = OhlcSample { open, high, low, close };
            let expected = match (open, high, low, close) {
                (Some(o), Some(h), Some(l), Some(c)) => l <= o.min(c) && o.max(c) <= h,
                _ => false,
            };
            prop_assert_eq!(validate_ohlc_data(&sample), expected);
        }

        #[test]
        fn aggregation_keeps_window_edges_and_extremes(
            samples in prop::collection::vec(valid_sample(), 1..40),
            period in 1usize..8,
        ) {
            let folded = aggregate_candlestick(&samples, period);
            prop_assert_eq!(folded.len(), samples.len().div_ceil(period));
            for (window, out) in samples.chunks(period).zip(&folded) {
                prop_assert_eq!(out.open, window[0].open);
                prop_assert_eq!(out.close, window[window.len() - 1].close);
            }
            let min_low = |s: &[OhlcSample]| s.iter().filter_map(|x| x.low).fold(f64::INFINITY, f64::min);
            let max_high = |s: &[OhlcSample]| s.iter().filter_map(|x| x.high).fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(min_low(&folded), min_low(&samples));
            prop_assert_eq!(max_high(&folded), max_high(&samples));
        }
    }
}

#[test]
fn validity_rejects_partial_samples() {
    assert!(!validate_ohlc_data(&OhlcSample {
        close: None,
        ..sample((1.0, 2.0, 0.5, 1.5))
    }));
}
