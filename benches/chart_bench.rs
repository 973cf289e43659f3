use criterion::{Criterion, criterion_group, criterion_main};
use statchart::charts::{CandlestickSeries, LineSeries};
use statchart::core::{OhlcSample, RangeOptions, solve_value_range};
use statchart::extensions::{PatternConfig, TrendLine, scan_for_candlestick_patterns};
use statchart::{ChartOption, SeriesList, render_chart_bytes};
use std::hint::black_box;

fn generated_samples(count: usize) -> Vec<OhlcSample> {
    (0..count)
        .map(|i| {
            let base = 100.0 + (i as f64 * 0.37).sin() * 20.0 + i as f64 * 0.01;
            let open = base;
            let close = if i % 3 == 0 { base - 1.5 } else { base + 1.0 };
            let low = open.min(close) - 0.75;
            let high = open.max(close) + 0.75;
            OhlcSample::new(open, high, low, close)
        })
        .collect()
}

fn bench_value_range_10k(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| (i as f64 * 0.13).cos() * 4_321.0).collect();
    let options = RangeOptions::default().with_axis_size(600);

    c.bench_function("value_range_10k", |b| {
        b.iter(|| {
            let _ = solve_value_range(black_box(values.iter().copied()), &options).expect("range");
        })
    });
}

fn bench_pattern_scan_10k(c: &mut Criterion) {
    let samples = generated_samples(10_000);
    let config = PatternConfig::all();

    c.bench_function("pattern_scan_10k", |b| {
        b.iter(|| {
            let _ = scan_for_candlestick_patterns(black_box(&samples), &config);
        })
    });
}

fn bench_line_svg_1k(c: &mut Criterion) {
    let values: Vec<Option<f64>> = (0..1_000)
        .map(|i| (i % 97 != 0).then(|| (i as f64 * 0.05).sin() * 100.0))
        .collect();
    let option = ChartOption::new(SeriesList::Line(vec![LineSeries::new("wave", values)]))
        .with_size(1280, 720);

    c.bench_function("line_svg_1k", |b| {
        b.iter(|| {
            let _ = render_chart_bytes(black_box(&option)).expect("render");
        })
    });
}

fn bench_candlestick_svg_500(c: &mut Criterion) {
    let mut series = CandlestickSeries::new("price", generated_samples(500))
        .with_trend_line(TrendLine::sma(20))
        .with_trend_line(TrendLine::ema(50).dashed());
    series.pattern_config = Some(PatternConfig::all());
    let option = ChartOption::new(SeriesList::Candlestick(vec![series])).with_size(1280, 720);

    c.bench_function("candlestick_svg_500", |b| {
        b.iter(|| {
            let _ = render_chart_bytes(black_box(&option)).expect("render");
        })
    });
}

criterion_group!(
    benches,
    bench_value_range_10k,
    bench_pattern_scan_10k,
    bench_line_svg_1k,
    bench_candlestick_svg_500
);
criterion_main!(benches);
