use statchart::core::OhlcSample;
use statchart::extensions::{
    CandlestickPattern, PatternConfig, PatternFormatter, merge_patterns, scan_for_candlestick_patterns,
};

fn samples(rows: &[(f64, f64, f64, f64)]) -> Vec<OhlcSample> {
    rows.iter()
        .map(|&(open, high, low, close)| OhlcSample::new(open, high, low, close))
        .collect()
}

fn patterns_at(scan: &statchart::extensions::PatternScan, index: usize) -> Vec<CandlestickPattern> {
    scan.get(&index)
        .map(|found| found.iter().map(|d| d.pattern).collect())
        .unwrap_or_default()
}

#[test]
fn doji_with_tight_threshold() {
    let data = samples(&[(100.0, 110.0, 95.0, 100.01), (105.0, 115.0, 100.0, 112.0)]);
    let config = PatternConfig::new([CandlestickPattern::Doji]).with_doji_threshold(0.001);
    let scan = scan_for_candlestick_patterns(&data, &config);

    assert_eq!(scan.len(), 1);
    assert_eq!(patterns_at(&scan, 0), [CandlestickPattern::Doji]);
    assert!(patterns_at(&scan, 1).is_empty());
}

#[test]
fn bullish_engulfing_with_relaxed_size() {
    let data = samples(&[(110.0, 112.0, 105.0, 106.0), (104.0, 115.0, 103.0, 114.0)]);
    let config =
        PatternConfig::new([CandlestickPattern::EngulfingBull]).with_engulfing_min_size(0.8);
    let scan = scan_for_candlestick_patterns(&data, &config);

    assert_eq!(scan.keys().copied().collect::<Vec<_>>(), [1]);
    assert_eq!(patterns_at(&scan, 1), [CandlestickPattern::EngulfingBull]);
}

#[test]
fn bearish_engulfing_mirrors_bullish() {
    let data = samples(&[(106.0, 112.0, 105.0, 110.0), (114.0, 115.0, 103.0, 104.0)]);
    let scan = scan_for_candlestick_patterns(
        &data,
        &PatternConfig::new([CandlestickPattern::EngulfingBear]),
    );
    assert_eq!(patterns_at(&scan, 1), [CandlestickPattern::EngulfingBear]);
}

#[test]
fn marubozu_has_no_shadows() {
    let data = samples(&[(100.0, 110.0, 100.0, 110.0), (110.0, 110.0, 100.0, 100.0)]);
    let config = PatternConfig::new([
        CandlestickPattern::BullishMarubozu,
        CandlestickPattern::BearishMarubozu,
    ]);
    let scan = scan_for_candlestick_patterns(&data, &config);
    assert_eq!(patterns_at(&scan, 0), [CandlestickPattern::BullishMarubozu]);
    assert_eq!(patterns_at(&scan, 1), [CandlestickPattern::BearishMarubozu]);
}

#[test]
fn piercing_line_and_dark_cloud_cover() {
    let piercing = samples(&[(110.0, 111.0, 99.0, 100.0), (98.0, 108.0, 97.0, 107.0)]);
    let scan = scan_for_candlestick_patterns(
        &piercing,
        &PatternConfig::new([CandlestickPattern::PiercingLine]),
    );
    assert_eq!(patterns_at(&scan, 1), [CandlestickPattern::PiercingLine]);

    let dark_cloud = samples(&[(100.0, 111.0, 99.0, 110.0), (112.0, 113.0, 102.0, 103.0)]);
    let scan = scan_for_candlestick_patterns(
        &dark_cloud,
        &PatternConfig::new([CandlestickPattern::DarkCloudCover]),
    );
    assert_eq!(patterns_at(&scan, 1), [CandlestickPattern::DarkCloudCover]);
}

fn scan_one(
    rows: &[(f64, f64, f64, f64)],
    pattern: CandlestickPattern,
) -> statchart::extensions::PatternScan {
    scan_for_candlestick_patterns(&samples(rows), &PatternConfig::new([pattern]))
}

#[test]
fn inverted_hammer_needs_a_short_lower_shadow() {
    let scan = scan_one(&[(100.0, 110.0, 99.5, 101.0)], CandlestickPattern::InvertedHammer);
    assert_eq!(patterns_at(&scan, 0), [CandlestickPattern::InvertedHammer]);

    // Lower shadow 4 exceeds 30% of the upper shadow 9.
    let scan = scan_one(&[(100.0, 110.0, 96.0, 101.0)], CandlestickPattern::InvertedHammer);
    assert!(scan.is_empty());
}

#[test]
fn gravestone_doji_has_its_shadow_above() {
    let scan = scan_one(&[(100.0, 110.0, 99.9, 100.0)], CandlestickPattern::GravestoneDoji);
    assert_eq!(patterns_at(&scan, 0), [CandlestickPattern::GravestoneDoji]);

    let scan = scan_one(&[(100.0, 110.0, 95.0, 100.0)], CandlestickPattern::GravestoneDoji);
    assert!(scan.is_empty());
}

#[test]
fn dragonfly_doji_has_its_shadow_below() {
    let scan = scan_one(&[(100.0, 100.1, 90.0, 100.0)], CandlestickPattern::DragonflyDoji);
    assert_eq!(patterns_at(&scan, 0), [CandlestickPattern::DragonflyDoji]);

    let scan = scan_one(&[(100.0, 105.0, 90.0, 100.0)], CandlestickPattern::DragonflyDoji);
    assert!(scan.is_empty());
}

#[test]
fn evening_star_reports_on_the_third_candle() {
    let rows = [
        (100.0, 111.0, 99.0, 110.0),
        (112.0, 114.0, 111.5, 113.0),
        (111.0, 111.5, 102.0, 103.0),
    ];
    let scan = scan_one(&rows, CandlestickPattern::EveningStar);
    assert_eq!(scan.keys().copied().collect::<Vec<_>>(), [2]);
    assert_eq!(patterns_at(&scan, 2), [CandlestickPattern::EveningStar]);
}

#[test]
fn evening_star_needs_the_last_open_below_the_star() {
    let rows = [
        (100.0, 111.0, 99.0, 110.0),
        (112.0, 114.0, 111.5, 113.0),
        (112.5, 113.0, 102.0, 103.0),
    ];
    assert!(scan_one(&rows, CandlestickPattern::EveningStar).is_empty());
}

#[test]
fn morning_star_mirrors_evening_star() {
    let rows = [
        (110.0, 111.0, 99.0, 100.0),
        (98.0, 99.0, 96.5, 97.0),
        (99.0, 108.0, 98.5, 107.0),
    ];
    let scan = scan_one(&rows, CandlestickPattern::MorningStar);
    assert_eq!(patterns_at(&scan, 2), [CandlestickPattern::MorningStar]);

    let late_open = [rows[0], (98.0, 99.0, 96.5, 97.0), (97.5, 108.0, 97.0, 107.0)];
    assert!(scan_one(&late_open, CandlestickPattern::MorningStar).is_empty());
}

#[test]
fn detections_follow_enabled_order() {
    // A flat doji that is also a dragonfly: long lower shadow, no upper shadow.
    let data = samples(&[(110.0, 110.05, 100.0, 110.0)]);
    let forward = PatternConfig::new([CandlestickPattern::DragonflyDoji, CandlestickPattern::Doji]);
    let backward = PatternConfig::new([CandlestickPattern::Doji, CandlestickPattern::DragonflyDoji]);

    assert_eq!(
        patterns_at(&scan_for_candlestick_patterns(&data, &forward), 0),
        [CandlestickPattern::DragonflyDoji, CandlestickPattern::Doji]
    );
    assert_eq!(
        patterns_at(&scan_for_candlestick_patterns(&data, &backward), 0),
        [CandlestickPattern::Doji, CandlestickPattern::DragonflyDoji]
    );
}

#[test]
fn invalid_samples_never_match() {
    let data = vec![
        OhlcSample::new(100.0, 90.0, 95.0, 100.0),
        OhlcSample::null(),
        OhlcSample {
            close: None,
            ..OhlcSample::new(1.0, 2.0, 0.5, 1.0)
        },
    ];
    let scan = scan_for_candlestick_patterns(&data, &PatternConfig::all());
    assert!(scan.is_empty());
}

#[test]
fn three_candle_patterns_need_three_candles() {
    let data = samples(&[(120.0, 121.0, 109.0, 110.0), (107.0, 108.0, 105.0, 106.0)]);
    let scan = scan_for_candlestick_patterns(
        &data,
        &PatternConfig::new([CandlestickPattern::MorningStar, CandlestickPattern::EveningStar]),
    );
    assert!(scan.is_empty());
}

#[test]
fn merge_unions_in_order_and_prefers_first_thresholds() {
    let mut a = PatternConfig::new([CandlestickPattern::Doji, CandlestickPattern::Hammer])
        .with_doji_threshold(0.1);
    a.prefer_pattern_labels = true;
    let b = PatternConfig::new([CandlestickPattern::Hammer, CandlestickPattern::MorningStar])
        .with_doji_threshold(0.2)
        .with_shadow_ratio(3.0);

    let merged = merge_patterns(Some(&a), Some(&b)).expect("merged");
    assert_eq!(
        merged.enabled_patterns,
        [
            CandlestickPattern::Doji,
            CandlestickPattern::Hammer,
            CandlestickPattern::MorningStar
        ]
    );
    assert_eq!(merged.doji_threshold, Some(0.1));
    assert_eq!(merged.shadow_ratio, Some(3.0));
    assert!(merged.prefer_pattern_labels);
}

#[test]
fn merge_with_missing_side() {
    let a = PatternConfig::new([CandlestickPattern::Doji]);
    assert!(merge_patterns(None, None).is_none());
    assert_eq!(merge_patterns(Some(&a), None), Some(a.clone()));
    assert_eq!(merge_patterns(None, Some(&a)), Some(a));
}

#[test]
fn merge_keeps_first_formatter() {
    let mut a = PatternConfig::new([CandlestickPattern::Doji]);
    a.pattern_formatter = Some(PatternFormatter::new(|_| "a".to_owned()));
    let mut b = PatternConfig::new([CandlestickPattern::Hammer]);
    b.pattern_formatter = Some(PatternFormatter::new(|_| "b".to_owned()));

    let merged = merge_patterns(Some(&a), Some(&b)).expect("merged");
    let formatter = merged.pattern_formatter.expect("formatter");
    assert_eq!(formatter.format(&[]), "a");
}

#[test]
fn merge_ignores_second_formatter() {
    let a = PatternConfig::new([CandlestickPattern::Doji]);
    let mut b = PatternConfig::new([CandlestickPattern::Hammer]);
    b.pattern_formatter = Some(PatternFormatter::new(|_| "b".to_owned()));

    let merged = merge_patterns(Some(&a), Some(&b)).expect("merged");
    assert!(merged.pattern_formatter.is_none());
}

mod properties {
    use proptest::prelude::*;
    use statchart::core::OhlcSample;
    use statchart::extensions::{
        CandlestickPattern, PatternConfig, merge_patterns, scan_for_candlestick_patterns,
    };

    fn sample() -> impl Strategy<Value = OhlcSample> {
        (
            prop::option::of(50.0f64..150.0),
            50.0f64..150.0,
            0.0f64..20.0,
            0.0f64..20.0,
        )
            .prop_map(|(open, close, up, down)| match open {
                Some(open) => OhlcSample::new(open, open.max(close) + up, open.min(close) - down, close),
                None => OhlcSample::null(),
            })
    }

    fn pattern_list() -> impl Strategy<Value = Vec<CandlestickPattern>> {
        prop::collection::vec(prop::sample::select(CandlestickPattern::ALL.to_vec()), 0..8)
    }

    proptest! {
        #[test]
        fn scanning_is_deterministic(data in prop::collection::vec(sample(), 0..30)) {
            let config = PatternConfig::all();
            let first = scan_for_candlestick_patterns(&data, &config);
            let second = scan_for_candlestick_patterns(&data, &config);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn merged_patterns_cover_both_inputs(a in pattern_list(), b in pattern_list()) {
            let merged = merge_patterns(
                Some(&PatternConfig::new(a.clone())),
                Some(&PatternConfig::new(b.clone())),
            )
            .expect("merged");
            let enabled = &merged.enabled_patterns;
            prop_assert!(a.iter().chain(&b).all(|p| enabled.contains(p)));

            let mut a_unique: Vec<CandlestickPattern> = Vec::new();
            for p in &a {
                if !a_unique.contains(p) {
                    a_unique.push(*p);
                }
            }
            prop_assert_eq!(&enabled[..a_unique.len()], a_unique.as_slice());
        }
    }
}
