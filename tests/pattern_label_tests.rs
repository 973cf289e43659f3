use indexmap::IndexMap;
use smallvec::smallvec;
use statchart::core::{OhlcSample, Theme};
use statchart::extensions::pattern_labels::{BULLISH_GLYPH, badge_colors};
use statchart::extensions::{
    CandleLabel, CandlestickPattern, LabelRequest, PatternConfig, PatternDetection,
    PatternFormatter, PatternScan, PatternSentiment, pattern_label_text, place_labels,
    resolve_candle_labels,
};

fn detection(index: usize, pattern: CandlestickPattern) -> PatternDetection {
    PatternDetection {
        index,
        name: pattern.display_name(),
        pattern,
    }
}

fn request(index: usize, x: f64, anchor_y: i32, text: &str) -> LabelRequest {
    LabelRequest {
        index,
        x,
        anchor_y,
        label: CandleLabel {
            index,
            text: text.to_owned(),
            sentiment: Some(PatternSentiment::Bullish),
        },
    }
}

fn samples(count: usize) -> Vec<OhlcSample> {
    (0..count)
        .map(|_| OhlcSample::new(10.0, 12.0, 9.0, 11.0))
        .collect()
}

fn hammer_at(index: usize) -> PatternScan {
    let mut scan = IndexMap::new();
    scan.insert(index, smallvec![detection(index, CandlestickPattern::Hammer)]);
    scan
}

#[test]
fn crowded_labels_never_overlap() {
    let requests = (0..6)
        .map(|i| request(i, 100.0 + i as f64 * 3.0, 200, "▲ Bullish Engulfing"))
        .collect();
    let placed = place_labels(requests, 10.0);

    assert_eq!(placed.len(), 6);
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            assert!(!a.bounds.intersects(b.bounds), "{} overlaps {}", a.index, b.index);
        }
    }
}

#[test]
fn first_label_sits_above_its_anchor() {
    let placed = place_labels(vec![request(0, 50.0, 120, "▲ Hammer")], 10.0);
    assert!(placed[0].bounds.bottom < 120);
}

#[test]
fn labels_are_placed_in_x_order() {
    let placed = place_labels(
        vec![
            request(2, 300.0, 100, "c"),
            request(0, 100.0, 100, "a"),
            request(1, 200.0, 100, "b"),
        ],
        10.0,
    );
    let order: Vec<usize> = placed.iter().map(|p| p.index).collect();
    assert_eq!(order, [0, 1, 2]);
}

#[test]
fn requests_for_one_index_merge_into_one_badge() {
    let mut bearish = request(3, 80.0, 90, "▼ Shooting Star");
    bearish.label.sentiment = Some(PatternSentiment::Bearish);
    let placed = place_labels(vec![request(3, 80.0, 100, "▲ Hammer"), bearish], 10.0);

    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].text, "▲ Hammer\n▼ Shooting Star");
    assert_eq!(placed[0].sentiment, Some(PatternSentiment::Neutral));
}

#[test]
fn pattern_label_fills_missing_user_label() {
    let data = samples(3);
    let labels = resolve_candle_labels(&data, &hammer_at(1), None, |_, _| None);
    assert_eq!(
        labels,
        [CandleLabel {
            index: 1,
            text: format!("{BULLISH_GLYPH} Hammer"),
            sentiment: Some(PatternSentiment::Bullish),
        }]
    );
}

#[test]
fn user_label_wins_unless_patterns_are_preferred() {
    let data = samples(3);
    let user = |index: usize, _: &OhlcSample| (index == 1).then(|| "earnings".to_owned());

    let labels = resolve_candle_labels(&data, &hammer_at(1), None, user);
    assert_eq!(labels[0].text, "earnings");
    assert_eq!(labels[0].sentiment, None);

    let mut config = PatternConfig::new([CandlestickPattern::Hammer]);
    config.prefer_pattern_labels = true;
    let labels = resolve_candle_labels(&data, &hammer_at(1), Some(&config), user);
    assert_eq!(labels[0].text, "▲ Hammer");
}

#[test]
fn empty_user_labels_are_ignored() {
    let data = samples(2);
    let labels = resolve_candle_labels(&data, &PatternScan::new(), None, |_, _| Some(String::new()));
    assert!(labels.is_empty());
}

#[test]
fn custom_formatter_replaces_glyph_text() {
    let data = samples(2);
    let mut config = PatternConfig::new([CandlestickPattern::Hammer]);
    config.pattern_formatter = Some(PatternFormatter::new(|detections| {
        format!("{} found", detections.len())
    }));
    let labels = resolve_candle_labels(&data, &hammer_at(0), Some(&config), |_, _| None);
    assert_eq!(labels[0].text, "1 found");
}

#[test]
fn glyph_text_lists_each_detection() {
    let detections = [
        detection(4, CandlestickPattern::EngulfingBear),
        detection(4, CandlestickPattern::GravestoneDoji),
    ];
    assert_eq!(
        pattern_label_text(&detections),
        "▼ Bearish Engulfing\n▼ Gravestone Doji"
    );
}

#[test]
fn badges_follow_sentiment_colors() {
    let theme = Theme::light();
    let bullish = badge_colors(Some(PatternSentiment::Bullish), &theme);
    let bearish = badge_colors(Some(PatternSentiment::Bearish), &theme);
    assert_eq!(bullish.border, theme.up_color);
    assert_eq!(bearish.border, theme.down_color);
    assert!(bullish.background.a < 255);
    assert_ne!(bullish.text, bearish.text);
}
