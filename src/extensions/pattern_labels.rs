//! Pattern badge text, colors and collision-free placement.

use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::text;
use crate::core::{Bounds, Color, OhlcSample, Theme};
use crate::extensions::patterns::{PatternConfig, PatternDetection, PatternScan, PatternSentiment};

pub const BULLISH_GLYPH: char = '▲';
pub const BEARISH_GLYPH: char = '▼';
pub const NEUTRAL_GLYPH: char = '◆';

/// Inner padding of a badge.
pub const BADGE_PADDING: i32 = 4;
/// Vertical distance between a badge and its anchor or a badge above it.
pub const BADGE_GAP: i32 = 4;

#[must_use]
pub fn sentiment_glyph(sentiment: PatternSentiment) -> char {
    match sentiment {
        PatternSentiment::Bullish => BULLISH_GLYPH,
        PatternSentiment::Bearish => BEARISH_GLYPH,
        PatternSentiment::Neutral => NEUTRAL_GLYPH,
    }
}

/// One line per detection: `"{glyph} {display_name}"`.
#[must_use]
pub fn pattern_label_text(detections: &[PatternDetection]) -> String {
    detections
        .iter()
        .map(|d| format!("{} {}", sentiment_glyph(d.pattern.sentiment()), d.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sentiment held by the most detections; a tie is neutral.
#[must_use]
pub fn majority_sentiment(detections: &[PatternDetection]) -> PatternSentiment {
    let (mut bullish, mut bearish) = (0usize, 0usize);
    for detection in detections {
        match detection.pattern.sentiment() {
            PatternSentiment::Bullish => bullish += 1,
            PatternSentiment::Bearish => bearish += 1,
            PatternSentiment::Neutral => {}
        }
    }
    let neutral = detections.len() - bullish - bearish;
    if bullish > bearish && bullish > neutral {
        PatternSentiment::Bullish
    } else if bearish > bullish && bearish > neutral {
        PatternSentiment::Bearish
    } else {
        PatternSentiment::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeColors {
    pub background: Color,
    pub border: Color,
    pub text: Color,
}

/// Badge colors for `sentiment`; `None` styles a user label.
#[must_use]
pub fn badge_colors(sentiment: Option<PatternSentiment>, theme: &Theme) -> BadgeColors {
    let base = match sentiment {
        Some(PatternSentiment::Bullish) => theme.up_color,
        Some(PatternSentiment::Bearish) => theme.down_color,
        Some(PatternSentiment::Neutral) => theme.neutral_color,
        None => theme.text_color,
    };
    if theme.is_dark {
        BadgeColors {
            background: base.with_alpha(64),
            border: base,
            text: base.adjust_hsl(0.0, 0.0, 0.2),
        }
    } else {
        BadgeColors {
            background: base.with_alpha(38),
            border: base,
            text: base.adjust_hsl(0.0, 0.0, -0.2),
        }
    }
}

/// Label text resolved for one candle.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleLabel {
    pub index: usize,
    pub text: String,
    /// `None` for a user-supplied label.
    pub sentiment: Option<PatternSentiment>,
}

/// Resolves the label of every candle from pattern detections and user labels.
///
/// A pattern label replaces the user label at the same index when
/// `prefer_pattern_labels` is set or the user supplied none.
pub fn resolve_candle_labels<F>(
    samples: &[OhlcSample],
    scan: &PatternScan,
    config: Option<&PatternConfig>,
    user_label: F,
) -> Vec<CandleLabel>
where
    F: Fn(usize, &OhlcSample) -> Option<String>,
{
    let prefer_patterns = config.is_some_and(|c| c.prefer_pattern_labels);
    let formatter = config.and_then(|c| c.pattern_formatter.as_ref());
    let mut labels = Vec::new();
    for (index, sample) in samples.iter().enumerate() {
        let user = user_label(index, sample).filter(|text| !text.is_empty());
        let detections = scan.get(&index).filter(|d| !d.is_empty());
        let label = match (detections, user) {
            (Some(detections), user) if prefer_patterns || user.is_none() => CandleLabel {
                index,
                text: match formatter {
                    Some(formatter) => formatter.format(detections),
                    None => pattern_label_text(detections),
                },
                sentiment: Some(majority_sentiment(detections)),
            },
            (_, Some(text)) => CandleLabel {
                index,
                text,
                sentiment: None,
            },
            (_, None) => continue,
        };
        labels.push(label);
    }
    labels
}

/// A label waiting to be placed: `x` is the candle center, `anchor_y` the
/// pixel of the candle high.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    pub index: usize,
    pub x: f64,
    pub anchor_y: i32,
    pub label: CandleLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub index: usize,
    pub text: String,
    pub sentiment: Option<PatternSentiment>,
    pub bounds: Bounds,
}

/// Greedy badge placement.
///
/// Requests are sorted by x (ties by index) and requests sharing an index are
/// merged into one badge. Each badge starts centered above its anchor and is
/// moved below every already placed badge it overlaps, so no two badges
/// intersect and none is dropped.
#[must_use]
pub fn place_labels(mut requests: Vec<LabelRequest>, font_size: f64) -> Vec<PlacedLabel> {
    requests.sort_by_key(|r| (OrderedFloat(r.x), r.index));

    let mut merged: Vec<LabelRequest> = Vec::with_capacity(requests.len());
    for request in requests {
        match merged.last_mut() {
            Some(last) if last.index == request.index => {
                last.label.text.push('\n');
                last.label.text.push_str(&request.label.text);
                last.anchor_y = last.anchor_y.min(request.anchor_y);
                if last.label.sentiment != request.label.sentiment {
                    last.label.sentiment = Some(PatternSentiment::Neutral);
                }
            }
            _ => merged.push(request),
        }
    }

    let mut placed: Vec<PlacedLabel> = Vec::with_capacity(merged.len());
    for request in merged {
        let (text_width, text_height) = text::measure_text(&request.label.text, font_size);
        let width = text_width + 2 * BADGE_PADDING;
        let height = text_height + 2 * BADGE_PADDING;
        let left = request.x.round() as i32 - width / 2;
        let bottom = request.anchor_y - BADGE_GAP;
        let mut bounds = Bounds::new(left, bottom - height, left + width, bottom);

        while let Some(blocker) = placed.iter().find(|p| p.bounds.intersects(bounds)) {
            let top = blocker.bounds.bottom + BADGE_GAP;
            trace!(
                index = request.index,
                blocker = blocker.index,
                top,
                "pattern badge moved below overlapping badge"
            );
            bounds = Bounds::new(bounds.left, top, bounds.right, top + height);
        }

        placed.push(PlacedLabel {
            index: request.index,
            text: request.label.text,
            sentiment: request.label.sentiment,
            bounds,
        });
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::patterns::CandlestickPattern;

    fn detection(pattern: CandlestickPattern) -> PatternDetection {
        PatternDetection {
            index: 0,
            name: pattern.display_name(),
            pattern,
        }
    }

    #[test]
    fn tie_is_neutral() {
        let detections = [
            detection(CandlestickPattern::Hammer),
            detection(CandlestickPattern::ShootingStar),
        ];
        assert_eq!(majority_sentiment(&detections), PatternSentiment::Neutral);
    }

    #[test]
    fn label_lines_carry_glyphs() {
        let detections = [
            detection(CandlestickPattern::Hammer),
            detection(CandlestickPattern::Doji),
        ];
        assert_eq!(pattern_label_text(&detections), "▲ Hammer\n◆ Doji");
    }
}
