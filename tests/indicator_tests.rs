use approx::assert_relative_eq;
use statchart::extensions::{
    TrendKind, TrendLine, bollinger_bands, compute_trend_line, ema, linear_regression, sma,
};

fn values(raw: &[f64]) -> Vec<Option<f64>> {
    raw.iter().copied().map(Some).collect()
}

#[test]
fn sma_is_undefined_before_first_full_window() {
    let out = sma(&values(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
    assert_eq!(out, [None, None, Some(2.0), Some(3.0), Some(4.0)]);
}

#[test]
fn ema_is_seeded_with_sma() {
    let out = ema(&values(&[1.0, 2.0, 3.0, 4.0]), 3);
    assert_eq!(out[..2], [None, None]);
    assert_relative_eq!(out[2].expect("seed"), 2.0);
    // alpha = 0.5: 0.5 * 4 + 0.5 * 2
    assert_relative_eq!(out[3].expect("next"), 3.0);
}

#[test]
fn ema_skips_missing_inputs() {
    let out = ema(&[Some(2.0), None, Some(4.0), Some(6.0)], 2);
    assert_eq!(out[1], None);
    assert_relative_eq!(out[2].expect("seed"), 3.0);
    assert_relative_eq!(out[3].expect("next"), 5.0, epsilon = 1e-12);
}

#[test]
fn bollinger_bands_surround_the_mean() {
    let input = values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    let (upper, lower) = bollinger_bands(&input, 8);
    // Population σ of the window is 2.
    assert_relative_eq!(upper[7].expect("upper"), 5.0 + 4.0);
    assert_relative_eq!(lower[7].expect("lower"), 5.0 - 4.0);
    assert!(upper[6].is_none() && lower[6].is_none());
}

#[test]
fn linear_regression_fits_a_line_exactly() {
    let out = linear_regression(&[Some(1.0), None, Some(5.0), Some(7.0)]);
    for (i, value) in out.iter().enumerate() {
        assert_relative_eq!(value.expect("defined"), 1.0 + 2.0 * i as f64, epsilon = 1e-9);
    }
}

#[test]
fn linear_regression_needs_two_points() {
    assert_eq!(linear_regression(&[Some(1.0), None]), [None, None]);
}

#[test]
fn dispatch_matches_direct_calls() {
    let input = values(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
    assert_eq!(compute_trend_line(&input, &TrendLine::sma(3)), sma(&input, 3));
    assert_eq!(compute_trend_line(&input, &TrendLine::ema(3)), ema(&input, 3));
    assert_eq!(
        compute_trend_line(&input, &TrendLine::new(TrendKind::BollingerLower, 4)),
        bollinger_bands(&input, 4).1
    );
}

#[test]
fn outputs_keep_input_length() {
    let input = values(&[1.0, 2.0]);
    for kind in [
        TrendKind::Sma,
        TrendKind::Ema,
        TrendKind::Linear,
        TrendKind::BollingerUpper,
        TrendKind::BollingerLower,
    ] {
        assert_eq!(compute_trend_line(&input, &TrendLine::new(kind, 5)).len(), 2);
    }
}
