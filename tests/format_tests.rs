use statchart::ChartError;
use statchart::core::format::{format_fixed_trimmed, format_value, parse_humanized};
use statchart::core::{ValueFormatter, humanize, humanize_default};

#[test]
fn humanize_suffixes_large_values() {
    assert_eq!(humanize_default(999.0), "999");
    assert_eq!(humanize_default(1_000.0), "1k");
    assert_eq!(humanize_default(1_234.0), "1.23k");
    assert_eq!(humanize_default(2_500_000.0), "2.5M");
    assert_eq!(humanize_default(-3_000_000_000.0), "-3G");
    assert_eq!(humanize_default(7e12), "7T");
}

#[test]
fn humanize_trims_unless_strict() {
    assert_eq!(humanize(12.5, 2, false), "12.5");
    assert_eq!(humanize(12.5, 2, true), "12.50");
    assert_eq!(humanize(0.0, 2, true), "0.00");
    assert_eq!(humanize(0.001, 2, false), "0");
}

#[test]
fn rounding_carries_into_next_unit() {
    assert_eq!(humanize_default(999_999.0), "1M");
}

#[test]
fn fixed_trimmed_drops_negative_zero() {
    assert_eq!(format_fixed_trimmed(-0.0001, 2), "0");
    assert_eq!(format_fixed_trimmed(33.333, 2), "33.33");
}

#[test]
fn template_formatter_substitutes_humanized_value() {
    let formatter = ValueFormatter::template("{value} ml");
    assert_eq!(formatter.format(1500.0).expect("format"), "1.5k ml");
}

#[test]
fn failing_formatter_surfaces_format_error() {
    let formatter = ValueFormatter::new(|value| Err(format!("cannot format {value}")));
    let err = format_value(Some(&formatter), 1.0).expect_err("must fail");
    assert!(matches!(err, ChartError::Format(message) if message.contains("cannot format")));
}

mod properties {
    use proptest::prelude::*;
    use statchart::core::format::parse_humanized;
    use statchart::core::humanize_default;

    proptest! {
        #[test]
        fn humanize_is_idempotent_through_parsing(value in -1e15f64..1e15) {
            let once = humanize_default(value);
            let parsed = parse_humanized(&once).expect("humanized output parses");
            prop_assert_eq!(humanize_default(parsed), once);
        }
    }
}

#[test]
fn parse_rejects_garbage() {
    assert_eq!(parse_humanized("abc"), None);
    assert_eq!(parse_humanized("2.5k"), Some(2500.0));
}
