#![cfg(feature = "cairo-backend")]

use statchart::charts::LineSeries;
use statchart::render::CairoBackend;
use statchart::{ChartError, ChartOption, OutputFormat, SeriesList, render_chart_bytes};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

fn option(format: OutputFormat) -> ChartOption {
    ChartOption::new(SeriesList::Line(vec![LineSeries::new(
        "visits",
        vec![Some(120.0), Some(132.0), None, Some(134.0), Some(90.0)],
    )]))
    .with_size(480, 320)
    .with_format(format)
    .with_title("visits")
    .with_x_labels(["Mon", "Tue", "Wed", "Thu", "Fri"])
}

#[test]
fn cairo_backend_rejects_invalid_surface_size() {
    let err = CairoBackend::new(0, 320, OutputFormat::Png).expect_err("invalid width");
    assert!(matches!(err, ChartError::InvalidViewport { width: 0, .. }));
}

#[test]
fn png_output_carries_signature() {
    let png = render_chart_bytes(&option(OutputFormat::Png)).expect("png");
    assert_eq!(png[..8], PNG_SIGNATURE);
}

#[test]
fn png_output_is_deterministic() {
    let first = render_chart_bytes(&option(OutputFormat::Png)).expect("first");
    let second = render_chart_bytes(&option(OutputFormat::Png)).expect("second");
    assert_eq!(first, second);
}

#[test]
fn jpeg_output_carries_soi_marker() {
    let jpg = render_chart_bytes(&option(OutputFormat::Jpg)).expect("jpg");
    assert_eq!(jpg[..2], [0xff, 0xd8]);
}
