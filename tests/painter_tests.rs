use std::cell::RefCell;
use std::rc::Rc;

use statchart::core::geometry::split_at_nulls;
use statchart::core::{Bounds, Color, FontStyle, Point};
use statchart::render::{NullBackend, OutputFormat, Painter, PainterOption, Style};

fn null_painter(width: i32, height: i32) -> (Rc<RefCell<NullBackend>>, Painter) {
    let backend = Rc::new(RefCell::new(NullBackend::new(width, height)));
    let painter = Painter::with_backend(backend.clone(), OutputFormat::Svg, None);
    (backend, painter)
}

#[test]
fn nested_boxes_compose_offsets() {
    let (_, root) = null_painter(400, 300);
    let padded = root.padded(Bounds::uniform(20));
    assert_eq!(padded.bounds(), Bounds::new(20, 20, 380, 280));

    let inner = padded.sub_box(Bounds::new(10, 10, 110, 60));
    assert_eq!(inner.bounds(), Bounds::new(30, 30, 130, 80));
    assert_eq!((inner.width(), inner.height()), (100, 50));
}

#[test]
fn zero_box_keeps_parent_region() {
    let (_, root) = null_painter(400, 300);
    let child = root.child([PainterOption::Box(Bounds::default())]);
    assert_eq!(child.bounds(), root.bounds());
}

#[test]
fn padding_never_inverts_the_box() {
    let (_, root) = null_painter(30, 30);
    let squeezed = root.padded(Bounds::uniform(40));
    assert!(squeezed.width() >= 0 && squeezed.height() >= 0);
}

#[test]
fn empty_text_is_not_drawn() {
    let (backend, painter) = null_painter(100, 100);
    painter.text("", 10, 10, 0.0, &FontStyle::default());
    painter.text("hello", 10, 10, 0.0, &FontStyle::default());
    assert_eq!(backend.borrow().texts(), ["hello"]);
}

#[test]
fn multiline_text_draws_each_line() {
    let (backend, painter) = null_painter(100, 100);
    painter.multiline_text("a\nb\nc", 0, 12, &FontStyle::default());
    assert_eq!(backend.borrow().texts(), ["a", "b", "c"]);
}

#[test]
fn line_stroke_breaks_at_nulls_and_dots_isolated_points() {
    let (_, painter) = null_painter(100, 100);
    let points = [
        Point::new(0, 10),
        Point::new(10, 20),
        Point::null(20),
        Point::new(30, 40),
        Point::null(40),
        Point::new(50, 60),
        Point::new(60, 70),
    ];
    painter.line_stroke(&points, Color::BLACK, 1.0);
    let stats = painter.stats();
    assert_eq!(stats.strokes, 2);
    assert_eq!(stats.circles, 1);
}

#[test]
fn fill_area_skips_single_point_runs() {
    let (_, painter) = null_painter(100, 100);
    let points = [
        Point::new(0, 10),
        Point::null(10),
        Point::new(20, 30),
        Point::new(30, 40),
        Point::new(30, 100),
    ];
    painter.fill_area(&points, Color::BLACK);
    assert_eq!(painter.stats().fills, 1);
}

#[test]
fn stroke_colors_are_recorded_in_draw_order() {
    let (backend, painter) = null_painter(100, 100);
    let red = Color::rgb(255, 0, 0);
    painter.line(0, 0, 10, 10, &Style::stroke(red, 1.0));
    painter.line(0, 0, 10, 10, &Style::stroke(Color::BLACK, 1.0));
    assert_eq!(backend.borrow().stroke_colors(), [red, Color::BLACK]);
}

#[test]
fn mark_line_draws_dot_segment_and_arrow() {
    let (_, painter) = null_painter(200, 100);
    painter.mark_line(10, 50, 120, Color::BLACK, 1.0);
    let stats = painter.stats();
    assert_eq!((stats.circles, stats.strokes, stats.fills), (1, 1, 1));
}

#[test]
fn pin_head_sits_above_its_tip() {
    let (_, painter) = null_painter(200, 100);
    let head = painter.pin(40, 80, 20, &Style::fill(Color::BLACK));
    assert_eq!(head, Point::new(40, 60));
    assert_eq!(painter.stats().fills, 1);
}

#[test]
fn measured_text_grows_with_length() {
    let (_, painter) = null_painter(100, 100);
    let font = FontStyle::default();
    let short = painter.measure_text("ab", 0.0, &font);
    let long = painter.measure_text("abcdefgh", 0.0, &font);
    assert!(long.width() > short.width());
    assert_eq!(short.height(), long.height());
}

#[test]
fn svg_painter_serializes_view_box() {
    let painter = Painter::new(OutputFormat::Svg, 320, 200, None).expect("painter");
    painter.line(0, 0, 10, 10, &Style::stroke(Color::BLACK, 1.0));
    let svg = String::from_utf8(painter.bytes().expect("bytes")).expect("utf8");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("viewBox=\"0 0 320 200\""));
    assert!(svg.contains("<path d=\"M 0 0 L 10 10\""));
}

#[test]
fn invalid_canvas_is_rejected() {
    assert!(Painter::new(OutputFormat::Svg, 0, 100, None).is_err());
}

#[cfg(not(feature = "cairo-backend"))]
#[test]
fn raster_output_needs_the_cairo_feature() {
    assert!(Painter::new(OutputFormat::Png, 100, 100, None).is_err());
}

mod properties {
    use proptest::prelude::*;
    use statchart::core::Point;
    use statchart::core::geometry::split_at_nulls;

    proptest! {
        #[test]
        fn k_isolated_nulls_give_k_plus_one_sub_paths(
            runs in prop::collection::vec(1usize..6, 1..10),
        ) {
            let mut points = Vec::new();
            let mut x = 0;
            for (i, len) in runs.iter().enumerate() {
                if i > 0 {
                    points.push(Point::null(x));
                    x += 10;
                }
                for _ in 0..*len {
                    points.push(Point::new(x, x / 2));
                    x += 10;
                }
            }
            let nulls = runs.len() - 1;
            prop_assert_eq!(split_at_nulls(&points).len(), nulls + 1);
        }

        #[test]
        fn all_null_input_has_no_sub_paths(count in 0usize..20) {
            let points: Vec<Point> = (0..count as i32).map(Point::null).collect();
            prop_assert!(split_at_nulls(&points).is_empty());
        }
    }
}

#[test]
fn leading_and_trailing_nulls_are_ignored() {
    let points = [Point::null(0), Point::new(1, 1), Point::new(2, 2), Point::null(3)];
    assert_eq!(split_at_nulls(&points).len(), 1);
}
