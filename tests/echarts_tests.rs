use statchart::charts::SeriesList;
use statchart::core::{Bounds, OhlcSample};
use statchart::{ChartError, EChartsOption, render_echarts_json};

fn convert(json: &str) -> statchart::ChartOption {
    EChartsOption::from_json(json)
        .expect("parse")
        .to_chart_option()
        .expect("convert")
}

#[test]
fn line_document_renders_svg() {
    let svg = render_echarts_json(
        r#"{
            "title": {"text": "Visits"},
            "xAxis": {"type": "category", "data": ["Mon", "Tue", "Wed"]},
            "yAxis": {"type": "value"},
            "series": [{"type": "line", "name": "a", "data": [120, null, "-"]}]
        }"#,
    )
    .expect("render");
    let svg = String::from_utf8(svg).expect("utf8");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">Visits</text>"));
    assert!(svg.contains(">Tue</text>"));
}

#[test]
fn missing_values_stay_missing() {
    let option = convert(r#"{"series": [{"type": "line", "data": [1, null, "-", {"value": 4}]}]}"#);
    let SeriesList::Line(series) = option.series else {
        panic!("expected a line chart");
    };
    assert_eq!(series[0].values, [Some(1.0), None, None, Some(4.0)]);
}

#[test]
fn padding_and_size_carry_over() {
    let option = convert(
        r#"{"width": 640, "height": 320, "padding": [10, 20],
            "series": [{"type": "bar", "data": [1, 2]}]}"#,
    );
    assert_eq!((option.width, option.height), (640, 320));
    assert_eq!(option.padding, Bounds::new(20, 10, 20, 10));
}

#[test]
fn value_x_axis_turns_bars_horizontal() {
    let option = convert(
        r#"{
            "xAxis": {"type": "value"},
            "yAxis": {"type": "category", "data": ["q1", "q2"]},
            "series": [{"type": "bar", "data": [3, 5]}]
        }"#,
    );
    assert!(matches!(option.series, SeriesList::HorizontalBar(_)));
    assert_eq!(option.y_axis[0].data, ["q1", "q2"]);
    assert!(option.x_axis.data.is_empty());
}

#[test]
fn horizontal_bars_borrow_x_categories_without_a_y_axis() {
    let option = convert(
        r#"{"xAxis": {"type": "value", "data": ["a", "b"]},
            "series": [{"type": "bar", "data": [3, 5]}]}"#,
    );
    assert_eq!(option.y_axis[0].data, ["a", "b"]);
}

#[test]
fn axis_label_template_formats_ticks() {
    let svg = render_echarts_json(
        r#"{
            "xAxis": {"data": ["a", "b"]},
            "yAxis": {"axisLabel": {"formatter": "{value} ml"}},
            "series": [{"type": "bar", "data": [1000, 2000]}]
        }"#,
    )
    .expect("render");
    assert!(String::from_utf8(svg).expect("utf8").contains("k ml</text>"));
}

#[test]
fn split_number_sets_label_count() {
    let option = convert(
        r#"{"yAxis": {"splitNumber": 4, "axisLabel": {"interval": 1}},
            "series": [{"type": "line", "data": [1, 2]}]}"#,
    );
    assert_eq!(option.y_axis[0].label_count, Some(5));
    assert_eq!(option.y_axis[0].label_skip_count, 1);
}

#[test]
fn unknown_keys_are_tolerated() {
    let parsed = EChartsOption::from_json(
        r#"{"tooltip": {"trigger": "axis"}, "animation": false,
            "series": [{"type": "line", "data": [1, 2], "emphasis": {}}]}"#,
    )
    .expect("parse");
    assert_eq!(
        parsed.unsupported.keys().map(String::as_str).collect::<Vec<_>>(),
        ["tooltip", "animation"]
    );
    assert!(parsed.series[0].unsupported.contains_key("emphasis"));
    assert!(parsed.to_chart_option().is_ok());
}

#[test]
fn invalid_json_is_a_json_error() {
    assert!(matches!(
        EChartsOption::from_json("{\"series\": ["),
        Err(ChartError::Json(_))
    ));
}

#[test]
fn unknown_series_type_is_rejected() {
    let err = EChartsOption::from_json(r#"{"series": [{"type": "sankey", "data": [1]}]}"#)
        .expect("parse")
        .to_chart_option()
        .expect_err("unsupported");
    assert!(err.to_string().contains("sankey"));
}

#[test]
fn mixed_series_keep_the_first_type() {
    let option = convert(
        r#"{"series": [
            {"type": "line", "name": "a", "data": [1, 2]},
            {"type": "bar", "name": "b", "data": [3, 4]},
            {"type": "line", "name": "c", "data": [5, 6]}
        ]}"#,
    );
    let SeriesList::Line(series) = option.series else {
        panic!("expected a line chart");
    };
    let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["a", "c"]);
}

#[test]
fn pie_names_fall_back_to_legend() {
    let option = convert(
        r#"{"legend": {"data": ["first", "second"]},
            "series": [{"type": "pie", "radius": ["20%", "60%"],
                        "data": [{"value": 1, "name": "named"}, 2]}]}"#,
    );
    let SeriesList::Pie(pie) = option.series else {
        panic!("expected a pie chart");
    };
    let names: Vec<&str> = pie.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["named", "second"]);
    assert!(pie.inner_radius.is_some() && pie.radius.is_some());
}

#[test]
fn candlestick_rows_are_open_close_low_high() {
    let option = convert(
        r#"{"series": [{"type": "candlestick", "data": [[10, 12, 9, 13], [1, 2]]}]}"#,
    );
    let SeriesList::Candlestick(series) = option.series else {
        panic!("expected a candlestick chart");
    };
    assert_eq!(series[0].data[0], OhlcSample::new(10.0, 13.0, 9.0, 12.0));
    assert!(!series[0].data[1].is_valid());
}

#[test]
fn smooth_flag_and_area_style() {
    let option = convert(
        r#"{"series": [{"type": "line", "smooth": true, "areaStyle": {"opacity": 0.5},
                        "data": [1, 2, 3]}]}"#,
    );
    let SeriesList::Line(series) = option.series else {
        panic!("expected a line chart");
    };
    assert_eq!(series[0].smooth, Some(0.5));
    assert!(series[0].fill_area);
    assert_eq!(series[0].fill_opacity, Some(128));
}

#[test]
fn children_convert_recursively() {
    let option = convert(
        r#"{"series": [{"type": "line", "data": [1, 2]}],
            "children": [{"bounds": [0, 300, 200, 0],
                          "series": [{"type": "bar", "data": [3, 4]}]}]}"#,
    );
    assert_eq!(option.children.len(), 1);
    assert!(matches!(option.children[0].series, SeriesList::Bar(_)));
    assert_eq!(option.children[0].bounds, Bounds::new(0, 0, 300, 200));
}
