//! ECharts-shaped JSON options mapped onto [`ChartOption`].
//!
//! Only the subset the renderers understand is typed. Everything else lands
//! in the `unsupported` maps and is reported with `warn!` during conversion.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::charts::options::{
    BarSeries, CandlestickSeries, ChartOption, FunnelSeries, FunnelSeriesList, HorizontalBarSeries,
    LegendOption, LineSeries, MarkType, PieSeries, PieSeriesList, RadarIndicator, RadarSeries,
    RadarSeriesList, SeriesLabel, SeriesList, SeriesMarkLine, SeriesMarkPoint, TitleOption,
    XAxisOption, YAxisOption,
};
use crate::charts::render_chart_bytes;
use crate::core::{Align, Bounds, Color, FontStyle, OhlcSample, Offset, Orient, Side, Theme, ValueFormatter};
use crate::error::{ChartError, ChartResult};
use crate::render::OutputFormat;

/// Tension used for `smooth: true`.
pub const DEFAULT_SMOOTH_TENSION: f64 = 0.5;

/// Wire form of [`EChartsText`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextRepr {
    Text(String),
    Number(f64),
}

/// A string field that also accepts bare numbers (`"left": 20`, `"data": [2019, 2020]`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "TextRepr")]
pub struct EChartsText(pub String);

impl From<TextRepr> for EChartsText {
    fn from(repr: TextRepr) -> Self {
        match repr {
            TextRepr::Text(text) => Self(text),
            TextRepr::Number(number) => Self(number.to_string()),
        }
    }
}

impl EChartsText {
    fn offset(&self) -> Option<Offset> {
        let offset = Offset::parse(&self.0);
        if offset.is_none() {
            warn!(value = %self.0, "unsupported position value ignored");
        }
        offset
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaddingRepr {
    Uniform(i32),
    List(Vec<i32>),
}

/// `N`, `[V, H]`, `[T, H, B]` or `[T, R, B, L]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaddingRepr")]
pub struct EChartsPadding(pub Bounds);

impl TryFrom<PaddingRepr> for EChartsPadding {
    type Error = String;

    fn try_from(repr: PaddingRepr) -> Result<Self, Self::Error> {
        let bounds = match repr {
            PaddingRepr::Uniform(value) => Bounds::uniform(value),
            PaddingRepr::List(values) => match values.as_slice() {
                [all] => Bounds::uniform(*all),
                [vertical, horizontal] => Bounds::new(*horizontal, *vertical, *horizontal, *vertical),
                [top, horizontal, bottom] => Bounds::new(*horizontal, *top, *horizontal, *bottom),
                [top, right, bottom, left] => Bounds::new(*left, *top, *right, *bottom),
                _ => return Err(format!("padding takes 1 to 4 values, got {}", values.len())),
            },
        };
        Ok(Self(bounds))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// Axis lists accept a single object or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OneOrMany<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct EChartsList<T>(pub Vec<T>);

impl<T> Default for EChartsList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<OneOrMany<T>> for EChartsList<T> {
    fn from(repr: OneOrMany<T>) -> Self {
        match repr {
            OneOrMany::One(item) => Self(vec![item]),
            OneOrMany::Many(items) => Self(items),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsTextStyle {
    pub color: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
}

impl EChartsTextStyle {
    fn to_font_style(&self) -> FontStyle {
        FontStyle {
            font: self.font_family.clone(),
            size: self.font_size,
            color: parse_color(self.color.as_deref()),
        }
    }
}

fn parse_color(raw: Option<&str>) -> Option<Color> {
    let raw = raw?;
    match Color::parse(raw) {
        Ok(color) => Some(color),
        Err(err) => {
            warn!(color = raw, %err, "unparsable color ignored");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsTitle {
    pub show: Option<bool>,
    pub text: String,
    pub subtext: String,
    pub left: Option<EChartsText>,
    pub top: Option<EChartsText>,
    pub text_style: EChartsTextStyle,
    pub subtext_style: EChartsTextStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsLegend {
    pub show: Option<bool>,
    pub data: Vec<EChartsText>,
    pub align: Option<String>,
    pub orient: Option<String>,
    pub padding: Option<EChartsPadding>,
    pub left: Option<EChartsText>,
    pub top: Option<EChartsText>,
    pub text_style: EChartsTextStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsAxisLabel {
    pub show: Option<bool>,
    /// `"{value}"` is replaced with the humanized tick value.
    pub formatter: Option<String>,
    pub rotate: Option<f64>,
    /// Labels skipped between two shown labels.
    pub interval: Option<usize>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsLineStyle {
    pub color: Option<String>,
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsAxisLine {
    pub show: Option<bool>,
    pub line_style: EChartsLineStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsSplitLine {
    pub show: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsAxis {
    #[serde(rename = "type")]
    pub axis_type: Option<String>,
    pub show: Option<bool>,
    pub name: Option<String>,
    pub data: Vec<EChartsText>,
    pub boundary_gap: Option<bool>,
    pub split_number: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Suggested tick step.
    pub interval: Option<f64>,
    pub position: Option<String>,
    pub axis_label: EChartsAxisLabel,
    pub axis_line: EChartsAxisLine,
    pub split_line: EChartsSplitLine,
}

impl EChartsAxis {
    fn is_value(&self) -> bool {
        self.axis_type.as_deref() == Some("value")
    }

    fn labels(&self) -> Vec<String> {
        self.data.iter().map(|text| text.0.clone()).collect()
    }

    fn formatter(&self) -> Option<ValueFormatter> {
        self.axis_label
            .formatter
            .as_deref()
            .map(ValueFormatter::template)
    }

    fn label_font(&self) -> FontStyle {
        FontStyle {
            font: None,
            size: self.axis_label.font_size,
            color: parse_color(self.axis_label.color.as_deref()),
        }
    }

    fn side(&self) -> Option<Side> {
        match self.position.as_deref()? {
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            "top" => Some(Side::Top),
            "bottom" => Some(Side::Bottom),
            other => {
                warn!(position = other, "unsupported axis position ignored");
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsItemStyle {
    pub color: Option<String>,
    /// Candlestick down color.
    pub color0: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EChartsValue {
    Number(Option<f64>),
    Array(Vec<Option<f64>>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsDataObject {
    pub value: Option<EChartsValue>,
    pub name: Option<String>,
    pub item_style: Option<EChartsItemStyle>,
}

/// One `data` entry: a number (or `null`), a `"-"` placeholder, a value array or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EChartsDataItem {
    Number(Option<f64>),
    Text(String),
    Array(Vec<Option<f64>>),
    Object(EChartsDataObject),
}

impl EChartsDataItem {
    /// Scalar value; arrays contribute their last element (the y of `[x, y]`).
    fn scalar(&self) -> Option<f64> {
        match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse().ok(),
            Self::Array(values) => values.last().copied().flatten(),
            Self::Object(object) => match &object.value {
                Some(EChartsValue::Number(value)) => *value,
                Some(EChartsValue::Array(values)) => values.last().copied().flatten(),
                None => None,
            },
        }
    }

    fn values(&self) -> Vec<Option<f64>> {
        match self {
            Self::Array(values) => values.clone(),
            Self::Object(EChartsDataObject {
                value: Some(EChartsValue::Array(values)),
                ..
            }) => values.clone(),
            other => vec![other.scalar()],
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Self::Object(object) => object.name.as_deref(),
            _ => None,
        }
    }

    fn color(&self) -> Option<Color> {
        match self {
            Self::Object(object) => {
                parse_color(object.item_style.as_ref().and_then(|s| s.color.as_deref()))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsSeriesLabel {
    pub show: Option<bool>,
    pub formatter: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
}

impl EChartsSeriesLabel {
    fn to_series_label(&self) -> SeriesLabel {
        SeriesLabel {
            show: self.show,
            font_style: FontStyle {
                font: None,
                size: self.font_size,
                color: parse_color(self.color.as_deref()),
            },
            formatter: self.formatter.as_deref().map(ValueFormatter::template),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsMarkData {
    #[serde(rename = "type")]
    pub mark_type: Option<MarkType>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsMark {
    pub data: Vec<EChartsMarkData>,
    pub symbol_size: Option<i32>,
}

impl EChartsMark {
    fn kinds(&self) -> Vec<MarkType> {
        self.data.iter().filter_map(|d| d.mark_type).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EChartsSmooth {
    Flag(bool),
    Tension(f64),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsSeries {
    #[serde(rename = "type")]
    pub series_type: String,
    pub name: String,
    pub data: Vec<EChartsDataItem>,
    pub y_axis_index: usize,
    pub item_style: EChartsItemStyle,
    pub label: EChartsSeriesLabel,
    pub mark_point: EChartsMark,
    pub mark_line: EChartsMark,
    pub smooth: Option<EChartsSmooth>,
    pub area_style: Option<EChartsLineStyle>,
    pub bar_width: Option<i32>,
    /// Pie outer radius, or `[inner, outer]`.
    pub radius: Option<EChartsList<EChartsText>>,
    #[serde(flatten)]
    pub unsupported: IndexMap<String, serde_json::Value>,
}

impl EChartsSeries {
    fn color(&self) -> Option<Color> {
        parse_color(self.item_style.color.as_deref())
    }

    fn scalars(&self) -> Vec<Option<f64>> {
        self.data.iter().map(EChartsDataItem::scalar).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsRadarIndicator {
    pub name: String,
    pub max: f64,
    pub min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsRadar {
    pub indicator: Vec<EChartsRadarIndicator>,
}

/// Root of an ECharts-style document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EChartsOption {
    /// Output format: `svg`, `png` or `jpg`.
    #[serde(rename = "type")]
    pub output_type: Option<String>,
    pub theme: Option<String>,
    pub font_family: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub padding: Option<EChartsPadding>,
    pub background_color: Option<String>,
    pub title: EChartsTitle,
    pub legend: EChartsLegend,
    pub x_axis: EChartsList<EChartsAxis>,
    pub y_axis: EChartsList<EChartsAxis>,
    pub radar: EChartsRadar,
    pub series: Vec<EChartsSeries>,
    /// Child placement inside the parent canvas.
    pub bounds: Option<EChartsPadding>,
    pub children: Vec<EChartsOption>,
    #[serde(flatten)]
    pub unsupported: IndexMap<String, serde_json::Value>,
}

impl EChartsOption {
    pub fn from_json(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::Json(format!("failed to parse echarts option: {e}")))
    }

    /// Typed chart options; the first series' type picks the chart kind.
    pub fn to_chart_option(&self) -> ChartResult<ChartOption> {
        for key in self.unsupported.keys() {
            warn!(field = %key, "unsupported echarts option ignored");
        }
        let x_axis = self.x_axis.0.first().cloned().unwrap_or_default();
        let series = self.series_list(&x_axis)?;
        let mut option = ChartOption::new(series);

        if let Some(raw) = &self.output_type {
            option.output_format = OutputFormat::parse(raw).unwrap_or_else(|| {
                warn!(format = %raw, "unknown output type; rendering svg");
                OutputFormat::Svg
            });
        }
        if let Some(theme) = &self.theme {
            option.theme = Some(Theme::get(theme));
        }
        option.font = self.font_family.clone();
        if let Some(width) = self.width {
            option.width = width;
        }
        if let Some(height) = self.height {
            option.height = height;
        }
        if let Some(padding) = self.padding {
            option.padding = padding.0;
        }
        if let Some(bounds) = self.bounds {
            option.bounds = bounds.0;
        }
        option.background_color = parse_color(self.background_color.as_deref());
        option.title = self.title_option();
        option.legend = self.legend_option();

        let horizontal = matches!(option.series, SeriesList::HorizontalBar(_));
        option.x_axis = x_axis_option(&x_axis);
        option.y_axis = self.y_axis.0.iter().map(y_axis_option).collect();
        if horizontal {
            // Categories move to the y axis; the x axis carries values.
            if option.y_axis.is_empty() {
                option.y_axis.push(YAxisOption::default());
            }
            if let Some(first) = option.y_axis.first_mut() {
                if first.data.is_empty() {
                    first.data = x_axis.labels();
                }
            }
            option.x_axis.data.clear();
        }

        option.children = self
            .children
            .iter()
            .map(EChartsOption::to_chart_option)
            .collect::<ChartResult<_>>()?;
        Ok(option)
    }

    fn title_option(&self) -> TitleOption {
        let title = &self.title;
        TitleOption {
            show: title.show,
            text: title.text.clone(),
            subtext: title.subtext.clone(),
            left: title.left.as_ref().and_then(EChartsText::offset).unwrap_or_default(),
            top: title.top.as_ref().and_then(EChartsText::offset),
            font_style: title.text_style.to_font_style(),
            subtext_font_style: title.subtext_style.to_font_style(),
        }
    }

    fn legend_option(&self) -> LegendOption {
        let legend = &self.legend;
        let defaults = LegendOption::default();
        LegendOption {
            show: legend.show,
            data: legend.data.iter().map(|text| text.0.clone()).collect(),
            align: match legend.align.as_deref() {
                Some("right") => Align::Right,
                Some("left") | None => Align::Left,
                Some(other) => {
                    warn!(align = other, "unsupported legend align ignored");
                    Align::Left
                }
            },
            orient: match legend.orient.as_deref() {
                Some("vertical") => Orient::Vertical,
                _ => Orient::Horizontal,
            },
            padding: legend.padding.map_or(defaults.padding, |p| p.0),
            left: legend.left.as_ref().and_then(EChartsText::offset).unwrap_or(defaults.left),
            top: legend.top.as_ref().and_then(EChartsText::offset).unwrap_or(defaults.top),
            font_style: legend.text_style.to_font_style(),
        }
    }

    fn series_list(&self, x_axis: &EChartsAxis) -> ChartResult<SeriesList> {
        let Some(first) = self.series.first() else {
            return Ok(SeriesList::Line(Vec::new()));
        };
        let kind = first.series_type.to_ascii_lowercase();
        let matching: Vec<&EChartsSeries> = self
            .series
            .iter()
            .filter(|s| {
                let same = s.series_type.eq_ignore_ascii_case(&kind)
                    || (is_candlestick(&kind) && is_candlestick(&s.series_type));
                if !same {
                    warn!(series = %s.name, series_type = %s.series_type, "mixed series types unsupported; series dropped");
                }
                same
            })
            .collect();
        for series in &matching {
            for key in series.unsupported.keys() {
                warn!(series = %series.name, field = %key, "unsupported series field ignored");
            }
        }

        Ok(match kind.as_str() {
            "line" => SeriesList::Line(matching.iter().map(|s| line_series(s)).collect()),
            "bar" if x_axis.is_value() => SeriesList::HorizontalBar(
                matching
                    .iter()
                    .map(|s| HorizontalBarSeries {
                        name: s.name.clone(),
                        values: s.scalars(),
                        color: s.color(),
                        bar_height: s.bar_width,
                        round_radius: 0,
                        label: s.label.to_series_label(),
                    })
                    .collect(),
            ),
            "bar" => SeriesList::Bar(matching.iter().map(|s| bar_series(s)).collect()),
            "pie" => SeriesList::Pie(pie_series(&matching, &self.legend)),
            "funnel" => SeriesList::Funnel(funnel_series(&matching, &self.legend)),
            "radar" => SeriesList::Radar(self.radar_series(&matching)),
            kind if is_candlestick(kind) => {
                SeriesList::Candlestick(matching.iter().map(|s| candlestick_series(s)).collect())
            }
            other => {
                return Err(ChartError::options(format!("unsupported series type: {other}")));
            }
        })
    }

    fn radar_series(&self, series: &[&EChartsSeries]) -> RadarSeriesList {
        let indicators = self
            .radar
            .indicator
            .iter()
            .map(|i| RadarIndicator {
                name: i.name.clone(),
                max: i.max,
                min: i.min.unwrap_or(0.0),
            })
            .collect();
        let series = series
            .iter()
            .flat_map(|s| {
                s.data.iter().map(move |item| RadarSeries {
                    name: item.name().map_or_else(|| s.name.clone(), str::to_owned),
                    values: item.values(),
                    color: item.color().or_else(|| s.color()),
                })
            })
            .collect();
        RadarSeriesList { indicators, series }
    }
}

fn is_candlestick(kind: &str) -> bool {
    matches!(kind.to_ascii_lowercase().as_str(), "candlestick" | "k")
}

fn x_axis_option(axis: &EChartsAxis) -> XAxisOption {
    XAxisOption {
        show: axis.show,
        data: axis.labels(),
        boundary_gap: axis.boundary_gap,
        position: axis.side().unwrap_or(Side::Bottom),
        font_style: axis.label_font(),
        label_rotation: axis.axis_label.rotate.unwrap_or(0.0),
        label_count: axis.split_number.map(|n| n + 1),
        label_skip_count: axis.axis_label.interval.unwrap_or(0),
        stroke_color: parse_color(axis.axis_line.line_style.color.as_deref()),
        split_line_show: axis.split_line.show.unwrap_or(false),
        title: axis.name.clone().unwrap_or_default(),
        min: axis.min,
        max: axis.max,
        unit: axis.interval,
        formatter: axis.formatter(),
        ..XAxisOption::default()
    }
}

fn y_axis_option(axis: &EChartsAxis) -> YAxisOption {
    YAxisOption {
        show: axis.show,
        min: axis.min,
        max: axis.max,
        unit: axis.interval,
        label_count: axis.split_number.map(|n| n + 1),
        formatter: axis.formatter(),
        position: axis.side(),
        font_style: axis.label_font(),
        split_line_show: axis.split_line.show,
        spine_line_show: axis.axis_line.show,
        title: axis.name.clone().unwrap_or_default(),
        data: axis.labels(),
        label_skip_count: axis.axis_label.interval.unwrap_or(0),
        ..YAxisOption::default()
    }
}

fn mark_point(mark: &EChartsMark) -> SeriesMarkPoint {
    SeriesMarkPoint {
        data: mark.kinds(),
        symbol_size: mark.symbol_size,
    }
}

fn line_series(series: &EChartsSeries) -> LineSeries {
    LineSeries {
        name: series.name.clone(),
        values: series.scalars(),
        y_axis_index: series.y_axis_index,
        color: series.color(),
        stroke_width: None,
        smooth: match series.smooth {
            Some(EChartsSmooth::Flag(true)) => Some(DEFAULT_SMOOTH_TENSION),
            Some(EChartsSmooth::Tension(tension)) => Some(tension),
            _ => None,
        },
        fill_area: series.area_style.is_some(),
        fill_opacity: series
            .area_style
            .as_ref()
            .and_then(|style| style.opacity)
            .map(|opacity| (opacity.clamp(0.0, 1.0) * 255.0).round() as u8),
        symbol_show: None,
        label: series.label.to_series_label(),
        mark_point: mark_point(&series.mark_point),
        mark_line: SeriesMarkLine::new(series.mark_line.kinds()),
    }
}

fn bar_series(series: &EChartsSeries) -> BarSeries {
    BarSeries {
        name: series.name.clone(),
        values: series.scalars(),
        y_axis_index: series.y_axis_index,
        color: series.color(),
        bar_width: series.bar_width,
        round_radius: 0,
        label: series.label.to_series_label(),
        mark_point: mark_point(&series.mark_point),
        mark_line: SeriesMarkLine::new(series.mark_line.kinds()),
    }
}

/// Slice or layer name: the item name, then the legend entry, then the series name.
fn item_name(item: &EChartsDataItem, index: usize, legend: &EChartsLegend, series: &EChartsSeries) -> String {
    item.name()
        .map(str::to_owned)
        .or_else(|| legend.data.get(index).map(|text| text.0.clone()))
        .unwrap_or_else(|| series.name.clone())
}

fn pie_series(series: &[&EChartsSeries], legend: &EChartsLegend) -> PieSeriesList {
    let mut list = PieSeriesList::default();
    for s in series {
        for (index, item) in s.data.iter().enumerate() {
            list.series.push(PieSeries {
                name: item_name(item, index, legend, s),
                value: item.scalar().unwrap_or(0.0),
                color: item.color(),
            });
        }
    }
    if let Some(first) = series.first() {
        list.label = first.label.to_series_label();
        let radius = first.radius.as_ref().map(|r| r.0.as_slice()).unwrap_or_default();
        match radius {
            [outer] => list.radius = outer.offset(),
            [inner, outer, ..] => {
                list.inner_radius = inner.offset();
                list.radius = outer.offset();
            }
            [] => {}
        }
    }
    list
}

fn funnel_series(series: &[&EChartsSeries], legend: &EChartsLegend) -> FunnelSeriesList {
    let mut list = FunnelSeriesList {
        label: SeriesLabel::shown(),
        ..FunnelSeriesList::default()
    };
    for s in series {
        for (index, item) in s.data.iter().enumerate() {
            list.series.push(FunnelSeries {
                name: item_name(item, index, legend, s),
                value: item.scalar().unwrap_or(0.0),
                color: item.color(),
            });
        }
    }
    if let Some(show) = series.first().and_then(|s| s.label.show) {
        list.label.show = Some(show);
    }
    list
}

/// ECharts candlestick rows are `[open, close, low, high]`.
fn candlestick_series(series: &EChartsSeries) -> CandlestickSeries {
    let data = series
        .data
        .iter()
        .map(|item| match item.values().as_slice() {
            [open, close, low, high, ..] => OhlcSample {
                open: *open,
                high: *high,
                low: *low,
                close: *close,
            },
            _ => OhlcSample::null(),
        })
        .collect();
    CandlestickSeries {
        name: series.name.clone(),
        data,
        y_axis_index: series.y_axis_index,
        up_color: series.color(),
        down_color: parse_color(series.item_style.color0.as_deref()),
        ..CandlestickSeries::default()
    }
}

/// Parses, converts and renders an ECharts-style JSON document.
pub fn render_echarts_json(input: &str) -> ChartResult<Vec<u8>> {
    let option = EChartsOption::from_json(input)?.to_chart_option()?;
    render_chart_bytes(&option)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_forms() {
        let parse = |raw: &str| serde_json::from_str::<EChartsPadding>(raw).map(|p| p.0);
        assert_eq!(parse("5").ok(), Some(Bounds::uniform(5)));
        assert_eq!(parse("[1, 2]").ok(), Some(Bounds::new(2, 1, 2, 1)));
        assert_eq!(parse("[1, 2, 3]").ok(), Some(Bounds::new(2, 1, 2, 3)));
        assert_eq!(parse("[1, 2, 3, 4]").ok(), Some(Bounds::new(4, 1, 2, 3)));
        assert!(parse("[1, 2, 3, 4, 5]").is_err());
    }

    #[test]
    fn numbers_coerce_to_text() {
        let text: EChartsText = serde_json::from_str("2020").expect("number");
        assert_eq!(text.0, "2020");
    }
}
