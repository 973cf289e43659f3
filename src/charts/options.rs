use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::candlestick::price_extent;
use crate::core::format::ValueFormatter;
use crate::core::{Bounds, Color, FontStyle, OhlcField, OhlcSample, Offset, Orient, Side, Theme};
use crate::error::{ChartError, ChartResult};
use crate::extensions::indicators::{TrendLine, compute_trend_line};
use crate::extensions::patterns::PatternConfig;
use crate::render::OutputFormat;

pub const DEFAULT_WIDTH: i32 = 600;
pub const DEFAULT_HEIGHT: i32 = 400;
pub const DEFAULT_PADDING: i32 = 20;
pub const DEFAULT_CANDLE_WIDTH_FRACTION: f64 = 0.8;
pub const DEFAULT_WICK_WIDTH: f64 = 1.0;

/// Extremum a mark point or mark line is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Max,
    Min,
    Average,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesMarkPoint {
    #[serde(default)]
    pub data: Vec<MarkType>,
    /// Pin head diameter in pixels (default 30).
    #[serde(default)]
    pub symbol_size: Option<i32>,
}

impl SeriesMarkPoint {
    #[must_use]
    pub fn new(data: impl Into<Vec<MarkType>>) -> Self {
        Self {
            data: data.into(),
            symbol_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesMarkLine {
    #[serde(default)]
    pub data: Vec<MarkType>,
}

impl SeriesMarkLine {
    #[must_use]
    pub fn new(data: impl Into<Vec<MarkType>>) -> Self {
        Self { data: data.into() }
    }
}

/// Value labels drawn next to bars, points and funnel layers.
#[derive(Debug, Clone, Default)]
pub struct SeriesLabel {
    pub show: Option<bool>,
    pub font_style: FontStyle,
    pub formatter: Option<ValueFormatter>,
}

impl SeriesLabel {
    #[must_use]
    pub fn shown() -> Self {
        Self {
            show: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.show.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TitleOption {
    pub show: Option<bool>,
    pub text: String,
    pub subtext: String,
    pub left: Offset,
    pub top: Option<Offset>,
    pub font_style: FontStyle,
    pub subtext_font_style: FontStyle,
}

impl TitleOption {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.show.unwrap_or(true) && !(self.text.is_empty() && self.subtext.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct LegendOption {
    pub show: Option<bool>,
    /// Item names; empty means every series name.
    pub data: Vec<String>,
    /// Side of the label the color chip sits on.
    pub align: crate::core::Align,
    pub orient: Orient,
    pub padding: Bounds,
    pub left: Offset,
    pub top: Offset,
    pub font_style: FontStyle,
}

impl Default for LegendOption {
    fn default() -> Self {
        Self {
            show: None,
            data: Vec::new(),
            align: crate::core::Align::Left,
            orient: Orient::Horizontal,
            padding: Bounds::new(0, 5, 0, 5),
            left: Offset::Center,
            top: Offset::Top,
            font_style: FontStyle::default(),
        }
    }
}

impl LegendOption {
    #[must_use]
    pub fn names(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            data: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct XAxisOption {
    pub show: Option<bool>,
    /// Category labels.
    pub data: Vec<String>,
    pub boundary_gap: Option<bool>,
    pub position: Side,
    pub font_style: FontStyle,
    /// Label rotation in degrees.
    pub label_rotation: f64,
    pub label_offset: i32,
    pub label_count: Option<usize>,
    pub label_skip_count: usize,
    pub tick_length: i32,
    pub label_margin: i32,
    pub stroke_color: Option<Color>,
    pub split_line_show: bool,
    pub title: String,
    /// Value-axis hints (horizontal bar charts).
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: Option<f64>,
    pub formatter: Option<ValueFormatter>,
    /// Lower bound on the axis gutter; honoured by horizontal bar charts only.
    pub minimum_axis_height: Option<i32>,
}

impl Default for XAxisOption {
    fn default() -> Self {
        Self {
            show: None,
            data: Vec::new(),
            boundary_gap: None,
            position: Side::Bottom,
            font_style: FontStyle::default(),
            label_rotation: 0.0,
            label_offset: 0,
            label_count: None,
            label_skip_count: 0,
            tick_length: 5,
            label_margin: 5,
            stroke_color: None,
            split_line_show: false,
            title: String::new(),
            min: None,
            max: None,
            unit: None,
            formatter: None,
            minimum_axis_height: None,
        }
    }
}

impl XAxisOption {
    #[must_use]
    pub fn categories(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            data: labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct YAxisOption {
    pub show: Option<bool>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: Option<f64>,
    pub label_count: Option<usize>,
    pub label_count_adjustment: i32,
    pub range_value_padding_scale: Option<f64>,
    pub formatter: Option<ValueFormatter>,
    /// Left for the first axis, right for the second unless set.
    pub position: Option<Side>,
    pub font_style: FontStyle,
    pub split_line_show: Option<bool>,
    pub spine_line_show: Option<bool>,
    pub label_margin: i32,
    pub title: String,
    /// Category labels (horizontal bar charts).
    pub data: Vec<String>,
    pub label_skip_count: usize,
}

impl Default for YAxisOption {
    fn default() -> Self {
        Self {
            show: None,
            min: None,
            max: None,
            unit: None,
            label_count: None,
            label_count_adjustment: 0,
            range_value_padding_scale: None,
            formatter: None,
            position: None,
            font_style: FontStyle::default(),
            split_line_show: None,
            spine_line_show: None,
            label_margin: 5,
            title: String::new(),
            data: Vec::new(),
            label_skip_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub y_axis_index: usize,
    pub color: Option<Color>,
    pub stroke_width: Option<f64>,
    /// Curve tension in `[0, 1]`; `None` draws straight segments.
    pub smooth: Option<f64>,
    pub fill_area: bool,
    /// Area alpha relative to the series color (`0..=255`, default 200).
    pub fill_opacity: Option<u8>,
    pub symbol_show: Option<bool>,
    pub label: SeriesLabel,
    pub mark_point: SeriesMarkPoint,
    pub mark_line: SeriesMarkLine,
}

impl LineSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub y_axis_index: usize,
    pub color: Option<Color>,
    pub bar_width: Option<i32>,
    pub round_radius: i32,
    pub label: SeriesLabel,
    pub mark_point: SeriesMarkPoint,
    pub mark_line: SeriesMarkLine,
}

impl BarSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HorizontalBarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub color: Option<Color>,
    pub bar_height: Option<i32>,
    pub round_radius: i32,
    pub label: SeriesLabel,
}

impl HorizontalBarSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
            ..Self::default()
        }
    }
}

/// One pie slice.
#[derive(Debug, Clone, Default)]
pub struct PieSeries {
    pub name: String,
    pub value: f64,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Default)]
pub struct PieSeriesList {
    pub series: Vec<PieSeries>,
    /// Outer radius; percentages are of `min(width, height)`. Default 40%.
    pub radius: Option<Offset>,
    /// Ring hole radius; `None` draws a full pie.
    pub inner_radius: Option<Offset>,
    pub label: SeriesLabel,
}

impl PieSeriesList {
    #[must_use]
    pub fn new(slices: impl IntoIterator<Item = (impl Into<String>, f64)>) -> Self {
        Self {
            series: slices
                .into_iter()
                .map(|(name, value)| PieSeries {
                    name: name.into(),
                    value,
                    color: None,
                })
                .collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RadarIndicator {
    pub name: String,
    pub max: f64,
    #[serde(default)]
    pub min: f64,
}

impl RadarIndicator {
    #[must_use]
    pub fn new(name: impl Into<String>, max: f64) -> Self {
        Self {
            name: name.into(),
            max,
            min: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RadarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Default)]
pub struct RadarSeriesList {
    pub indicators: Vec<RadarIndicator>,
    pub series: Vec<RadarSeries>,
}

#[derive(Debug, Clone, Default)]
pub struct FunnelSeries {
    pub name: String,
    pub value: f64,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Default)]
pub struct FunnelSeriesList {
    pub series: Vec<FunnelSeries>,
    pub label: SeriesLabel,
}

impl FunnelSeriesList {
    #[must_use]
    pub fn new(layers: impl IntoIterator<Item = (impl Into<String>, f64)>) -> Self {
        Self {
            series: layers
                .into_iter()
                .map(|(name, value)| FunnelSeries {
                    name: name.into(),
                    value,
                    color: None,
                })
                .collect(),
            label: SeriesLabel::shown(),
        }
    }
}

/// Grid of text cells.
#[derive(Debug, Clone)]
pub struct TableSeries {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Relative column widths; empty means equal columns.
    pub spans: Vec<usize>,
    pub header_background: Option<Color>,
    /// Alternating row backgrounds.
    pub row_backgrounds: Vec<Color>,
    pub header_font_style: FontStyle,
    pub font_style: FontStyle,
    pub cell_padding: Bounds,
    pub text_aligns: Vec<crate::core::Align>,
}

impl Default for TableSeries {
    fn default() -> Self {
        Self {
            header: Vec::new(),
            rows: Vec::new(),
            spans: Vec::new(),
            header_background: None,
            row_backgrounds: Vec::new(),
            header_font_style: FontStyle::default(),
            font_style: FontStyle::default(),
            cell_padding: Bounds::new(10, 8, 10, 8),
            text_aligns: Vec::new(),
        }
    }
}

impl TableSeries {
    #[must_use]
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            header,
            rows,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }
}

/// How candle bodies are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleStyle {
    /// Bodies filled with the up or down color.
    #[default]
    Filled,
    /// Bullish bodies outlined, bearish bodies filled.
    Traditional,
    /// No body; open tick on the left and close tick on the right.
    Ohlc,
}

/// Trend lines and marks computed over one price field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldOverlay {
    #[serde(default)]
    pub field: OhlcField,
    #[serde(default)]
    pub trend_lines: Vec<TrendLine>,
    #[serde(default)]
    pub mark_point: SeriesMarkPoint,
    #[serde(default)]
    pub mark_line: SeriesMarkLine,
}

type CandleLabelFn = dyn Fn(usize, &OhlcSample) -> Option<String> + Send + Sync;

/// User label callback for individual candles.
#[derive(Clone)]
pub struct CandleLabelFormatter(Arc<CandleLabelFn>);

impl CandleLabelFormatter {
    pub fn new<F>(formatter: F) -> Self
    where
        F: Fn(usize, &OhlcSample) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(formatter))
    }

    #[must_use]
    pub fn label(&self, index: usize, sample: &OhlcSample) -> Option<String> {
        (self.0)(index, sample)
    }
}

impl fmt::Debug for CandleLabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CandleLabelFormatter(..)")
    }
}

#[derive(Debug, Clone)]
pub struct CandlestickSeries {
    pub name: String,
    pub data: Vec<OhlcSample>,
    pub y_axis_index: usize,
    pub up_color: Option<Color>,
    pub down_color: Option<Color>,
    pub show_wick: Option<bool>,
    pub candle_style: CandleStyle,
    /// Fraction of the per-sample width used by candles.
    pub candle_width: Option<f64>,
    pub wick_width: Option<f64>,
    /// Inter-candle margin as a fraction of the section width (multi-series).
    pub candle_margin: Option<f64>,
    pub overlays: Vec<FieldOverlay>,
    pub pattern_config: Option<PatternConfig>,
    pub label_formatter: Option<CandleLabelFormatter>,
}

impl Default for CandlestickSeries {
    fn default() -> Self {
        Self {
            name: String::new(),
            data: Vec::new(),
            y_axis_index: 0,
            up_color: None,
            down_color: None,
            show_wick: None,
            candle_style: CandleStyle::Filled,
            candle_width: None,
            wick_width: None,
            candle_margin: None,
            overlays: Vec::new(),
            pattern_config: None,
            label_formatter: None,
        }
    }
}

impl CandlestickSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<OhlcSample>) -> Self {
        Self {
            name: name.into(),
            data,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_trend_line(mut self, trend_line: TrendLine) -> Self {
        self.overlay_mut(OhlcField::Close)
            .trend_lines
            .push(trend_line);
        self
    }

    /// Overlay for `field`, created on first use.
    pub fn overlay_mut(&mut self, field: OhlcField) -> &mut FieldOverlay {
        let position = match self.overlays.iter().position(|o| o.field == field) {
            Some(position) => position,
            None => {
                self.overlays.push(FieldOverlay {
                    field,
                    ..FieldOverlay::default()
                });
                self.overlays.len() - 1
            }
        };
        &mut self.overlays[position]
    }

    #[must_use]
    pub fn shows_wick(&self) -> bool {
        self.show_wick.unwrap_or(true)
    }
}

/// Typed series list; one variant per chart type.
#[derive(Debug, Clone)]
pub enum SeriesList {
    Line(Vec<LineSeries>),
    Bar(Vec<BarSeries>),
    HorizontalBar(Vec<HorizontalBarSeries>),
    Pie(PieSeriesList),
    Radar(RadarSeriesList),
    Funnel(FunnelSeriesList),
    Candlestick(Vec<CandlestickSeries>),
    Table(TableSeries),
}

impl Default for SeriesList {
    fn default() -> Self {
        Self::Line(Vec::new())
    }
}

impl SeriesList {
    /// Line series named `series N` from raw values.
    #[must_use]
    pub fn line(values: Vec<Vec<Option<f64>>>) -> Self {
        Self::Line(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| LineSeries::new(format!("series {}", i + 1), v))
                .collect(),
        )
    }

    #[must_use]
    pub fn bar(values: Vec<Vec<Option<f64>>>) -> Self {
        Self::Bar(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| BarSeries::new(format!("series {}", i + 1), v))
                .collect(),
        )
    }

    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        match self {
            Self::Line(_) => SeriesKind::Line,
            Self::Bar(_) => SeriesKind::Bar,
            Self::HorizontalBar(_) => SeriesKind::HorizontalBar,
            Self::Pie(_) => SeriesKind::Pie,
            Self::Radar(_) => SeriesKind::Radar,
            Self::Funnel(_) => SeriesKind::Funnel,
            Self::Candlestick(_) => SeriesKind::Candlestick,
            Self::Table(_) => SeriesKind::Table,
        }
    }

    /// Number of entries in the list (series, slices, layers or table rows).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Line(list) => list.len(),
            Self::Bar(list) => list.len(),
            Self::HorizontalBar(list) => list.len(),
            Self::Pie(list) => list.series.len(),
            Self::Radar(list) => list.series.len(),
            Self::Funnel(list) => list.series.len(),
            Self::Candlestick(list) => list.len(),
            Self::Table(table) => table.rows.len() + usize::from(!table.header.is_empty()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the chart uses the cartesian (axes) render pipeline.
    #[must_use]
    pub fn uses_axes(&self) -> bool {
        matches!(
            self,
            Self::Line(_) | Self::Bar(_) | Self::HorizontalBar(_) | Self::Candlestick(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Line,
    Bar,
    HorizontalBar,
    Pie,
    Radar,
    Funnel,
    Candlestick,
    Table,
}

/// Uniform, axis-index-aware view used by shared renderers.
#[derive(Debug, Clone)]
pub struct GenericSeries {
    pub kind: SeriesKind,
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub y_axis_index: usize,
    pub color: Option<Color>,
    pub label: SeriesLabel,
    pub mark_point: SeriesMarkPoint,
    pub mark_line: SeriesMarkLine,
    /// Extra `(min, max)` the value axis must cover beyond `values`.
    pub extent: Option<(f64, f64)>,
}

impl GenericSeries {
    fn new(kind: SeriesKind, name: &str, values: Vec<Option<f64>>) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            values,
            y_axis_index: 0,
            color: None,
            label: SeriesLabel::default(),
            mark_point: SeriesMarkPoint::default(),
            mark_line: SeriesMarkLine::default(),
            extent: None,
        }
    }

    /// Every finite value the value axis has to include.
    pub fn range_values(&self) -> impl Iterator<Item = f64> + '_ {
        let extent = self
            .extent
            .into_iter()
            .flat_map(|(min, max)| [min, max]);
        self.values
            .iter()
            .flatten()
            .copied()
            .chain(extent)
            .filter(|v| v.is_finite())
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.values.iter().flatten().any(|v| v.is_finite())
    }
}

/// Conversion of a typed series list into the generic view.
pub trait ToGenericSeries {
    fn to_generic_series(&self) -> Vec<GenericSeries>;
}

impl ToGenericSeries for [LineSeries] {
    fn to_generic_series(&self) -> Vec<GenericSeries> {
        self.iter()
            .map(|s| GenericSeries {
                y_axis_index: s.y_axis_index,
                color: s.color,
                label: s.label.clone(),
                mark_point: s.mark_point.clone(),
                mark_line: s.mark_line.clone(),
                ..GenericSeries::new(SeriesKind::Line, &s.name, s.values.clone())
            })
            .collect()
    }
}

impl ToGenericSeries for [BarSeries] {
    fn to_generic_series(&self) -> Vec<GenericSeries> {
        self.iter()
            .map(|s| GenericSeries {
                y_axis_index: s.y_axis_index,
                color: s.color,
                label: s.label.clone(),
                mark_point: s.mark_point.clone(),
                mark_line: s.mark_line.clone(),
                // Bars grow from zero.
                extent: Some((0.0, 0.0)),
                ..GenericSeries::new(SeriesKind::Bar, &s.name, s.values.clone())
            })
            .collect()
    }
}

impl ToGenericSeries for [HorizontalBarSeries] {
    fn to_generic_series(&self) -> Vec<GenericSeries> {
        self.iter()
            .map(|s| GenericSeries {
                color: s.color,
                label: s.label.clone(),
                extent: Some((0.0, 0.0)),
                ..GenericSeries::new(SeriesKind::HorizontalBar, &s.name, s.values.clone())
            })
            .collect()
    }
}

impl ToGenericSeries for PieSeriesList {
    fn to_generic_series(&self) -> Vec<GenericSeries> {
        self.series
            .iter()
            .map(|s| GenericSeries {
                color: s.color,
                label: self.label.clone(),
                ..GenericSeries::new(SeriesKind::Pie, &s.name, vec![Some(s.value)])
            })
            .collect()
    }
}

impl ToGenericSeries for RadarSeriesList {
    fn to_generic_series(&self) -> Vec<GenericSeries> {
        self.series
            .iter()
            .map(|s| GenericSeries {
                color: s.color,
                ..GenericSeries::new(SeriesKind::Radar, &s.name, s.values.clone())
            })
            .collect()
    }
}

impl ToGenericSeries for FunnelSeriesList {
    fn to_generic_series(&self) -> Vec<GenericSeries> {
        self.series
            .iter()
            .map(|s| GenericSeries {
                color: s.color,
                label: self.label.clone(),
                ..GenericSeries::new(SeriesKind::Funnel, &s.name, vec![Some(s.value)])
            })
            .collect()
    }
}

impl ToGenericSeries for [CandlestickSeries] {
    fn to_generic_series(&self) -> Vec<GenericSeries> {
        self.iter()
            .map(|s| {
                let closes = s
                    .data
                    .iter()
                    .map(|sample| sample.candle().map(|c| c.close))
                    .collect();
                GenericSeries {
                    y_axis_index: s.y_axis_index,
                    color: s.up_color,
                    extent: candlestick_extent(s),
                    ..GenericSeries::new(SeriesKind::Candlestick, &s.name, closes)
                }
            })
            .collect()
    }
}

/// Price extent of a candlestick series widened by its trend lines.
fn candlestick_extent(series: &CandlestickSeries) -> Option<(f64, f64)> {
    let mut extent = price_extent(&series.data);
    for overlay in &series.overlays {
        let values: Vec<Option<f64>> = series
            .data
            .iter()
            .map(|sample| sample.candle().map(|c| c.field(overlay.field)))
            .collect();
        for trend_line in &overlay.trend_lines {
            for value in compute_trend_line(&values, trend_line).into_iter().flatten() {
                extent = Some(match extent {
                    None => (value, value),
                    Some((min, max)) => (min.min(value), max.max(value)),
                });
            }
        }
    }
    extent
}

impl ToGenericSeries for SeriesList {
    fn to_generic_series(&self) -> Vec<GenericSeries> {
        match self {
            Self::Line(list) => list.to_generic_series(),
            Self::Bar(list) => list.to_generic_series(),
            Self::HorizontalBar(list) => list.to_generic_series(),
            Self::Pie(list) => list.to_generic_series(),
            Self::Radar(list) => list.to_generic_series(),
            Self::Funnel(list) => list.to_generic_series(),
            Self::Candlestick(list) => list.to_generic_series(),
            Self::Table(_) => Vec::new(),
        }
    }
}

/// Complete description of one chart.
#[derive(Debug, Clone)]
pub struct ChartOption {
    pub output_format: OutputFormat,
    pub font: Option<String>,
    pub theme: Option<Arc<Theme>>,
    pub title: TitleOption,
    pub legend: LegendOption,
    pub x_axis: XAxisOption,
    pub y_axis: Vec<YAxisOption>,
    pub series: SeriesList,
    pub padding: Bounds,
    pub width: i32,
    pub height: i32,
    pub background_color: Option<Color>,
    /// Placement when rendered as a child; zero means the whole parent canvas.
    pub bounds: Bounds,
    pub children: Vec<ChartOption>,
    pub value_formatter: Option<ValueFormatter>,
}

impl Default for ChartOption {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Svg,
            font: None,
            theme: None,
            title: TitleOption::default(),
            legend: LegendOption::default(),
            x_axis: XAxisOption::default(),
            y_axis: Vec::new(),
            series: SeriesList::default(),
            padding: Bounds::uniform(DEFAULT_PADDING),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background_color: None,
            bounds: Bounds::default(),
            children: Vec::new(),
            value_formatter: None,
        }
    }
}

impl ChartOption {
    #[must_use]
    pub fn new(series: SeriesList) -> Self {
        Self {
            series,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Uses the registered theme `name`.
    #[must_use]
    pub fn with_theme(mut self, name: &str) -> Self {
        self.theme = Some(Theme::get(name));
        self
    }

    #[must_use]
    pub fn with_x_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.x_axis.data = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        self.title.text = text.into();
        self
    }

    /// Effective theme.
    #[must_use]
    pub fn theme(&self) -> Arc<Theme> {
        self.theme.clone().unwrap_or_else(Theme::light)
    }

    /// Effective y-axis options, padded to the number of axes the series reference.
    #[must_use]
    pub fn resolved_y_axes(&self) -> Vec<YAxisOption> {
        let needed = self
            .series
            .to_generic_series()
            .iter()
            .map(|s| s.y_axis_index + 1)
            .max()
            .unwrap_or(1)
            .max(self.y_axis.len())
            .max(1);
        let mut axes = self.y_axis.clone();
        axes.resize_with(needed, YAxisOption::default);
        for (index, axis) in axes.iter_mut().enumerate() {
            if axis.position.is_none() {
                axis.position = Some(if index == 0 { Side::Left } else { Side::Right });
            }
        }
        axes
    }

    /// Checks the options before any drawing happens.
    pub fn validate(&self) -> ChartResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ChartError::InvalidViewport {
                width: self.width.max(0) as u32,
                height: self.height.max(0) as u32,
            });
        }
        if self.series.is_empty() {
            return Err(ChartError::options("series list is empty"));
        }
        match &self.series {
            SeriesList::Table(table) => {
                if table.column_count() == 0 {
                    return Err(ChartError::options("table has no columns"));
                }
            }
            SeriesList::Radar(radar) => {
                if radar.indicators.len() < 3 {
                    return Err(ChartError::options(format!(
                        "radar needs at least 3 indicators, got {}",
                        radar.indicators.len()
                    )));
                }
                if let Some(bad) = radar.indicators.iter().find(|i| !(i.max > i.min)) {
                    return Err(ChartError::options(format!(
                        "invalid radar indicator `{}`: max must exceed min",
                        bad.name
                    )));
                }
            }
            _ => {}
        }

        let generic = self.series.to_generic_series();
        if let Some(series) = generic.iter().find(|s| s.y_axis_index > 1) {
            return Err(ChartError::options(format!(
                "invalid y-axis index: {}",
                series.y_axis_index
            )));
        }
        if self.y_axis.len() > 2 {
            return Err(ChartError::options(format!(
                "at most 2 y-axes are supported, got {}",
                self.y_axis.len()
            )));
        }
        if !generic.is_empty() && !generic.iter().any(GenericSeries::has_data) {
            return Err(ChartError::options("no data in any series"));
        }

        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }
}
