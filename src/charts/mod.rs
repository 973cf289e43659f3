//! Chart options and renderers.
//!
//! [`render_chart`] validates a [`ChartOption`], builds the root painter and
//! dispatches on the series list. Axis charts go through
//! [`pipeline::default_render`]; pie, radar, funnel and table charts only
//! reserve the title/legend header.

pub mod axis;
pub mod bar;
pub mod candlestick;
pub mod funnel;
pub mod horizontal_bar;
pub mod legend;
pub mod line;
pub mod marks;
pub mod options;
pub mod pie;
pub mod pipeline;
pub mod radar;
pub mod table;
pub mod title;

pub use options::{
    BarSeries, CandleLabelFormatter, CandleStyle, CandlestickSeries, ChartOption, FieldOverlay,
    FunnelSeries, FunnelSeriesList, GenericSeries, HorizontalBarSeries, LegendOption, LineSeries,
    MarkType, PieSeries, PieSeriesList, RadarIndicator, RadarSeries, RadarSeriesList, SeriesKind,
    SeriesLabel, SeriesList, SeriesMarkLine, SeriesMarkPoint, TableSeries, TitleOption,
    ToGenericSeries, XAxisOption, YAxisOption,
};
pub use pipeline::{RenderResult, default_render};

use tracing::debug;

use crate::error::ChartResult;
use crate::render::{Painter, PainterOption};

/// Renders `option` (and its children) and returns the root painter.
///
/// Call [`Painter::bytes`] on the result to serialize it.
pub fn render_chart(option: &ChartOption) -> ChartResult<Painter> {
    option.validate()?;
    let height = match &option.series {
        SeriesList::Table(table) => table::measure_table_height(option, table)?,
        _ => option.height,
    };
    let painter = Painter::new(option.output_format, option.width, height, option.font.clone())?;
    debug!(
        kind = ?option.series.kind(),
        width = option.width,
        height,
        children = option.children.len(),
        "rendering chart"
    );
    render_into(&painter, option, true)?;
    Ok(painter)
}

/// [`render_chart`] followed by serialization in the option's output format.
pub fn render_chart_bytes(option: &ChartOption) -> ChartResult<Vec<u8>> {
    render_chart(option)?.bytes()
}

fn render_into(parent: &Painter, option: &ChartOption, is_root: bool) -> ChartResult<()> {
    let theme = option.theme();
    let mut settings = vec![PainterOption::Theme(theme.clone())];
    if let Some(font) = &option.font {
        settings.push(PainterOption::Font(font.clone()));
    }
    if let Some(formatter) = &option.value_formatter {
        settings.push(PainterOption::Formatter(formatter.clone()));
    }
    if !is_root {
        settings.push(PainterOption::Box(option.bounds));
    }
    let painter = parent.child(settings);

    if is_root {
        let background = option.background_color.unwrap_or(theme.background);
        painter.set_background(painter.width(), painter.height(), background, false);
    } else if let Some(background) = option.background_color {
        painter.set_background(painter.width(), painter.height(), background, true);
    }

    let content = painter.padded(option.padding);
    match &option.series {
        SeriesList::Line(series) => line::render_line_chart(&content, option, series)?,
        SeriesList::Bar(series) => bar::render_bar_chart(&content, option, series)?,
        SeriesList::HorizontalBar(series) => {
            horizontal_bar::render_horizontal_bar_chart(&content, option, series)?;
        }
        SeriesList::Pie(series) => pie::render_pie_chart(&content, option, series)?,
        SeriesList::Radar(series) => radar::render_radar_chart(&content, option, series)?,
        SeriesList::Funnel(series) => funnel::render_funnel_chart(&content, option, series)?,
        SeriesList::Candlestick(series) => {
            candlestick::render_candlestick_chart(&content, option, series)?;
        }
        SeriesList::Table(table) => {
            table::render_table(&content, option, table)?;
        }
    }

    for child in &option.children {
        render_into(&painter, child, false)?;
    }
    Ok(())
}
