//! statchart: deterministic statistical chart rendering.
//!
//! A [`ChartOption`] describes one chart (line, bar, horizontal bar, pie,
//! radar, funnel, table or candlestick) plus optional child charts laid over
//! the same canvas. [`render_chart`] turns it into a [`render::Painter`] whose
//! backend serializes to SVG, or to PNG/JPEG with the `cairo-backend` feature.
//! [`api::render_echarts_json`] accepts the same charts as ECharts-style JSON.
//!
//! Candlestick analytics (trend lines and pattern detection) live in
//! [`extensions`] and are usable without rendering anything.

pub mod api;
pub mod charts;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{EChartsOption, render_echarts_json};
pub use charts::{ChartOption, SeriesList, render_chart, render_chart_bytes};
pub use error::{ChartError, ChartResult};
pub use render::{OutputFormat, Painter};
