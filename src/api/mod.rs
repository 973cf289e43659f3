//! JSON façade over [`crate::charts`].

pub mod echarts;

pub use echarts::{EChartsOption, render_echarts_json};
