//! Chart Specifications
//!
//! Turns dataset records and map descriptors into renderer-ready specs:
//!
//! - **spec**: Plotly-compatible trace, layout and renderer config types
//! - **builder**: Record → chart dispatch (`total`, `daily`, `testing`, `map`)
//! - **choropleth**: State and county boundary maps with viewport-derived zoom
//!
//! # Architecture
//!
//! ```text
//! DatasetRecord ──► ChartBuilder ──────► ChartSpec { data, layout } ──► renderer
//! RegionMapStyle ─► RegionMapBuilder ──┘
//! ```
//!
//! Building never fails: a missing or unrecognized record yields
//! `ChartSpec::empty()`, which the renderer shows as a placeholder.

pub mod builder;
pub mod choropleth;
pub mod spec;

pub use builder::ChartBuilder;
pub use choropleth::{CountyMapStyle, RegionMapBuilder, RegionMapStyle, StateMapStyle, ZoomModel};
pub use spec::{
    Axis, BarMode, ChartSpec, ColorScale, Fill, HoverInfo, ImageExportOptions, Layout, Legend,
    Line, MapCenter, Mapbox, Margin, Marker, Mode, Orientation, PlotConfig, Trace, TraceKind,
};
