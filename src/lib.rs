//! # tncovid
//!
//! Tennessee COVID-19 dashboard - builds Plotly chart and choropleth
//! specifications from static, precomputed county datasets.
//!
//! ## Features
//!
//! - **Chart specs**: Cumulative, daily (with moving average) and testing charts
//! - **Choropleths**: Summary, state and county maps over GeoJSON boundaries
//! - **View controller**: Metric/county selection with map drill-down
//! - **Static data**: Typed loading and validation of the JSON assets
//!
//! ## Modules
//!
//! - [`dataset`]: Dataset records, lookup table and boundaries
//! - [`chart`]: Chart spec types and builders
//! - [`view`]: Selection state and view controller
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tncovid::config::Config;
//! use tncovid::dataset::{DatasetTable, GeoBoundaries, MetricKind};
//! use tncovid::view::{SelectionState, ViewController, ViewEvent};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!
//!     // Load the static assets
//!     let table = DatasetTable::load(&config.data.counties_path(), &config.data.maps_path())?;
//!     let boundaries = GeoBoundaries::load(
//!         &config.data.state_geojson_path(),
//!         &config.data.county_geojson_path(),
//!     )?;
//!
//!     let mut view = ViewController::new(Arc::new(table), boundaries, SelectionState::default());
//!
//!     // Pick a county, then a metric
//!     view.apply(ViewEvent::SelectCounty { county: "Davidson".into() });
//!     view.apply(ViewEvent::SelectMetric { metric: MetricKind::DailyCases });
//!
//!     println!("{}", serde_json::to_string(view.chart())?);
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod view;

// Re-export top-level types for convenience
pub use chart::{
    ChartBuilder, ChartSpec, Layout, PlotConfig, RegionMapBuilder, RegionMapStyle, Trace,
    ZoomModel,
};

pub use config::{Config, ConfigError, LoggingConfig};

pub use dataset::{
    DatasetError, DatasetRecord, DatasetResult, DatasetTable, GeoBoundaries, MetricKind,
};

pub use view::{ChartView, MapClick, RenderPayload, SelectionState, ViewController, ViewEvent};
