//! Selection/View Controller
//!
//! Owns the selection state and the chart derived from it. Every event goes
//! through `apply`, which updates the state and rebuilds the affected chart
//! from the static dataset table.

use super::state::{MapClick, SelectionState, ViewEvent};
use crate::chart::{ChartBuilder, ChartSpec, PlotConfig};
use crate::dataset::{DatasetTable, GeoBoundaries, MetricKind};
use serde::Serialize;
use std::sync::Arc;

/// Shown instead of a chart when there is nothing to plot
pub const PLACEHOLDER_MESSAGE: &str = "Select a county";

/// What the renderer should display in a chart slot
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ChartView<'a> {
    Placeholder {
        message: &'static str,
    },
    Plot {
        spec: &'a ChartSpec,
        config: &'a PlotConfig,
    },
}

/// One entry of the metric menu
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MenuItem {
    pub metric: MetricKind,
    pub label: &'static str,
    pub active: bool,
}

/// Everything the page needs to render the current selection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderPayload<'a> {
    pub selection: &'a SelectionState,
    pub county_title: &'a str,
    pub menu: Vec<MenuItem>,
    pub map: ChartView<'a>,
    pub chart: ChartView<'a>,
}

/// Dashboard view controller
#[derive(Debug, Clone)]
pub struct ViewController {
    state: SelectionState,
    table: Arc<DatasetTable>,
    boundaries: GeoBoundaries,
    builder: ChartBuilder,
    plot_config: PlotConfig,
    chart: ChartSpec,
    map_chart: ChartSpec,
}

impl ViewController {
    pub fn new(table: Arc<DatasetTable>, boundaries: GeoBoundaries, state: SelectionState) -> Self {
        let builder = ChartBuilder::new(&boundaries);
        let chart = builder.build(table.lookup(state.county_or_empty(), state.metric));
        let map_chart = builder.build(table.map(&state.map));

        Self {
            state,
            table,
            boundaries,
            builder,
            plot_config: PlotConfig::chart(),
            chart,
            map_chart,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn chart(&self) -> &ChartSpec {
        &self.chart
    }

    pub fn map_chart(&self) -> &ChartSpec {
        &self.map_chart
    }

    /// Apply one event, returning whether the selection changed
    pub fn apply(&mut self, event: ViewEvent) -> bool {
        match event {
            ViewEvent::SelectMetric { metric } => self.select_metric(metric),
            ViewEvent::SelectCounty { county } => self.select_county(county),
            ViewEvent::MapClick { click } => self.map_click(&click),
            ViewEvent::SelectMap { map } => self.select_map(map),
        }
    }

    fn select_metric(&mut self, metric: MetricKind) -> bool {
        if self.state.metric == metric {
            tracing::debug!("Metric {} already selected", metric);
            return false;
        }

        self.state.metric = metric;

        // Nothing to plot until a county is chosen
        if !self.state.has_county() {
            tracing::debug!("Metric set to {} with no county selected", metric);
            return true;
        }

        self.rebuild_chart();
        true
    }

    fn select_county(&mut self, county: String) -> bool {
        if !self.table.has_county(&county) {
            tracing::warn!("No data for county '{}'", county);
        }

        self.state.county = Some(county);
        self.rebuild_chart();
        true
    }

    fn map_click(&mut self, click: &MapClick) -> bool {
        let Some(location) = click.location() else {
            return false;
        };

        match self.resolve_county(location) {
            Some(county) => {
                tracing::debug!("Map click on '{}' drills down to {}", location, county);
                self.select_county(county)
            }
            None => {
                tracing::debug!("Map click on unknown region '{}' ignored", location);
                false
            }
        }
    }

    fn select_map(&mut self, map: String) -> bool {
        if self.state.map == map {
            return false;
        }

        if self.table.map(&map).is_none() {
            tracing::warn!("Summary map '{}' not found", map);
        }

        self.map_chart = self.builder.build(self.table.map(&map));
        self.state.map = map;
        true
    }

    /// County name for a clicked region: a name, or a FIPS code from the boundaries
    fn resolve_county(&self, location: &str) -> Option<String> {
        if self.table.has_county(location) {
            return Some(location.to_string());
        }
        self.boundaries.county_name_by_fips(location)
    }

    fn rebuild_chart(&mut self) {
        let record = self
            .table
            .lookup(self.state.county_or_empty(), self.state.metric);

        self.chart = self.builder.build(record);
        tracing::debug!(
            "Rebuilt chart for {}/{}: {} traces",
            self.state.county_or_empty(),
            self.state.metric,
            self.chart.traces.len()
        );
    }

    /// Title of the county selector
    pub fn county_selector_title(&self) -> &str {
        self.state.county.as_deref().unwrap_or(PLACEHOLDER_MESSAGE)
    }

    /// The eleven metrics with the current one marked active
    pub fn menu(&self) -> Vec<MenuItem> {
        MetricKind::all()
            .iter()
            .map(|&metric| MenuItem {
                metric,
                label: metric.label(),
                active: metric == self.state.metric,
            })
            .collect()
    }

    pub fn chart_view(&self) -> ChartView<'_> {
        self.view_of(&self.chart)
    }

    pub fn map_view(&self) -> ChartView<'_> {
        self.view_of(&self.map_chart)
    }

    fn view_of<'a>(&'a self, spec: &'a ChartSpec) -> ChartView<'a> {
        if spec.is_empty() {
            ChartView::Placeholder {
                message: PLACEHOLDER_MESSAGE,
            }
        } else {
            ChartView::Plot {
                spec,
                config: &self.plot_config,
            }
        }
    }

    pub fn render(&self) -> RenderPayload<'_> {
        RenderPayload {
            selection: &self.state,
            county_title: self.county_selector_title(),
            menu: self.menu(),
            map: self.map_view(),
            chart: self.chart_view(),
        }
    }
}
