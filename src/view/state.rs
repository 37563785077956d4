//! Selection state and events
//!
//! The view state is an explicit value updated only by `ViewEvent`s.

use crate::dataset::MetricKind;
use serde::{Deserialize, Serialize};

/// Summary map shown when the dashboard opens
pub const DEFAULT_MAP: &str = "daily_cases_map";

/// Current user selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    /// Metric chosen from the menu
    pub metric: MetricKind,
    /// Selected county, `None` until the user picks one
    pub county: Option<String>,
    /// Key of the summary map
    pub map: String,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(MetricKind::default(), DEFAULT_MAP)
    }
}

impl SelectionState {
    pub fn new(metric: MetricKind, map: impl Into<String>) -> Self {
        Self {
            metric,
            county: None,
            map: map.into(),
        }
    }

    /// Selected county, or `""` when none is selected
    pub fn county_or_empty(&self) -> &str {
        self.county.as_deref().unwrap_or("")
    }

    pub fn has_county(&self) -> bool {
        self.county.is_some()
    }
}

/// A point the user clicked on a map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClickPoint {
    /// Region identifier: county name or FIPS code
    pub location: String,
    #[serde(default)]
    pub z: Option<f64>,
}

/// Click payload as emitted by the renderer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MapClick {
    #[serde(default)]
    pub points: Vec<ClickPoint>,
}

impl MapClick {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            points: vec![ClickPoint {
                location: location.into(),
                z: None,
            }],
        }
    }

    /// Location of the first clicked point
    pub fn location(&self) -> Option<&str> {
        self.points.first().map(|p| p.location.as_str())
    }
}

/// Discrete user input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewEvent {
    /// Metric chosen from the menu
    SelectMetric { metric: MetricKind },
    /// County chosen from the county list
    SelectCounty { county: String },
    /// Click on a map, drilling down to the clicked county
    MapClick { click: MapClick },
    /// Summary map switched
    SelectMap { map: String },
}
