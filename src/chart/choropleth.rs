//! Region Choropleth Builder
//!
//! State and county boundary maps shaded by a metric value. The map style
//! descriptor is tagged by `type`: `smap` for the single-region state map,
//! `cmap` for the per-county map.
//!
//! Zoom is a linear function of the viewport width, evaluated once when the
//! builder is mounted. Later viewport changes do not recompute it.

use super::spec::{ChartSpec, ColorScale, Layout, MapCenter, Mapbox, Margin, Marker, Trace};
use crate::dataset::GeoBoundaries;
use serde::{Deserialize, Serialize};

const STATE_LOCATION: &str = "Tennessee";
const FEATURE_ID_KEY: &str = "properties.NAME";
const MAP_STYLE: &str = "light";
const MAP_CENTER: MapCenter = MapCenter {
    lat: 35.8,
    lon: -86.0,
};
const REGION_OPACITY: f64 = 0.75;
const STATE_BASE_COLOR: &str = "rgb(255, 255, 255)";
const COUNTY_STOPS: [f64; 5] = [0.0, 0.01, 0.33, 0.66, 1.0];

/// Linear zoom model: `slope * width + intercept`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ZoomModel {
    pub slope: f64,
    pub intercept: f64,
    /// Zoom used before the viewport width is known
    pub initial: f64,
}

impl ZoomModel {
    pub fn state() -> Self {
        Self {
            slope: 0.001144,
            intercept: 4.42797,
            initial: 6.35,
        }
    }

    pub fn county() -> Self {
        Self {
            slope: 0.0012712,
            intercept: 4.0644,
            initial: 6.2,
        }
    }

    pub fn zoom_for(&self, viewport_width: f64) -> f64 {
        self.slope * viewport_width + self.intercept
    }
}

/// Whole-state map: one region, white to `color`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateMapStyle {
    #[serde(rename = "z", alias = "value")]
    pub value: f64,
    #[serde(rename = "col", alias = "color")]
    pub color: String,
    /// Unit label shown before the value on hover
    #[serde(rename = "hovtext", alias = "unitLabel")]
    pub unit_label: String,
}

/// Per-county map with a five-stop color scale
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(from = "CountyStyleWire")]
pub struct CountyMapStyle {
    pub counties: Vec<String>,
    pub values: Vec<f64>,
    /// Colors at stops 0, 0.01, 0.33, 0.66 and 1.0
    pub colors: [String; 5],
    pub unit_label: String,
}

#[derive(Deserialize)]
struct CountyStyleWire {
    counties: Vec<String>,
    z: Vec<f64>,
    col1: String,
    col2: String,
    col3: String,
    col4: String,
    col5: String,
    hovtext: String,
}

impl From<CountyStyleWire> for CountyMapStyle {
    fn from(wire: CountyStyleWire) -> Self {
        Self {
            counties: wire.counties,
            values: wire.z,
            colors: [wire.col1, wire.col2, wire.col3, wire.col4, wire.col5],
            unit_label: wire.hovtext,
        }
    }
}

/// Map descriptor supplied by the caller
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RegionMapStyle {
    #[serde(rename = "smap")]
    State(StateMapStyle),
    #[serde(rename = "cmap")]
    County(CountyMapStyle),
}

/// Builds state and county choropleths against the loaded boundaries
#[derive(Debug, Clone)]
pub struct RegionMapBuilder {
    boundaries: GeoBoundaries,
    state_model: ZoomModel,
    county_model: ZoomModel,
    state_zoom: f64,
    county_zoom: f64,
    mounted: bool,
}

impl RegionMapBuilder {
    pub fn new(boundaries: GeoBoundaries, state_model: ZoomModel, county_model: ZoomModel) -> Self {
        Self {
            boundaries,
            state_model,
            county_model,
            state_zoom: state_model.initial,
            county_zoom: county_model.initial,
            mounted: false,
        }
    }

    /// Compute zoom levels from the viewport width
    ///
    /// Only the first call has an effect.
    pub fn mount(&mut self, viewport_width: f64) {
        if self.mounted {
            tracing::debug!("Map already mounted, keeping zoom levels");
            return;
        }

        self.state_zoom = self.state_model.zoom_for(viewport_width);
        self.county_zoom = self.county_model.zoom_for(viewport_width);
        self.mounted = true;

        tracing::debug!(
            "Mounted map at width {}: state zoom {:.3}, county zoom {:.3}",
            viewport_width,
            self.state_zoom,
            self.county_zoom
        );
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn state_zoom(&self) -> f64 {
        self.state_zoom
    }

    pub fn county_zoom(&self) -> f64 {
        self.county_zoom
    }

    pub fn build(&self, style: &RegionMapStyle) -> ChartSpec {
        match style {
            RegionMapStyle::State(style) => self.state_map(style),
            RegionMapStyle::County(style) => self.county_map(style),
        }
    }

    fn state_map(&self, style: &StateMapStyle) -> ChartSpec {
        let trace = Trace::choropleth_mapbox()
            .regions(
                self.boundaries.state(),
                FEATURE_ID_KEY,
                vec![STATE_LOCATION.to_string()],
                vec![style.value],
            )
            .colorscale(ColorScale::stops([
                (0.0, STATE_BASE_COLOR),
                (1.0, style.color.as_str()),
            ]))
            .hovertemplate(hover_template(&style.unit_label))
            .marker(Marker::opacity(REGION_OPACITY))
            .showscale(false);

        ChartSpec::new(vec![trace], map_layout(self.state_zoom))
    }

    fn county_map(&self, style: &CountyMapStyle) -> ChartSpec {
        let trace = Trace::choropleth_mapbox()
            .regions(
                self.boundaries.county(),
                FEATURE_ID_KEY,
                style.counties.clone(),
                style.values.clone(),
            )
            .colorscale(ColorScale::stops(
                COUNTY_STOPS.iter().copied().zip(style.colors.iter().cloned()),
            ))
            .z_range(0.0, max_value(&style.values))
            .hovertemplate(hover_template(&style.unit_label))
            .marker(Marker::opacity(REGION_OPACITY));

        ChartSpec::new(vec![trace], map_layout(self.county_zoom))
    }
}

fn hover_template(unit_label: &str) -> String {
    format!("<b>%{{location}}</b><br>{} %{{z}}<extra></extra>", unit_label)
}

fn map_layout(zoom: f64) -> Layout {
    Layout {
        mapbox: Some(Mapbox {
            style: MAP_STYLE.to_string(),
            zoom,
            center: MAP_CENTER,
        }),
        margin: Some(Margin::flush(2.0)),
        autosize: Some(true),
        ..Default::default()
    }
}

/// Largest value, or 0 for an empty slice
fn max_value(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .reduce(f64::max)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> RegionMapBuilder {
        let state = json!({"type": "FeatureCollection", "features": [{"properties": {"NAME": "Tennessee"}}]});
        let county = json!({"type": "FeatureCollection", "features": []});
        RegionMapBuilder::new(
            GeoBoundaries::new(state, county),
            ZoomModel::state(),
            ZoomModel::county(),
        )
    }

    fn county_style(values: Vec<f64>) -> RegionMapStyle {
        let counties: Vec<String> = (0..values.len()).map(|i| format!("County {}", i)).collect();
        serde_json::from_value(json!({
            "type": "cmap",
            "counties": counties,
            "z": values,
            "col1": "rgb(255, 255, 255)",
            "col2": "rgb(255, 230, 230)",
            "col3": "rgb(255, 150, 150)",
            "col4": "rgb(230, 60, 60)",
            "col5": "rgb(150, 0, 0)",
            "hovtext": "Cases:"
        }))
        .unwrap()
    }

    #[test]
    fn test_zoom_before_and_after_mount() {
        let mut builder = builder();
        assert!(!builder.is_mounted());
        assert_eq!(builder.state_zoom(), 6.35);
        assert_eq!(builder.county_zoom(), 6.2);

        builder.mount(1000.0);
        assert!((builder.state_zoom() - 5.57197).abs() < 1e-9);
        assert!((builder.county_zoom() - 5.3356).abs() < 1e-9);

        // Later viewport changes are ignored
        builder.mount(400.0);
        assert!((builder.state_zoom() - 5.57197).abs() < 1e-9);
    }

    #[test]
    fn test_state_map() {
        let style: RegionMapStyle = serde_json::from_value(json!({
            "type": "smap",
            "z": 28000,
            "col": "rgb(200, 0, 0)",
            "hovtext": "Total cases:"
        }))
        .unwrap();

        let spec = builder().build(&style);
        let value = serde_json::to_value(&spec).unwrap();
        let trace = &value["data"][0];

        assert_eq!(trace["locations"], json!(["Tennessee"]));
        assert_eq!(trace["z"], json!([28000.0]));
        assert_eq!(trace["featureidkey"], json!("properties.NAME"));
        assert_eq!(
            trace["colorscale"],
            json!([[0.0, "rgb(255, 255, 255)"], [1.0, "rgb(200, 0, 0)"]])
        );
        assert_eq!(trace["showscale"], json!(false));
        assert_eq!(trace["marker"], json!({"opacity": 0.75}));
        assert_eq!(
            trace["hovertemplate"],
            json!("<b>%{location}</b><br>Total cases: %{z}<extra></extra>")
        );
        assert_eq!(trace["geojson"]["features"][0]["properties"]["NAME"], json!("Tennessee"));

        let layout = &value["layout"];
        assert_eq!(layout["mapbox"]["zoom"], json!(6.35));
        assert_eq!(layout["mapbox"]["center"], json!({"lat": 35.8, "lon": -86.0}));
        assert_eq!(
            layout["margin"],
            json!({"l": 0.0, "r": 0.0, "b": 0.0, "t": 0.0, "pad": 2.0})
        );
        assert_eq!(layout["autosize"], json!(true));
    }

    #[test]
    fn test_county_map_color_domain() {
        let spec = builder().build(&county_style(vec![3.0, 42.0, 17.5]));
        let trace = &spec.traces[0];

        assert_eq!(trace.zmin, Some(0.0));
        assert_eq!(trace.zmax, Some(42.0));
        assert!(trace.showscale.is_none());

        match &trace.colorscale {
            Some(ColorScale::Stops(stops)) => {
                let positions: Vec<f64> = stops.iter().map(|(p, _)| *p).collect();
                assert_eq!(positions, vec![0.0, 0.01, 0.33, 0.66, 1.0]);
                assert_eq!(stops[4].1, "rgb(150, 0, 0)");
            }
            other => panic!("expected explicit stops, got {:?}", other),
        }
    }

    #[test]
    fn test_county_map_uses_county_zoom() {
        let mut builder = builder();
        builder.mount(1280.0);

        let spec = builder.build(&county_style(vec![1.0]));
        let zoom = spec.layout.mapbox.as_ref().map(|m| m.zoom).unwrap();
        assert!((zoom - (0.0012712 * 1280.0 + 4.0644)).abs() < 1e-9);
        assert_eq!(
            spec.traces[0].geojson.as_deref(),
            Some(&json!({"type": "FeatureCollection", "features": []}))
        );
    }

    #[test]
    fn test_empty_county_values() {
        let spec = builder().build(&county_style(vec![]));
        assert_eq!(spec.traces[0].zmax, Some(0.0));
        assert_eq!(max_value(&[]), 0.0);
        assert_eq!(max_value(&[-2.0, -1.0]), -1.0);
    }

    #[test]
    fn test_unknown_style_rejected() {
        let result: Result<RegionMapStyle, _> =
            serde_json::from_value(json!({"type": "zmap", "z": 1}));
        assert!(result.is_err());
    }
}
