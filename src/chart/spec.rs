//! Chart specification types
//!
//! Declarative, Plotly-compatible chart descriptions. A `ChartSpec` is pure
//! output: a list of traces plus a layout, serialized with Plotly's key names
//! so the renderer can consume it unchanged.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Traces and layout for one chart
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChartSpec {
    #[serde(rename = "data")]
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpec {
    /// The placeholder spec: no traces, empty layout
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(traces: Vec<Trace>, layout: Layout) -> Self {
        Self { traces, layout }
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}

/// Plotly trace type
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
    Choroplethmapbox,
}

/// Drawing mode for scatter-like traces
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Mode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Hover behaviour of a trace
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum HoverInfo {
    #[serde(rename = "x+y")]
    XY,
    #[serde(rename = "skip")]
    Skip,
}

/// Area fill under a line
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Fill {
    #[serde(rename = "tozeroy")]
    ToZeroY,
}

/// Either a named Plotly scale or explicit `[position, color]` stops
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ColorScale {
    Named(String),
    Stops(Vec<(f64, String)>),
}

impl ColorScale {
    pub fn named(name: impl Into<String>) -> Self {
        ColorScale::Named(name.into())
    }

    pub fn stops<S: Into<String>>(stops: impl IntoIterator<Item = (f64, S)>) -> Self {
        ColorScale::Stops(stops.into_iter().map(|(pos, c)| (pos, c.into())).collect())
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Marker {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            opacity: None,
        }
    }

    pub fn opacity(opacity: f64) -> Self {
        Self {
            color: None,
            opacity: Some(opacity),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Line {
    pub color: String,
}

impl Line {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

/// One data series
///
/// Only the fields a trace sets are serialized.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<String>>,
    /// Missing points serialize as `null` and leave a gap in the line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<HoverInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    /// Axis reference such as `y2`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<Arc<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featureidkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<ColorScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zmax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
}

impl Trace {
    fn of_kind(kind: TraceKind) -> Self {
        Self {
            kind,
            name: None,
            x: None,
            y: None,
            mode: None,
            marker: None,
            line: None,
            fill: None,
            fillcolor: None,
            hoverinfo: None,
            hovertemplate: None,
            yaxis: None,
            geojson: None,
            locations: None,
            z: None,
            featureidkey: None,
            colorscale: None,
            zmin: None,
            zmax: None,
            showscale: None,
        }
    }

    pub fn scatter() -> Self {
        Self::of_kind(TraceKind::Scatter)
    }

    pub fn bar() -> Self {
        Self::of_kind(TraceKind::Bar)
    }

    pub fn choropleth_mapbox() -> Self {
        Self::of_kind(TraceKind::Choroplethmapbox)
    }

    /// Builder: set x and y values
    pub fn xy(self, x: Vec<String>, y: Vec<f64>) -> Self {
        self.xy_with_gaps(x, y.into_iter().map(Some).collect())
    }

    pub fn xy_with_gaps(mut self, x: Vec<String>, y: Vec<Option<f64>>) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn line(mut self, line: Line) -> Self {
        self.line = Some(line);
        self
    }

    /// Builder: fill down to zero with the given color
    pub fn fill_to_zero(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(Fill::ToZeroY);
        self.fillcolor = Some(color.into());
        self
    }

    pub fn hoverinfo(mut self, hoverinfo: HoverInfo) -> Self {
        self.hoverinfo = Some(hoverinfo);
        self
    }

    pub fn hovertemplate(mut self, template: impl Into<String>) -> Self {
        self.hovertemplate = Some(template.into());
        self
    }

    pub fn yaxis(mut self, axis: impl Into<String>) -> Self {
        self.yaxis = Some(axis.into());
        self
    }

    /// Builder: regions to shade, matched against `featureidkey` in `geojson`
    pub fn regions(
        mut self,
        geojson: Arc<Value>,
        featureidkey: impl Into<String>,
        locations: Vec<String>,
        z: Vec<f64>,
    ) -> Self {
        self.geojson = Some(geojson);
        self.featureidkey = Some(featureidkey.into());
        self.locations = Some(locations);
        self.z = Some(z);
        self
    }

    pub fn colorscale(mut self, scale: ColorScale) -> Self {
        self.colorscale = Some(scale);
        self
    }

    pub fn z_range(mut self, zmin: f64, zmax: f64) -> Self {
        self.zmin = Some(zmin);
        self.zmax = Some(zmax);
        self
    }

    pub fn showscale(mut self, show: bool) -> Self {
        self.showscale = Some(show);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangemode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
}

impl Axis {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BarMode {
    #[serde(rename = "overlay")]
    Overlay,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Orientation {
    #[serde(rename = "h")]
    Horizontal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Legend {
    pub y: f64,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Margin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad: Option<f64>,
}

impl Margin {
    /// Edge-to-edge margins with the given padding
    pub fn flush(pad: f64) -> Self {
        Self {
            l: Some(0.0),
            r: Some(0.0),
            b: Some(0.0),
            t: Some(0.0),
            pad: Some(pad),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Mapbox {
    pub style: String,
    pub zoom: f64,
    pub center: MapCenter,
}

/// Non-data chart configuration
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosize: Option<bool>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        *self == Layout::default()
    }
}

/// Image export options of the renderer's download button
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageExportOptions {
    pub format: String,
    pub filename: String,
    pub height: u32,
    pub width: u32,
    pub scale: f64,
}

/// Renderer options accompanying a chart
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_mode_bar: Option<bool>,
    pub display_logo: bool,
    pub responsive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_image_button_options: Option<ImageExportOptions>,
}

impl PlotConfig {
    /// Time-series charts: no mode bar
    pub fn chart() -> Self {
        Self {
            display_mode_bar: Some(false),
            ..Default::default()
        }
    }

    /// Region maps: mode bar with image export
    pub fn map(export: ImageExportOptions) -> Self {
        Self {
            to_image_button_options: Some(export),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_spec_serialization() {
        let spec = ChartSpec::empty();
        assert!(spec.is_empty());
        assert!(spec.layout.is_empty());
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({"data": [], "layout": {}})
        );
    }

    #[test]
    fn test_trace_skips_unset_fields() {
        let trace = Trace::scatter()
            .xy(vec!["2020-06-01".into()], vec![4.0])
            .mode(Mode::LinesMarkers)
            .line(Line::color("red"));

        assert_eq!(
            serde_json::to_value(&trace).unwrap(),
            json!({
                "type": "scatter",
                "x": ["2020-06-01"],
                "y": [4.0],
                "mode": "lines+markers",
                "line": {"color": "red"}
            })
        );
    }

    #[test]
    fn test_color_scale_forms() {
        assert_eq!(
            serde_json::to_value(ColorScale::named("Viridis")).unwrap(),
            json!("Viridis")
        );
        assert_eq!(
            serde_json::to_value(ColorScale::stops([(0.0, "white"), (1.0, "red")])).unwrap(),
            json!([[0.0, "white"], [1.0, "red"]])
        );
    }

    #[test]
    fn test_plot_config_keys() {
        assert_eq!(
            serde_json::to_value(PlotConfig::chart()).unwrap(),
            json!({"displayModeBar": false, "displayLogo": false, "responsive": false})
        );

        let config = PlotConfig::map(ImageExportOptions {
            format: "png".into(),
            filename: "plot".into(),
            height: 900,
            width: 1500,
            scale: 2.0,
        });
        let value = serde_json::to_value(config).unwrap();
        assert_eq!(value["toImageButtonOptions"]["width"], json!(1500));
        assert!(value.get("displayModeBar").is_none());
    }
}
