//! Chart Spec Builder
//!
//! Maps a dataset record to a chart specification. Dispatch is an exhaustive
//! match on the record's variant; absent and unrecognized records both fall
//! back to the empty spec, which the renderer shows as a placeholder.

use super::spec::{
    Axis, BarMode, ChartSpec, ColorScale, HoverInfo, Layout, Legend, Line, MapCenter, Mapbox,
    Margin, Marker, Mode, Orientation, Trace,
};
use crate::dataset::{
    DailySeries, DatasetRecord, GeoBoundaries, RegionValues, TestingSeries, TotalSeries,
};
use serde_json::Value;
use std::sync::Arc;

const DATE_AXIS_TITLE: &str = "Date";

const TOTAL_TESTS_COLOR: &str = "rgb(206, 162, 219)";
const POSITIVE_TESTS_COLOR: &str = "rgb(0, 182, 199)";
const PERCENT_POSITIVE_COLOR: &str = "rgb(191, 23, 23)";

const SUMMARY_MAP_TITLE: &str = "Daily Confirmed COVID-19 Cases";
const SUMMARY_MAP_STYLE: &str = "carto-positron";
const SUMMARY_MAP_ZOOM: f64 = 5.0;
const SUMMARY_MAP_CENTER: MapCenter = MapCenter {
    lat: 35.51,
    lon: -86.0,
};

/// Builds chart specs from dataset records
///
/// Holds the county boundaries needed by summary map records; everything
/// else is derived from the record alone.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    county_geojson: Arc<Value>,
}

impl ChartBuilder {
    pub fn new(boundaries: &GeoBoundaries) -> Self {
        Self {
            county_geojson: boundaries.county(),
        }
    }

    /// Build the spec for a record, or the empty spec when there is none
    pub fn build(&self, record: Option<&DatasetRecord>) -> ChartSpec {
        let Some(record) = record else {
            tracing::trace!("No record, building empty chart");
            return ChartSpec::empty();
        };

        tracing::trace!("Building {} chart", record.type_tag());

        match record {
            DatasetRecord::Total(series) => total_chart(series),
            DatasetRecord::Daily(series) => daily_chart(series),
            DatasetRecord::Testing(series) => testing_chart(series),
            DatasetRecord::Map(values) => self.summary_map(values),
            DatasetRecord::Unrecognized => ChartSpec::empty(),
        }
    }

    /// County choropleth of a summary map record, keyed by FIPS code
    fn summary_map(&self, values: &RegionValues) -> ChartSpec {
        let trace = Trace::choropleth_mapbox()
            .regions(
                Arc::clone(&self.county_geojson),
                "properties.FIPS",
                values.region_ids.clone(),
                values.values.clone(),
            )
            .colorscale(ColorScale::named("Viridis"));

        let layout = Layout {
            title: Some(SUMMARY_MAP_TITLE.to_string()),
            mapbox: Some(Mapbox {
                style: SUMMARY_MAP_STYLE.to_string(),
                zoom: SUMMARY_MAP_ZOOM,
                center: SUMMARY_MAP_CENTER,
            }),
            ..Default::default()
        };

        ChartSpec::new(vec![trace], layout)
    }
}

/// Title plus date x-axis and titled y-axis
fn time_series_layout(title: &str, y_axis_title: &str) -> Layout {
    Layout {
        title: Some(title.to_string()),
        xaxis: Some(Axis::titled(DATE_AXIS_TITLE)),
        yaxis: Some(Axis::titled(y_axis_title)),
        ..Default::default()
    }
}

fn total_chart(series: &TotalSeries) -> ChartSpec {
    let trace = Trace::scatter()
        .xy(series.x_values.clone(), series.y_values.clone())
        .mode(Mode::LinesMarkers)
        .line(Line::color(&series.line_color));

    ChartSpec::new(
        vec![trace],
        time_series_layout(&series.title, &series.y_axis_title),
    )
}

fn daily_chart(series: &DailySeries) -> ChartSpec {
    let raw = Trace::bar()
        .xy(series.x_values.clone(), series.y_values.clone())
        .mode(Mode::LinesMarkers)
        .marker(Marker::color(&series.bar_color))
        .hoverinfo(HoverInfo::XY);

    let average = Trace::scatter()
        .xy_with_gaps(series.x_values.clone(), series.moving_average.clone())
        .mode(Mode::Lines)
        .fill_to_zero(&series.fill_color)
        .line(Line::color(&series.moving_line_color))
        .hoverinfo(HoverInfo::Skip);

    let layout = Layout {
        showlegend: Some(false),
        ..time_series_layout(&series.title, &series.y_axis_title)
    };

    ChartSpec::new(vec![raw, average], layout)
}

fn testing_chart(series: &TestingSeries) -> ChartSpec {
    let total = Trace::bar()
        .xy(series.x_values.clone(), series.total_tests.clone())
        .name("Total Tests")
        .hoverinfo(HoverInfo::XY)
        .marker(Marker::color(TOTAL_TESTS_COLOR));

    let positive = Trace::bar()
        .xy(series.x_values.clone(), series.positive_tests.clone())
        .name("Positive Tests")
        .hoverinfo(HoverInfo::XY)
        .marker(Marker::color(POSITIVE_TESTS_COLOR));

    let percent = Trace::scatter()
        .xy(series.x_values.clone(), series.percent_positive.clone())
        .mode(Mode::Lines)
        .name("Positive (%)")
        .yaxis("y2")
        .hoverinfo(HoverInfo::XY)
        .line(Line::color(PERCENT_POSITIVE_COLOR));

    let layout = Layout {
        title: Some(series.title.clone()),
        xaxis: Some(Axis::titled(DATE_AXIS_TITLE)),
        yaxis: Some(Axis::titled("Daily Tests")),
        yaxis2: Some(Axis {
            title: Some("Positive (%)".to_string()),
            overlaying: Some("y".to_string()),
            side: Some("right".to_string()),
            rangemode: Some("tozero".to_string()),
            showgrid: Some(false),
        }),
        barmode: Some(BarMode::Overlay),
        legend: Some(Legend {
            y: -0.3,
            orientation: Orientation::Horizontal,
        }),
        margin: Some(Margin {
            r: Some(45.0),
            ..Default::default()
        }),
        ..Default::default()
    };

    ChartSpec::new(vec![total, positive, percent], layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::spec::{Fill, TraceKind};
    use serde_json::json;

    fn builder() -> ChartBuilder {
        let county = json!({"type": "FeatureCollection", "features": []});
        ChartBuilder::new(&GeoBoundaries::new(Value::Null, county))
    }

    fn dates(n: usize) -> Vec<String> {
        (1..=n).map(|d| format!("2020-06-{:02}", d)).collect()
    }

    #[test]
    fn test_total_chart_example() {
        let record: DatasetRecord = serde_json::from_value(json!({
            "type": "total",
            "xValues": ["2020-01-01", "2020-01-02"],
            "yValues": [1, 2],
            "lineColor": "red",
            "title": "T",
            "yAxisTitle": "Y"
        }))
        .unwrap();

        let spec = builder().build(Some(&record));

        assert_eq!(spec.traces.len(), 1);
        let trace = &spec.traces[0];
        assert_eq!(trace.kind, TraceKind::Scatter);
        assert_eq!(trace.mode, Some(Mode::LinesMarkers));
        assert_eq!(
            trace.x.as_deref(),
            Some(&["2020-01-01".to_string(), "2020-01-02".to_string()][..])
        );
        assert_eq!(trace.y.as_deref(), Some(&[Some(1.0), Some(2.0)][..]));
        assert_eq!(spec.layout.title.as_deref(), Some("T"));
        assert_eq!(
            spec.layout.yaxis.as_ref().and_then(|a| a.title.as_deref()),
            Some("Y")
        );
        assert_eq!(
            spec.layout.xaxis.as_ref().and_then(|a| a.title.as_deref()),
            Some("Date")
        );
    }

    #[test]
    fn test_daily_chart() {
        let series = DailySeries {
            x_values: dates(3),
            y_values: vec![4.0, 9.0, 2.0],
            moving_average: vec![Some(4.0), Some(6.5), Some(5.0)],
            bar_color: "blue".into(),
            fill_color: "rgba(0, 0, 255, 0.2)".into(),
            moving_line_color: "navy".into(),
            title: "Daily Cases".into(),
            y_axis_title: "Cases".into(),
        };

        let spec = builder().build(Some(&DatasetRecord::Daily(series.clone())));

        assert_eq!(spec.traces.len(), 2);
        let (raw, average) = (&spec.traces[0], &spec.traces[1]);

        assert_eq!(raw.kind, TraceKind::Bar);
        assert_eq!(raw.y, Some(vec![Some(4.0), Some(9.0), Some(2.0)]));
        assert_eq!(raw.hoverinfo, Some(HoverInfo::XY));

        assert_eq!(average.y.as_ref(), Some(&series.moving_average));
        assert_eq!(average.fill, Some(Fill::ToZeroY));
        assert_eq!(average.fillcolor.as_deref(), Some("rgba(0, 0, 255, 0.2)"));
        assert_eq!(average.hoverinfo, Some(HoverInfo::Skip));

        assert_eq!(spec.layout.showlegend, Some(false));
    }

    #[test]
    fn test_daily_chart_gaps_serialize_as_null() {
        let series = DailySeries {
            x_values: dates(3),
            y_values: vec![4.0, 9.0, 2.0],
            moving_average: vec![None, None, Some(5.0)],
            bar_color: "blue".into(),
            fill_color: "lightblue".into(),
            moving_line_color: "navy".into(),
            title: "Daily Cases".into(),
            y_axis_title: "Cases".into(),
        };

        let spec = builder().build(Some(&DatasetRecord::Daily(series)));
        let value = serde_json::to_value(&spec).unwrap();

        assert_eq!(value["data"][1]["y"], json!([null, null, 5.0]));
        assert_eq!(value["data"][0]["y"], json!([4.0, 9.0, 2.0]));
    }

    #[test]
    fn test_testing_chart() {
        let series = TestingSeries {
            x_values: dates(2),
            total_tests: vec![1000.0, 1200.0],
            positive_tests: vec![50.0, 60.0],
            percent_positive: vec![5.0, 5.0],
            title: "Testing".into(),
        };

        let spec = builder().build(Some(&DatasetRecord::Testing(series)));
        assert_eq!(spec.traces.len(), 3);
        assert_eq!(spec.traces[2].yaxis.as_deref(), Some("y2"));
        assert!(spec.traces[..2].iter().all(|t| t.yaxis.is_none()));

        let layout = serde_json::to_value(&spec.layout).unwrap();
        assert_eq!(layout["barmode"], json!("overlay"));
        assert_eq!(layout["legend"], json!({"y": -0.3, "orientation": "h"}));
        assert_eq!(layout["yaxis2"]["overlaying"], json!("y"));
        assert_eq!(layout["yaxis2"]["side"], json!("right"));
        assert_eq!(layout["yaxis2"]["rangemode"], json!("tozero"));
        assert_eq!(layout["margin"], json!({"r": 45.0}));
    }

    #[test]
    fn test_summary_map() {
        let record = DatasetRecord::Map(RegionValues {
            region_ids: vec!["47037".into(), "47157".into()],
            values: vec![80.0, 120.0],
        });

        let spec = builder().build(Some(&record));
        let value = serde_json::to_value(&spec).unwrap();
        let trace = &value["data"][0];

        assert_eq!(trace["type"], json!("choroplethmapbox"));
        assert_eq!(trace["featureidkey"], json!("properties.FIPS"));
        assert_eq!(trace["colorscale"], json!("Viridis"));
        assert_eq!(trace["locations"], json!(["47037", "47157"]));
        assert_eq!(trace["geojson"]["type"], json!("FeatureCollection"));
        assert_eq!(value["layout"]["title"], json!("Daily Confirmed COVID-19 Cases"));
        assert_eq!(value["layout"]["mapbox"]["style"], json!("carto-positron"));
        assert_eq!(value["layout"]["mapbox"]["zoom"], json!(5.0));
    }

    #[test]
    fn test_missing_and_unrecognized_are_empty() {
        let builder = builder();
        let missing = builder.build(None);
        let unknown = builder.build(Some(&DatasetRecord::Unrecognized));

        assert_eq!(missing, unknown);
        assert_eq!(missing, ChartSpec::empty());
        assert_eq!(
            serde_json::to_value(&unknown).unwrap(),
            json!({"data": [], "layout": {}})
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let record = DatasetRecord::Total(TotalSeries {
            x_values: dates(2),
            y_values: vec![1.0, 3.0],
            line_color: "green".into(),
            title: "Total".into(),
            y_axis_title: "Cases".into(),
        });

        let builder = builder();
        assert_eq!(builder.build(Some(&record)), builder.build(Some(&record)));
    }
}
