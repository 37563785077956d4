//! Core data types for the dashboard datasets
//!
//! This module defines the records stored in the static JSON assets:
//! - `MetricKind`: The eleven selectable statistics
//! - `DatasetRecord`: A chartable record, tagged by its `type` field
//! - `TotalSeries`, `DailySeries`, `TestingSeries`, `RegionValues`: Record payloads
//!
//! Field names follow the asset files (`xval`, `yval`, `gtitle`, ...); the
//! descriptive camelCase names are accepted as aliases.

use super::error::{DatasetError, DatasetResult};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// One of the statistics selectable from the dashboard menu
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    TotalCases,
    DailyCases,
    TotalDeaths,
    DailyDeaths,
    Testing,
    ActiveCases,
    DailyActive,
    TotalRecoveries,
    DailyRecoveries,
    TotalHospitalized,
    DailyHospitalized,
}

impl MetricKind {
    /// All metrics in menu order
    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::TotalCases,
            MetricKind::DailyCases,
            MetricKind::TotalDeaths,
            MetricKind::DailyDeaths,
            MetricKind::Testing,
            MetricKind::ActiveCases,
            MetricKind::DailyActive,
            MetricKind::TotalRecoveries,
            MetricKind::DailyRecoveries,
            MetricKind::TotalHospitalized,
            MetricKind::DailyHospitalized,
        ]
    }

    /// Key used in the asset files
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::TotalCases => "total_cases",
            MetricKind::DailyCases => "daily_cases",
            MetricKind::TotalDeaths => "total_deaths",
            MetricKind::DailyDeaths => "daily_deaths",
            MetricKind::Testing => "testing",
            MetricKind::ActiveCases => "active_cases",
            MetricKind::DailyActive => "daily_active",
            MetricKind::TotalRecoveries => "total_recoveries",
            MetricKind::DailyRecoveries => "daily_recoveries",
            MetricKind::TotalHospitalized => "total_hospitalized",
            MetricKind::DailyHospitalized => "daily_hospitalized",
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::TotalCases => "Total Cases",
            MetricKind::DailyCases => "Daily Cases",
            MetricKind::TotalDeaths => "Total Deaths",
            MetricKind::DailyDeaths => "Daily Deaths",
            MetricKind::Testing => "Testing Data",
            MetricKind::ActiveCases => "Active Cases",
            MetricKind::DailyActive => "Daily Active Cases",
            MetricKind::TotalRecoveries => "Total Recoveries",
            MetricKind::DailyRecoveries => "Daily Recoveries",
            MetricKind::TotalHospitalized => "Total Hospitalized",
            MetricKind::DailyHospitalized => "Daily Hospitalized",
        }
    }
}

impl Default for MetricKind {
    fn default() -> Self {
        MetricKind::TotalCases
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MetricKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        MetricKind::all()
            .iter()
            .copied()
            .find(|m| m.key() == key)
            .ok_or_else(|| DatasetError::UnknownMetric(key.to_string()))
    }
}

/// A chartable record from the asset files
///
/// Unknown `type` tags deserialize to `Unrecognized` so a single odd record
/// does not fail the whole file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatasetRecord {
    /// Cumulative series drawn as a line
    Total(TotalSeries),
    /// Daily counts with a moving average overlay
    Daily(DailySeries),
    /// Total/positive tests with percent positive
    Testing(TestingSeries),
    /// Per-county values for the summary choropleth
    Map(RegionValues),
    #[serde(other)]
    Unrecognized,
}

/// Cumulative time series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TotalSeries {
    #[serde(rename = "xval", alias = "xValues")]
    pub x_values: Vec<String>,
    #[serde(rename = "yval", alias = "yValues")]
    pub y_values: Vec<f64>,
    #[serde(rename = "linecolor", alias = "lineColor")]
    pub line_color: String,
    #[serde(rename = "gtitle", alias = "title")]
    pub title: String,
    #[serde(rename = "ytitle", alias = "yAxisTitle")]
    pub y_axis_title: String,
}

/// Daily time series with a moving average
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySeries {
    #[serde(rename = "xval", alias = "xValues")]
    pub x_values: Vec<String>,
    #[serde(rename = "yval", alias = "yValues")]
    pub y_values: Vec<f64>,
    /// `null` where the averaging window is not yet full
    #[serde(rename = "movingAverage")]
    pub moving_average: Vec<Option<f64>>,
    #[serde(rename = "barcolor", alias = "barColor")]
    pub bar_color: String,
    #[serde(rename = "fillcolor", alias = "fillColor")]
    pub fill_color: String,
    #[serde(rename = "movingLineColor")]
    pub moving_line_color: String,
    #[serde(rename = "gtitle", alias = "title")]
    pub title: String,
    #[serde(rename = "ytitle", alias = "yAxisTitle")]
    pub y_axis_title: String,
}

/// Testing volume and positivity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestingSeries {
    #[serde(rename = "xval", alias = "xValues")]
    pub x_values: Vec<String>,
    #[serde(rename = "totalTestVal", alias = "totalTests")]
    pub total_tests: Vec<f64>,
    #[serde(rename = "positiveVals", alias = "positiveTests")]
    pub positive_tests: Vec<f64>,
    /// Percent of tests that were positive, 0-100
    #[serde(rename = "percentPositive")]
    pub percent_positive: Vec<f64>,
    #[serde(rename = "gtitle", alias = "title")]
    pub title: String,
}

/// Values keyed by region identifier (county FIPS code)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionValues {
    #[serde(
        rename = "fips",
        alias = "regionIds",
        deserialize_with = "deserialize_region_ids"
    )]
    pub region_ids: Vec<String>,
    #[serde(rename = "z", alias = "values")]
    pub values: Vec<f64>,
}

/// Region ids appear as strings or bare integers depending on the export
fn deserialize_region_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    let raw = Vec::<RawId>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|id| match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        })
        .collect())
}

/// Tabular view of a record, used for CSV export
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl DatasetRecord {
    /// The record's `type` tag
    pub fn type_tag(&self) -> &'static str {
        match self {
            DatasetRecord::Total(_) => "total",
            DatasetRecord::Daily(_) => "daily",
            DatasetRecord::Testing(_) => "testing",
            DatasetRecord::Map(_) => "map",
            DatasetRecord::Unrecognized => "unrecognized",
        }
    }

    /// Check that all parallel sequences have equal length
    pub fn validate(&self) -> DatasetResult<()> {
        match self {
            DatasetRecord::Total(s) => check_len("yval", s.x_values.len(), s.y_values.len()),
            DatasetRecord::Daily(s) => {
                check_len("yval", s.x_values.len(), s.y_values.len())?;
                check_len("movingAverage", s.x_values.len(), s.moving_average.len())
            }
            DatasetRecord::Testing(s) => {
                check_len("totalTestVal", s.x_values.len(), s.total_tests.len())?;
                check_len("positiveVals", s.x_values.len(), s.positive_tests.len())?;
                check_len("percentPositive", s.x_values.len(), s.percent_positive.len())
            }
            DatasetRecord::Map(m) => check_len("z", m.region_ids.len(), m.values.len()),
            DatasetRecord::Unrecognized => Ok(()),
        }
    }

    /// Date labels of time-series records
    pub fn x_values(&self) -> Option<&[String]> {
        match self {
            DatasetRecord::Total(s) => Some(&s.x_values),
            DatasetRecord::Daily(s) => Some(&s.x_values),
            DatasetRecord::Testing(s) => Some(&s.x_values),
            DatasetRecord::Map(_) | DatasetRecord::Unrecognized => None,
        }
    }

    /// First and last date covered, if the labels parse as dates
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let labels = self.x_values()?;
        let first = parse_date_label(labels.first()?)?;
        let last = parse_date_label(labels.last()?)?;
        Some((first, last))
    }

    /// Flatten the record into columns for export
    pub fn to_table(&self) -> SeriesTable {
        match self {
            DatasetRecord::Total(s) => SeriesTable {
                headers: vec!["date", "value"],
                rows: s
                    .x_values
                    .iter()
                    .zip(&s.y_values)
                    .map(|(x, y)| vec![x.clone(), y.to_string()])
                    .collect(),
            },
            DatasetRecord::Daily(s) => SeriesTable {
                headers: vec!["date", "value", "moving_average"],
                rows: s
                    .x_values
                    .iter()
                    .zip(&s.y_values)
                    .zip(&s.moving_average)
                    .map(|((x, y), avg)| {
                        let avg = avg.map(|v| v.to_string()).unwrap_or_default();
                        vec![x.clone(), y.to_string(), avg]
                    })
                    .collect(),
            },
            DatasetRecord::Testing(s) => SeriesTable {
                headers: vec!["date", "total_tests", "positive_tests", "percent_positive"],
                rows: s
                    .x_values
                    .iter()
                    .zip(&s.total_tests)
                    .zip(&s.positive_tests)
                    .zip(&s.percent_positive)
                    .map(|(((x, total), positive), pct)| {
                        vec![
                            x.clone(),
                            total.to_string(),
                            positive.to_string(),
                            pct.to_string(),
                        ]
                    })
                    .collect(),
            },
            DatasetRecord::Map(m) => SeriesTable {
                headers: vec!["region", "value"],
                rows: m
                    .region_ids
                    .iter()
                    .zip(&m.values)
                    .map(|(id, v)| vec![id.clone(), v.to_string()])
                    .collect(),
            },
            DatasetRecord::Unrecognized => SeriesTable {
                headers: Vec::new(),
                rows: Vec::new(),
            },
        }
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> DatasetResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(DatasetError::LengthMismatch {
            field,
            expected,
            actual,
        })
    }
}

/// Parse a date label as exported by the health department feed
pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m/%d/%y"];

    let label = label.trim();
    // Timestamps like "2020-06-10T00:00:00" carry the date in the first 10 chars
    let date_part = label.get(..10).filter(|_| label.contains('T')).unwrap_or(label);

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_kind_round_trip_keys() {
        assert_eq!(MetricKind::all().len(), 11);
        for metric in MetricKind::all() {
            assert_eq!(metric.key().parse::<MetricKind>().unwrap(), *metric);
        }
        assert!(matches!(
            "weekly_cases".parse::<MetricKind>(),
            Err(DatasetError::UnknownMetric(_))
        ));
        assert_eq!(MetricKind::default(), MetricKind::TotalCases);
        assert_eq!(MetricKind::Testing.label(), "Testing Data");
    }

    #[test]
    fn test_deserialize_asset_field_names() {
        let json = r#"{
            "type": "daily",
            "xval": ["2020-06-01", "2020-06-02"],
            "yval": [3, 5],
            "movingAverage": [3.0, 4.0],
            "barcolor": "blue",
            "fillcolor": "lightblue",
            "movingLineColor": "navy",
            "gtitle": "Daily Cases",
            "ytitle": "Cases"
        }"#;

        let record: DatasetRecord = serde_json::from_str(json).unwrap();
        match record {
            DatasetRecord::Daily(s) => {
                assert_eq!(s.y_values, vec![3.0, 5.0]);
                assert_eq!(s.moving_average, vec![Some(3.0), Some(4.0)]);
                assert_eq!(s.title, "Daily Cases");
            }
            other => panic!("expected daily record, got {:?}", other),
        }
    }

    #[test]
    fn test_moving_average_gaps() {
        let json = r#"{
            "type": "daily",
            "xval": ["2020-06-01", "2020-06-02", "2020-06-03"],
            "yval": [3, 5, 4],
            "movingAverage": [null, null, 4.0],
            "barcolor": "blue",
            "fillcolor": "lightblue",
            "movingLineColor": "navy",
            "gtitle": "Daily Cases",
            "ytitle": "Cases"
        }"#;

        let record: DatasetRecord = serde_json::from_str(json).unwrap();
        assert!(record.validate().is_ok());
        match &record {
            DatasetRecord::Daily(s) => assert_eq!(s.moving_average, vec![None, None, Some(4.0)]),
            other => panic!("expected daily record, got {:?}", other),
        }

        let table = record.to_table();
        assert_eq!(table.rows[0], vec!["2020-06-01", "3", ""]);
        assert_eq!(table.rows[2], vec!["2020-06-03", "4", "4"]);

        // Raw counts have no gaps
        let strict = json.replace(r#""yval": [3, 5, 4]"#, r#""yval": [3, null, 4]"#);
        assert!(serde_json::from_str::<DatasetRecord>(&strict).is_err());
    }

    #[test]
    fn test_deserialize_descriptive_aliases() {
        let json = r#"{
            "type": "total",
            "xValues": ["2020-01-01", "2020-01-02"],
            "yValues": [1, 2],
            "lineColor": "red",
            "title": "T",
            "yAxisTitle": "Y"
        }"#;

        let record: DatasetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.type_tag(), "total");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_tag() {
        let record: DatasetRecord =
            serde_json::from_str(r#"{"type": "histogram", "bins": [1, 2]}"#).unwrap();
        assert_eq!(record, DatasetRecord::Unrecognized);
        assert!(record.validate().is_ok());
        assert!(record.x_values().is_none());
    }

    #[test]
    fn test_region_ids_accept_numbers() {
        let record: DatasetRecord =
            serde_json::from_str(r#"{"type": "map", "fips": [47001, "47003"], "z": [4, 9]}"#)
                .unwrap();
        match record {
            DatasetRecord::Map(m) => assert_eq!(m.region_ids, vec!["47001", "47003"]),
            other => panic!("expected map record, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_length_mismatch() {
        let record = DatasetRecord::Testing(TestingSeries {
            x_values: vec!["2020-06-01".into(), "2020-06-02".into()],
            total_tests: vec![10.0, 12.0],
            positive_tests: vec![1.0],
            percent_positive: vec![10.0, 8.3],
            title: "Testing".into(),
        });

        match record.validate() {
            Err(DatasetError::LengthMismatch {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "positiveVals");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected length mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_date_span() {
        let record = DatasetRecord::Total(TotalSeries {
            x_values: vec!["3/10/2020".into(), "3/11/2020".into(), "6/10/2020".into()],
            y_values: vec![1.0, 2.0, 3.0],
            line_color: "red".into(),
            title: "Total".into(),
            y_axis_title: "Cases".into(),
        });

        let (first, last) = record.date_span().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2020, 3, 10).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2020, 6, 10).unwrap());

        assert_eq!(
            parse_date_label("2020-06-10T00:00:00"),
            NaiveDate::from_ymd_opt(2020, 6, 10)
        );
        assert_eq!(parse_date_label("June 10"), None);
    }

    #[test]
    fn test_to_table() {
        let record = DatasetRecord::Map(RegionValues {
            region_ids: vec!["47037".into(), "47157".into()],
            values: vec![120.0, 98.5],
        });

        let table = record.to_table();
        assert_eq!(table.headers, vec!["region", "value"]);
        assert_eq!(table.rows[1], vec!["47157".to_string(), "98.5".to_string()]);
    }
}
