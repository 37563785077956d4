//! Static dataset table
//!
//! In-memory lookup over the two precomputed assets:
//! - `counties.json`: county name → metric key → record
//! - `maps.json`: summary map key → record
//!
//! Both are loaded once at startup and never mutated.

use super::error::{DatasetError, DatasetResult};
use super::read_asset;
use super::types::{DatasetRecord, MetricKind};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Records for one county, keyed by metric key
pub type CountyRecords = BTreeMap<String, DatasetRecord>;

/// A record that failed validation
#[derive(Debug)]
pub struct ValidationIssue {
    /// `county/metric` or `maps/key`
    pub location: String,
    pub error: DatasetError,
}

/// Immutable table of all chartable records
#[derive(Debug, Clone, Default)]
pub struct DatasetTable {
    counties: BTreeMap<String, CountyRecords>,
    maps: BTreeMap<String, DatasetRecord>,
}

impl DatasetTable {
    pub fn new(
        counties: BTreeMap<String, CountyRecords>,
        maps: BTreeMap<String, DatasetRecord>,
    ) -> Self {
        Self { counties, maps }
    }

    /// Load the county and summary map assets
    pub fn load(counties_path: &Path, maps_path: &Path) -> DatasetResult<Self> {
        let counties: BTreeMap<String, CountyRecords> = read_asset(counties_path)?;
        let maps: BTreeMap<String, DatasetRecord> = read_asset(maps_path)?;

        let table = Self::new(counties, maps);
        tracing::info!(
            "Loaded {} counties ({} records) and {} summary maps",
            table.counties.len(),
            table.record_count(),
            table.maps.len()
        );

        Ok(table)
    }

    /// Record for a county/metric pair
    ///
    /// Returns `None` for an empty county name, an unknown county, or a county
    /// without that metric.
    pub fn lookup(&self, county: &str, metric: MetricKind) -> Option<&DatasetRecord> {
        if county.is_empty() {
            return None;
        }
        self.counties.get(county)?.get(metric.key())
    }

    /// Summary map record by key
    pub fn map(&self, key: &str) -> Option<&DatasetRecord> {
        self.maps.get(key)
    }

    pub fn has_county(&self, county: &str) -> bool {
        self.counties.contains_key(county)
    }

    /// County names in alphabetical order
    pub fn county_names(&self) -> impl Iterator<Item = &str> {
        self.counties.keys().map(String::as_str)
    }

    pub fn county_records(&self, county: &str) -> Option<&CountyRecords> {
        self.counties.get(county)
    }

    pub fn map_keys(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Total number of county records
    pub fn record_count(&self) -> usize {
        self.counties.values().map(BTreeMap::len).sum()
    }

    /// Validate every record, collecting all issues
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (county, records) in &self.counties {
            for (metric, record) in records {
                if let Err(error) = record.validate() {
                    issues.push(ValidationIssue {
                        location: format!("{}/{}", county, metric),
                        error,
                    });
                }
            }
        }

        for (key, record) in &self.maps {
            if let Err(error) = record.validate() {
                issues.push(ValidationIssue {
                    location: format!("maps/{}", key),
                    error,
                });
            }
        }

        if !issues.is_empty() {
            tracing::warn!("Dataset validation found {} issues", issues.len());
        }

        issues
    }

    /// Write one county/metric series as CSV
    pub fn export_csv<W: Write>(
        &self,
        county: &str,
        metric: MetricKind,
        writer: W,
    ) -> DatasetResult<usize> {
        let record = self
            .lookup(county, metric)
            .ok_or_else(|| DatasetError::RecordNotFound {
                county: county.to_string(),
                metric: metric.key().to_string(),
            })?;

        let table = record.to_table();
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&table.headers)?;
        for row in &table.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;

        Ok(table.rows.len())
    }
}
