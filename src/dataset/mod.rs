//! Dashboard Datasets
//!
//! Static, precomputed assets the dashboard charts are built from:
//!
//! - **types**: Dataset records (`total`, `daily`, `testing`, `map`) and metric keys
//! - **table**: County/metric and summary-map lookup
//! - **geo**: State and county GeoJSON boundaries
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tncovid::dataset::{DatasetTable, MetricKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = DatasetTable::load(
//!         Path::new("assets/counties.json"),
//!         Path::new("assets/maps.json"),
//!     )?;
//!
//!     if let Some(record) = table.lookup("Davidson", MetricKind::DailyCases) {
//!         println!("{} record", record.type_tag());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod geo;
pub mod table;
pub mod types;

pub use error::{DatasetError, DatasetResult};
pub use geo::GeoBoundaries;
pub use table::{CountyRecords, DatasetTable, ValidationIssue};
pub use types::{
    parse_date_label, DailySeries, DatasetRecord, MetricKind, RegionValues, SeriesTable,
    TestingSeries, TotalSeries,
};

use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and parse one JSON asset file
pub(crate) fn read_asset<T: DeserializeOwned>(path: &Path) -> DatasetResult<T> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
