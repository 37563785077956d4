//! Geographic boundaries
//!
//! State and county boundary polygons, loaded once and embedded by reference
//! in every choropleth trace.

use super::error::DatasetResult;
use super::read_asset;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Property holding the county name in the county GeoJSON
pub const NAME_PROPERTY: &str = "NAME";
/// Property holding the county FIPS code in the county GeoJSON
pub const FIPS_PROPERTY: &str = "FIPS";

/// Immutable state and county GeoJSON feature collections
#[derive(Debug, Clone)]
pub struct GeoBoundaries {
    state: Arc<Value>,
    county: Arc<Value>,
}

impl Default for GeoBoundaries {
    fn default() -> Self {
        Self::new(Value::Null, Value::Null)
    }
}

impl GeoBoundaries {
    pub fn new(state: Value, county: Value) -> Self {
        Self {
            state: Arc::new(state),
            county: Arc::new(county),
        }
    }

    /// Load both boundary files
    pub fn load(state_path: &Path, county_path: &Path) -> DatasetResult<Self> {
        let state: Value = read_asset(state_path)?;
        let county: Value = read_asset(county_path)?;

        let boundaries = Self::new(state, county);
        tracing::info!(
            "Loaded boundaries: {} state features, {} county features",
            boundaries.state_feature_count(),
            boundaries.county_feature_count()
        );

        Ok(boundaries)
    }

    pub fn state(&self) -> Arc<Value> {
        Arc::clone(&self.state)
    }

    pub fn county(&self) -> Arc<Value> {
        Arc::clone(&self.county)
    }

    pub fn state_feature_count(&self) -> usize {
        features(&self.state).count()
    }

    pub fn county_feature_count(&self) -> usize {
        features(&self.county).count()
    }

    /// Resolve a county FIPS code to its name
    pub fn county_name_by_fips(&self, fips: &str) -> Option<String> {
        let fips = fips.trim();
        features(&self.county).find_map(|feature| {
            let props = feature.get("properties")?;
            if property_text(props, FIPS_PROPERTY)? == fips {
                property_text(props, NAME_PROPERTY)
            } else {
                None
            }
        })
    }
}

fn features(collection: &Value) -> impl Iterator<Item = &Value> {
    collection
        .get("features")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Property as text; numeric codes are rendered without decoration
fn property_text(props: &Value, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
