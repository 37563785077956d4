//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::chart::{ImageExportOptions, ZoomModel};
use crate::dataset::MetricKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub zoom: ZoomConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location of the static asset files
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,

    #[serde(default = "default_counties_file")]
    pub counties_file: String,

    #[serde(default = "default_maps_file")]
    pub maps_file: String,

    #[serde(default = "default_state_geojson_file")]
    pub state_geojson_file: String,

    #[serde(default = "default_county_geojson_file")]
    pub county_geojson_file: String,
}

fn default_data_dir() -> String {
    "./assets".to_string()
}

fn default_counties_file() -> String {
    "counties.json".to_string()
}

fn default_maps_file() -> String {
    "maps.json".to_string()
}

fn default_state_geojson_file() -> String {
    "tn_geojson.json".to_string()
}

fn default_county_geojson_file() -> String {
    "county_geojson.json".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            counties_file: default_counties_file(),
            maps_file: default_maps_file(),
            state_geojson_file: default_state_geojson_file(),
            county_geojson_file: default_county_geojson_file(),
        }
    }
}

impl DataConfig {
    pub fn counties_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.counties_file)
    }

    pub fn maps_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.maps_file)
    }

    pub fn state_geojson_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.state_geojson_file)
    }

    pub fn county_geojson_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.county_geojson_file)
    }
}

/// Initial view selection
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub default_metric: MetricKind,

    #[serde(default = "default_map")]
    pub default_map: String,

    /// Viewport width used when mounting region maps (pixels)
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
}

fn default_map() -> String {
    crate::view::DEFAULT_MAP.to_string()
}

fn default_viewport_width() -> f64 {
    1280.0
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_metric: MetricKind::default(),
            default_map: default_map(),
            viewport_width: default_viewport_width(),
        }
    }
}

/// Zoom models for the region maps
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ZoomConfig {
    #[serde(default = "ZoomModel::state")]
    pub state: ZoomModel,

    #[serde(default = "ZoomModel::county")]
    pub county: ZoomModel,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            state: ZoomModel::state(),
            county: ZoomModel::county(),
        }
    }
}

/// Image export settings for region maps
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_image_format")]
    pub image_format: String,

    #[serde(default = "default_image_filename")]
    pub image_filename: String,

    #[serde(default = "default_image_width")]
    pub image_width: u32,

    #[serde(default = "default_image_height")]
    pub image_height: u32,

    #[serde(default = "default_image_scale")]
    pub image_scale: f64,
}

fn default_image_format() -> String {
    "png".to_string()
}

fn default_image_filename() -> String {
    "plot".to_string()
}

fn default_image_width() -> u32 {
    1500
}

fn default_image_height() -> u32 {
    900
}

fn default_image_scale() -> f64 {
    2.0
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_format: default_image_format(),
            image_filename: default_image_filename(),
            image_width: default_image_width(),
            image_height: default_image_height(),
            image_scale: default_image_scale(),
        }
    }
}

impl RenderConfig {
    pub fn image_export(&self) -> ImageExportOptions {
        ImageExportOptions {
            format: self.image_format.clone(),
            filename: self.image_filename.clone(),
            height: self.image_height,
            width: self.image_width,
            scale: self.image_scale,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Standard config file locations, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("tncovid").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/tncovid/config.toml"));
        paths.push(PathBuf::from("./config.toml"));
        paths
    }

    /// Load from default locations or environment
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_first(&Self::search_paths())
    }

    /// Load the first file in `paths` that exists
    ///
    /// A file that exists but cannot be read or parsed is an error; later
    /// paths are not tried. With no file present, defaults plus environment
    /// overrides are used.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Data overrides
        if let Some(dir) = lookup("TNCOVID_DATA_DIR") {
            self.data.dir = dir;
        }

        // View overrides
        if let Some(width) = lookup("TNCOVID_VIEWPORT_WIDTH") {
            match width.parse() {
                Ok(w) => self.view.viewport_width = w,
                Err(_) => tracing::warn!("Ignoring invalid TNCOVID_VIEWPORT_WIDTH: {}", width),
            }
        }
        if let Some(metric) = lookup("TNCOVID_DEFAULT_METRIC") {
            match metric.parse() {
                Ok(m) => self.view.default_metric = m,
                Err(e) => tracing::warn!("Ignoring TNCOVID_DEFAULT_METRIC: {}", e),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("TNCOVID_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TNCOVID_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# TN COVID-19 Dashboard Configuration
#
# Environment variables override these settings:
# - TNCOVID_DATA_DIR
# - TNCOVID_VIEWPORT_WIDTH
# - TNCOVID_DEFAULT_METRIC
# - TNCOVID_LOG_LEVEL
# - TNCOVID_LOG_FORMAT

[data]
# Directory holding the static assets
dir = "./assets"

# County → metric → record table
counties_file = "counties.json"

# Summary choropleth records
maps_file = "maps.json"

# Boundary polygons
state_geojson_file = "tn_geojson.json"
county_geojson_file = "county_geojson.json"

[view]
# Metric selected when the dashboard opens
default_metric = "total_cases"

# Summary map shown when the dashboard opens
default_map = "daily_cases_map"

# Viewport width used to compute region map zoom (pixels)
viewport_width = 1280

[zoom.state]
# zoom = slope * viewport_width + intercept
slope = 0.001144
intercept = 4.42797
# Zoom before the viewport width is known
initial = 6.35

[zoom.county]
slope = 0.0012712
intercept = 4.0644
initial = 6.2

[render]
# Image export of region maps
image_format = "png"
image_filename = "plot"
image_width = 1500
image_height = 900
image_scale = 2.0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty, compact, or json
format = "pretty"

# Optional log file path
# file = "/var/log/tncovid/tncovid.log"
"#
    .to_string()
}
