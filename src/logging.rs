//! Logging setup
//!
//! Installs the global `tracing` subscriber described by `LoggingConfig`.
//! `RUST_LOG`, when set, takes precedence over the configured level.

use crate::config::LoggingConfig;
use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Errors that can occur while installing the subscriber
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown log format '{0}' (expected pretty, compact or json)")]
    Format(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggingError::Format(s.to_string())),
        }
    }
}

/// Filter directives for a configured level
pub fn filter_directives(level: &str) -> String {
    format!("tncovid={}", level.trim().to_lowercase())
}

/// Stderr subscriber used until the configured one is installed
///
/// Scoped with `tracing::subscriber::with_default` around config loading so
/// its warnings are not lost. Shows warnings unless `RUST_LOG` says otherwise.
pub fn bootstrap_subscriber() -> impl Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let format: LogFormat = config.format.parse()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level)));

    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File {
                    path: path.clone(),
                    source,
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives("info"), "tncovid=info");
        assert_eq!(filter_directives(" DEBUG "), "tncovid=debug");
    }

    #[test]
    fn test_unwritable_log_file() {
        let config = LoggingConfig {
            file: Some("/nonexistent/dir/tncovid.log".to_string()),
            ..Default::default()
        };

        assert!(matches!(init(&config), Err(LoggingError::File { .. })));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("full".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let config = LoggingConfig {
            format: "prety".to_string(),
            ..Default::default()
        };

        match init(&config) {
            Err(LoggingError::Format(format)) => assert_eq!(format, "prety"),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_bootstrap_subscriber_scoped() {
        let loaded = tracing::subscriber::with_default(bootstrap_subscriber(), || {
            tracing::warn!("loading config");
            42
        });

        assert_eq!(loaded, 42);
    }
}
