//! tncovid CLI
//!
//! Command-line front end for the dashboard datasets:
//! - Print chart and map specifications for a renderer
//! - Replay selection events through the view controller
//! - List, validate and export the static data

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tncovid::chart::{ChartBuilder, ChartSpec, PlotConfig, RegionMapBuilder, RegionMapStyle};
use tncovid::config::{generate_default_config, Config};
use tncovid::dataset::{DatasetError, DatasetTable, GeoBoundaries, MetricKind};
use tncovid::view::{SelectionState, ViewController, ViewEvent};

#[derive(Parser)]
#[command(name = "tncovid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tennessee COVID-19 dashboard chart builder")]
#[command(long_about = "Builds Plotly chart and choropleth specifications from the dashboard's static county datasets.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Asset directory, overrides the configured one
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the chart for a county and metric
    Chart {
        /// County name (e.g. Davidson)
        county: String,
        /// Metric key (e.g. daily_cases)
        metric: MetricKind,
    },

    /// Print a summary choropleth
    Map {
        /// Map key (default: configured default map)
        key: Option<String>,
    },

    /// Print a state or county boundary map from a style file
    RegionMap {
        /// JSON map descriptor (`smap` or `cmap`)
        style: PathBuf,
        /// Viewport width in pixels (default: configured width)
        #[arg(short, long)]
        width: Option<f64>,
    },

    /// Apply selection events and print the resulting view
    Replay {
        /// JSON array of view events
        events: PathBuf,
    },

    /// List counties and the dates their data covers
    Counties,

    /// List metric keys
    Metrics,

    /// Check every record for mismatched sequence lengths
    Validate,

    /// Export a county series as CSV
    Export {
        county: String,
        metric: MetricKind,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Region map with its renderer options
#[derive(Serialize)]
struct MapPayload<'a> {
    #[serde(flatten)]
    spec: &'a ChartSpec,
    config: PlotConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The configured subscriber depends on the config, so loading logs to stderr
    let mut config = tracing::subscriber::with_default(tncovid::logging::bootstrap_subscriber(), || {
        match &cli.config {
            Some(path) => Config::load_with_env(path)
                .with_context(|| format!("Cannot load config {:?}", path)),
            None => Config::load_default().context("Cannot load config from a default location"),
        }
    })?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data.dir = dir;
    }

    tncovid::logging::init(&config.logging)?;
    tracing::debug!("tncovid v{}, data directory {:?}", env!("CARGO_PKG_VERSION"), config.data.dir);

    match cli.command {
        Commands::Chart { county, metric } => {
            let table = load_table(&config)?;
            let boundaries = load_boundaries(&config)?;

            let spec = ChartBuilder::new(&boundaries).build(table.lookup(&county, metric));
            if spec.is_empty() {
                tracing::warn!("No {} data for county '{}'", metric, county);
            }
            print_json(&spec, cli.pretty)?;
        }

        Commands::Map { key } => {
            let table = load_table(&config)?;
            let boundaries = load_boundaries(&config)?;

            let key = key.unwrap_or_else(|| config.view.default_map.clone());
            let record = table
                .map(&key)
                .ok_or_else(|| DatasetError::MapNotFound(key.clone()))?;

            let spec = ChartBuilder::new(&boundaries).build(Some(record));
            print_json(&spec, cli.pretty)?;
        }

        Commands::RegionMap { style, width } => {
            let boundaries = load_boundaries(&config)?;

            let content = std::fs::read_to_string(&style)
                .with_context(|| format!("Cannot read map style {:?}", style))?;
            let style: RegionMapStyle =
                serde_json::from_str(&content).context("Invalid map style")?;

            let mut builder = RegionMapBuilder::new(boundaries, config.zoom.state, config.zoom.county);
            builder.mount(width.unwrap_or(config.view.viewport_width));

            let spec = builder.build(&style);
            let payload = MapPayload {
                spec: &spec,
                config: PlotConfig::map(config.render.image_export()),
            };
            print_json(&payload, cli.pretty)?;
        }

        Commands::Replay { events } => {
            let table = load_table(&config)?;
            let boundaries = load_boundaries(&config)?;

            let content = std::fs::read_to_string(&events)
                .with_context(|| format!("Cannot read events {:?}", events))?;
            let events: Vec<ViewEvent> =
                serde_json::from_str(&content).context("Invalid event list")?;

            let initial = SelectionState::new(config.view.default_metric, config.view.default_map.clone());
            let mut view = ViewController::new(Arc::new(table), boundaries, initial);

            let total = events.len();
            let changed = events.into_iter().map(|e| view.apply(e)).filter(|c| *c).count();
            tracing::info!("Applied {} events, {} changed the view", total, changed);

            print_json(&view.render(), cli.pretty)?;
        }

        Commands::Counties => {
            let table = load_table(&config)?;

            println!("{:<16} {:>8}  {}", "County", "Records", "Dates");
            println!("{}", "-".repeat(52));

            for county in table.county_names() {
                let records = table.county_records(county).map(|r| r.len()).unwrap_or(0);
                let span = table
                    .county_records(county)
                    .and_then(|r| date_span(r.values().filter_map(|rec| rec.date_span())))
                    .map(|(first, last)| format!("{} to {}", first, last))
                    .unwrap_or_else(|| "-".to_string());

                println!("{:<16} {:>8}  {}", county, records, span);
            }
        }

        Commands::Metrics => {
            println!("{:<20} {}", "Key", "Label");
            println!("{}", "-".repeat(40));

            for metric in MetricKind::all() {
                println!("{:<20} {}", metric.key(), metric.label());
            }
        }

        Commands::Validate => {
            let table = load_table(&config)?;
            let issues = table.validate();

            if issues.is_empty() {
                println!(
                    "{} county records and {} maps are valid",
                    table.record_count(),
                    table.map_keys().count()
                );
            } else {
                for issue in &issues {
                    println!("{}: {}", issue.location, issue.error);
                }
                bail!("{} invalid records", issues.len());
            }
        }

        Commands::Export {
            county,
            metric,
            output,
        } => {
            let table = load_table(&config)?;

            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Cannot create {:?}", path))?;
                    let rows = table.export_csv(&county, metric, file)?;
                    println!("Exported {} rows to {:?}", rows, path);
                }
                None => {
                    table.export_csv(&county, metric, std::io::stdout().lock())?;
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn load_table(config: &Config) -> anyhow::Result<DatasetTable> {
    let table = DatasetTable::load(&config.data.counties_path(), &config.data.maps_path())?;
    Ok(table)
}

fn load_boundaries(config: &Config) -> anyhow::Result<GeoBoundaries> {
    let boundaries = GeoBoundaries::load(
        &config.data.state_geojson_path(),
        &config.data.county_geojson_path(),
    )?;
    Ok(boundaries)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Earliest start and latest end over several spans
fn date_span(spans: impl Iterator<Item = (NaiveDate, NaiveDate)>) -> Option<(NaiveDate, NaiveDate)> {
    spans.reduce(|(a_first, a_last), (b_first, b_last)| (a_first.min(b_first), a_last.max(b_last)))
}

