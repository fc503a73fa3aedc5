//! CLI entry point for the transit safety engine.
//!
//! Provides subcommands for listing, summarizing and heat-mapping a record
//! batch, and for bucketing a single score.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transit_safety::{
    Engine, EngineConfig, EngineError, SignalRecord,
    engine::{Facet, Facets, SortDirection, SortKey, ThresholdTable},
    output::{SummaryRow, append_summary, print_json, print_pretty, write_regions},
    parser::load_records,
    seed,
};

/// Source name that selects the built-in demo collection.
const SEED_SOURCE: &str = "seed";

#[derive(Parser)]
#[command(name = "transit_safety")]
#[command(about = "Filter, sort, summarize and map transit safety reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records matching the facet selection
    List {
        /// Record batch (JSON, optionally gzipped) or `seed`
        #[arg(value_name = "FILE")]
        source: String,

        /// Facet selection as name=value; repeatable
        #[arg(short, long = "facet", value_name = "NAME=VALUE")]
        facets: Vec<String>,

        /// Sort key (recency, severity_rank, casualties, rating, score, likes)
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort direction (asc or desc); defaults per key
        #[arg(short, long)]
        direction: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Summarize the records matching the facet selection
    Summary {
        #[arg(value_name = "FILE")]
        source: String,

        #[arg(short, long = "facet", value_name = "NAME=VALUE")]
        facets: Vec<String>,

        /// Produce one summary per value of this facet
        #[arg(short, long)]
        group_by: Option<String>,

        /// CSV file to append summary rows to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Build heat map regions for the located records
    Heatmap {
        #[arg(value_name = "FILE")]
        source: String,

        #[arg(short, long = "facet", value_name = "NAME=VALUE")]
        facets: Vec<String>,

        /// Influence radius; overrides the configured one
        #[arg(short, long)]
        radius: Option<f64>,

        /// CSV file to write regions to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Show the tier a score falls into
    Bucket {
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Built-in threshold table; defaults to the configured one
        #[arg(short, long, value_enum)]
        preset: Option<Preset>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Safety,
    Route,
    Rating,
}

impl Preset {
    fn table(self) -> ThresholdTable {
        match self {
            Self::Safety => ThresholdTable::safety_score(),
            Self::Route => ThresholdTable::route_status(),
            Self::Rating => ThresholdTable::rating(),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/transit_safety.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("transit_safety.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config_path = std::env::var("SAFETY_CONFIG_PATH").ok();
    let config = EngineConfig::load_or_default(config_path.as_deref())
        .context("failed to load engine config")?;

    match cli.command {
        Commands::List {
            source,
            facets,
            sort,
            direction,
            format,
        } => list(config, &source, &facets, sort.as_deref(), direction.as_deref(), format)?,
        Commands::Summary {
            source,
            facets,
            group_by,
            csv,
        } => summary(config, &source, &facets, group_by.as_deref(), csv.as_deref())?,
        Commands::Heatmap {
            source,
            facets,
            radius,
            csv,
        } => {
            let mut config = config;
            if let Some(radius) = radius {
                config.heatmap_radius = radius;
            }
            heatmap(config, &source, &facets, csv.as_deref())?;
        }
        Commands::Bucket { value, preset } => {
            let table = preset.map_or(config.thresholds, Preset::table);
            let tier = table.bucket(value);
            info!(value, tier = %tier.label, rank = tier.rank, "Bucketed");
        }
    }

    Ok(())
}

#[tracing::instrument(skip(config, facets))]
fn list(
    config: EngineConfig,
    source: &str,
    facets: &[String],
    sort: Option<&str>,
    direction: Option<&str>,
    format: Format,
) -> Result<()> {
    let records = load(source)?;
    let engine = Engine::new(config);

    let mut selected = engine.filter(&records, &parse_facets(facets)?);
    if let Some(key) = sort {
        let key = SortKey::parse(key)?;
        let direction = direction
            .map(|d| {
                d.parse::<SortDirection>()
                    .with_context(|| format!("unknown sort direction: {d}"))
            })
            .transpose()?;
        selected = engine.sort(selected, key, direction)?;
    } else if direction.is_some() {
        warn!("Ignoring --direction without --sort");
    }

    match format {
        Format::Pretty => {
            for record in &selected {
                let tier = record.tier(&engine.config().thresholds);
                info!(
                    id = %record.id,
                    variant = record.variant(),
                    route = record.route.as_deref().unwrap_or("-"),
                    location = record.location.as_deref().unwrap_or("-"),
                    tier = %tier.label,
                    "Record"
                );
            }
            print_pretty(&selected);
        }
        Format::Json => print_json(&selected)?,
    }

    info!(matched = selected.len(), total = records.len(), "List complete");
    Ok(())
}

#[tracing::instrument(skip(config, facets))]
fn summary(
    config: EngineConfig,
    source: &str,
    facets: &[String],
    group_by: Option<&str>,
    csv: Option<&str>,
) -> Result<()> {
    let records = load(source)?;
    let engine = Engine::new(config);
    let selected = engine.filter(&records, &parse_facets(facets)?);
    let now = Utc::now();

    match group_by {
        Some(name) => {
            let facet: Facet = name
                .parse()
                .map_err(|_| EngineError::UnknownFacet(name.to_string()))?;
            let groups = engine.aggregate_by(selected.iter().copied(), facet);
            print_json(&groups)?;

            if let Some(path) = csv {
                for (value, group) in &groups {
                    let scope = format!("{facet}={value}");
                    append_summary(path, &SummaryRow::new(&scope, group, now))?;
                }
            }
        }
        None => {
            let summary = engine.aggregate(selected.iter().copied());
            print_json(&summary)?;

            if let Some(path) = csv {
                append_summary(path, &SummaryRow::new("all", &summary, now))?;
            }
        }
    }

    Ok(())
}

#[tracing::instrument(skip(config, facets), fields(radius = config.heatmap_radius))]
fn heatmap(config: EngineConfig, source: &str, facets: &[String], csv: Option<&str>) -> Result<()> {
    let records = load(source)?;
    let engine = Engine::new(config);
    let selected = engine.filter(&records, &parse_facets(facets)?);

    let regions = engine.bin(selected)?;
    info!(regions = regions.len(), "Heat map built");

    match csv {
        Some(path) => write_regions(path, &regions)?,
        None => print_json(&regions)?,
    }

    Ok(())
}

/// Loads records from a batch file, or the demo collection for `seed`.
fn load(source: &str) -> Result<Vec<SignalRecord>> {
    if source == SEED_SOURCE {
        return Ok(seed::all(Utc::now()));
    }

    let batch = load_records(source)?;
    if batch.rejected > 0 {
        warn!(
            source,
            rejected = batch.rejected,
            "Some records could not be decoded"
        );
    }
    Ok(batch.records)
}

fn parse_facets(args: &[String]) -> Result<Facets> {
    let mut pairs = Vec::with_capacity(args.len());
    for arg in args {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("facet selection must be NAME=VALUE, got {arg}");
        };
        pairs.push((name.trim(), value.trim()));
    }
    Ok(Facets::parse(pairs)?)
}
