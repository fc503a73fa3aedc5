//! Output formatting and persistence for engine results.
//!
//! Supports pretty-printing, JSON serialization, CSV append of summary rows
//! and CSV export of heat map regions.

use std::fmt::Debug;
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::types::{InfluenceRegion, Summary};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Flat projection of a [`Summary`] for CSV history files.
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub generated_at: DateTime<Utc>,
    pub scope: String,
    pub total_records: usize,
    pub excluded: usize,
    pub total_casualties: u64,
    pub total_likes: u64,
    pub total_replies: u64,
    pub resolution_rate: f64,
    pub mean_score: Option<f64>,
    pub mean_trend: Option<f64>,
}

impl SummaryRow {
    pub fn new(scope: &str, summary: &Summary, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            scope: scope.to_string(),
            total_records: summary.total_records,
            excluded: summary.excluded,
            total_casualties: summary.total_casualties,
            total_likes: summary.total_likes,
            total_replies: summary.total_replies,
            resolution_rate: summary.resolution_rate,
            mean_score: summary.mean_score,
            mean_trend: summary.mean_trend,
        }
    }
}

/// Appends a [`SummaryRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &str, row: &SummaryRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending summary row");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

#[derive(Debug, Serialize)]
struct RegionRow<'a> {
    record_id: &'a str,
    x: f64,
    y: f64,
    radius: f64,
    tier: &'a str,
    tier_rank: usize,
    marker: &'a str,
}

/// Writes heat map regions to `path`, replacing any existing file.
pub fn write_regions(path: &str, regions: &[InfluenceRegion]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;

    for region in regions {
        writer.serialize(RegionRow {
            record_id: &region.record_id,
            x: region.center.x,
            y: region.center.y,
            radius: region.radius,
            tier: &region.tier.label,
            tier_rank: region.tier.rank,
            marker: region.marker.as_ref(),
        })?;
    }
    writer.flush()?;

    debug!(path, regions = regions.len(), "Heat map regions written");
    Ok(())
}
