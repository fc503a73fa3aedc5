//! Result types produced by the aggregator and the geospatial binner.

use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::engine::bucket::Tier;
use crate::model::{Coordinates, Status};

/// Summary statistics over a (usually already filtered) record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Well-formed records counted.
    pub total_records: usize,
    /// Malformed records skipped.
    pub excluded: usize,
    /// Scale name (the record variant) to tier label to count. Every tier of
    /// every scale present is zero-filled; scales never share a bucket.
    pub count_by_tier: BTreeMap<&'static str, BTreeMap<String, usize>>,
    /// Always holds all three statuses.
    pub count_by_status: BTreeMap<Status, usize>,
    pub total_casualties: u64,
    pub total_likes: u64,
    pub total_replies: u64,
    /// Resolved records over all counted records; 0 for an empty collection.
    pub resolution_rate: f64,
    /// `None` when no record carries a score or rating.
    pub mean_score: Option<f64>,
    pub mean_trend: Option<f64>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            total_records: 0,
            excluded: 0,
            count_by_tier: BTreeMap::new(),
            count_by_status: Status::all().iter().map(|s| (*s, 0)).collect(),
            total_casualties: 0,
            total_likes: 0,
            total_replies: 0,
            resolution_rate: 0.0,
            mean_score: None,
            mean_trend: None,
        }
    }
}

impl Summary {
    pub fn status_count(&self, status: Status) -> usize {
        self.count_by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn tier_count(&self, scale: &str, label: &str) -> usize {
        self.count_by_tier
            .get(scale)
            .and_then(|tiers| tiers.get(label))
            .copied()
            .unwrap_or(0)
    }

    /// Records counted across every tier of every scale.
    pub fn tier_total(&self) -> usize {
        self.count_by_tier.values().flat_map(BTreeMap::values).sum()
    }
}

/// Display size of a map marker. Independent of the heat influence radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerSize {
    Small,
    Medium,
    Large,
}

/// One heat-map contribution: a fixed-radius circle colored by tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluenceRegion {
    pub record_id: String,
    pub center: Coordinates,
    pub radius: f64,
    pub tier: Tier,
    pub marker: MarkerSize,
}
