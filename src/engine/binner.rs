//! Heat map binning.
//!
//! One [`InfluenceRegion`] per located record, in input order. The radius is
//! fixed per call; magnitude is carried by the tier color, so dense clusters
//! of nearby points compound into hot spots on their own. The marker size is
//! a separate encoding derived from the same tier.

use tracing::debug;

use crate::engine::bucket::{Tier, ThresholdTable};
use crate::engine::types::{InfluenceRegion, MarkerSize};
use crate::error::{EngineError, Result};
use crate::model::{SignalKind, SignalRecord};

/// Default influence radius in map percentage points.
pub const DEFAULT_RADIUS: f64 = 40.0;

/// Marker size for a record's tier.
///
/// Score-bucketed records shrink as the score improves: top tier small,
/// lowest tier large. Severity-ranked records grow with severity.
pub fn marker_size(record: &SignalRecord, tier: &Tier, table: &ThresholdTable) -> MarkerSize {
    match &record.kind {
        SignalKind::RouteScore(_) => {
            if tier.rank == table.highest_rank() {
                MarkerSize::Small
            } else if tier.rank == 0 {
                MarkerSize::Large
            } else {
                MarkerSize::Medium
            }
        }
        _ => match tier.rank {
            r if r >= 3 => MarkerSize::Large,
            2 => MarkerSize::Medium,
            _ => MarkerSize::Small,
        },
    }
}

/// Maps every well-formed record with coordinates to an influence region.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRadius`] when `radius` is negative or not
/// finite.
pub fn bin<'a, I>(records: I, radius: f64, table: &ThresholdTable) -> Result<Vec<InfluenceRegion>>
where
    I: IntoIterator<Item = &'a SignalRecord>,
{
    if !radius.is_finite() || radius < 0.0 {
        return Err(EngineError::InvalidRadius(radius));
    }

    let mut unlocated = 0usize;
    let mut regions = Vec::new();

    for record in records {
        if !record.is_well_formed() {
            debug!(id = %record.id, "Excluding malformed record from heat map");
            continue;
        }

        let Some(center) = record.coordinates else {
            unlocated += 1;
            continue;
        };

        if !center.in_bounds() {
            debug!(id = %record.id, x = center.x, y = center.y, "Record lies outside the map");
        }

        let tier = record.tier(table);
        let marker = marker_size(record, &tier, table);
        regions.push(InfluenceRegion {
            record_id: record.id.clone(),
            center,
            radius,
            tier,
            marker,
        });
    }

    debug!(regions = regions.len(), unlocated, "Heat map binned");
    Ok(regions)
}
