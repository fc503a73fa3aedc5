use std::collections::BTreeMap;

use tracing::debug;

use crate::engine::bucket::ThresholdTable;
use crate::engine::filter::{Facet, FacetValue};
use crate::engine::types::Summary;
use crate::engine::utility::{mean, ratio};
use crate::model::{SignalKind, SignalRecord, Status};

/// Computes a [`Summary`] in a single pass over `records`.
///
/// Route score samples are tiered through `table`; every other variant is
/// counted under its severity or topic. Tier counts are kept per variant, and
/// the first record of each variant zero-fills that variant's whole scale, so
/// an empty collection yields an empty tier map.
pub fn aggregate<'a, I>(records: I, table: &ThresholdTable) -> Summary
where
    I: IntoIterator<Item = &'a SignalRecord>,
{
    let mut summary = Summary::default();
    let mut scores = Vec::new();
    let mut trends = Vec::new();

    for record in records {
        if !record.is_well_formed() {
            summary.excluded += 1;
            debug!(id = %record.id, "Excluding malformed record from aggregate");
            continue;
        }

        summary.total_records += 1;

        let tiers = summary
            .count_by_tier
            .entry(record.variant())
            .or_insert_with(|| {
                record
                    .tier_scale(table)
                    .into_iter()
                    .map(|tier| (tier.label, 0))
                    .collect()
            });
        *tiers.entry(record.tier(table).label).or_insert(0) += 1;

        if let Some(status) = record.status() {
            *summary.count_by_status.entry(status).or_insert(0) += 1;
        }

        match &record.kind {
            SignalKind::Accident(a) => summary.total_casualties += u64::from(a.casualties),
            SignalKind::Chat(c) => {
                summary.total_likes += u64::from(c.likes);
                summary.total_replies += u64::from(c.replies);
            }
            SignalKind::RouteScore(r) => trends.push(r.trend),
            SignalKind::Harassment(_) => {}
        }

        if let Some(score) = record.score() {
            scores.push(score);
        }
    }

    summary.resolution_rate = ratio(
        summary.status_count(Status::Resolved),
        summary.total_records,
    );
    summary.mean_score = mean(&scores);
    summary.mean_trend = mean(&trends);

    debug!(
        total = summary.total_records,
        excluded = summary.excluded,
        "Aggregate computed"
    );
    summary
}

/// Summaries grouped by the value each record exposes for `facet`, e.g. one
/// summary per transport mode. Records where the facet is missing or does
/// not apply are left out.
pub fn aggregate_by<'a, I>(
    records: I,
    facet: Facet,
    table: &ThresholdTable,
) -> BTreeMap<String, Summary>
where
    I: IntoIterator<Item = &'a SignalRecord>,
{
    let mut groups: BTreeMap<String, Vec<&SignalRecord>> = BTreeMap::new();
    for record in records {
        if let FacetValue::Value(value) = record.facet_value(facet) {
            groups.entry(value.to_string()).or_default().push(record);
        }
    }

    groups
        .into_iter()
        .map(|(key, group)| (key, aggregate(group, table)))
        .collect()
}
