//! Signal aggregation and query engine.
//!
//! The free functions in the submodules are pure transformations over
//! borrowed records. [`Engine`] binds them to one view's [`EngineConfig`]:
//! its threshold table, the facets it lets users filter on, and its heat map
//! radius.

pub mod aggregate;
pub mod binner;
pub mod bucket;
pub mod filter;
pub mod sort;
pub mod types;
pub mod utility;

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::SignalRecord;

pub use aggregate::{aggregate, aggregate_by};
pub use binner::bin;
pub use bucket::{Ranked, Threshold, ThresholdTable, Tier, bucket};
pub use filter::{ALL, Facet, Facets, filter};
pub use sort::{SortDirection, SortKey, sort};
pub use types::{InfluenceRegion, MarkerSize, Summary};

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Filters on the enabled facets only; selections on other facets are
    /// logged and ignored.
    pub fn filter<'a, I>(&self, records: I, facets: &Facets) -> Vec<&'a SignalRecord>
    where
        I: IntoIterator<Item = &'a SignalRecord>,
    {
        let (enabled, ignored) = facets.restrict_to(&self.config.facets);
        for facet in ignored {
            warn!(%facet, "Ignoring selection on a facet this view does not enable");
        }
        filter(records, &enabled)
    }

    pub fn sort<'a, I>(
        &self,
        records: I,
        key: SortKey,
        direction: Option<SortDirection>,
    ) -> Result<Vec<&'a SignalRecord>>
    where
        I: IntoIterator<Item = &'a SignalRecord>,
    {
        sort(records, key, direction)
    }

    pub fn aggregate<'a, I>(&self, records: I) -> Summary
    where
        I: IntoIterator<Item = &'a SignalRecord>,
    {
        aggregate(records, &self.config.thresholds)
    }

    pub fn aggregate_by<'a, I>(&self, records: I, facet: Facet) -> BTreeMap<String, Summary>
    where
        I: IntoIterator<Item = &'a SignalRecord>,
    {
        aggregate_by(records, facet, &self.config.thresholds)
    }

    pub fn bucket(&self, value: f64) -> &Tier {
        self.config.thresholds.bucket(value)
    }

    pub fn bin<'a, I>(&self, records: I) -> Result<Vec<InfluenceRegion>>
    where
        I: IntoIterator<Item = &'a SignalRecord>,
    {
        bin(records, self.config.heatmap_radius, &self.config.thresholds)
    }
}
