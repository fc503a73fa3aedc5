//! Score bucketing: maps a numeric score or a severity class onto a discrete
//! tier.
//!
//! Numeric scores go through a [`ThresholdTable`]:
//!
//! | Preset           | Tiers (highest boundary first)                 |
//! |------------------|------------------------------------------------|
//! | `safety_score`   | >= 8 good, >= 6 caution, else risk             |
//! | `route_status`   | >= 8 good, >= 7 warning, >= 6 caution, else alert |
//! | `rating`         | >= 4 good, >= 3 fair, >= 2 poor, else unsafe   |
//!
//! Severity enums are ranked through the static tables on [`Ranked`], which
//! are the only ordering of severities used by sorting and aggregation.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::model::{AccidentSeverity, ChatCategory, HarassmentSeverity, SignalKind, SignalRecord};

/// A discrete bucket. `rank` grows with the boundary (or severity) so tiers of
/// one scale are totally ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tier {
    pub label: String,
    pub rank: usize,
}

impl Tier {
    pub fn new(label: &str, rank: usize) -> Self {
        Self {
            label: label.to_string(),
            rank,
        }
    }
}

/// One row of a threshold table: values meeting or exceeding `boundary` fall
/// into `tier` unless a higher boundary also matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub boundary: f64,
    pub tier: String,
}

impl From<(f64, &str)> for Threshold {
    fn from((boundary, tier): (f64, &str)) -> Self {
        Self {
            boundary,
            tier: tier.to_string(),
        }
    }
}

/// Validated, highest-boundary-first list of thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Threshold>", into = "Vec<Threshold>")]
pub struct ThresholdTable {
    // Never empty; sorted by boundary, descending.
    entries: Vec<(f64, Tier)>,
}

impl ThresholdTable {
    /// Builds a table from thresholds in any order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyThresholds`] for an empty list and
    /// [`EngineError::InvalidThreshold`] when a boundary is not finite.
    pub fn new(thresholds: Vec<Threshold>) -> Result<Self> {
        if thresholds.is_empty() {
            return Err(EngineError::EmptyThresholds);
        }

        if let Some(bad) = thresholds.iter().find(|t| !t.boundary.is_finite()) {
            return Err(EngineError::InvalidThreshold {
                tier: bad.tier.clone(),
            });
        }

        let mut sorted = thresholds;
        // Stable: among equal boundaries the first listed wins.
        sorted.sort_by(|a, b| b.boundary.total_cmp(&a.boundary));

        let len = sorted.len();
        let entries = sorted
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.boundary, Tier::new(&t.tier, len - 1 - i)))
            .collect();

        Ok(Self { entries })
    }

    fn from_static(rows: &[(f64, &str)]) -> Self {
        let len = rows.len();
        Self {
            entries: rows
                .iter()
                .enumerate()
                .map(|(i, (boundary, label))| (*boundary, Tier::new(label, len - 1 - i)))
                .collect(),
        }
    }

    /// Overall safety score colors used across the dashboard.
    pub fn safety_score() -> Self {
        Self::from_static(&[(8.0, "good"), (6.0, "caution"), (0.0, "risk")])
    }

    /// Route status labels and the four-color heat map scale.
    pub fn route_status() -> Self {
        Self::from_static(&[
            (8.0, "good"),
            (7.0, "warning"),
            (6.0, "caution"),
            (0.0, "alert"),
        ])
    }

    /// Star rating colors for harassment reports.
    pub fn rating() -> Self {
        Self::from_static(&[(4.0, "good"), (3.0, "fair"), (2.0, "poor"), (1.0, "unsafe")])
    }

    /// Returns the tier for `value`.
    ///
    /// The first boundary (highest first) that `value` meets or exceeds wins.
    /// Values below every boundary, and NaN, land in the lowest tier.
    pub fn bucket(&self, value: f64) -> &Tier {
        self.entries
            .iter()
            .find(|(boundary, _)| value >= *boundary)
            .map_or_else(|| self.lowest(), |(_, tier)| tier)
    }

    fn lowest(&self) -> &Tier {
        &self.entries[self.entries.len() - 1].1
    }

    pub fn highest_rank(&self) -> usize {
        self.entries.len() - 1
    }

    /// Tiers from the highest boundary down.
    pub fn tiers(&self) -> impl Iterator<Item = &Tier> {
        self.entries.iter().map(|(_, tier)| tier)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::safety_score()
    }
}

impl TryFrom<Vec<Threshold>> for ThresholdTable {
    type Error = EngineError;

    fn try_from(thresholds: Vec<Threshold>) -> Result<Self> {
        Self::new(thresholds)
    }
}

impl From<ThresholdTable> for Vec<Threshold> {
    fn from(table: ThresholdTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(boundary, tier)| Threshold {
                boundary,
                tier: tier.label,
            })
            .collect()
    }
}

/// Free-function form of [`ThresholdTable::bucket`].
pub fn bucket(value: f64, table: &ThresholdTable) -> &Tier {
    table.bucket(value)
}

/// Closed enums with a fixed ordinal rank.
pub trait Ranked: Copy + PartialEq + Into<&'static str> + 'static {
    /// Every value of the scale with its rank, lowest first.
    const RANKS: &'static [(Self, u8)];

    fn rank(self) -> u8 {
        Self::RANKS
            .iter()
            .find(|(value, _)| *value == self)
            .map_or(0, |(_, rank)| *rank)
    }

    fn tier(self) -> Tier {
        let label: &'static str = self.into();
        Tier::new(label, usize::from(self.rank()))
    }

    fn scale() -> Vec<Tier> {
        Self::RANKS.iter().map(|(value, _)| value.tier()).collect()
    }
}

impl Ranked for AccidentSeverity {
    const RANKS: &'static [(Self, u8)] = &[
        (Self::Minor, 1),
        (Self::Moderate, 2),
        (Self::Severe, 3),
    ];
}

impl Ranked for HarassmentSeverity {
    const RANKS: &'static [(Self, u8)] = &[(Self::Low, 1), (Self::Medium, 2), (Self::High, 3)];
}

impl Ranked for ChatCategory {
    const RANKS: &'static [(Self, u8)] = &[
        (Self::General, 0),
        (Self::Story, 1),
        (Self::Delay, 2),
        (Self::Danger, 3),
    ];
}

impl SignalRecord {
    /// Ordinal severity of the record, for the variants that have one.
    pub fn severity_rank(&self) -> Option<u8> {
        match &self.kind {
            SignalKind::Accident(a) => Some(a.severity.rank()),
            SignalKind::Harassment(h) => Some(h.severity.rank()),
            SignalKind::Chat(c) => Some(c.category.rank()),
            SignalKind::RouteScore(_) => None,
        }
    }

    /// The tier this record is counted and colored under. Route scores are
    /// bucketed through `table`; every other variant uses its ranked enum.
    pub fn tier(&self, table: &ThresholdTable) -> Tier {
        match &self.kind {
            SignalKind::Accident(a) => a.severity.tier(),
            SignalKind::Harassment(h) => h.severity.tier(),
            SignalKind::Chat(c) => c.category.tier(),
            SignalKind::RouteScore(r) => table.bucket(r.score).clone(),
        }
    }

    /// All tiers of the scale this record is bucketed on.
    pub fn tier_scale(&self, table: &ThresholdTable) -> Vec<Tier> {
        match &self.kind {
            SignalKind::Accident(_) => AccidentSeverity::scale(),
            SignalKind::Harassment(_) => HarassmentSeverity::scale(),
            SignalKind::Chat(_) => ChatCategory::scale(),
            SignalKind::RouteScore(_) => table.tiers().cloned().collect(),
        }
    }
}
