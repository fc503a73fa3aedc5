//! Stable, key-selectable ordering of signal records.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::model::{SignalKind, SignalRecord};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortKey {
    #[strum(to_string = "recency", serialize = "recent")]
    Recency,
    #[strum(to_string = "severity_rank", serialize = "severity")]
    SeverityRank,
    Casualties,
    Rating,
    Score,
    Likes,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortDirection {
    #[strum(to_string = "ascending", serialize = "asc")]
    Ascending,
    #[strum(to_string = "descending", serialize = "desc")]
    Descending,
}

impl SortKey {
    /// Parses a key name as sent by a view.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSortKey`] for an unrecognized name.
    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| EngineError::UnknownSortKey(name.to_string()))
    }

    /// Most recent, most severe, most casualties first. Ratings default to
    /// lowest (least safe) first.
    pub const fn default_direction(self) -> SortDirection {
        match self {
            Self::Rating => SortDirection::Ascending,
            Self::Recency | Self::SeverityRank | Self::Casualties | Self::Score | Self::Likes => {
                SortDirection::Descending
            }
        }
    }

    /// Whether records of this variant carry the key.
    pub const fn supports(self, kind: &SignalKind) -> bool {
        matches!(
            (self, kind),
            (Self::Recency, _)
                | (
                    Self::SeverityRank,
                    SignalKind::Accident(_) | SignalKind::Harassment(_) | SignalKind::Chat(_)
                )
                | (Self::Casualties, SignalKind::Accident(_))
                | (Self::Rating, SignalKind::Harassment(_))
                | (Self::Score, SignalKind::RouteScore(_))
                | (Self::Likes, SignalKind::Chat(_))
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum SortValue {
    Time(DateTime<Utc>),
    Int(i64),
    Float(f64),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            // Non-finite scores never get here; -0.0 and 0.0 compare equal.
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            // One key always yields one value shape.
            _ => Ordering::Equal,
        }
    }
}

fn sort_value(key: SortKey, record: &SignalRecord) -> Option<SortValue> {
    match (key, &record.kind) {
        (SortKey::Recency, _) => Some(SortValue::Time(record.timestamp)),
        (SortKey::SeverityRank, _) => record
            .severity_rank()
            .map(|rank| SortValue::Int(i64::from(rank))),
        (SortKey::Casualties, SignalKind::Accident(a)) => {
            Some(SortValue::Int(i64::from(a.casualties)))
        }
        (SortKey::Rating, SignalKind::Harassment(h)) => Some(SortValue::Int(i64::from(h.rating))),
        (SortKey::Score, SignalKind::RouteScore(r)) => Some(SortValue::Float(r.score)),
        (SortKey::Likes, SignalKind::Chat(c)) => Some(SortValue::Int(i64::from(c.likes))),
        _ => None,
    }
}

/// Orders well-formed records by `key`.
///
/// The sort is stable in both directions: records with equal keys keep their
/// input order. `direction` falls back to [`SortKey::default_direction`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidKey`] naming the first record variant that
/// does not carry `key`. Empty input always succeeds.
pub fn sort<'a, I>(
    records: I,
    key: SortKey,
    direction: Option<SortDirection>,
) -> Result<Vec<&'a SignalRecord>>
where
    I: IntoIterator<Item = &'a SignalRecord>,
{
    let direction = direction.unwrap_or(key.default_direction());

    let mut keyed: Vec<(SortValue, &SignalRecord)> = Vec::new();
    for record in records {
        if !record.is_well_formed() {
            debug!(id = %record.id, "Excluding malformed record from sort");
            continue;
        }

        if !key.supports(&record.kind) {
            return Err(EngineError::InvalidKey {
                key: key.into(),
                variant: record.variant(),
            });
        }
        if let Some(value) = sort_value(key, record) {
            keyed.push((value, record));
        }
    }

    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => b.compare(a),
    });

    debug!(%key, %direction, sorted = keyed.len(), "Sort applied");
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}
