//! Normalized safety signal records.
//!
//! Every view of the dashboard (accident zones, harassment reports, the
//! community feed, route scores and the heat map) reads the same
//! [`SignalRecord`] shape. Records are immutable values owned by whoever
//! produced them; the engine only reads fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Lifecycle of an accident or harassment report.
///
/// Variant order follows the forward lifecycle, so `Ord` on this type matches
/// reported < investigating < resolved.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Reported,
    Investigating,
    Resolved,
}

impl Status {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Reported, Self::Investigating, Self::Resolved]
    }
}

/// Severity class of an accident.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccidentSeverity {
    Minor,
    Moderate,
    Severe,
}

/// Risk level attached to a harassment report.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HarassmentSeverity {
    Low,
    Medium,
    High,
}

/// Topic of a community chat post.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatCategory {
    Danger,
    Delay,
    Story,
    #[default]
    General,
}

/// Aspect of the ride a route score sample rates. `Overall` is the combined
/// safety score shown on the map by default.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RouteMetric {
    #[default]
    Overall,
    Comfort,
    Cleanliness,
    Harassment,
    Lighting,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReporterType {
    #[default]
    Anonymous,
    Verified,
}

/// Position on the normalized map, each axis a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Whether both axes fall inside the map. Out-of-range points are still
    /// binned; callers use this to flag uncurated input.
    pub fn in_bounds(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentDetails {
    pub severity: AccidentSeverity,
    #[serde(default)]
    pub casualties: u32,
    pub vehicle_type: String,
    pub status: Status,
    #[serde(default)]
    pub accident_type: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub time_of_day: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarassmentDetails {
    /// Rider rating of the place, nominally 1 (unsafe) to 5 (safe). Values
    /// outside that range are kept as reported.
    pub rating: i32,
    pub severity: HarassmentSeverity,
    pub transport_mode: String,
    pub status: Status,
    #[serde(default)]
    pub reporter: ReporterType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDetails {
    #[serde(default)]
    pub category: ChatCategory,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub replies: u32,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteScoreDetails {
    /// Safety score, nominally `[0, 10]`.
    pub score: f64,
    #[serde(default)]
    pub metric: RouteMetric,
    /// Signed change since the previous sample.
    #[serde(default)]
    pub trend: f64,
    #[serde(default)]
    pub transport_mode: Option<String>,
    #[serde(default)]
    pub reports: u32,
}

/// Variant-specific part of a [`SignalRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalKind {
    Accident(AccidentDetails),
    Harassment(HarassmentDetails),
    Chat(ChatDetails),
    RouteScore(RouteScoreDetails),
}

impl SignalKind {
    /// Stable name of the variant, as used in error messages and JSON.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Accident(_) => "accident",
            Self::Harassment(_) => "harassment",
            Self::Chat(_) => "chat",
            Self::RouteScore(_) => "route_score",
        }
    }
}

/// A single crowd-sourced safety signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(flatten)]
    pub kind: SignalKind,
}

impl SignalRecord {
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>, kind: SignalKind) -> Self {
        Self {
            id: id.into(),
            timestamp,
            location: None,
            route: None,
            coordinates: None,
            kind,
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_route(mut self, route: &str) -> Self {
        self.route = Some(route.to_string());
        self
    }

    pub fn with_coordinates(mut self, x: f64, y: f64) -> Self {
        self.coordinates = Some(Coordinates::new(x, y));
        self
    }

    pub const fn variant(&self) -> &'static str {
        self.kind.name()
    }

    /// Report status, for the variants that carry one.
    pub const fn status(&self) -> Option<Status> {
        match &self.kind {
            SignalKind::Accident(a) => Some(a.status),
            SignalKind::Harassment(h) => Some(h.status),
            SignalKind::Chat(_) | SignalKind::RouteScore(_) => None,
        }
    }

    /// Numeric score contributing to the mean: the route score, or the
    /// harassment rating.
    pub fn score(&self) -> Option<f64> {
        match &self.kind {
            SignalKind::RouteScore(r) => Some(r.score),
            SignalKind::Harassment(h) => Some(f64::from(h.rating)),
            SignalKind::Accident(_) | SignalKind::Chat(_) => None,
        }
    }

    /// The closed-set category label of the record: severity class for
    /// accidents, risk level for harassment, topic for chat posts and the
    /// rated metric for route scores.
    pub fn category(&self) -> &'static str {
        match &self.kind {
            SignalKind::Accident(a) => a.severity.into(),
            SignalKind::Harassment(h) => h.severity.into(),
            SignalKind::Chat(c) => c.category.into(),
            SignalKind::RouteScore(r) => r.metric.into(),
        }
    }

    /// A record is usable by the engine when its id is present and every
    /// numeric field it carries is finite.
    pub fn is_well_formed(&self) -> bool {
        if self.id.trim().is_empty() {
            return false;
        }

        if let Some(c) = &self.coordinates {
            if !c.is_finite() {
                return false;
            }
        }

        match &self.kind {
            SignalKind::RouteScore(r) => r.score.is_finite() && r.trend.is_finite(),
            _ => true,
        }
    }
}
