//! Facet filtering.
//!
//! A [`Facets`] value holds the concrete selections a view has made. Facets
//! combine with logical AND; a facet left at `"all"` is simply absent.
//! Facets that do not apply to a record's variant are skipped for that
//! record, while an applicable facet whose field is missing on the record
//! excludes it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::model::{SignalKind, SignalRecord};

/// Sentinel selection meaning "do not filter on this facet".
pub const ALL: &str = "all";

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
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Facet {
    Category,
    Severity,
    Status,
    TransportMode,
    VehicleType,
    Route,
    Location,
    Reporter,
}

impl Facet {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Category,
            Self::Severity,
            Self::Status,
            Self::TransportMode,
            Self::VehicleType,
            Self::Route,
            Self::Location,
            Self::Reporter,
        ]
    }
}

/// What a record exposes for a given facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetValue<'a> {
    /// The facet has no meaning for this variant.
    NotApplicable,
    /// The facet applies but the record leaves the field empty.
    Missing,
    Value(&'a str),
}

impl<'a> From<Option<&'a str>> for FacetValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, Self::Value)
    }
}

impl SignalRecord {
    pub fn facet_value(&self, facet: Facet) -> FacetValue<'_> {
        match (facet, &self.kind) {
            (Facet::Route, _) => self.route.as_deref().into(),
            (Facet::Location, _) => self.location.as_deref().into(),
            (Facet::Category, _) => FacetValue::Value(self.category()),
            (Facet::Severity, SignalKind::Accident(a)) => FacetValue::Value(a.severity.into()),
            (Facet::Severity, SignalKind::Harassment(h)) => FacetValue::Value(h.severity.into()),
            (Facet::Status, SignalKind::Accident(a)) => FacetValue::Value(a.status.into()),
            (Facet::Status, SignalKind::Harassment(h)) => FacetValue::Value(h.status.into()),
            (Facet::TransportMode, SignalKind::Harassment(h)) => {
                FacetValue::Value(&h.transport_mode)
            }
            (Facet::TransportMode, SignalKind::RouteScore(r)) => r.transport_mode.as_deref().into(),
            (Facet::VehicleType, SignalKind::Accident(a)) => FacetValue::Value(&a.vehicle_type),
            (Facet::Reporter, SignalKind::Harassment(h)) => FacetValue::Value(h.reporter.into()),
            _ => FacetValue::NotApplicable,
        }
    }
}

/// A set of conjunctive facet selections.
///
/// Several values on the same facet are all required, so two different
/// values on one facet match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    selections: BTreeMap<Facet, Vec<String>>,
}

impl Facets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection on `facet`. Selecting `"all"` clears it.
    pub fn with(mut self, facet: Facet, value: &str) -> Self {
        self.set(facet, value);
        self
    }

    pub fn set(&mut self, facet: Facet, value: &str) {
        if value == ALL {
            self.selections.remove(&facet);
        } else {
            self.selections.insert(facet, vec![value.to_string()]);
        }
    }

    /// Parses `(facet-name, value)` pairs as sent by a view.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownFacet`] for a facet name outside
    /// [`Facet::all`].
    pub fn parse<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut facets = Self::new();
        for (name, value) in pairs {
            let facet: Facet = name
                .as_ref()
                .parse()
                .map_err(|_| EngineError::UnknownFacet(name.as_ref().to_string()))?;
            facets.set(facet, value.as_ref());
        }
        Ok(facets)
    }

    /// Conjunction of two selection sets.
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (facet, values) in &other.selections {
            let entry = merged.selections.entry(*facet).or_default();
            for value in values {
                if !entry.contains(value) {
                    entry.push(value.clone());
                }
            }
        }
        merged
    }

    /// Drops selections on facets outside `enabled`, returning the kept set
    /// and the facets that were dropped.
    pub fn restrict_to(&self, enabled: &[Facet]) -> (Self, Vec<Facet>) {
        let mut kept = Self::new();
        let mut dropped = Vec::new();
        for (facet, values) in &self.selections {
            if enabled.contains(facet) {
                kept.selections.insert(*facet, values.clone());
            } else {
                dropped.push(*facet);
            }
        }
        (kept, dropped)
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Facet, &str)> {
        self.selections
            .iter()
            .flat_map(|(facet, values)| values.iter().map(move |v| (*facet, v.as_str())))
    }

    pub fn matches(&self, record: &SignalRecord) -> bool {
        self.iter()
            .all(|(facet, selected)| match record.facet_value(facet) {
                FacetValue::NotApplicable => true,
                FacetValue::Missing => false,
                FacetValue::Value(actual) => actual == selected,
            })
    }
}

/// Keeps the well-formed records that match every selection, in input order.
pub fn filter<'a, I>(records: I, facets: &Facets) -> Vec<&'a SignalRecord>
where
    I: IntoIterator<Item = &'a SignalRecord>,
{
    let mut seen = 0usize;
    let mut malformed = 0usize;

    let kept: Vec<&SignalRecord> = records
        .into_iter()
        .inspect(|_| seen += 1)
        .filter(|record| {
            if record.is_well_formed() {
                true
            } else {
                malformed += 1;
                debug!(id = %record.id, "Excluding malformed record from filter");
                false
            }
        })
        .filter(|record| facets.matches(record))
        .collect();

    debug!(seen, malformed, kept = kept.len(), "Filter applied");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AccidentDetails, AccidentSeverity, ChatCategory, ChatDetails, HarassmentDetails,
        HarassmentSeverity, ReporterType, RouteMetric, RouteScoreDetails, Status,
    };
    use chrono::{DateTime, TimeZone, Utc};

    #[test]
    fn test_filter_by_severity_returns_single_severe() {
        let records = three_accidents();
        let facets = Facets::new().with(Facet::Severity, "severe");

        let out = filter(&records, &facets);

        assert_eq!(ids(&out), ["a2"]);
    }

    #[test]
    fn test_all_sentinel_keeps_everything() {
        let records = mixed();
        let facets = Facets::new()
            .with(Facet::Severity, "severe")
            .with(Facet::Severity, ALL);

        assert!(facets.is_empty());
        assert_eq!(filter(&records, &facets).len(), records.len());
    }

    #[test]
    fn test_filter_preserves_input_order() {
        let records = mixed();
        let facets = Facets::new().with(Facet::Status, "investigating");

        let out = filter(&records, &facets);

        // chat and route samples have no status and are unaffected
        assert_eq!(ids(&out), ["a1", "h1", "c1", "r1", "r2"]);
    }

    #[test]
    fn test_missing_field_excludes_record() {
        let records = mixed();
        let facets = Facets::new().with(Facet::Route, "Bus Route 45");

        let out = filter(&records, &facets);

        assert_eq!(ids(&out), ["a1", "r1"]);
    }

    #[test]
    fn test_route_score_without_mode_excluded_by_mode_facet() {
        let records = mixed();
        let facets = Facets::new().with(Facet::TransportMode, "bus");

        let out = filter(&records, &facets);

        // h1 is rail; r2 has no transport mode
        assert_eq!(ids(&out), ["a1", "h2", "c1", "r1"]);
    }

    #[test]
    fn test_facets_are_conjunctive() {
        let records = mixed();
        let facets = Facets::new()
            .with(Facet::Category, "danger")
            .with(Facet::VehicleType, "bus");

        let out = filter(&records, &facets);

        // route samples rate the overall metric, not a danger topic
        assert_eq!(ids(&out), ["c1"]);
    }

    #[test]
    fn test_category_selects_route_metric() {
        let mut lighting = route("r3", 8.5, None);
        if let SignalKind::RouteScore(r) = &mut lighting.kind {
            r.metric = RouteMetric::Lighting;
        }
        let mut records = mixed();
        records.push(lighting);

        let out = filter(&records, &Facets::new().with(Facet::Category, "lighting"));

        assert_eq!(ids(&out), ["r3"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = mixed();
        for facets in facet_grid() {
            let once = filter(&records, &facets);
            let twice = filter(once.iter().copied(), &facets);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_union_matches_sequential_filtering() {
        let records = mixed();
        let grid = facet_grid();
        for f1 in &grid {
            for f2 in &grid {
                let combined = filter(&records, &f1.union(f2));
                let sequential = filter(filter(&records, f1), f2);
                assert_eq!(combined, sequential);
            }
        }
    }

    #[test]
    fn test_conflicting_values_on_one_facet_match_nothing_applicable() {
        let records = three_accidents();
        let f1 = Facets::new().with(Facet::Severity, "severe");
        let f2 = Facets::new().with(Facet::Severity, "minor");

        assert!(filter(&records, &f1.union(&f2)).is_empty());
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let mut records = mixed();
        records.push(route("bad", f64::NAN, Some("bus")));

        let out = filter(&records, &Facets::new());

        assert!(out.iter().all(|r| r.id != "bad"));
        assert_eq!(out.len(), records.len() - 1);
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<SignalRecord> = Vec::new();
        assert!(filter(&records, &Facets::new().with(Facet::Status, "resolved")).is_empty());
    }

    #[test]
    fn test_parse_pairs() {
        let facets = Facets::parse([("severity", "high"), ("transport_mode", "all")]).unwrap();
        assert_eq!(facets.iter().collect::<Vec<_>>(), [(Facet::Severity, "high")]);

        let err = Facets::parse([("colour", "red")]).unwrap_err();
        assert_eq!(err, EngineError::UnknownFacet("colour".to_string()));
    }

    #[test]
    fn test_restrict_to_enabled_facets() {
        let facets = Facets::new()
            .with(Facet::Severity, "high")
            .with(Facet::Reporter, "verified");

        let (kept, dropped) = facets.restrict_to(&[Facet::Severity]);

        assert_eq!(kept, Facets::new().with(Facet::Severity, "high"));
        assert_eq!(dropped, [Facet::Reporter]);
    }

    // Helper functions for tests

    fn ids<'a>(records: &[&'a SignalRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn accident(id: &str, severity: AccidentSeverity, casualties: u32) -> SignalRecord {
        SignalRecord::new(
            id,
            at(8),
            SignalKind::Accident(AccidentDetails {
                severity,
                casualties,
                vehicle_type: "bus".to_string(),
                status: Status::Investigating,
                accident_type: None,
                weather: None,
                time_of_day: None,
            }),
        )
    }

    fn route(id: &str, score: f64, mode: Option<&str>) -> SignalRecord {
        SignalRecord::new(
            id,
            at(9),
            SignalKind::RouteScore(RouteScoreDetails {
                score,
                metric: RouteMetric::Overall,
                trend: 0.1,
                transport_mode: mode.map(str::to_string),
                reports: 3,
            }),
        )
    }

    fn three_accidents() -> Vec<SignalRecord> {
        vec![
            accident("a1", AccidentSeverity::Minor, 0),
            accident("a2", AccidentSeverity::Severe, 8),
            accident("a3", AccidentSeverity::Moderate, 1),
        ]
    }

    fn mixed() -> Vec<SignalRecord> {
        vec![
            accident("a1", AccidentSeverity::Minor, 0).with_route("Bus Route 45"),
            SignalRecord::new(
                "h1",
                at(10),
                SignalKind::Harassment(HarassmentDetails {
                    rating: 2,
                    severity: HarassmentSeverity::High,
                    transport_mode: "rail".to_string(),
                    status: Status::Investigating,
                    reporter: ReporterType::Anonymous,
                }),
            ),
            SignalRecord::new(
                "h2",
                at(11),
                SignalKind::Harassment(HarassmentDetails {
                    rating: 4,
                    severity: HarassmentSeverity::Low,
                    transport_mode: "bus".to_string(),
                    status: Status::Resolved,
                    reporter: ReporterType::Verified,
                }),
            ),
            SignalRecord::new(
                "c1",
                at(12),
                SignalKind::Chat(ChatDetails {
                    category: ChatCategory::Danger,
                    likes: 23,
                    replies: 8,
                    username: None,
                }),
            ),
            route("r1", 8.2, Some("bus")).with_route("Bus Route 45"),
            route("r2", 5.4, None),
        ]
    }

    fn facet_grid() -> Vec<Facets> {
        vec![
            Facets::new(),
            Facets::new().with(Facet::Status, "resolved"),
            Facets::new().with(Facet::Severity, "high"),
            Facets::new().with(Facet::Category, "danger"),
            Facets::new().with(Facet::TransportMode, "bus"),
            Facets::new().with(Facet::Route, "Bus Route 45"),
            Facets::new()
                .with(Facet::Reporter, "verified")
                .with(Facet::Status, "resolved"),
        ]
    }
}
