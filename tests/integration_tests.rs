use chrono::{DateTime, Duration, TimeZone, Utc};
use transit_safety::engine::{
    Facet, Facets, MarkerSize, SortDirection, SortKey, ThresholdTable, aggregate, aggregate_by,
    bin, bucket, filter, sort,
};
use transit_safety::engine::filter::FacetValue;
use transit_safety::model::Status;
use transit_safety::parser::parse_records;
use transit_safety::{Engine, EngineConfig, EngineError, SignalRecord, seed};

fn fixture() -> Vec<SignalRecord> {
    let bytes = include_bytes!("fixtures/records.json");
    parse_records(bytes).expect("Failed to parse fixture").records
}

fn ids(records: &[&SignalRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_fixture_skips_unknown_kinds() {
    let batch = parse_records(include_bytes!("fixtures/records.json")).unwrap();
    assert_eq!(batch.records.len(), 10);
    assert_eq!(batch.rejected, 1);
}

#[test]
fn test_severity_sort_most_severe_first() {
    let records = fixture();
    let accidents: Vec<_> = ["a3", "a1", "a2"]
        .iter()
        .map(|id| records.iter().find(|r| r.id == *id).unwrap())
        .collect();

    let sorted = sort(accidents, SortKey::SeverityRank, None).unwrap();

    assert_eq!(ids(&sorted), ["a1", "a2", "a3"]);
}

#[test]
fn test_filter_severe_excludes_malformed() {
    let records = fixture();
    let facets = Facets::new().with(Facet::Severity, "severe");

    let out = filter(&records, &facets);

    // severity does not apply to chat posts or route scores, so they pass;
    // the record with an empty id is severe but malformed
    assert_eq!(ids(&out), ["a1", "c1", "c2", "r1", "r2"]);
}

#[test]
fn test_bucket_just_below_good() {
    let table = ThresholdTable::safety_score();
    assert_eq!(bucket(7.9, &table).label, "caution");
}

#[test]
fn test_aggregate_empty_collection() {
    let summary = aggregate(std::iter::empty(), &ThresholdTable::default());

    assert_eq!(summary.total_records, 0);
    assert!(summary.count_by_tier.is_empty());
    for status in Status::all() {
        assert_eq!(summary.status_count(*status), 0);
    }
    assert_eq!(summary.resolution_rate, 0.0);
    assert_eq!(summary.mean_score, None);
}

#[test]
fn test_aggregate_fixture() {
    let records = fixture();
    let summary = aggregate(&records, &ThresholdTable::safety_score());

    assert_eq!(summary.total_records, 9);
    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.total_casualties, 4);
    assert_eq!(summary.total_likes, 50);
    assert_eq!(summary.total_replies, 7);

    assert_eq!(summary.status_count(Status::Reported), 1);
    assert_eq!(summary.status_count(Status::Investigating), 2);
    assert_eq!(summary.status_count(Status::Resolved), 2);
    assert!((summary.resolution_rate - 2.0 / 9.0).abs() < 1e-9);

    assert!((summary.mean_score.unwrap() - 5.075).abs() < 1e-9);
    assert!((summary.mean_trend.unwrap() + 0.1).abs() < 1e-9);

    assert_eq!(summary.tier_count("accident", "severe"), 1);
    assert_eq!(summary.tier_count("harassment", "medium"), 0);
    assert_eq!(summary.tier_count("chat", "general"), 0);
    assert_eq!(summary.tier_count("route_score", "good"), 1);
    assert_eq!(summary.tier_count("route_score", "caution"), 0);
    assert_eq!(summary.tier_count("route_score", "risk"), 1);
    assert_eq!(summary.tier_total(), 9);
}

#[test]
fn test_recency_sort_keeps_ties_in_input_order() {
    let records = fixture();

    let sorted = sort(&records, SortKey::Recency, None).unwrap();

    assert_eq!(
        ids(&sorted),
        ["r1", "r2", "c1", "c2", "h1", "a1", "a2", "a3", "h2"]
    );
}

#[test]
fn test_sort_on_unsupported_variant_fails() {
    let records = fixture();

    let err = sort(&records, SortKey::Casualties, Some(SortDirection::Descending)).unwrap_err();

    assert!(matches!(err, EngineError::InvalidKey { key: "casualties", .. }));
}

#[test]
fn test_heatmap_regions() {
    let records = fixture();

    let regions = bin(&records, 40.0, &ThresholdTable::safety_score()).unwrap();

    let summary: Vec<_> = regions
        .iter()
        .map(|r| (r.record_id.as_str(), r.tier.label.as_str(), r.marker))
        .collect();
    assert_eq!(
        summary,
        [
            ("a1", "severe", MarkerSize::Large),
            ("r1", "good", MarkerSize::Small),
            ("r2", "risk", MarkerSize::Large),
        ]
    );
    assert!(regions.iter().all(|r| r.radius == 40.0));
}

#[test]
fn test_full_pipeline_with_config_file() {
    let path = format!(
        "{}/transit_safety_integration_config.json",
        std::env::temp_dir().display()
    );
    std::fs::write(
        &path,
        r#"{"facets": ["transport_mode", "route"], "heatmap_radius": 15}"#,
    )
    .unwrap();
    let engine = Engine::new(EngineConfig::load(&path).unwrap());
    std::fs::remove_file(&path).unwrap();

    let records = fixture();
    let facets = Facets::parse([("transport_mode", "bus"), ("severity", "high")]).unwrap();

    // severity is not enabled, so only the transport mode selection applies
    let selected = engine.filter(&records, &facets);
    assert_eq!(ids(&selected), ["a1", "a2", "a3", "h2", "c1", "c2", "r1"]);

    let regions = engine.bin(selected.iter().copied()).unwrap();
    let located: Vec<_> = regions.iter().map(|r| r.record_id.as_str()).collect();
    assert_eq!(located, ["a1", "r1"]);
    assert!(regions.iter().all(|r| r.radius == 15.0));

    let summary = engine.aggregate(selected);
    assert_eq!(summary.total_records, 7);
    assert!((summary.resolution_rate - 2.0 / 7.0).abs() < 1e-9);
}

#[test]
fn test_filter_properties_over_seed() {
    let records = seed::all(anchor());

    for facet in Facet::all() {
        let mut values: Vec<String> = records
            .iter()
            .filter_map(|r| match r.facet_value(*facet) {
                FacetValue::Value(v) => Some(v.to_string()),
                _ => None,
            })
            .collect();
        values.sort();
        values.dedup();

        for value in &values {
            let facets = Facets::new().with(*facet, value);
            let once = filter(&records, &facets);
            let twice = filter(once.iter().copied(), &facets);
            assert_eq!(ids(&once), ids(&twice), "{facet}={value}");
            assert!(!once.is_empty(), "{facet}={value}");
        }
    }
}

#[test]
fn test_filter_union_matches_sequential_filtering() {
    let records = seed::all(anchor());
    let by_mode = Facets::new().with(Facet::TransportMode, "rail");
    let by_severity = Facets::new().with(Facet::Severity, "high");

    let combined = filter(&records, &by_mode.union(&by_severity));
    let sequential = filter(filter(&records, &by_mode), &by_severity);

    assert_eq!(ids(&combined), ids(&sequential));

    let harassment: Vec<_> = combined
        .iter()
        .filter(|r| r.variant() == "harassment")
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(harassment, ["HR001", "HR004"]);
}

#[test]
fn test_aggregate_totals_over_seed() {
    let records = seed::all(anchor());

    for table in [
        ThresholdTable::safety_score(),
        ThresholdTable::route_status(),
        ThresholdTable::rating(),
    ] {
        let summary = aggregate(&records, &table);
        assert_eq!(summary.total_records, records.len());
        assert_eq!(summary.tier_total(), records.len());
        assert!((0.0..=1.0).contains(&summary.resolution_rate));
    }
}

#[test]
fn test_route_metric_breakdown_over_seed() {
    let records = seed::all(anchor());
    let route_scores = records.iter().filter(|r| r.variant() == "route_score");

    let groups = aggregate_by(route_scores, Facet::Category, &ThresholdTable::safety_score());

    assert_eq!(
        groups.keys().collect::<Vec<_>>(),
        ["cleanliness", "comfort", "harassment", "lighting", "overall"]
    );
    assert_eq!(groups["lighting"].mean_score, Some(8.5));
    assert_eq!(groups["lighting"].tier_count("route_score", "good"), 1);
    assert_eq!(groups["harassment"].tier_count("route_score", "caution"), 1);
    assert_eq!(groups["overall"].total_records, 14);
}

#[test]
fn test_mode_scores_group_by_transport_mode() {
    let modes = seed::mode_scores(anchor());

    let groups = aggregate_by(&modes, Facet::TransportMode, &ThresholdTable::safety_score());

    assert_eq!(groups["bus"].mean_score, Some(7.4));
    assert_eq!(groups["rail"].mean_score, Some(8.2));
    assert_eq!(groups["ridehail"].mean_score, Some(7.9));
}

#[test]
fn test_seed_recency_ties_are_stable() {
    let records = seed::all(anchor());

    let sorted = sort(&records, SortKey::Recency, None).unwrap();

    let day_old: Vec<_> = sorted
        .iter()
        .filter(|r| r.timestamp == anchor() - Duration::hours(24))
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(day_old, ["AZ002", "HR003", "msg007", "msg008"]);
}

#[test]
fn test_bucket_is_monotonic() {
    for table in [
        ThresholdTable::safety_score(),
        ThresholdTable::route_status(),
        ThresholdTable::rating(),
    ] {
        let mut previous = 0;
        for step in -20..=120 {
            let rank = bucket(f64::from(step) / 10.0, &table).rank;
            assert!(rank >= previous);
            previous = rank;
        }
        assert_eq!(previous, table.highest_rank());
    }
}
