//! Demo collection shipped with the dashboard.
//!
//! Reports carry relative ages ("3 hours ago"), so every builder takes the
//! instant they are relative to. Several reports share an age on purpose;
//! list views rely on stable ordering for them.

use chrono::{DateTime, Duration, Utc};

use crate::model::{
    AccidentDetails, AccidentSeverity, ChatCategory, ChatDetails, HarassmentDetails,
    HarassmentSeverity, ReporterType, RouteMetric, RouteScoreDetails, SignalKind, SignalRecord,
    Status,
};

type AccidentRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    AccidentSeverity,
    &'static str,
    i64,
    u32,
    Status,
    &'static str,
    &'static str,
);

const ACCIDENTS: &[AccidentRow] = &[
    (
        "AZ001",
        "Highway 101 & Main Street Intersection",
        "Bus Route 45",
        "bus",
        AccidentSeverity::Severe,
        "Collision with Vehicle",
        3,
        8,
        Status::Investigating,
        "Rainy",
        "Rush Hour",
    ),
    (
        "AZ002",
        "Downtown Metro Rail Crossing",
        "Metro Line A",
        "train",
        AccidentSeverity::Moderate,
        "Pedestrian Incident",
        24,
        1,
        Status::Investigating,
        "Clear",
        "Evening",
    ),
    (
        "AZ003",
        "Industrial District Loading Zone",
        "Freight Route 12",
        "truck",
        AccidentSeverity::Minor,
        "Loading Dock Collision",
        48,
        0,
        Status::Resolved,
        "Clear",
        "Morning",
    ),
    (
        "AZ004",
        "University Campus Transit Hub",
        "Campus Shuttle",
        "bus",
        AccidentSeverity::Minor,
        "Slip and Fall",
        72,
        1,
        Status::Resolved,
        "Rainy",
        "Afternoon",
    ),
    (
        "AZ005",
        "Electric Bus Charging Station",
        "Green Line Express",
        "electric",
        AccidentSeverity::Moderate,
        "Electrical Malfunction",
        120,
        0,
        Status::Investigating,
        "Clear",
        "Morning",
    ),
    (
        "AZ006",
        "Airport Express Terminal",
        "Airport Shuttle",
        "bus",
        AccidentSeverity::Severe,
        "Brake Failure",
        168,
        12,
        Status::Investigating,
        "Clear",
        "Morning",
    ),
];

type HarassmentRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i32,
    i64,
    ReporterType,
    HarassmentSeverity,
    Status,
);

const HARASSMENT: &[HarassmentRow] = &[
    (
        "HR001",
        "Downtown Metro Station",
        "Metro Line A",
        "rail",
        2,
        2,
        ReporterType::Anonymous,
        HarassmentSeverity::High,
        Status::Investigating,
    ),
    (
        "HR002",
        "Central Bus Terminal",
        "Bus Route 45",
        "bus",
        3,
        5,
        ReporterType::Verified,
        HarassmentSeverity::Medium,
        Status::Reported,
    ),
    (
        "HR003",
        "University District Stop",
        "Bus Route 78",
        "bus",
        4,
        24,
        ReporterType::Anonymous,
        HarassmentSeverity::Low,
        Status::Resolved,
    ),
    (
        "HR004",
        "Financial District Station",
        "Metro Line B",
        "rail",
        1,
        48,
        ReporterType::Verified,
        HarassmentSeverity::High,
        Status::Investigating,
    ),
    (
        "HR005",
        "Shopping Mall Transit Hub",
        "Multiple Routes",
        "mixed",
        3,
        72,
        ReporterType::Anonymous,
        HarassmentSeverity::Medium,
        Status::Reported,
    ),
    (
        "HR006",
        "Airport Express Terminal",
        "Airport Line",
        "rail",
        5,
        96,
        ReporterType::Verified,
        HarassmentSeverity::Low,
        Status::Resolved,
    ),
];

type ChatRow = (
    &'static str,
    &'static str,
    ChatCategory,
    &'static str,
    &'static str,
    u32,
    u32,
    i64,
);

const CHAT: &[ChatRow] = &[
    ("msg001", "SafeCommuter", ChatCategory::Danger, "Central Station", "Metro Line A", 23, 8, 2),
    ("msg002", "DailyRider", ChatCategory::Delay, "Main Street", "Bus Route 45", 15, 4, 3),
    (
        "msg003",
        "StudentTraveler",
        ChatCategory::Story,
        "University District",
        "Night Bus 12",
        47,
        12,
        5,
    ),
    ("msg004", "CommuterMom", ChatCategory::Danger, "Metro Line B", "Downtown Section", 31, 6, 6),
    (
        "msg005",
        "WeekendWarrior",
        ChatCategory::Delay,
        "Downtown Terminal",
        "Express Train",
        19,
        9,
        8,
    ),
    (
        "msg006",
        "NightShiftWorker",
        ChatCategory::Story,
        "Industrial District",
        "Bus Route 67",
        89,
        15,
        12,
    ),
    (
        "msg007",
        "SafetyFirst",
        ChatCategory::Danger,
        "North Station Parking",
        "Multiple Lines",
        26,
        3,
        24,
    ),
    ("msg008", "RegularRider", ChatCategory::Story, "Morning Express", "Metro Line A", 156, 28, 24),
    (
        "msg009",
        "ConcernedCitizen",
        ChatCategory::Danger,
        "Shopping Mall Stops",
        "Multiple Routes",
        42,
        11,
        48,
    ),
    (
        "msg010",
        "ElderlyCommuter",
        ChatCategory::Story,
        "Grocery District",
        "Bus Route 23",
        203,
        34,
        72,
    ),
];

/// Every seeded record: accidents, harassment reports, chat posts, route
/// scores, per-metric and per-mode scores and heat map points.
pub fn all(now: DateTime<Utc>) -> Vec<SignalRecord> {
    let mut records = accident_reports(now);
    records.extend(harassment_reports(now));
    records.extend(chat_posts(now));
    records.extend(route_scores(now));
    records.extend(metric_scores(now));
    records.extend(mode_scores(now));
    records.extend(map_points(now));
    records
}

pub fn accident_reports(now: DateTime<Utc>) -> Vec<SignalRecord> {
    ACCIDENTS
        .iter()
        .map(|&row| {
            let (
                id,
                location,
                route,
                vehicle,
                severity,
                kind,
                hours,
                casualties,
                status,
                weather,
                time_of_day,
            ) = row;
            SignalRecord::new(
                id,
                now - Duration::hours(hours),
                SignalKind::Accident(AccidentDetails {
                    severity,
                    casualties,
                    vehicle_type: vehicle.to_string(),
                    status,
                    accident_type: Some(kind.to_string()),
                    weather: Some(weather.to_string()),
                    time_of_day: Some(time_of_day.to_string()),
                }),
            )
            .with_location(location)
            .with_route(route)
        })
        .collect()
}

pub fn harassment_reports(now: DateTime<Utc>) -> Vec<SignalRecord> {
    HARASSMENT
        .iter()
        .map(|&(id, location, route, mode, rating, hours, reporter, severity, status)| {
            SignalRecord::new(
                id,
                now - Duration::hours(hours),
                SignalKind::Harassment(HarassmentDetails {
                    rating,
                    severity,
                    transport_mode: mode.to_string(),
                    status,
                    reporter,
                }),
            )
            .with_location(location)
            .with_route(route)
        })
        .collect()
}

pub fn chat_posts(now: DateTime<Utc>) -> Vec<SignalRecord> {
    CHAT.iter()
        .map(|&(id, user, category, location, route, likes, replies, hours)| {
            SignalRecord::new(
                id,
                now - Duration::hours(hours),
                SignalKind::Chat(ChatDetails {
                    category,
                    likes,
                    replies,
                    username: Some(user.to_string()),
                }),
            )
            .with_location(location)
            .with_route(route)
        })
        .collect()
}

/// Route list entries. These carry no map position.
pub fn route_scores(now: DateTime<Utc>) -> Vec<SignalRecord> {
    let rows = [
        ("bus-45", "Bus Route 45", "bus", 8.4, 0.3, 5, 23),
        ("metro-a", "Metro Line A", "rail", 7.1, -0.2, 12, 31),
        ("bus-78", "Bus Route 78", "bus", 6.8, 0.1, 18, 18),
        ("uber-downtown", "Downtown Uber Zone", "ridehail", 8.7, 0.4, 3, 45),
        ("metro-b", "Metro Line B", "rail", 5.9, -0.5, 8, 12),
    ];

    rows.into_iter()
        .map(|(id, route, mode, score, trend, minutes, reports)| {
            let timestamp = now - Duration::minutes(minutes);
            route_sample(id, timestamp, RouteMetric::Overall, Some(mode), score, trend, reports)
                .with_route(route)
        })
        .collect()
}

/// Network-wide scores broken down by the rated metric.
pub fn metric_scores(now: DateTime<Utc>) -> Vec<SignalRecord> {
    let rows = [
        ("metric-comfort", RouteMetric::Comfort, 8.1, 0.3, 234),
        ("metric-cleanliness", RouteMetric::Cleanliness, 7.8, 0.1, 189),
        ("metric-harassment", RouteMetric::Harassment, 6.2, -0.2, 45),
        ("metric-lighting", RouteMetric::Lighting, 8.5, 0.4, 67),
    ];

    rows.into_iter()
        .map(|(id, metric, score, trend, reports)| {
            route_sample(id, now, metric, None, score, trend, reports)
        })
        .collect()
}

/// Overall score per transport mode.
pub fn mode_scores(now: DateTime<Utc>) -> Vec<SignalRecord> {
    let rows = [
        ("mode-bus", "bus", 7.4, 0.1, 634),
        ("mode-rail", "rail", 8.2, 0.3, 423),
        ("mode-ridehail", "ridehail", 7.9, -0.1, 190),
    ];

    rows.into_iter()
        .map(|(id, mode, score, trend, reports)| {
            route_sample(id, now, RouteMetric::Overall, Some(mode), score, trend, reports)
        })
        .collect()
}

/// Heat map samples positioned on the normalized map.
pub fn map_points(now: DateTime<Utc>) -> Vec<SignalRecord> {
    let rows = [
        ("map-1", "Bus 45", "bus", 8.2, 25.0, 30.0, 23),
        ("map-2", "Metro A", "rail", 6.1, 60.0, 45.0, 31),
        ("map-3", "Bus 78", "bus", 7.8, 40.0, 70.0, 18),
        ("map-4", "Metro B", "rail", 5.4, 75.0, 25.0, 12),
        ("map-5", "Uber Downtown", "ridehail", 8.7, 20.0, 60.0, 45),
        ("map-6", "Bus 92", "bus", 7.2, 85.0, 55.0, 27),
    ];

    rows.into_iter()
        .map(|(id, route, mode, score, x, y, reports)| {
            route_sample(id, now, RouteMetric::Overall, Some(mode), score, 0.0, reports)
                .with_route(route)
                .with_coordinates(x, y)
        })
        .collect()
}

fn route_sample(
    id: &str,
    timestamp: DateTime<Utc>,
    metric: RouteMetric,
    mode: Option<&str>,
    score: f64,
    trend: f64,
    reports: u32,
) -> SignalRecord {
    SignalRecord::new(
        id,
        timestamp,
        SignalKind::RouteScore(RouteScoreDetails {
            score,
            metric,
            trend,
            transport_mode: mode.map(str::to_string),
            reports,
        }),
    )
}
