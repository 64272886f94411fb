//! End-to-end service-map building over hand-written feeds.

use std::collections::HashMap;

use chrono::Weekday;
use proptest::prelude::*;
use transitmap_core::trip::{WEEKDAYS, WEEKEND};
use transitmap_core::{
    GroupConfig, RouteGroupKey, RouteTrips, ServiceDays, ServiceMapBuilder, ServiceMapsConfig,
    StopRoutesIndex, StopTree, Trip, TripSource, filter_trips_by_frequency, load_config,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn trip(id: &str, route: &str, stops: &[&str], days: &[Weekday], start_hour: u32) -> Trip {
    Trip {
        id: id.into(),
        route_id: route.into(),
        direction_id: None,
        days: ServiceDays::only(days),
        start_time: Some(start_hour * 3600),
        end_time: Some(start_hour * 3600 + 2400),
        stop_ids: stops.iter().map(|s| (*s).to_string()).collect(),
    }
}

fn inbound(mut trip: Trip) -> Trip {
    trip.direction_id = Some(true);
    trip.stop_ids.reverse();
    trip
}

fn config() -> ServiceMapsConfig {
    ServiceMapsConfig {
        groups: vec![
            GroupConfig {
                threshold: 0.1,
                ..GroupConfig::new("all_times", TripSource::Schedule)
            },
            GroupConfig {
                conditions: Some(serde_json::json!({ "weekend": true, "weekday": false })),
                use_for_routes_at_stop: true,
                ..GroupConfig::new("weekend", TripSource::Schedule)
            },
            GroupConfig::new("realtime", TripSource::Realtime),
        ],
    }
}

/// Platforms `N`/`S` of each numbered station.
fn stations() -> StopTree {
    StopTree::from_pairs(
        ["1", "2", "3", "4", "5", "6"]
            .into_iter()
            .flat_map(|station| {
                [(format!("{station}N"), station), (format!("{station}S"), station)]
            }),
    )
}

/// A trunk 1-2-3 that splits into 4 and 5-6, a weekday express skipping 2,
/// one rare diversion and inbound trips.
fn red_line() -> RouteTrips {
    let mut trips = Vec::new();
    for i in 0..4 {
        trips.push(trip(&format!("r4-{i}"), "R", &["1N", "2N", "3N", "4N"], &WEEKDAYS, 8 + i));
        let branch = ["1N", "2N", "3N", "5N", "6N"];
        trips.push(trip(&format!("r6-{i}"), "R", &branch, &WEEKDAYS, 9 + i));
        let back = ["1S", "2S", "3S", "4S"];
        trips.push(inbound(trip(&format!("in-{i}"), "R", &back, &WEEKDAYS, 16)));
    }
    trips.push(trip("express", "R", &["1N", "3N", "4N"], &WEEKDAYS, 7));
    trips.push(trip("express-2", "R", &["1N", "3N", "4N"], &WEEKDAYS, 17));
    trips.push(trip("weekend", "R", &["1N", "2N", "3N"], &WEEKEND, 10));
    trips.push(trip("diverted", "R", &["1N", "6N", "3N"], &[Weekday::Tue], 3));
    RouteTrips {
        route_id: "R".into(),
        source: TripSource::Schedule,
        trips,
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

#[test]
fn branching_line_builds_ordered_map() {
    let config = config();
    let stops = stations();
    let builder = ServiceMapBuilder::new(&config, &stops).expect("valid config");

    let updates = builder.rebuild(&[red_line()], &HashMap::new());
    let keys: Vec<String> = updates.iter().map(|u| u.key.to_string()).collect();
    assert_eq!(keys, ["R/all_times", "R/weekend"]);

    // The rare diversion is filtered out; the express merges into the trunk.
    let all_times: Vec<&str> = updates[0].map.stop_ids().collect();
    assert_eq!(all_times, ["1", "2", "3", "4", "5", "6"]);
    let positions: Vec<usize> = updates[0].map.stops.iter().map(|s| s.position).collect();
    assert_eq!(positions, [0, 1, 2, 3, 4, 5]);

    let weekend: Vec<&str> = updates[1].map.stop_ids().collect();
    assert_eq!(weekend, ["1", "2", "3"]);
}

#[test]
fn unchanged_path_sets_are_skipped() {
    let config = config();
    let stops = stations();
    let builder = ServiceMapBuilder::new(&config, &stops).expect("valid config");
    let mut route = red_line();

    let first = builder.rebuild(std::slice::from_ref(&route), &HashMap::new());
    let stored: HashMap<RouteGroupKey, String> = first
        .iter()
        .map(|update| (update.key.clone(), update.hash.clone()))
        .collect();

    // Reordering trips does not change the path set.
    route.trips.reverse();
    assert!(builder.rebuild(std::slice::from_ref(&route), &stored).is_empty());

    // A new weekend pattern changes only the weekend group.
    route
        .trips
        .push(trip("weekend-long", "R", &["1N", "2N", "3N", "4N"], &WEEKEND, 12));
    let changed = builder.rebuild(std::slice::from_ref(&route), &stored);
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].key, RouteGroupKey::new("R", "weekend"));
    assert_eq!(changed[0].map.stop_ids().collect::<Vec<_>>(), ["1", "2", "3", "4"]);
}

#[test]
fn cyclic_route_yields_empty_map() {
    let config = config();
    let stops = StopTree::new();
    let builder = ServiceMapBuilder::new(&config, &stops).expect("valid config");
    let route = RouteTrips {
        route_id: "L".into(),
        source: TripSource::Realtime,
        trips: vec![
            trip("a", "L", &["a", "b", "c"], &WEEKDAYS, 8),
            trip("b", "L", &["c", "d", "a"], &WEEKDAYS, 9),
        ],
    };
    let updates = builder.rebuild(&[route], &HashMap::new());
    assert_eq!(updates.len(), 1);
    assert!(updates[0].map.is_empty());
    assert!(updates[0].hash.starts_with("blake3:"));
}

#[test]
fn zero_trips_give_empty_maps() {
    let config = config();
    let stops = StopTree::new();
    let builder = ServiceMapBuilder::new(&config, &stops).expect("valid config");
    let route = RouteTrips {
        route_id: "Z".into(),
        source: TripSource::Schedule,
        trips: Vec::new(),
    };
    let updates = builder.rebuild(&[route], &HashMap::new());
    assert_eq!(updates.len(), 2);
    assert!(updates.iter().all(|update| update.map.is_empty()));
}

#[test]
fn routes_at_stop_uses_flagged_groups() {
    let config = config();
    let stops = stations();
    let builder = ServiceMapBuilder::new(&config, &stops).expect("valid config");
    let mut green = red_line();
    green.route_id = "G".into();
    for trip in &mut green.trips {
        trip.route_id = "G".into();
    }

    let updates = builder.rebuild(&[red_line(), green], &HashMap::new());
    let index = StopRoutesIndex::from_service_maps(updates.iter().map(|u| &u.map), &config);

    let at_two = index.routes_at_stop("2", &stops);
    assert_eq!(at_two.len(), 1);
    assert_eq!(at_two[0].group, "weekend");
    assert_eq!(at_two[0].route_ids, ["G", "R"]);

    // Station 5 only appears in the weekday-heavy all_times map.
    assert!(index.routes_at_stop("5", &stops)[0].route_ids.is_empty());
}

#[test]
fn config_file_drives_the_builder() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("service_maps.toml");
    std::fs::write(
        &path,
        r#"
[[groups]]
name = "early"
source = "schedule"

[groups.conditions]
starts_later_than = 5
starts_earlier_than = 8
"#,
    )
    .expect("write config");

    let config = load_config(&path).expect("valid config");
    let stops = stations();
    let builder = ServiceMapBuilder::new(&config, &stops).expect("valid config");
    let updates = builder.rebuild(&[red_line()], &HashMap::new());
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].map.stop_ids().collect::<Vec<_>>(), ["1", "3", "4"]);
}

// ---------------------------------------------------------------------------
// Frequency filter properties
// ---------------------------------------------------------------------------

fn arb_trips() -> impl Strategy<Value = Vec<Trip>> {
    prop::collection::vec(prop::collection::vec(0_u8..4, 1..4), 0..30).prop_map(|patterns| {
        patterns
            .into_iter()
            .enumerate()
            .map(|(i, stops)| Trip {
                id: i.to_string(),
                route_id: "P".into(),
                direction_id: None,
                days: ServiceDays::every_day(),
                start_time: None,
                end_time: None,
                stop_ids: stops.iter().map(u8::to_string).collect(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn zero_threshold_keeps_every_pattern(trips in arb_trips()) {
        let refs: Vec<&Trip> = trips.iter().collect();
        let kept = filter_trips_by_frequency(&refs, 0.0);
        let mut patterns: Vec<&Vec<String>> = trips.iter().map(|t| &t.stop_ids).collect();
        patterns.sort();
        patterns.dedup();
        prop_assert_eq!(kept.len(), patterns.len());
    }

    #[test]
    fn full_threshold_keeps_only_a_unanimous_pattern(trips in arb_trips()) {
        let refs: Vec<&Trip> = trips.iter().collect();
        let kept = filter_trips_by_frequency(&refs, 1.0);
        let unanimous = trips
            .first()
            .is_some_and(|first| trips.iter().all(|t| t.stop_ids == first.stop_ids));
        prop_assert_eq!(kept.len(), usize::from(unanimous));
    }
}
