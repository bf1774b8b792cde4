//! Property-based tests for the observation filter.
//!
//! The store-backed properties run a small number of cases, each against a
//! fresh in-memory database.

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::TestApp;
use facility_monitor_api::services::observations::{
    parse_timestamp, Observation, ObservationQuery, Series,
};
use proptest::prelude::*;

const FACILITIES: [&str; 4] = ["Coaster", "Ferris Wheel", "Log Flume", "Carousel"];

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
}

// Strategies for generating test data
fn name_subset_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(FACILITIES.to_vec(), 1..=FACILITIES.len())
}

fn hour_strategy() -> impl Strategy<Value = i64> {
    0i64..48
}

/// Distinct (facility, hour) samples with arbitrary visitor counts
fn samples_strategy() -> impl Strategy<Value = Vec<(usize, i64, i32)>> {
    proptest::collection::btree_map((0..FACILITIES.len(), hour_strategy()), 0i32..500, 0..40)
        .prop_map(|m| m.into_iter().map(|((f, h), v)| (f, h, v)).collect())
}

fn format_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("%Y-%m-%dT%H:%M:%SZ"),
        Just("%Y-%m-%dT%H:%M:%S+00:00"),
        Just("%Y-%m-%d %H:%M:%S"),
        Just("%Y-%m-%dT%H:%M:%S"),
    ]
}

// Property: every supported textual shape denotes the same instant
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn timestamp_shapes_agree(offset_secs in 0i64..(400 * 86_400), format in format_strategy()) {
        let instant = base_time() + Duration::seconds(offset_secs);
        let text = instant.format(format).to_string();
        prop_assert_eq!(parse_timestamp(&text).unwrap(), instant);
    }

    #[test]
    fn blank_facility_lists_always_fail(spaces in proptest::collection::vec(" {0,3}", 1..5)) {
        let joined = spaces.join(",");
        prop_assert!(ObservationQuery::parse(&joined, "2024-05-01", "2024-05-02").is_err());
    }

    #[test]
    fn window_membership_matches_bounds(
        names in name_subset_strategy(),
        start in hour_strategy(),
        end in hour_strategy(),
        at in hour_strategy(),
        facility in 0..FACILITIES.len(),
    ) {
        let start_ts = base_time() + Duration::hours(start);
        let end_ts = base_time() + Duration::hours(end);
        let query = ObservationQuery::new(names.iter().copied(), start_ts, end_ts).unwrap();
        let observation = Observation {
            name: FACILITIES[facility].to_string(),
            record_time: base_time() + Duration::hours(at),
            visitor: 1,
        };

        let expected = names.contains(&FACILITIES[facility]) && start <= at && at <= end;
        prop_assert_eq!(query.matches(&observation), expected);
    }
}

// Property: store results satisfy the filter and are ordered by time
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn store_results_match_filter_and_are_time_ordered(
        samples in samples_strategy(),
        names in name_subset_strategy(),
        start in hour_strategy(),
        end in hour_strategy(),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (rows, expected_len) = runtime.block_on(async {
            let app = TestApp::new().await;
            for (facility, hour, visitor) in &samples {
                app.seed_observation(
                    Series::Raw,
                    FACILITIES[*facility],
                    base_time() + Duration::hours(*hour),
                    *visitor,
                )
                .await;
            }

            let query = ObservationQuery::new(
                names.iter().copied(),
                base_time() + Duration::hours(start),
                base_time() + Duration::hours(end),
            )
            .unwrap();
            let expected_len = samples
                .iter()
                .filter(|(f, h, _)| {
                    names.contains(&FACILITIES[*f]) && start <= *h && *h <= end
                })
                .count();
            let rows = app
                .state
                .services
                .observations
                .query_observations(Series::Raw, &query)
                .await
                .unwrap();
            (rows.into_iter().map(|row| (query.matches(&row), row)).collect::<Vec<_>>(), expected_len)
        });

        prop_assert_eq!(rows.len(), expected_len);
        prop_assert!(rows.iter().all(|(matches, _)| *matches));
        prop_assert!(rows
            .windows(2)
            .all(|pair| pair[0].1.record_time <= pair[1].1.record_time));
    }
}
