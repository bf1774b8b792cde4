mod common;

use axum::http::StatusCode;
use common::{json_ts, ts, TestApp};
use serde_json::Value;

/// Coaster sampled twice, Ferris Wheel once and later, Log Flume never.
async fn dashboard_app(adjust: impl FnOnce(&mut facility_monitor_api::config::AppConfig)) -> TestApp {
    let app = TestApp::with_config(adjust).await;
    app.seed_facility(1, "Coaster").await;
    app.seed_facility(2, "Ferris Wheel").await;
    app.seed_facility(3, "Log Flume").await;

    app.seed_queue_sample(1, 12, 9, ts("2024-05-01T10:00:00Z")).await;
    app.seed_queue_sample(1, 7, 5, ts("2024-05-01T10:30:00Z")).await;
    app.seed_queue_sample(2, 3, 2, ts("2024-05-01T11:00:00Z")).await;
    app
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|row| row["facility_id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn fixed_data_lists_every_facility_by_id() {
    let app = dashboard_app(|_| {}).await;

    let (status, body) = app.get_json("/api/fixed-data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3]);
    assert_eq!(body[0]["name"], "Coaster");
    assert_eq!(body[0]["maximum_capacity"], 20);
    assert_eq!(body[0]["runtime"], "09:00-21:00");
}

#[tokio::test]
async fn snapshot_joins_latest_sample_most_recent_first() {
    let app = dashboard_app(|_| {}).await;

    let (status, body) = app.get_json("/api/facilities").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2, 1, 3]);

    let coaster = &body[1];
    assert_eq!(coaster["current_queue"], 7);
    assert_eq!(coaster["wait_time"], 5);
    assert_eq!(json_ts(&coaster["record_time"]), ts("2024-05-01T10:30:00Z"));
}

#[tokio::test]
async fn snapshot_reports_unsampled_facility_as_null_not_zero() {
    let app = dashboard_app(|_| {}).await;

    let (_, body) = app.get_json("/api/facilities").await;

    let flume = &body[2];
    assert_eq!(flume["name"], "Log Flume");
    assert!(flume["current_queue"].is_null());
    assert!(flume["wait_time"].is_null());
    assert!(flume["record_time"].is_null());
}

#[tokio::test]
async fn snapshot_limit_is_capped_by_dashboard_size() {
    let app = dashboard_app(|cfg| cfg.dashboard_limit = 2).await;

    let (_, body) = app.get_json("/api/facilities").await;
    assert_eq!(ids(&body), vec![2, 1]);

    let (_, body) = app.get_json("/api/facilities?limit=50").await;
    assert_eq!(ids(&body), vec![2, 1]);

    let (_, body) = app.get_json("/api/facilities?limit=1").await;
    assert_eq!(ids(&body), vec![2]);
}

#[tokio::test]
async fn queue_tracker_returns_latest_sample_per_facility() {
    let app = dashboard_app(|_| {}).await;
    let queue = &app.state.services.queue;

    let coaster = queue.latest_sample(1).await.unwrap().expect("coaster sample");
    assert_eq!(coaster.current_queue, 7);
    assert_eq!(coaster.record_time, ts("2024-05-01T10:30:00Z"));

    assert!(queue.latest_sample(3).await.unwrap().is_none());

    let latest = queue.latest_samples().await.unwrap();
    let facility_ids: Vec<i32> = latest.iter().map(|s| s.facility_id).collect();
    assert_eq!(facility_ids, vec![1, 2]);
    assert_eq!(latest[0].current_queue, 7);
}

#[tokio::test]
async fn snapshot_is_stable_without_writes() {
    let app = dashboard_app(|_| {}).await;

    let (_, first) = app.get_json("/api/facilities").await;
    let (_, second) = app.get_json("/api/facilities").await;

    assert_eq!(first, second);
}
