mod common;

use axum::http::StatusCode;
use common::{json_ts, ts, TestApp};
use facility_monitor_api::services::working_log::{LogPage, NewLogEntry};
use serde_json::{json, Value};

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn appended_entry_is_listed_first_with_server_fields() {
    let app = TestApp::new().await;
    let before = chrono::Utc::now();

    app.post_json(
        "/api/logs",
        json!({ "facility": "Ferris Wheel", "log_type": "info", "message": "opened" }),
    )
    .await;
    let (status, created) = app
        .post_json(
            "/api/logs",
            json!({ "facility": "Coaster", "log_type": "incident", "message": "stopped" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_i64().is_some());
    assert!(json_ts(&created["timestamp"]) >= before);

    let (status, body) = app.get_json("/api/logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0], created);
    assert_eq!(body[0]["message"], "stopped");
}

#[tokio::test]
async fn listing_is_newest_first() {
    let app = TestApp::new().await;
    for n in 0..4 {
        app.post_json("/api/logs", json!({ "message": format!("entry {}", n) }))
            .await;
    }

    let (_, body) = app.get_json("/api/logs").await;

    let listed = ids(&body);
    assert_eq!(listed.len(), 4);
    assert!(listed.windows(2).all(|pair| pair[0] > pair[1]));
    let times: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| json_ts(&row["timestamp"]))
        .collect();
    assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn empty_entry_is_accepted() {
    let app = TestApp::new().await;

    let (status, body) = app.post_json("/api/logs", json!({})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["facility"].is_null());
    assert!(body["log_type"].is_null());
    assert!(body["message"].is_null());
}

#[tokio::test]
async fn oversized_field_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post_json("/api/logs", json!({ "log_type": "x".repeat(65) }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get_json("/api/logs").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn limit_and_cursor_page_through_the_log() {
    let app = TestApp::new().await;
    let service = &app.state.services.working_log;
    for n in 0..5 {
        service
            .append_log(NewLogEntry {
                message: Some(format!("entry {}", n)),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let (_, first_page) = app.get_json("/api/logs?limit=2").await;
    let first = ids(&first_page);
    assert_eq!(first.len(), 2);

    let (_, second_page) = app
        .get_json(&format!("/api/logs?limit=2&before_id={}", first[1]))
        .await;
    let second = ids(&second_page);
    assert_eq!(second.len(), 2);
    assert!(second.iter().all(|id| *id < first[1]));

    let rest = service
        .list_logs(LogPage {
            limit: 10,
            before_id: Some(second[1]),
        })
        .await
        .unwrap();
    assert_eq!(rest.len(), 1);
}

#[tokio::test]
async fn page_size_is_capped_by_configuration() {
    let app = TestApp::with_config(|cfg| {
        cfg.log_page_default = 2;
        cfg.log_page_max = 3;
    })
    .await;
    for _ in 0..5 {
        app.post_json("/api/logs", json!({ "log_type": "info" })).await;
    }

    let (_, body) = app.get_json("/api/logs").await;
    assert_eq!(ids(&body).len(), 2);

    let (_, body) = app.get_json("/api/logs?limit=100").await;
    assert_eq!(ids(&body).len(), 3);
}

#[tokio::test]
async fn repeated_listing_is_identical() {
    let app = TestApp::new().await;
    app.post_json("/api/logs", json!({ "message": "stopped" })).await;

    let (_, first) = app.get_json("/api/logs").await;
    let (_, second) = app.get_json("/api/logs").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn paging_follows_timestamps_when_ids_disagree() {
    let app = TestApp::new().await;
    // Later ids carry earlier timestamps, as concurrent appends can produce.
    let newest = app.seed_log_entry("a", ts("2024-05-01T10:00:05Z")).await;
    let tied_low = app.seed_log_entry("b", ts("2024-05-01T10:00:04Z")).await;
    let tied_high = app.seed_log_entry("c", ts("2024-05-01T10:00:04Z")).await;
    let older = app.seed_log_entry("d", ts("2024-05-01T10:00:02Z")).await;
    let oldest = app.seed_log_entry("e", ts("2024-05-01T10:00:01Z")).await;

    let mut walked = Vec::new();
    let mut uri = "/api/logs?limit=2".to_string();
    loop {
        let (status, body) = app.get_json(&uri).await;
        assert_eq!(status, StatusCode::OK);
        let page = ids(&body);
        let Some(last) = page.last().copied() else {
            break;
        };
        walked.extend(page);
        uri = format!("/api/logs?limit=2&before_id={}", last);
    }

    assert_eq!(walked, vec![newest, tied_high, tied_low, older, oldest]);
}

#[tokio::test]
async fn unknown_cursor_is_rejected() {
    let app = TestApp::new().await;
    app.post_json("/api/logs", json!({ "message": "opened" })).await;

    let (status, body) = app.get_json("/api/logs?before_id=999").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn unparsable_paging_parameter_gets_the_error_shape() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/api/logs?limit=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn mistyped_field_gets_the_error_shape() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json("/api/logs", json!({ "message": 42 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    let (_, body) = app.get_json("/api/logs").await;
    assert_eq!(body, json!([]));
}
