#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use construction_schedule::http_api::{self, ScheduleResponse};
use serde_json::json;
use tower::util::ServiceExt;

async fn post_schedule(body: String) -> (StatusCode, ScheduleResponse) {
    let response = http_api::router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/schedule")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let response = http_api::router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, json!({"status": "ok"}));
}

#[tokio::test]
async fn schedule_is_generated_from_payload() {
    let payload = json!({
        "projectStartDate": "2024-01-01",
        "demolition": {
            "enabled": true,
            "duration": 10,
            "scaffolding": {"enabled": true, "erectionDuration": 3, "dismantleDuration": 2}
        }
    });
    let (status, response) = post_schedule(payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response.success);
    assert!(response.error.is_none());
    let schedule = response.schedule.unwrap();
    let ids: Vec<_> = schedule.iter().map(|t| t.task_id.as_str()).collect();
    assert_eq!(ids, vec!["DM.01", "DM.02", "DM.03"]);
    assert_eq!(schedule[2].end_date_text(), "Mon 15.01.24");
}

#[tokio::test]
async fn invalid_start_date_is_bad_request() {
    let (status, response) =
        post_schedule(json!({"projectStartDate": "15-01-2024"}).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!response.success);
    assert!(response.schedule.is_none());
    assert!(response.error.unwrap().contains("15-01-2024"));
}

#[tokio::test]
async fn out_of_range_durations_are_bad_request() {
    for payload in [
        json!({"excavation": {"enabled": true, "volume": 1e300}}),
        json!({"siteEstablishment": {"enabled": true, "mobiliseDuration": 9_000_000_000_000i64}}),
    ] {
        let (status, response) = post_schedule(payload.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert!(!response.success);
        assert!(response.error.unwrap().contains("supported calendar"));
    }
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (status, response) = post_schedule("{\"projectStartDate\": ".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!response.success);
    assert!(response.error.unwrap().starts_with("invalid JSON parameters"));
}

#[tokio::test]
async fn independent_requests_do_not_share_state() {
    let excavation = json!({"enabled": true, "volume": 300});
    let first = json!({"projectStartDate": "2024-01-01", "excavation": excavation});
    let second = json!({"projectStartDate": "2024-06-03", "excavation": excavation});

    let (_, a) = post_schedule(first.to_string()).await;
    let (_, b) = post_schedule(second.to_string()).await;
    let a = a.schedule.unwrap();
    let b = b.schedule.unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].sequence, 1);
    assert_eq!(b[0].start_date_text(), "Mon 03.06.24");
}
