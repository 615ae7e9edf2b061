use super::common::*;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::Value;
use tower::ServiceExt;

use crate::tracking::scheduling::StandardWeights;
use crate::tracking::service::DropPointService;
use crate::tracking::{FillStatus, VisitAction};

fn get(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

fn post_json<T: serde::Serialize>(uri: &str, payload: &T) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(payload).expect("payload serializes"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn create_route_registers_and_echoes_the_snapshot() {
    let (service, _) = build_service();
    let router = tracking_router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/drop-points",
            &creation(None, event_time(10, 0)),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("number").and_then(Value::as_u64), Some(1));
    assert_eq!(payload.get("status").and_then(Value::as_str), Some("new"));
    assert_eq!(
        payload.get("description").and_then(Value::as_str),
        Some("Main hall entrance")
    );
}

#[tokio::test]
async fn create_route_collects_validation_problems() {
    let (service, _) = build_service();
    let router = tracking_router_with_service(service);

    let mut request = creation(Some(0), event_time(10, 0));
    request.lat = Some(120.0);
    let response = router
        .oneshot(post_json("/api/v1/drop-points", &request))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let fields: Vec<&str> = payload
        .get("errors")
        .and_then(Value::as_array)
        .expect("errors array")
        .iter()
        .filter_map(|problem| problem.get("field").and_then(Value::as_str))
        .collect();
    assert!(fields.contains(&"number"));
    assert!(fields.contains(&"lat"));
}

#[tokio::test]
async fn create_handler_returns_conflict_when_the_store_races() {
    let service = Arc::new(DropPointService::new(
        Arc::new(ConflictStore),
        priority_config(),
    ));

    let response = crate::tracking::router::create_handler::<ConflictStore, StandardWeights>(
        State(service),
        axum::Json(creation(Some(1), event_time(10, 0))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn info_route_is_not_found_for_unknown_numbers() {
    let (service, _) = build_service();
    let router = tracking_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/drop-points/99"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_route_applies_the_event() {
    let (service, _) = build_service();
    service
        .create(creation(Some(1), event_time(10, 0)))
        .expect("create");
    let router = tracking_router_with_service(service);

    let body = serde_json::json!({
        "status": "full",
        "time": event_time(11, 0),
    });
    let response = router
        .oneshot(post_json("/api/v1/drop-points/1/reports", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status").and_then(Value::as_str), Some("full"));
    assert_eq!(payload.get("reports_new").and_then(Value::as_u64), Some(1));
}

#[tokio::test]
async fn visit_route_resets_the_backlog() {
    let (service, _) = build_service();
    service
        .create(creation(Some(1), event_time(10, 0)))
        .expect("create");
    service
        .submit_report(1, FillStatus::Full, Some(event_time(11, 0)))
        .expect("report");
    let router = tracking_router_with_service(service);

    let body = serde_json::json!({
        "action": "emptied",
        "time": event_time(12, 0),
    });
    let response = router
        .oneshot(post_json("/api/v1/drop-points/1/visits", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("status").and_then(Value::as_str),
        Some("emptied")
    );
    assert_eq!(payload.get("reports_new").and_then(Value::as_u64), Some(0));
}

#[tokio::test]
async fn mutations_on_unknown_targets_are_unprocessable() {
    let (service, _) = build_service();
    let router = tracking_router_with_service(service);

    let body = serde_json::json!({ "action": "emptied" });
    let response = router
        .oneshot(post_json("/api/v1/drop-points/99/visits", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let fields: Vec<&str> = payload
        .get("errors")
        .and_then(Value::as_array)
        .expect("errors array")
        .iter()
        .filter_map(|problem| problem.get("field").and_then(Value::as_str))
        .collect();
    assert_eq!(fields, vec!["drop_point"]);
}

#[tokio::test]
async fn delete_route_retires_the_drop_point() {
    let (service, _) = build_service();
    service
        .create(creation(Some(1), event_time(10, 0)))
        .expect("create");
    let router = tracking_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::delete("/api/v1/drop-points/1?at=2026-08-21T12:00:00Z")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("removed").and_then(Value::as_bool), Some(true));
    assert_eq!(payload.get("priority").and_then(Value::as_f64), Some(0.0));
}

#[tokio::test]
async fn queue_route_ranks_with_a_pinned_clock() {
    let (service, _) = build_service();
    service
        .create(creation(Some(1), event_time(10, 0)))
        .expect("create 1");
    service
        .create(creation(Some(2), event_time(10, 0)))
        .expect("create 2");
    service
        .submit_report(2, FillStatus::Overflowing, Some(event_time(11, 0)))
        .expect("report");
    let router = tracking_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/queue?at=2026-08-21T12:00:00Z"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let numbers: Vec<u64> = payload
        .as_array()
        .expect("queue array")
        .iter()
        .filter_map(|info| info.get("number").and_then(Value::as_u64))
        .collect();
    assert_eq!(numbers, vec![2, 1]);
    let scores: Vec<f64> = payload
        .as_array()
        .expect("queue array")
        .iter()
        .filter_map(|info| info.get("priority").and_then(Value::as_f64))
        .collect();
    assert_eq!(scores, vec![9.0, 1.0]);
}

#[tokio::test]
async fn timeline_route_returns_tagged_events() {
    let (service, _) = build_service();
    service
        .create(creation(Some(1), event_time(10, 0)))
        .expect("create");
    service
        .record_visit(1, VisitAction::Emptied, Some(event_time(12, 0)))
        .expect("visit");
    let router = tracking_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/drop-points/1/timeline"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let events: Vec<&str> = payload
        .as_array()
        .expect("timeline array")
        .iter()
        .filter_map(|event| event.get("event").and_then(Value::as_str))
        .collect();
    assert_eq!(events, vec!["visited", "relocated", "created"]);
}

#[tokio::test]
async fn stats_route_reports_fleet_counts() {
    let (service, _) = build_service();
    service
        .create(creation(Some(1), event_time(10, 0)))
        .expect("create");
    service
        .submit_report(1, FillStatus::Full, Some(event_time(11, 0)))
        .expect("report");
    let router = tracking_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/stats"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("drop_points_total").and_then(Value::as_u64),
        Some(1)
    );
    assert_eq!(payload.get("reports_total").and_then(Value::as_u64), Some(1));
}

#[tokio::test]
async fn next_number_route_prefills_creation_forms() {
    let (service, _) = build_service();
    service
        .create(creation(Some(3), event_time(10, 0)))
        .expect("create");
    let router = tracking_router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/drop-points/next-number"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("next_free_number").and_then(Value::as_u64),
        Some(4)
    );
}

#[tokio::test]
async fn degraded_store_maps_to_service_unavailable() {
    let service = Arc::new(DropPointService::new(
        Arc::new(UnavailableStore),
        priority_config(),
    ));

    let response = crate::tracking::router::stats_handler::<UnavailableStore, StandardWeights>(
        State(service),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
