use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FillStatus, VisitAction};
use super::scheduling::ReportWeighting;
use super::service::{DropPointService, DropPointServiceError, InfoFilter};
use super::store::{DropPointStore, StoreError};
use super::validation::{NewDropPoint, NewLocation};

/// Router builder exposing HTTP endpoints for the tracking workflow.
pub fn tracking_router<S, W>(service: Arc<DropPointService<S, W>>) -> Router
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    Router::new()
        .route(
            "/api/v1/drop-points",
            get(list_handler::<S, W>).post(create_handler::<S, W>),
        )
        .route(
            "/api/v1/drop-points/next-number",
            get(next_number_handler::<S, W>),
        )
        .route(
            "/api/v1/drop-points/:number",
            get(info_handler::<S, W>).delete(remove_handler::<S, W>),
        )
        .route(
            "/api/v1/drop-points/:number/reports",
            post(report_handler::<S, W>),
        )
        .route(
            "/api/v1/drop-points/:number/visits",
            post(visit_handler::<S, W>),
        )
        .route(
            "/api/v1/drop-points/:number/location",
            post(relocate_handler::<S, W>),
        )
        .route(
            "/api/v1/drop-points/:number/timeline",
            get(timeline_handler::<S, W>),
        )
        .route("/api/v1/queue", get(queue_handler::<S, W>))
        .route("/api/v1/stats", get(stats_handler::<S, W>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    category: Option<String>,
    changed_since: Option<DateTime<Utc>>,
    at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AtQuery {
    at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportBody {
    status: FillStatus,
    #[serde(default)]
    time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VisitBody {
    action: VisitAction,
    #[serde(default)]
    time: Option<DateTime<Utc>>,
}

pub(crate) async fn list_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    let filter = InfoFilter {
        category: query.category,
        changed_since: query.changed_since,
    };
    match service.list(&filter, query.at) {
        Ok(infos) => (StatusCode::OK, axum::Json(infos)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    axum::Json(request): axum::Json<NewDropPoint>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.create(request) {
        Ok(info) => (StatusCode::CREATED, axum::Json(info)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn next_number_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.next_free_number() {
        Ok(number) => {
            let payload = json!({ "next_free_number": number });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn info_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    Path(number): Path<u32>,
    Query(query): Query<AtQuery>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.info(number, query.at) {
        Ok(info) => (StatusCode::OK, axum::Json(info)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    Path(number): Path<u32>,
    Query(query): Query<AtQuery>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.remove(number, query.at) {
        Ok(info) => (StatusCode::OK, axum::Json(info)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    Path(number): Path<u32>,
    axum::Json(body): axum::Json<ReportBody>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.submit_report(number, body.status, body.time) {
        Ok(info) => (StatusCode::CREATED, axum::Json(info)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn visit_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    Path(number): Path<u32>,
    axum::Json(body): axum::Json<VisitBody>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.record_visit(number, body.action, body.time) {
        Ok(info) => (StatusCode::CREATED, axum::Json(info)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn relocate_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    Path(number): Path<u32>,
    axum::Json(request): axum::Json<NewLocation>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.relocate(number, request) {
        Ok(info) => (StatusCode::CREATED, axum::Json(info)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn timeline_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    Path(number): Path<u32>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.timeline(number) {
        Ok(events) => (StatusCode::OK, axum::Json(events)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn queue_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
    Query(query): Query<AtQuery>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.visit_queue(query.at) {
        Ok(queue) => (StatusCode::OK, axum::Json(queue)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<S, W>(
    State(service): State<Arc<DropPointService<S, W>>>,
) -> Response
where
    S: DropPointStore + 'static,
    W: ReportWeighting + 'static,
{
    match service.statistics() {
        Ok(statistics) => (StatusCode::OK, axum::Json(statistics)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: DropPointServiceError) -> Response {
    match error {
        DropPointServiceError::Validation(error) => {
            let payload = json!({
                "errors": error.problems,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        DropPointServiceError::Store(StoreError::NotFound) => {
            let payload = json!({
                "error": "no such drop point",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        DropPointServiceError::Store(StoreError::Conflict) => {
            let payload = json!({
                "error": "drop point number already taken",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        DropPointServiceError::Store(StoreError::Unavailable(reason)) => {
            let payload = json!({
                "error": reason,
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
