use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationStatus, ApplicationType, EmployeeId, NewApplication};
use super::listing::ListingQuery;
use super::repository::ApplicationRepository;
use super::service::{ApplicationService, ApplicationServiceError};

/// Router builder exposing HTTP endpoints for filing, listing, approval and statistics.
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(create_handler::<R>))
        .route(
            "/api/v1/applications/:application_id/status",
            put(status_handler::<R>),
        )
        .route(
            "/api/v1/employees/:employee_id/applications",
            get(list_handler::<R>),
        )
        .route(
            "/api/v1/employees/:employee_id/statistics/:year",
            get(statistics_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingParams {
    #[serde(rename = "type")]
    pub(crate) application_type: ApplicationType,
    #[serde(default)]
    pub(crate) page: Option<i64>,
    #[serde(default)]
    pub(crate) size: Option<i64>,
    #[serde(default)]
    pub(crate) from: Option<NaiveDateTime>,
    #[serde(default)]
    pub(crate) to: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdate {
    pub(crate) status: ApplicationStatus,
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    axum::Json(request): axum::Json<NewApplication>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    if service.create_application(request) {
        (StatusCode::CREATED, axum::Json(json!({ "success": true }))).into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "success": false })),
        )
            .into_response()
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(application_id): Path<i64>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.update_application_status(ApplicationId(application_id), update.status) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(employee_id): Path<i64>,
    Query(params): Query<ListingParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let query = ListingQuery {
        employee_id: EmployeeId(employee_id),
        application_type: params.application_type,
        page: params.page.unwrap_or_default(),
        size: params.size.unwrap_or_default(),
        from: params.from,
        to: params.to,
    };

    match service.list_applications(&query) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn statistics_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path((employee_id, year)): Path<(i64, i32)>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.yearly_statistics(EmployeeId(employee_id), year) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}
