use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::model::enrollment::{
    CreateEnrollmentStatusRequest, EnrollmentStatusListQuery, StoredEnrollmentStatus,
    UpdateEnrollmentStatusRequest,
};
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::service::enrollment_status_service;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, put};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn enrollment_status_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(get_enrollment_statuses_handler).post(create_enrollment_status_handler),
        )
        .route("/{id}", put(update_enrollment_status_handler))
}

/// Create enrollment status
///
/// One record per student and term.
#[utoipa::path(
    post,
    path = "/api/v1/student-enrollment-statuses",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = CreateEnrollmentStatusRequest,
    responses(
        (status = 201, description = "Enrollment status created successfully", body = StoredEnrollmentStatus),
        (status = 400, description = "Student or instructor not found", body = ApiError),
        (status = 409, description = "Status already exists for the term", body = ApiError),
        (status = 422, description = "Unprocessable request", body = ApiError),
    )
)]
pub(crate) async fn create_enrollment_status_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateEnrollmentStatusRequest>,
) -> Result<Response, AppError> {
    enrollment_status_service::create_enrollment_status(state, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/student-enrollment-statuses",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(EnrollmentStatusListQuery),
    responses(
        (status = 200, description = "Enrollment statuses retrieved successfully", body = [StoredEnrollmentStatus]),
    )
)]
pub(crate) async fn get_enrollment_statuses_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<EnrollmentStatusListQuery>,
) -> Result<Response, AppError> {
    enrollment_status_service::get_enrollment_statuses(state, query).await
}

#[utoipa::path(
    put,
    path = "/api/v1/student-enrollment-statuses/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = UpdateEnrollmentStatusRequest,
    params(
        ("id" = i64, Path, description = "Enrollment status id")
    ),
    responses(
        (status = 200, description = "Enrollment status updated successfully", body = StoredEnrollmentStatus),
        (status = 404, description = "Enrollment status not found", body = ApiError),
    )
)]
pub(crate) async fn update_enrollment_status_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateEnrollmentStatusRequest>,
) -> Result<Response, AppError> {
    enrollment_status_service::update_enrollment_status(state, id, request).await
}
