use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::model::common::{ListQuery, MessageResponse};
use crate::api::model::staff::{CreateStaffRequest, StoredStaff, UpdateStaffRequest};
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::service::staff_service;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn staff_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_staff_list_handler).post(create_staff_handler))
        .route(
            "/{id}",
            get(get_staff_handler)
                .put(update_staff_handler)
                .delete(delete_staff_handler),
        )
}

/// Create staff
///
/// Create the staff profile of an existing user. A user has at most one.
#[utoipa::path(
    post,
    path = "/api/v1/staff",
    tag = "Staff",
    security(("bearer_auth" = [])),
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff created successfully", body = StoredStaff),
        (status = 400, description = "User not found", body = ApiError),
        (status = 409, description = "User is already staff", body = ApiError),
    )
)]
pub(crate) async fn create_staff_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateStaffRequest>,
) -> Result<Response, AppError> {
    staff_service::create_staff(state, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/staff",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Staff retrieved successfully", body = [StoredStaff]),
    )
)]
pub(crate) async fn get_staff_list_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<ListQuery>,
) -> Result<Response, AppError> {
    staff_service::get_staff_list(state, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Staff id")
    ),
    responses(
        (status = 200, description = "Staff retrieved successfully", body = StoredStaff),
        (status = 404, description = "Staff not found", body = ApiError),
    )
)]
pub(crate) async fn get_staff_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    staff_service::get_staff_by_id(state, id).await
}

#[utoipa::path(
    put,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    request_body = UpdateStaffRequest,
    params(
        ("id" = i64, Path, description = "Staff id")
    ),
    responses(
        (status = 200, description = "Staff updated successfully", body = StoredStaff),
        (status = 404, description = "Staff not found", body = ApiError),
    )
)]
pub(crate) async fn update_staff_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateStaffRequest>,
) -> Result<Response, AppError> {
    staff_service::update_staff(state, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/staff/{id}",
    tag = "Staff",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Staff id")
    ),
    responses(
        (status = 200, description = "Staff deleted successfully", body = MessageResponse),
        (status = 404, description = "Staff not found", body = ApiError),
    )
)]
pub(crate) async fn delete_staff_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    staff_service::delete_staff(state, id).await
}
