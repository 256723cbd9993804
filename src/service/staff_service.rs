use crate::api::model::common::{ApiResponse, ListQuery, MessageResponse, PaginatedResponse};
use crate::api::model::staff::{CreateStaffRequest, StoredStaff, UpdateStaffRequest};
use crate::config::app_config::AppState;
use crate::db::db_error::DbError;
use crate::db::repo::staff_repository;
use crate::db::repo::staff_repository::StaffFields;
use crate::error::error_model::AppError;
use crate::service::{bad_request, conflict, ensure_affected, non_empty, or_not_found};
use crate::util::pagination::search_term;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::error;

fn map_staff_write_error(e: DbError) -> AppError {
    if e.is_unique_violation_on("staff_user_id_key") {
        conflict("User is already registered as staff", "USER_ALREADY_STAFF")
    } else if matches!(e, DbError::ForeignKeyViolation { .. }) {
        bad_request("User not found", "USER_NOT_FOUND")
    } else {
        or_not_found("Staff not found", "STAFF_NOT_FOUND")(e)
    }
}

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "staff_service", service.operation = "create_staff")
)]
pub async fn create_staff(
    state: Arc<AppState>,
    request: CreateStaffRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateStaffRequest")?;
    let values = StaffFields {
        user_id: Some(request.user_id),
        name: Some(request.name.trim()),
        middle_name: non_empty(&request.middle_name),
        surname: Some(request.surname.trim()),
        position: non_empty(&request.position),
        department: non_empty(&request.department),
    };
    let staff = staff_repository::create_staff(&state.pg_pool, &values)
        .await
        .map_err(|e| {
            error!("Error creating staff: {:?}", e);
            map_staff_write_error(e)
        })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/staff/{}", staff.id))],
        Json(ApiResponse::new(
            "Staff created successfully",
            StoredStaff::from(staff),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "staff_service", service.operation = "get_staff_list")
)]
pub async fn get_staff_list(state: Arc<AppState>, query: ListQuery) -> Result<Response, AppError> {
    let window = query.window();
    let search = search_term(&query.search);
    let (staff, total) =
        staff_repository::list_staff(&state.pg_pool, search.as_deref(), window.limit, window.offset())
            .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Staff retrieved successfully",
            staff.into_iter().map(StoredStaff::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "staff_service", service.operation = "get_staff_by_id")
)]
pub async fn get_staff_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let staff = staff_repository::get_staff_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Staff not found", "STAFF_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Staff retrieved successfully",
            StoredStaff::from(staff),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "staff_service", service.operation = "update_staff")
)]
pub async fn update_staff(
    state: Arc<AppState>,
    id: i64,
    request: UpdateStaffRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateStaffRequest")?;
    let values = StaffFields {
        user_id: None,
        name: non_empty(&request.name),
        middle_name: non_empty(&request.middle_name),
        surname: non_empty(&request.surname),
        position: non_empty(&request.position),
        department: non_empty(&request.department),
    };
    let staff = staff_repository::update_staff(&state.pg_pool, id, &values)
        .await
        .map_err(map_staff_write_error)?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Staff updated successfully",
            StoredStaff::from(staff),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "staff_service", service.operation = "delete_staff")
)]
pub async fn delete_staff(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = staff_repository::delete_staff(&state.pg_pool, id).await?;
    ensure_affected(rows, "Staff not found", "STAFF_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Staff deleted successfully")),
    )
        .into_response())
}
