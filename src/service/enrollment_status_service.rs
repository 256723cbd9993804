use crate::api::model::common::{ApiResponse, PaginatedResponse};
use crate::api::model::enrollment::{
    CreateEnrollmentStatusRequest, EnrollmentStatusListQuery, StoredEnrollmentStatus,
    UpdateEnrollmentStatusRequest,
};
use crate::config::app_config::AppState;
use crate::db::db_error::DbError;
use crate::db::repo::enrollment_status_repository;
use crate::db::repo::enrollment_status_repository::EnrollStatusFields;
use crate::error::error_model::AppError;
use crate::service::{bad_request, conflict, non_empty, or_not_found};
use crate::util::pagination::PageWindow;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::error;

fn map_status_write_error(e: DbError) -> AppError {
    if e.is_unique_violation_on("student_enroll_statuses_student_term_key") {
        return conflict(
            "Enrollment status already exists for this student and term",
            "STATUS_EXISTS",
        );
    }
    match e {
        DbError::ForeignKeyViolation { constraint } if constraint.contains("instructor") => {
            bad_request("Instructor not found", "INSTRUCTOR_NOT_FOUND")
        }
        DbError::ForeignKeyViolation { .. } => bad_request("Student not found", "STUDENT_NOT_FOUND"),
        other => or_not_found("Enrollment status not found", "ENROLLMENT_STATUS_NOT_FOUND")(other),
    }
}

/// Per-term record of a student's standing. Status defaults to `active`.
#[tracing::instrument(
    skip(state, request),
    fields(
        service.name = "enrollment_status_service",
        service.operation = "create_enrollment_status"
    )
)]
pub async fn create_enrollment_status(
    state: Arc<AppState>,
    request: CreateEnrollmentStatusRequest,
) -> Result<Response, AppError> {
    state
        .validator
        .validate(&request, "CreateEnrollmentStatusRequest")?;
    let values = EnrollStatusFields {
        student_id: Some(request.student_id),
        semester: Some(request.semester),
        year: Some(request.year),
        status: non_empty(&request.status),
        gpa: request.gpa,
        credits: request.credits,
        instructor_id: request.instructor_id,
    };
    let status = enrollment_status_repository::create_status(&state.pg_pool, &values)
        .await
        .map_err(|e| {
            error!("Error creating enrollment status: {:?}", e);
            map_status_write_error(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Enrollment status created successfully",
            StoredEnrollmentStatus::from(status),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(
        service.name = "enrollment_status_service",
        service.operation = "get_enrollment_statuses"
    )
)]
pub async fn get_enrollment_statuses(
    state: Arc<AppState>,
    query: EnrollmentStatusListQuery,
) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let (statuses, total) = enrollment_status_repository::list_statuses(
        &state.pg_pool,
        query.student_id,
        query.semester,
        query.year,
        window.limit,
        window.offset(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Enrollment statuses retrieved successfully",
            statuses
                .into_iter()
                .map(StoredEnrollmentStatus::from)
                .collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state, request),
    fields(
        service.name = "enrollment_status_service",
        service.operation = "update_enrollment_status"
    )
)]
pub async fn update_enrollment_status(
    state: Arc<AppState>,
    id: i64,
    request: UpdateEnrollmentStatusRequest,
) -> Result<Response, AppError> {
    state
        .validator
        .validate(&request, "UpdateEnrollmentStatusRequest")?;
    let values = EnrollStatusFields {
        status: non_empty(&request.status),
        gpa: request.gpa,
        credits: request.credits,
        instructor_id: request.instructor_id,
        ..Default::default()
    };
    let status = enrollment_status_repository::update_status(&state.pg_pool, id, &values)
        .await
        .map_err(map_status_write_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Enrollment status updated successfully",
            StoredEnrollmentStatus::from(status),
        )),
    )
        .into_response())
}
