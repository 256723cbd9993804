use crate::api::model::common::{ApiResponse, GroupCount, MessageResponse, PaginatedResponse};
use crate::api::model::instructor::{
    AssignCourseRequest, CreateInstructorRequest, InstructorListQuery, InstructorStats,
    StoredCourseAssignment, StoredInstructor, UpdateAssignmentRequest, UpdateInstructorRequest,
};
use crate::config::app_config::AppState;
use crate::db::db_error::DbError;
use crate::db::repo::instructor_repository::InstructorFields;
use crate::db::repo::{course_section_repository, instructor_repository};
use crate::error::error_model::{AppError, ErrorType};
use crate::service::{bad_request, conflict, ensure_affected, non_empty, or_not_found};
use crate::util::pagination::{search_term, PageWindow};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};

fn map_instructor_write_error(e: DbError) -> AppError {
    if e.is_unique_violation_on("instructors_staff_id_key") {
        conflict("Staff ID already exists", "STAFF_ID_EXISTS")
    } else if e.is_unique_violation_on("instructors_user_id_key") {
        conflict(
            "User is already registered as an instructor",
            "USER_ALREADY_INSTRUCTOR",
        )
    } else if matches!(e, DbError::ForeignKeyViolation { .. }) {
        bad_request("User not found", "USER_NOT_FOUND")
    } else {
        or_not_found("Instructor not found", "INSTRUCTOR_NOT_FOUND")(e)
    }
}

/// Create an instructor profile for an existing user.
///
/// # Errors
///
/// * `USER_NOT_FOUND` (400) if the referenced user does not exist.
/// * `STAFF_ID_EXISTS` if the staff id is taken.
/// * `USER_ALREADY_INSTRUCTOR` if the user already has an instructor profile.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "instructor_service", service.operation = "create_instructor")
)]
pub async fn create_instructor(
    state: Arc<AppState>,
    request: CreateInstructorRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateInstructorRequest")?;
    let values = InstructorFields {
        user_id: Some(request.user_id),
        staff_id: Some(request.staff_id.trim()),
        name: Some(request.name.trim()),
        middle_name: non_empty(&request.middle_name),
        surname: Some(request.surname.trim()),
        faculty: non_empty(&request.faculty),
        program: non_empty(&request.program),
    };
    let instructor = instructor_repository::create_instructor(&state.pg_pool, &values)
        .await
        .map_err(|e| {
            error!("Error creating instructor: {:?}", e);
            map_instructor_write_error(e)
        })?;

    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("/api/v1/instructors/{}", instructor.id),
        )],
        Json(ApiResponse::new(
            "Instructor created successfully",
            StoredInstructor::from(instructor),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "instructor_service", service.operation = "get_instructors")
)]
pub async fn get_instructors(
    state: Arc<AppState>,
    query: InstructorListQuery,
) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let search = search_term(&query.search);
    let (instructors, total) = instructor_repository::list_instructors(
        &state.pg_pool,
        search.as_deref(),
        non_empty(&query.faculty),
        window.limit,
        window.offset(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Instructors retrieved successfully",
            instructors.into_iter().map(StoredInstructor::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "instructor_service", service.operation = "get_instructor_stats")
)]
pub async fn get_instructor_stats(state: Arc<AppState>) -> Result<Response, AppError> {
    let by_faculty = instructor_repository::count_instructors_by_faculty(&state.pg_pool).await?;
    let total: i64 = by_faculty.iter().map(|(_, count)| count).sum();
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Instructor statistics retrieved successfully",
            InstructorStats {
                total,
                by_faculty: by_faculty.into_iter().map(GroupCount::from).collect(),
            },
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "instructor_service", service.operation = "get_instructor_by_id")
)]
pub async fn get_instructor_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let instructor = instructor_repository::get_instructor_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Instructor not found", "INSTRUCTOR_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Instructor retrieved successfully",
            StoredInstructor::from(instructor),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "instructor_service", service.operation = "update_instructor")
)]
pub async fn update_instructor(
    state: Arc<AppState>,
    id: i64,
    request: UpdateInstructorRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateInstructorRequest")?;
    let values = InstructorFields {
        user_id: None,
        staff_id: non_empty(&request.staff_id),
        name: non_empty(&request.name),
        middle_name: non_empty(&request.middle_name),
        surname: non_empty(&request.surname),
        faculty: non_empty(&request.faculty),
        program: non_empty(&request.program),
    };
    let instructor = instructor_repository::update_instructor(&state.pg_pool, id, &values)
        .await
        .map_err(map_instructor_write_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Instructor updated successfully",
            StoredInstructor::from(instructor),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "instructor_service", service.operation = "delete_instructor")
)]
pub async fn delete_instructor(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = instructor_repository::delete_instructor(&state.pg_pool, id).await?;
    ensure_affected(rows, "Instructor not found", "INSTRUCTOR_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Instructor deleted successfully")),
    )
        .into_response())
}

/// Assign an instructor to a course section with a role.
///
/// # Errors
///
/// * `INSTRUCTOR_NOT_FOUND` or `SECTION_NOT_FOUND` (404) for unknown references.
/// * `ALREADY_ASSIGNED` if the instructor already teaches the section.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "instructor_service", service.operation = "assign_course")
)]
pub async fn assign_course(
    state: Arc<AppState>,
    request: AssignCourseRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "AssignCourseRequest")?;
    if !instructor_repository::instructor_exists(&state.pg_pool, request.instructor_id).await? {
        return Err(AppError::new(ErrorType::NotFound, "Instructor not found")
            .with_code("INSTRUCTOR_NOT_FOUND"));
    }
    if !course_section_repository::section_exists(&state.pg_pool, request.course_section_id).await?
    {
        return Err(AppError::new(ErrorType::NotFound, "Course section not found")
            .with_code("SECTION_NOT_FOUND"));
    }

    let assignment = instructor_repository::create_assignment(
        &state.pg_pool,
        request.instructor_id,
        request.course_section_id,
        &request.role,
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation_on("course_instructors_instructor_section_key") {
            conflict(
                "Instructor is already assigned to this section",
                "ALREADY_ASSIGNED",
            )
        } else {
            error!("Error assigning course: {:?}", e);
            e.into()
        }
    })?;

    info!(
        instructor_id = request.instructor_id,
        course_section_id = request.course_section_id,
        role = %request.role,
        "Instructor assigned"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Course assigned successfully",
            StoredCourseAssignment::from(assignment),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "instructor_service", service.operation = "update_assignment")
)]
pub async fn update_assignment(
    state: Arc<AppState>,
    id: i64,
    request: UpdateAssignmentRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateAssignmentRequest")?;
    let assignment = instructor_repository::update_assignment(&state.pg_pool, id, &request.role)
        .await
        .map_err(or_not_found("Course assignment not found", "ASSIGNMENT_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Course assignment updated successfully",
            StoredCourseAssignment::from(assignment),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "instructor_service", service.operation = "delete_assignment")
)]
pub async fn delete_assignment(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = instructor_repository::delete_assignment(&state.pg_pool, id).await?;
    ensure_affected(rows, "Course assignment not found", "ASSIGNMENT_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Course assignment deleted successfully")),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "instructor_service", service.operation = "get_instructor_assignments")
)]
pub async fn get_instructor_assignments(
    state: Arc<AppState>,
    instructor_id: i64,
) -> Result<Response, AppError> {
    if !instructor_repository::instructor_exists(&state.pg_pool, instructor_id).await? {
        return Err(AppError::new(ErrorType::NotFound, "Instructor not found")
            .with_code("INSTRUCTOR_NOT_FOUND"));
    }
    let assignments =
        instructor_repository::list_assignments_for_instructor(&state.pg_pool, instructor_id)
            .await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Course assignments retrieved successfully",
            assignments
                .into_iter()
                .map(StoredCourseAssignment::from)
                .collect::<Vec<_>>(),
        )),
    )
        .into_response())
}
