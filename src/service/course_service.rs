use crate::api::model::common::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::api::model::course::{
    CourseListQuery, CreateCourseRequest, StoredCourse, UpdateCourseRequest,
};
use crate::config::app_config::AppState;
use crate::db::db_error::DbError;
use crate::db::repo::course_repository;
use crate::db::repo::course_repository::CourseFields;
use crate::error::error_model::AppError;
use crate::service::{bad_request, conflict, ensure_affected, non_empty, or_not_found};
use crate::util::pagination::{search_term, PageWindow};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};

const COURSE_CODE_CONSTRAINT: &str = "courses_code_key";

fn curriculum_not_found() -> AppError {
    bad_request("Curriculum not found", "CURRICULUM_NOT_FOUND")
}

fn map_course_write_error(e: DbError) -> AppError {
    if e.is_unique_violation_on(COURSE_CODE_CONSTRAINT) {
        conflict("Course code already exists", "COURSE_CODE_EXISTS")
    } else if matches!(e, DbError::ForeignKeyViolation { .. }) {
        curriculum_not_found()
    } else {
        or_not_found("Course not found", "COURSE_NOT_FOUND")(e)
    }
}

async fn ensure_curriculum_exists(state: &AppState, curriculum_id: i64) -> Result<(), AppError> {
    if course_repository::curriculum_exists(&state.pg_pool, curriculum_id).await? {
        Ok(())
    } else {
        Err(curriculum_not_found())
    }
}

/// Create a course in a curriculum.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - Code, name, credits and the owning curriculum.
///
/// # Errors
///
/// * `CURRICULUM_NOT_FOUND` (400) if the curriculum does not exist.
/// * `COURSE_CODE_EXISTS` (409) if the code is taken.
#[tracing::instrument(
    skip(state, request),
    fields(
        service.name = "course_service",
        service.operation = "create_course",
        course.code = %request.code
    )
)]
pub async fn create_course(
    state: Arc<AppState>,
    request: CreateCourseRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateCourseRequest")?;
    ensure_curriculum_exists(&state, request.curriculum_id).await?;

    let values = CourseFields {
        curriculum_id: Some(request.curriculum_id),
        code: Some(request.code.trim()),
        name: Some(request.name.trim()),
        credits: Some(request.credits),
        description: non_empty(&request.description),
        prerequisites: non_empty(&request.prerequisites),
    };
    let course = course_repository::create_course(&state.pg_pool, &values)
        .await
        .map_err(|e| {
            error!("Error creating course: {:?}", e);
            map_course_write_error(e)
        })?;

    info!(course_id = course.id, "Course created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/courses/{}", course.id))],
        Json(ApiResponse::new(
            "Course created successfully",
            StoredCourse::from(course),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "course_service", service.operation = "get_courses")
)]
pub async fn get_courses(state: Arc<AppState>, query: CourseListQuery) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let search = search_term(&query.search);
    let courses = course_repository::list_courses(
        &state.pg_pool,
        search.as_deref(),
        query.curriculum_id,
        window.limit,
        window.offset(),
    )
    .await?;
    let total =
        course_repository::count_courses(&state.pg_pool, search.as_deref(), query.curriculum_id)
            .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Courses retrieved successfully",
            courses.into_iter().map(StoredCourse::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "course_service", service.operation = "get_course_by_id")
)]
pub async fn get_course_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let course = course_repository::get_course_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Course not found", "COURSE_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Course retrieved successfully",
            StoredCourse::from(course),
        )),
    )
        .into_response())
}

/// Update a course. The curriculum and code checks of `create_course` apply.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "course_service", service.operation = "update_course")
)]
pub async fn update_course(
    state: Arc<AppState>,
    id: i64,
    request: UpdateCourseRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateCourseRequest")?;
    if let Some(curriculum_id) = request.curriculum_id {
        ensure_curriculum_exists(&state, curriculum_id).await?;
    }

    let values = CourseFields {
        curriculum_id: request.curriculum_id,
        code: non_empty(&request.code),
        name: non_empty(&request.name),
        credits: request.credits,
        description: non_empty(&request.description),
        prerequisites: non_empty(&request.prerequisites),
    };
    let course = course_repository::update_course(&state.pg_pool, id, &values)
        .await
        .map_err(map_course_write_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Course updated successfully",
            StoredCourse::from(course),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "course_service", service.operation = "delete_course")
)]
pub async fn delete_course(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = course_repository::delete_course(&state.pg_pool, id).await?;
    ensure_affected(rows, "Course not found", "COURSE_NOT_FOUND")?;
    info!(course_id = id, "Course deleted");
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Course deleted successfully")),
    )
        .into_response())
}
