use crate::api::model::common::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::api::model::course::{
    CourseSectionListQuery, CreateCourseSectionRequest, StoredCourseSection,
    UpdateCourseSectionRequest,
};
use crate::config::app_config::AppState;
use crate::db::db_error::DbError;
use crate::db::repo::course_section_repository::{SectionFields, SectionFilter};
use crate::db::repo::{course_repository, course_section_repository};
use crate::error::error_model::AppError;
use crate::service::{bad_request, conflict, ensure_affected, non_empty, or_not_found};
use crate::util::pagination::PageWindow;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::error;

fn course_not_found() -> AppError {
    bad_request("Course not found", "COURSE_NOT_FOUND")
}

fn map_section_write_error(e: DbError) -> AppError {
    if e.is_unique_violation_on("course_sections_course_section_term_key") {
        conflict(
            "Section already exists for this course and term",
            "SECTION_EXISTS",
        )
    } else if matches!(e, DbError::ForeignKeyViolation { .. }) {
        course_not_found()
    } else {
        or_not_found("Course section not found", "SECTION_NOT_FOUND")(e)
    }
}

async fn ensure_course_exists(state: &AppState, course_id: i64) -> Result<(), AppError> {
    if course_repository::course_exists(&state.pg_pool, course_id).await? {
        Ok(())
    } else {
        Err(course_not_found())
    }
}

/// Open a section of a course for a semester.
///
/// `max_students` defaults to 30 when omitted.
#[tracing::instrument(
    skip(state, request),
    fields(
        service.name = "course_section_service",
        service.operation = "create_course_section"
    )
)]
pub async fn create_course_section(
    state: Arc<AppState>,
    request: CreateCourseSectionRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateCourseSectionRequest")?;
    ensure_course_exists(&state, request.course_id).await?;

    let values = SectionFields {
        course_id: Some(request.course_id),
        section: Some(request.section.trim()),
        semester: Some(request.semester),
        year: Some(request.year),
        max_students: request.max_students,
        schedule: non_empty(&request.schedule),
    };
    let section = course_section_repository::create_section(&state.pg_pool, &values)
        .await
        .map_err(|e| {
            error!("Error creating course section: {:?}", e);
            map_section_write_error(e)
        })?;

    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("/api/v1/course-sections/{}", section.id),
        )],
        Json(ApiResponse::new(
            "Course section created successfully",
            StoredCourseSection::from(section),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(
        service.name = "course_section_service",
        service.operation = "get_course_sections"
    )
)]
pub async fn get_course_sections(
    state: Arc<AppState>,
    query: CourseSectionListQuery,
) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let filter = SectionFilter {
        course_id: query.course_id,
        semester: query.semester,
        year: query.year,
    };
    let sections =
        course_section_repository::list_sections(&state.pg_pool, filter, window.limit, window.offset())
            .await?;
    let total = course_section_repository::count_sections(&state.pg_pool, filter).await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Course sections retrieved successfully",
            sections.into_iter().map(StoredCourseSection::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(
        service.name = "course_section_service",
        service.operation = "get_course_section_by_id"
    )
)]
pub async fn get_course_section_by_id(
    state: Arc<AppState>,
    id: i64,
) -> Result<Response, AppError> {
    let section = course_section_repository::get_section_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Course section not found", "SECTION_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Course section retrieved successfully",
            StoredCourseSection::from(section),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state, request),
    fields(
        service.name = "course_section_service",
        service.operation = "update_course_section"
    )
)]
pub async fn update_course_section(
    state: Arc<AppState>,
    id: i64,
    request: UpdateCourseSectionRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateCourseSectionRequest")?;
    if let Some(course_id) = request.course_id {
        ensure_course_exists(&state, course_id).await?;
    }

    let values = SectionFields {
        course_id: request.course_id,
        section: non_empty(&request.section),
        semester: request.semester,
        year: request.year,
        max_students: request.max_students,
        schedule: non_empty(&request.schedule),
    };
    let section = course_section_repository::update_section(&state.pg_pool, id, &values)
        .await
        .map_err(map_section_write_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Course section updated successfully",
            StoredCourseSection::from(section),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(
        service.name = "course_section_service",
        service.operation = "delete_course_section"
    )
)]
pub async fn delete_course_section(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = course_section_repository::delete_section(&state.pg_pool, id).await?;
    ensure_affected(rows, "Course section not found", "SECTION_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Course section deleted successfully")),
    )
        .into_response())
}
