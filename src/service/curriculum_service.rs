use crate::api::model::common::{ApiResponse, ListQuery, PaginatedResponse};
use crate::api::model::course::{CreateCurriculumRequest, StoredCurriculum};
use crate::config::app_config::AppState;
use crate::db::repo::course_repository;
use crate::error::error_model::AppError;
use crate::service::{conflict, non_empty, or_not_found};
use crate::util::pagination::search_term;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

/// Create a curriculum. Codes are unique.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "curriculum_service", service.operation = "create_curriculum")
)]
pub async fn create_curriculum(
    state: Arc<AppState>,
    request: CreateCurriculumRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateCurriculumRequest")?;
    let curriculum = course_repository::create_curriculum(
        &state.pg_pool,
        request.code.trim(),
        request.name.trim(),
        non_empty(&request.description),
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation_on("curriculums_code_key") {
            conflict("Curriculum code already exists", "CURRICULUM_CODE_EXISTS")
        } else {
            e.into()
        }
    })?;

    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("/api/v1/curriculums/{}", curriculum.id),
        )],
        Json(ApiResponse::new(
            "Curriculum created successfully",
            StoredCurriculum::from(curriculum),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "curriculum_service", service.operation = "get_curriculums")
)]
pub async fn get_curriculums(state: Arc<AppState>, query: ListQuery) -> Result<Response, AppError> {
    let window = query.window();
    let search = search_term(&query.search);
    let (curriculums, total) = course_repository::list_curriculums(
        &state.pg_pool,
        search.as_deref(),
        window.limit,
        window.offset(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Curriculums retrieved successfully",
            curriculums.into_iter().map(StoredCurriculum::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "curriculum_service", service.operation = "get_curriculum_by_id")
)]
pub async fn get_curriculum_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let curriculum = course_repository::get_curriculum_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Curriculum not found", "CURRICULUM_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Curriculum retrieved successfully",
            StoredCurriculum::from(curriculum),
        )),
    )
        .into_response())
}
