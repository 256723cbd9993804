//! Supervision visits for students on internship.
//!
//! A visitor training links a student enrollment to the instructor who visits
//! the student at the company. Each training has up to four scheduled visits
//! and evaluations of both the student and the company.

use crate::api::model::common::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::api::model::visitor::{
    CreateEvaluationRequest, CreateVisitorScheduleRequest, CreateVisitorTrainingRequest,
    StoredEvaluation, StoredVisitorSchedule, StoredVisitorTraining, TrainingScopedQuery,
    UpdateEvaluationRequest, UpdateVisitorScheduleRequest, UpdateVisitorTrainingRequest,
    VisitorTrainingListQuery,
};
use crate::config::app_config::AppState;
use crate::db::db_error::DbError;
use crate::db::repo::visitor_repository;
use crate::db::repo::visitor_repository::EvaluationTarget;
use crate::error::error_model::AppError;
use crate::service::{bad_request, conflict, ensure_affected, non_empty, or_not_found};
use crate::util::pagination::PageWindow;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};

fn map_training_write_error(e: DbError) -> AppError {
    match e {
        DbError::ForeignKeyViolation { constraint } => {
            if constraint.contains("student_enroll") {
                bad_request("Enrollment not found", "ENROLLMENT_NOT_FOUND")
            } else if constraint.contains("company") {
                bad_request("Company not found", "COMPANY_NOT_FOUND")
            } else {
                bad_request("Instructor not found", "INSTRUCTOR_NOT_FOUND")
            }
        }
        other => or_not_found("Visitor training not found", "TRAINING_NOT_FOUND")(other),
    }
}

async fn ensure_training_exists(state: &AppState, id: i64) -> Result<(), AppError> {
    if visitor_repository::training_exists(&state.pg_pool, id).await? {
        Ok(())
    } else {
        Err(bad_request("Visitor training not found", "TRAINING_NOT_FOUND"))
    }
}

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "visitor_service", service.operation = "create_training")
)]
pub async fn create_training(
    state: Arc<AppState>,
    request: CreateVisitorTrainingRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateVisitorTrainingRequest")?;
    let training = visitor_repository::create_training(
        &state.pg_pool,
        request.student_enroll_id,
        request.visitor_instructor_id,
        request.company_id,
    )
    .await
    .map_err(|e| {
        error!("Error creating visitor training: {:?}", e);
        map_training_write_error(e)
    })?;

    info!(training_id = training.id, "Visitor training created");
    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("/api/v1/visitor-trainings/{}", training.id),
        )],
        Json(ApiResponse::new(
            "Visitor training created successfully",
            StoredVisitorTraining::from(training),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "get_trainings")
)]
pub async fn get_trainings(
    state: Arc<AppState>,
    query: VisitorTrainingListQuery,
) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let (trainings, total) = visitor_repository::list_trainings(
        &state.pg_pool,
        query.student_enroll_id,
        query.visitor_instructor_id,
        window.limit,
        window.offset(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Visitor trainings retrieved successfully",
            trainings
                .into_iter()
                .map(StoredVisitorTraining::from)
                .collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "get_training_by_id")
)]
pub async fn get_training_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let training = visitor_repository::get_training_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Visitor training not found", "TRAINING_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Visitor training retrieved successfully",
            StoredVisitorTraining::from(training),
        )),
    )
        .into_response())
}

/// Change the visiting instructor or the company of a training.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "visitor_service", service.operation = "update_training")
)]
pub async fn update_training(
    state: Arc<AppState>,
    id: i64,
    request: UpdateVisitorTrainingRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateVisitorTrainingRequest")?;
    let training = visitor_repository::update_training(
        &state.pg_pool,
        id,
        request.visitor_instructor_id,
        request.company_id,
    )
    .await
    .map_err(map_training_write_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Visitor training updated successfully",
            StoredVisitorTraining::from(training),
        )),
    )
        .into_response())
}

/// Delete a training together with its schedules and evaluations.
#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "delete_training")
)]
pub async fn delete_training(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = visitor_repository::delete_training(&state.pg_pool, id).await?;
    ensure_affected(rows, "Visitor training not found", "TRAINING_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Visitor training deleted successfully")),
    )
        .into_response())
}

fn map_schedule_write_error(e: DbError) -> AppError {
    if e.is_unique_violation_on("visitor_schedules_training_visit_key") {
        conflict(
            "Visit number already scheduled for this training",
            "VISIT_EXISTS",
        )
    } else if matches!(e, DbError::ForeignKeyViolation { .. }) {
        bad_request("Visitor training not found", "TRAINING_NOT_FOUND")
    } else {
        or_not_found("Visitor schedule not found", "SCHEDULE_NOT_FOUND")(e)
    }
}

/// Schedule one of the (at most four) visits of a training.
///
/// # Errors
///
/// * `TRAINING_NOT_FOUND` (400) if the training does not exist.
/// * `VISIT_EXISTS` (409) if the visit number is already scheduled.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "visitor_service", service.operation = "create_schedule")
)]
pub async fn create_schedule(
    state: Arc<AppState>,
    request: CreateVisitorScheduleRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateVisitorScheduleRequest")?;
    ensure_training_exists(&state, request.visitor_training_id).await?;

    let schedule = visitor_repository::create_schedule(
        &state.pg_pool,
        request.visitor_training_id,
        request.visit_no,
        request.visit_at,
        non_empty(&request.comment),
    )
    .await
    .map_err(map_schedule_write_error)?;

    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("/api/v1/visitor-schedules/{}", schedule.id),
        )],
        Json(ApiResponse::new(
            "Visitor schedule created successfully",
            StoredVisitorSchedule::from(schedule),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "get_schedules")
)]
pub async fn get_schedules(
    state: Arc<AppState>,
    query: TrainingScopedQuery,
) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let (schedules, total) = visitor_repository::list_schedules(
        &state.pg_pool,
        query.visitor_training_id,
        window.limit,
        window.offset(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Visitor schedules retrieved successfully",
            schedules
                .into_iter()
                .map(StoredVisitorSchedule::from)
                .collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "get_schedule_by_id")
)]
pub async fn get_schedule_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let schedule = visitor_repository::get_schedule_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Visitor schedule not found", "SCHEDULE_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Visitor schedule retrieved successfully",
            StoredVisitorSchedule::from(schedule),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "visitor_service", service.operation = "update_schedule")
)]
pub async fn update_schedule(
    state: Arc<AppState>,
    id: i64,
    request: UpdateVisitorScheduleRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateVisitorScheduleRequest")?;
    let schedule = visitor_repository::update_schedule(
        &state.pg_pool,
        id,
        request.visit_no,
        request.visit_at,
        non_empty(&request.comment),
    )
    .await
    .map_err(map_schedule_write_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Visitor schedule updated successfully",
            StoredVisitorSchedule::from(schedule),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "delete_schedule")
)]
pub async fn delete_schedule(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = visitor_repository::delete_schedule(&state.pg_pool, id).await?;
    ensure_affected(rows, "Visitor schedule not found", "SCHEDULE_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Visitor schedule deleted successfully")),
    )
        .into_response())
}

fn evaluation_not_found() -> impl FnOnce(DbError) -> AppError {
    or_not_found("Evaluation not found", "EVALUATION_NOT_FOUND")
}

/// Record an evaluation of the student or of the company of a training.
///
/// `company_id` is only stored for company evaluations.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "visitor_service", service.operation = "create_evaluation")
)]
pub async fn create_evaluation(
    state: Arc<AppState>,
    target: EvaluationTarget,
    request: CreateEvaluationRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateEvaluationRequest")?;
    ensure_training_exists(&state, request.visitor_training_id).await?;

    let company_id = match target {
        EvaluationTarget::Company => request.company_id,
        EvaluationTarget::Student => None,
    };
    let evaluation = visitor_repository::create_evaluation(
        &state.pg_pool,
        target,
        request.visitor_training_id,
        company_id,
        request.score,
        request.questions.as_ref(),
        non_empty(&request.comment),
    )
    .await
    .map_err(|e| match e {
        DbError::ForeignKeyViolation { .. } => bad_request("Company not found", "COMPANY_NOT_FOUND"),
        other => other.into(),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Evaluation created successfully",
            StoredEvaluation::from(evaluation),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "get_evaluations")
)]
pub async fn get_evaluations(
    state: Arc<AppState>,
    target: EvaluationTarget,
    query: TrainingScopedQuery,
) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let (evaluations, total) = visitor_repository::list_evaluations(
        &state.pg_pool,
        target,
        query.visitor_training_id,
        window.limit,
        window.offset(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Evaluations retrieved successfully",
            evaluations.into_iter().map(StoredEvaluation::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "get_evaluation_by_id")
)]
pub async fn get_evaluation_by_id(
    state: Arc<AppState>,
    target: EvaluationTarget,
    id: i64,
) -> Result<Response, AppError> {
    let evaluation = visitor_repository::get_evaluation_by_id(&state.pg_pool, target, id)
        .await
        .map_err(evaluation_not_found())?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Evaluation retrieved successfully",
            StoredEvaluation::from(evaluation),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "visitor_service", service.operation = "update_evaluation")
)]
pub async fn update_evaluation(
    state: Arc<AppState>,
    target: EvaluationTarget,
    id: i64,
    request: UpdateEvaluationRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateEvaluationRequest")?;
    let evaluation = visitor_repository::update_evaluation(
        &state.pg_pool,
        target,
        id,
        request.score,
        request.questions.as_ref(),
        non_empty(&request.comment),
    )
    .await
    .map_err(evaluation_not_found())?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Evaluation updated successfully",
            StoredEvaluation::from(evaluation),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "visitor_service", service.operation = "delete_evaluation")
)]
pub async fn delete_evaluation(
    state: Arc<AppState>,
    target: EvaluationTarget,
    id: i64,
) -> Result<Response, AppError> {
    let rows = visitor_repository::delete_evaluation(&state.pg_pool, target, id).await?;
    ensure_affected(rows, "Evaluation not found", "EVALUATION_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Evaluation deleted successfully")),
    )
        .into_response())
}
