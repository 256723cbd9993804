use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::model::common::MessageResponse;
use crate::api::model::visitor::{
    CreateEvaluationRequest, CreateVisitorScheduleRequest, CreateVisitorTrainingRequest,
    StoredEvaluation, StoredVisitorSchedule, StoredVisitorTraining, TrainingScopedQuery,
    UpdateEvaluationRequest, UpdateVisitorScheduleRequest, UpdateVisitorTrainingRequest,
    VisitorTrainingListQuery,
};
use crate::config::app_config::AppState;
use crate::db::repo::visitor_repository::EvaluationTarget;
use crate::error::error_model::{ApiError, AppError};
use crate::service::visitor_service;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn visitor_training_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_trainings_handler).post(create_training_handler))
        .route(
            "/{id}",
            get(get_training_handler)
                .put(update_training_handler)
                .delete(delete_training_handler),
        )
}

pub fn visitor_schedule_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_schedules_handler).post(create_schedule_handler))
        .route(
            "/{id}",
            get(get_schedule_handler)
                .put(update_schedule_handler)
                .delete(delete_schedule_handler),
        )
}

pub fn visitor_evaluation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/students",
            get(get_student_evaluations_handler).post(create_student_evaluation_handler),
        )
        .route(
            "/students/{id}",
            get(get_student_evaluation_handler)
                .put(update_student_evaluation_handler)
                .delete(delete_student_evaluation_handler),
        )
        .route(
            "/companies",
            get(get_company_evaluations_handler).post(create_company_evaluation_handler),
        )
        .route(
            "/companies/{id}",
            get(get_company_evaluation_handler)
                .put(update_company_evaluation_handler)
                .delete(delete_company_evaluation_handler),
        )
}

// Trainings

/// Create visitor training
///
/// Assign a visiting instructor to a student enrollment.
#[utoipa::path(
    post,
    path = "/api/v1/visitor-trainings",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    request_body = CreateVisitorTrainingRequest,
    responses(
        (status = 201, description = "Visitor training created successfully", body = StoredVisitorTraining),
        (status = 400, description = "Referenced record not found", body = ApiError),
    )
)]
pub(crate) async fn create_training_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateVisitorTrainingRequest>,
) -> Result<Response, AppError> {
    visitor_service::create_training(state, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/visitor-trainings",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(VisitorTrainingListQuery),
    responses(
        (status = 200, description = "Visitor trainings retrieved successfully", body = [StoredVisitorTraining]),
    )
)]
pub(crate) async fn get_trainings_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<VisitorTrainingListQuery>,
) -> Result<Response, AppError> {
    visitor_service::get_trainings(state, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/visitor-trainings/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Visitor training id")
    ),
    responses(
        (status = 200, description = "Visitor training retrieved successfully", body = StoredVisitorTraining),
        (status = 404, description = "Visitor training not found", body = ApiError),
    )
)]
pub(crate) async fn get_training_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    visitor_service::get_training_by_id(state, id).await
}

#[utoipa::path(
    put,
    path = "/api/v1/visitor-trainings/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    request_body = UpdateVisitorTrainingRequest,
    params(
        ("id" = i64, Path, description = "Visitor training id")
    ),
    responses(
        (status = 200, description = "Visitor training updated successfully", body = StoredVisitorTraining),
        (status = 404, description = "Visitor training not found", body = ApiError),
    )
)]
pub(crate) async fn update_training_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateVisitorTrainingRequest>,
) -> Result<Response, AppError> {
    visitor_service::update_training(state, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/visitor-trainings/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Visitor training id")
    ),
    responses(
        (status = 200, description = "Visitor training deleted successfully", body = MessageResponse),
        (status = 404, description = "Visitor training not found", body = ApiError),
    )
)]
pub(crate) async fn delete_training_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    visitor_service::delete_training(state, id).await
}

// Schedules

/// Schedule a visit
#[utoipa::path(
    post,
    path = "/api/v1/visitor-schedules",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    request_body = CreateVisitorScheduleRequest,
    responses(
        (status = 201, description = "Visitor schedule created successfully", body = StoredVisitorSchedule),
        (status = 400, description = "Visitor training not found", body = ApiError),
        (status = 409, description = "Visit number already scheduled", body = ApiError),
    )
)]
pub(crate) async fn create_schedule_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateVisitorScheduleRequest>,
) -> Result<Response, AppError> {
    visitor_service::create_schedule(state, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/visitor-schedules",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(TrainingScopedQuery),
    responses(
        (status = 200, description = "Visitor schedules retrieved successfully", body = [StoredVisitorSchedule]),
    )
)]
pub(crate) async fn get_schedules_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<TrainingScopedQuery>,
) -> Result<Response, AppError> {
    visitor_service::get_schedules(state, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/visitor-schedules/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Visitor schedule id")
    ),
    responses(
        (status = 200, description = "Visitor schedule retrieved successfully", body = StoredVisitorSchedule),
        (status = 404, description = "Visitor schedule not found", body = ApiError),
    )
)]
pub(crate) async fn get_schedule_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    visitor_service::get_schedule_by_id(state, id).await
}

#[utoipa::path(
    put,
    path = "/api/v1/visitor-schedules/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    request_body = UpdateVisitorScheduleRequest,
    params(
        ("id" = i64, Path, description = "Visitor schedule id")
    ),
    responses(
        (status = 200, description = "Visitor schedule updated successfully", body = StoredVisitorSchedule),
        (status = 404, description = "Visitor schedule not found", body = ApiError),
        (status = 409, description = "Visit number already scheduled", body = ApiError),
    )
)]
pub(crate) async fn update_schedule_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateVisitorScheduleRequest>,
) -> Result<Response, AppError> {
    visitor_service::update_schedule(state, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/visitor-schedules/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Visitor schedule id")
    ),
    responses(
        (status = 200, description = "Visitor schedule deleted successfully", body = MessageResponse),
        (status = 404, description = "Visitor schedule not found", body = ApiError),
    )
)]
pub(crate) async fn delete_schedule_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    visitor_service::delete_schedule(state, id).await
}

// Student evaluations

#[utoipa::path(
    post,
    path = "/api/v1/visitor-evaluations/students",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    request_body = CreateEvaluationRequest,
    responses(
        (status = 201, description = "Evaluation created successfully", body = StoredEvaluation),
        (status = 400, description = "Visitor training not found", body = ApiError),
        (status = 422, description = "Unprocessable request", body = ApiError),
    )
)]
pub(crate) async fn create_student_evaluation_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateEvaluationRequest>,
) -> Result<Response, AppError> {
    visitor_service::create_evaluation(state, EvaluationTarget::Student, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/visitor-evaluations/students",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(TrainingScopedQuery),
    responses(
        (status = 200, description = "Evaluations retrieved successfully", body = [StoredEvaluation]),
    )
)]
pub(crate) async fn get_student_evaluations_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<TrainingScopedQuery>,
) -> Result<Response, AppError> {
    visitor_service::get_evaluations(state, EvaluationTarget::Student, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/visitor-evaluations/students/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Evaluation id")
    ),
    responses(
        (status = 200, description = "Evaluation retrieved successfully", body = StoredEvaluation),
        (status = 404, description = "Evaluation not found", body = ApiError),
    )
)]
pub(crate) async fn get_student_evaluation_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    visitor_service::get_evaluation_by_id(state, EvaluationTarget::Student, id).await
}

#[utoipa::path(
    put,
    path = "/api/v1/visitor-evaluations/students/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    request_body = UpdateEvaluationRequest,
    params(
        ("id" = i64, Path, description = "Evaluation id")
    ),
    responses(
        (status = 200, description = "Evaluation updated successfully", body = StoredEvaluation),
        (status = 404, description = "Evaluation not found", body = ApiError),
    )
)]
pub(crate) async fn update_student_evaluation_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateEvaluationRequest>,
) -> Result<Response, AppError> {
    visitor_service::update_evaluation(state, EvaluationTarget::Student, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/visitor-evaluations/students/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Evaluation id")
    ),
    responses(
        (status = 200, description = "Evaluation deleted successfully", body = MessageResponse),
        (status = 404, description = "Evaluation not found", body = ApiError),
    )
)]
pub(crate) async fn delete_student_evaluation_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    visitor_service::delete_evaluation(state, EvaluationTarget::Student, id).await
}

// Company evaluations

#[utoipa::path(
    post,
    path = "/api/v1/visitor-evaluations/companies",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    request_body = CreateEvaluationRequest,
    responses(
        (status = 201, description = "Evaluation created successfully", body = StoredEvaluation),
        (status = 400, description = "Visitor training or company not found", body = ApiError),
        (status = 422, description = "Unprocessable request", body = ApiError),
    )
)]
pub(crate) async fn create_company_evaluation_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateEvaluationRequest>,
) -> Result<Response, AppError> {
    visitor_service::create_evaluation(state, EvaluationTarget::Company, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/visitor-evaluations/companies",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(TrainingScopedQuery),
    responses(
        (status = 200, description = "Evaluations retrieved successfully", body = [StoredEvaluation]),
    )
)]
pub(crate) async fn get_company_evaluations_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<TrainingScopedQuery>,
) -> Result<Response, AppError> {
    visitor_service::get_evaluations(state, EvaluationTarget::Company, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/visitor-evaluations/companies/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Evaluation id")
    ),
    responses(
        (status = 200, description = "Evaluation retrieved successfully", body = StoredEvaluation),
        (status = 404, description = "Evaluation not found", body = ApiError),
    )
)]
pub(crate) async fn get_company_evaluation_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    visitor_service::get_evaluation_by_id(state, EvaluationTarget::Company, id).await
}

#[utoipa::path(
    put,
    path = "/api/v1/visitor-evaluations/companies/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    request_body = UpdateEvaluationRequest,
    params(
        ("id" = i64, Path, description = "Evaluation id")
    ),
    responses(
        (status = 200, description = "Evaluation updated successfully", body = StoredEvaluation),
        (status = 404, description = "Evaluation not found", body = ApiError),
    )
)]
pub(crate) async fn update_company_evaluation_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateEvaluationRequest>,
) -> Result<Response, AppError> {
    visitor_service::update_evaluation(state, EvaluationTarget::Company, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/visitor-evaluations/companies/{id}",
    tag = "Visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Evaluation id")
    ),
    responses(
        (status = 200, description = "Evaluation deleted successfully", body = MessageResponse),
        (status = 404, description = "Evaluation not found", body = ApiError),
    )
)]
pub(crate) async fn delete_company_evaluation_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    visitor_service::delete_evaluation(state, EvaluationTarget::Company, id).await
}
