use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::model::common::MessageResponse;
use crate::api::model::instructor::{
    AssignCourseRequest, CreateInstructorRequest, InstructorListQuery, InstructorStats,
    StoredCourseAssignment, StoredInstructor, UpdateAssignmentRequest, UpdateInstructorRequest,
};
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::service::instructor_service;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn instructor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_instructors_handler).post(create_instructor_handler))
        .route("/stats", get(get_instructor_stats_handler))
        .route("/assign-course", post(assign_course_handler))
        .route(
            "/course-assignments/{id}",
            put(update_assignment_handler).delete(delete_assignment_handler),
        )
        .route(
            "/{id}",
            get(get_instructor_handler)
                .put(update_instructor_handler)
                .delete(delete_instructor_handler),
        )
        .route(
            "/{id}/course-assignments",
            get(get_instructor_assignments_handler),
        )
}

/// Create instructor
#[utoipa::path(
    post,
    path = "/api/v1/instructors",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    request_body = CreateInstructorRequest,
    responses(
        (status = 201, description = "Instructor created successfully", body = StoredInstructor),
        (status = 400, description = "User not found", body = ApiError),
        (status = 409, description = "Staff id taken or user already an instructor", body = ApiError),
    )
)]
pub(crate) async fn create_instructor_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateInstructorRequest>,
) -> Result<Response, AppError> {
    instructor_service::create_instructor(state, request).await
}

/// Get a list of instructors
#[utoipa::path(
    get,
    path = "/api/v1/instructors",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    params(InstructorListQuery),
    responses(
        (status = 200, description = "Instructors retrieved successfully", body = [StoredInstructor]),
    )
)]
pub(crate) async fn get_instructors_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<InstructorListQuery>,
) -> Result<Response, AppError> {
    instructor_service::get_instructors(state, query).await
}

/// Instructor statistics
#[utoipa::path(
    get,
    path = "/api/v1/instructors/stats",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Instructor statistics", body = InstructorStats),
    )
)]
pub(crate) async fn get_instructor_stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    instructor_service::get_instructor_stats(state).await
}

/// Get an instructor by id
#[utoipa::path(
    get,
    path = "/api/v1/instructors/{id}",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Instructor id")
    ),
    responses(
        (status = 200, description = "Instructor retrieved successfully", body = StoredInstructor),
        (status = 404, description = "Instructor not found", body = ApiError),
    )
)]
pub(crate) async fn get_instructor_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    instructor_service::get_instructor_by_id(state, id).await
}

/// Update instructor
#[utoipa::path(
    put,
    path = "/api/v1/instructors/{id}",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    request_body = UpdateInstructorRequest,
    params(
        ("id" = i64, Path, description = "Instructor id")
    ),
    responses(
        (status = 200, description = "Instructor updated successfully", body = StoredInstructor),
        (status = 404, description = "Instructor not found", body = ApiError),
    )
)]
pub(crate) async fn update_instructor_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateInstructorRequest>,
) -> Result<Response, AppError> {
    instructor_service::update_instructor(state, id, request).await
}

/// Delete instructor
#[utoipa::path(
    delete,
    path = "/api/v1/instructors/{id}",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Instructor id")
    ),
    responses(
        (status = 200, description = "Instructor deleted successfully", body = MessageResponse),
        (status = 404, description = "Instructor not found", body = ApiError),
    )
)]
pub(crate) async fn delete_instructor_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    instructor_service::delete_instructor(state, id).await
}

/// Assign instructor to a course section
#[utoipa::path(
    post,
    path = "/api/v1/instructors/assign-course",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    request_body = AssignCourseRequest,
    responses(
        (status = 201, description = "Course assigned successfully", body = StoredCourseAssignment),
        (status = 404, description = "Instructor or section not found", body = ApiError),
        (status = 409, description = "Already assigned", body = ApiError),
    )
)]
pub(crate) async fn assign_course_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<AssignCourseRequest>,
) -> Result<Response, AppError> {
    instructor_service::assign_course(state, request).await
}

/// Update course assignment role
#[utoipa::path(
    put,
    path = "/api/v1/instructors/course-assignments/{id}",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    request_body = UpdateAssignmentRequest,
    params(
        ("id" = i64, Path, description = "Course assignment id")
    ),
    responses(
        (status = 200, description = "Course assignment updated successfully", body = StoredCourseAssignment),
        (status = 404, description = "Course assignment not found", body = ApiError),
    )
)]
pub(crate) async fn update_assignment_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateAssignmentRequest>,
) -> Result<Response, AppError> {
    instructor_service::update_assignment(state, id, request).await
}

/// Remove course assignment
#[utoipa::path(
    delete,
    path = "/api/v1/instructors/course-assignments/{id}",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Course assignment id")
    ),
    responses(
        (status = 200, description = "Course assignment deleted successfully", body = MessageResponse),
        (status = 404, description = "Course assignment not found", body = ApiError),
    )
)]
pub(crate) async fn delete_assignment_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    instructor_service::delete_assignment(state, id).await
}

/// Course assignments of an instructor
#[utoipa::path(
    get,
    path = "/api/v1/instructors/{id}/course-assignments",
    tag = "Instructors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Instructor id")
    ),
    responses(
        (status = 200, description = "Course assignments retrieved successfully", body = [StoredCourseAssignment]),
        (status = 404, description = "Instructor not found", body = ApiError),
    )
)]
pub(crate) async fn get_instructor_assignments_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    instructor_service::get_instructor_assignments(state, id).await
}
