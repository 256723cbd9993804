use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::model::common::MessageResponse;
use crate::api::model::student::{
    CreateStudentRequest, EnrollStudentRequest, StoredEnrollment, StoredStudent,
    StudentListQuery, StudentStats, UpdateEnrollmentRequest, UpdateStudentRequest,
};
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::service::student_service;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn student_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_students_handler).post(create_student_handler))
        .route("/stats", get(get_student_stats_handler))
        .route("/enroll", post(enroll_student_handler))
        .route("/enrollments/{id}", put(update_enrollment_handler))
        .route(
            "/{id}",
            get(get_student_handler)
                .put(update_student_handler)
                .delete(delete_student_handler),
        )
        .route("/{id}/enrollments", get(get_student_enrollments_handler))
}

/// Create student
///
/// Create the student profile of an existing user.
#[utoipa::path(
    post,
    path = "/api/v1/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = StoredStudent),
        (status = 400, description = "User not found", body = ApiError),
        (status = 409, description = "Student id taken or user already a student", body = ApiError),
        (status = 422, description = "Unprocessable request", body = ApiError),
    )
)]
pub(crate) async fn create_student_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateStudentRequest>,
) -> Result<Response, AppError> {
    student_service::create_student(state, request).await
}

/// Get a list of students
#[utoipa::path(
    get,
    path = "/api/v1/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(StudentListQuery),
    responses(
        (status = 200, description = "Students retrieved successfully", body = [StoredStudent]),
    )
)]
pub(crate) async fn get_students_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<StudentListQuery>,
) -> Result<Response, AppError> {
    student_service::get_students(state, query).await
}

/// Student statistics
///
/// Total, average GPAX and the count per major.
#[utoipa::path(
    get,
    path = "/api/v1/students/stats",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student statistics", body = StudentStats),
    )
)]
pub(crate) async fn get_student_stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    student_service::get_student_stats(state).await
}

/// Get a student by id
#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Student record id")
    ),
    responses(
        (status = 200, description = "Student retrieved successfully", body = StoredStudent),
        (status = 404, description = "Student not found", body = ApiError),
    )
)]
pub(crate) async fn get_student_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    student_service::get_student_by_id(state, id).await
}

/// Update student
#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = UpdateStudentRequest,
    params(
        ("id" = i64, Path, description = "Student record id")
    ),
    responses(
        (status = 200, description = "Student updated successfully", body = StoredStudent),
        (status = 404, description = "Student not found", body = ApiError),
        (status = 409, description = "Student id taken", body = ApiError),
    )
)]
pub(crate) async fn update_student_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateStudentRequest>,
) -> Result<Response, AppError> {
    student_service::update_student(state, id, request).await
}

/// Delete student
#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Student record id")
    ),
    responses(
        (status = 200, description = "Student deleted successfully", body = MessageResponse),
        (status = 404, description = "Student not found", body = ApiError),
    )
)]
pub(crate) async fn delete_student_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    student_service::delete_student(state, id).await
}

/// Enroll student in a course section
#[utoipa::path(
    post,
    path = "/api/v1/students/enroll",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = EnrollStudentRequest,
    responses(
        (status = 201, description = "Student enrolled successfully", body = StoredEnrollment),
        (status = 404, description = "Student or section not found", body = ApiError),
        (status = 409, description = "Already enrolled or section full", body = ApiError),
    )
)]
pub(crate) async fn enroll_student_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<EnrollStudentRequest>,
) -> Result<Response, AppError> {
    student_service::enroll_student(state, request).await
}

/// Update enrollment
///
/// Change status, grade or grade points of an enrollment.
#[utoipa::path(
    put,
    path = "/api/v1/students/enrollments/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = UpdateEnrollmentRequest,
    params(
        ("id" = i64, Path, description = "Enrollment id")
    ),
    responses(
        (status = 200, description = "Enrollment updated successfully", body = StoredEnrollment),
        (status = 404, description = "Enrollment not found", body = ApiError),
    )
)]
pub(crate) async fn update_enrollment_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateEnrollmentRequest>,
) -> Result<Response, AppError> {
    student_service::update_enrollment(state, id, request).await
}

/// Enrollments of a student
#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/enrollments",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Student record id")
    ),
    responses(
        (status = 200, description = "Enrollments retrieved successfully", body = [StoredEnrollment]),
        (status = 404, description = "Student not found", body = ApiError),
    )
)]
pub(crate) async fn get_student_enrollments_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    student_service::get_student_enrollments(state, id).await
}
