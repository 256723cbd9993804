use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::model::common::{ListQuery, MessageResponse};
use crate::api::model::course::{
    CourseListQuery, CourseSectionListQuery, CreateCourseRequest, CreateCourseSectionRequest,
    CreateCurriculumRequest, StoredCourse, StoredCourseSection, StoredCurriculum,
    UpdateCourseRequest, UpdateCourseSectionRequest,
};
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::service::{course_section_service, course_service, curriculum_service};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn curriculum_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(get_curriculums_handler).post(create_curriculum_handler),
        )
        .route("/{id}", get(get_curriculum_handler))
}

pub fn course_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_courses_handler).post(create_course_handler))
        .route(
            "/{id}",
            get(get_course_handler)
                .put(update_course_handler)
                .delete(delete_course_handler),
        )
}

pub fn course_section_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(get_course_sections_handler).post(create_course_section_handler),
        )
        .route(
            "/{id}",
            get(get_course_section_handler)
                .put(update_course_section_handler)
                .delete(delete_course_section_handler),
        )
}

// Curriculums

#[utoipa::path(
    post,
    path = "/api/v1/curriculums",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CreateCurriculumRequest,
    responses(
        (status = 201, description = "Curriculum created successfully", body = StoredCurriculum),
        (status = 409, description = "Curriculum code already exists", body = ApiError),
    )
)]
pub(crate) async fn create_curriculum_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateCurriculumRequest>,
) -> Result<Response, AppError> {
    curriculum_service::create_curriculum(state, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/curriculums",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Curriculums retrieved successfully", body = [StoredCurriculum]),
    )
)]
pub(crate) async fn get_curriculums_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<ListQuery>,
) -> Result<Response, AppError> {
    curriculum_service::get_curriculums(state, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/curriculums/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Curriculum id")
    ),
    responses(
        (status = 200, description = "Curriculum retrieved successfully", body = StoredCurriculum),
        (status = 404, description = "Curriculum not found", body = ApiError),
    )
)]
pub(crate) async fn get_curriculum_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    curriculum_service::get_curriculum_by_id(state, id).await
}

// Courses

/// Create course
///
/// The curriculum must exist and the course code must be unique.
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created successfully", body = StoredCourse),
        (status = 400, description = "Curriculum not found", body = ApiError),
        (status = 409, description = "Course code already exists", body = ApiError),
        (status = 422, description = "Unprocessable request", body = ApiError),
    )
)]
pub(crate) async fn create_course_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateCourseRequest>,
) -> Result<Response, AppError> {
    course_service::create_course(state, request).await
}

/// Get a list of courses
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(CourseListQuery),
    responses(
        (status = 200, description = "Courses retrieved successfully", body = [StoredCourse]),
    )
)]
pub(crate) async fn get_courses_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<CourseListQuery>,
) -> Result<Response, AppError> {
    course_service::get_courses(state, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Course retrieved successfully", body = StoredCourse),
        (status = 404, description = "Course not found", body = ApiError),
    )
)]
pub(crate) async fn get_course_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    course_service::get_course_by_id(state, id).await
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = UpdateCourseRequest,
    params(
        ("id" = i64, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Course updated successfully", body = StoredCourse),
        (status = 400, description = "Curriculum not found", body = ApiError),
        (status = 404, description = "Course not found", body = ApiError),
        (status = 409, description = "Course code already exists", body = ApiError),
    )
)]
pub(crate) async fn update_course_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateCourseRequest>,
) -> Result<Response, AppError> {
    course_service::update_course(state, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Course deleted successfully", body = MessageResponse),
        (status = 404, description = "Course not found", body = ApiError),
    )
)]
pub(crate) async fn delete_course_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    course_service::delete_course(state, id).await
}

// Course sections

#[utoipa::path(
    post,
    path = "/api/v1/course-sections",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CreateCourseSectionRequest,
    responses(
        (status = 201, description = "Course section created successfully", body = StoredCourseSection),
        (status = 400, description = "Course not found", body = ApiError),
        (status = 409, description = "Section already exists for the term", body = ApiError),
    )
)]
pub(crate) async fn create_course_section_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateCourseSectionRequest>,
) -> Result<Response, AppError> {
    course_section_service::create_course_section(state, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/course-sections",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(CourseSectionListQuery),
    responses(
        (status = 200, description = "Course sections retrieved successfully", body = [StoredCourseSection]),
    )
)]
pub(crate) async fn get_course_sections_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<CourseSectionListQuery>,
) -> Result<Response, AppError> {
    course_section_service::get_course_sections(state, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/course-sections/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Course section id")
    ),
    responses(
        (status = 200, description = "Course section retrieved successfully", body = StoredCourseSection),
        (status = 404, description = "Course section not found", body = ApiError),
    )
)]
pub(crate) async fn get_course_section_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    course_section_service::get_course_section_by_id(state, id).await
}

#[utoipa::path(
    put,
    path = "/api/v1/course-sections/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = UpdateCourseSectionRequest,
    params(
        ("id" = i64, Path, description = "Course section id")
    ),
    responses(
        (status = 200, description = "Course section updated successfully", body = StoredCourseSection),
        (status = 404, description = "Course section not found", body = ApiError),
        (status = 409, description = "Section already exists for the term", body = ApiError),
    )
)]
pub(crate) async fn update_course_section_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateCourseSectionRequest>,
) -> Result<Response, AppError> {
    course_section_service::update_course_section(state, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/course-sections/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Course section id")
    ),
    responses(
        (status = 200, description = "Course section deleted successfully", body = MessageResponse),
        (status = 404, description = "Course section not found", body = ApiError),
    )
)]
pub(crate) async fn delete_course_section_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    course_section_service::delete_course_section(state, id).await
}
