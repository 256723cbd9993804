use crate::api::handler::{
    auth_handler, company_handler, course_handler, enrollment_status_handler, file_handler,
    health_handler, instructor_handler, staff_handler, student_handler, user_handler,
    visitor_handler,
};
use crate::config::app_config::AppState;
use crate::error::error_model::{AppError, ErrorType};
use crate::middleware::auth::require_auth;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Internship Management API",
        description = "Students, instructors, courses and internship supervision visits."
    ),
    modifiers(&BearerAuth),
    paths(
        health_handler::health_handler,
        health_handler::db_health_handler,
        health_handler::api_info_handler,
        auth_handler::login_handler,
        auth_handler::student_login_handler,
        auth_handler::register_handler,
        auth_handler::refresh_token_handler,
        auth_handler::request_password_reset_handler,
        auth_handler::reset_password_handler,
        auth_handler::me_handler,
        auth_handler::change_password_handler,
        auth_handler::logout_handler,
        user_handler::create_user_handler,
        user_handler::get_users_handler,
        user_handler::get_user_stats_handler,
        user_handler::get_user_handler,
        user_handler::update_user_handler,
        user_handler::delete_user_handler,
        user_handler::bulk_delete_users_handler,
        user_handler::get_roles_handler,
        student_handler::create_student_handler,
        student_handler::get_students_handler,
        student_handler::get_student_stats_handler,
        student_handler::get_student_handler,
        student_handler::update_student_handler,
        student_handler::delete_student_handler,
        student_handler::enroll_student_handler,
        student_handler::update_enrollment_handler,
        student_handler::get_student_enrollments_handler,
        instructor_handler::create_instructor_handler,
        instructor_handler::get_instructors_handler,
        instructor_handler::get_instructor_stats_handler,
        instructor_handler::get_instructor_handler,
        instructor_handler::update_instructor_handler,
        instructor_handler::delete_instructor_handler,
        instructor_handler::assign_course_handler,
        instructor_handler::update_assignment_handler,
        instructor_handler::delete_assignment_handler,
        instructor_handler::get_instructor_assignments_handler,
        staff_handler::create_staff_handler,
        staff_handler::get_staff_list_handler,
        staff_handler::get_staff_handler,
        staff_handler::update_staff_handler,
        staff_handler::delete_staff_handler,
        course_handler::create_curriculum_handler,
        course_handler::get_curriculums_handler,
        course_handler::get_curriculum_handler,
        course_handler::create_course_handler,
        course_handler::get_courses_handler,
        course_handler::get_course_handler,
        course_handler::update_course_handler,
        course_handler::delete_course_handler,
        course_handler::create_course_section_handler,
        course_handler::get_course_sections_handler,
        course_handler::get_course_section_handler,
        course_handler::update_course_section_handler,
        course_handler::delete_course_section_handler,
        enrollment_status_handler::create_enrollment_status_handler,
        enrollment_status_handler::get_enrollment_statuses_handler,
        enrollment_status_handler::update_enrollment_status_handler,
        company_handler::create_company_handler,
        company_handler::get_companies_handler,
        company_handler::get_company_handler,
        company_handler::update_company_handler,
        company_handler::delete_company_handler,
        visitor_handler::create_training_handler,
        visitor_handler::get_trainings_handler,
        visitor_handler::get_training_handler,
        visitor_handler::update_training_handler,
        visitor_handler::delete_training_handler,
        visitor_handler::create_schedule_handler,
        visitor_handler::get_schedules_handler,
        visitor_handler::get_schedule_handler,
        visitor_handler::update_schedule_handler,
        visitor_handler::delete_schedule_handler,
        visitor_handler::create_student_evaluation_handler,
        visitor_handler::get_student_evaluations_handler,
        visitor_handler::get_student_evaluation_handler,
        visitor_handler::update_student_evaluation_handler,
        visitor_handler::delete_student_evaluation_handler,
        visitor_handler::create_company_evaluation_handler,
        visitor_handler::get_company_evaluations_handler,
        visitor_handler::get_company_evaluation_handler,
        visitor_handler::update_company_evaluation_handler,
        visitor_handler::delete_company_evaluation_handler,
        file_handler::list_files_handler,
        file_handler::download_file_handler,
        file_handler::delete_file_handler,
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Authentication", description = "Login, tokens and passwords"),
        (name = "Users", description = "User accounts and roles"),
        (name = "Students", description = "Students, enrollments and term statuses"),
        (name = "Instructors", description = "Instructors and course assignments"),
        (name = "Staff", description = "Staff profiles"),
        (name = "Courses", description = "Curriculums, courses and sections"),
        (name = "Companies", description = "Internship host companies"),
        (name = "Visitors", description = "Supervision visits and evaluations"),
        (name = "Files", description = "Generated documents"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn timeout_layer(secs: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(secs))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if state.config.allows_any_origin() {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

async fn route_not_found() -> Response {
    AppError::new(ErrorType::NotFound, "Route not found")
        .with_code("ROUTE_NOT_FOUND")
        .into_response()
}

/// Builds the complete application router.
///
/// Public: health checks, `/api/v1/test` and the unauthenticated auth endpoints.
/// Everything else under `/api/v1` passes through `require_auth`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(auth_handler::protected_auth_routes())
        .nest("/users", user_handler::user_routes())
        .nest("/roles", user_handler::role_routes())
        .nest("/students", student_handler::student_routes())
        .nest("/instructors", instructor_handler::instructor_routes())
        .nest("/staff", staff_handler::staff_routes())
        .nest("/curriculums", course_handler::curriculum_routes())
        .nest("/courses", course_handler::course_routes())
        .nest("/course-sections", course_handler::course_section_routes())
        .nest(
            "/student-enrollment-statuses",
            enrollment_status_handler::enrollment_status_routes(),
        )
        .nest("/companies", company_handler::company_routes())
        .nest("/visitor-trainings", visitor_handler::visitor_training_routes())
        .nest("/visitor-schedules", visitor_handler::visitor_schedule_routes())
        .nest(
            "/visitor-evaluations",
            visitor_handler::visitor_evaluation_routes(),
        )
        .nest("/files", file_handler::file_routes())
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .merge(auth_handler::public_auth_routes())
        .merge(health_handler::api_info_routes())
        .merge(protected);

    Router::new()
        .merge(health_handler::health_routes())
        .nest("/api/v1", api)
        .fallback(route_not_found)
        .layer(CompressionLayer::new())
        .layer(timeout_layer(state.config.request_timeout_secs))
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    #[tokio::test]
    async fn slow_requests_time_out_with_408() {
        let app: Router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    "done"
                }),
            )
            .layer(timeout_layer(1));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn openapi_document_lists_resources_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/login"));
        assert!(doc.paths.paths.contains_key("/api/v1/student-login"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/bulk"));
        assert!(doc.paths.paths.contains_key("/api/v1/visitor-evaluations/companies/{id}"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
