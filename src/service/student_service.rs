use crate::api::model::common::{ApiResponse, GroupCount, MessageResponse, PaginatedResponse};
use crate::api::model::student::{
    CreateStudentRequest, EnrollStudentRequest, StoredEnrollment, StoredStudent,
    StudentListQuery, StudentStats, UpdateEnrollmentRequest, UpdateStudentRequest,
};
use crate::config::app_config::AppState;
use crate::db::db_error::DbError;
use crate::db::repo::student_repository::{StudentFields, StudentFilter};
use crate::db::repo::{course_section_repository, student_repository};
use crate::error::error_model::AppError;
use crate::service::{bad_request, conflict, ensure_affected, non_empty, or_not_found};
use crate::util::pagination::{search_term, PageWindow};
use crate::util::validation::{normalize_phone, normalize_student_id};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};

const DEFAULT_ENROLLMENT_STATUS: &str = "enrolled";

fn map_student_write_error(e: DbError) -> AppError {
    if e.is_unique_violation_on("students_student_id_key") {
        conflict("Student ID already exists", "STUDENT_ID_EXISTS")
    } else if e.is_unique_violation_on("students_user_id_key") {
        conflict("User is already registered as a student", "USER_ALREADY_STUDENT")
    } else if matches!(e, DbError::ForeignKeyViolation { .. }) {
        bad_request("User not found", "USER_NOT_FOUND")
    } else {
        or_not_found("Student not found", "STUDENT_NOT_FOUND")(e)
    }
}

/// Create a student profile for an existing user.
///
/// The student id and phone number are stored in their normalised form.
///
/// # Errors
///
/// * `USER_NOT_FOUND` (400) if the referenced user does not exist.
/// * `STUDENT_ID_EXISTS` if another student has the same student id.
/// * `USER_ALREADY_STUDENT` if the user already has a student profile.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "student_service", service.operation = "create_student")
)]
pub async fn create_student(
    state: Arc<AppState>,
    request: CreateStudentRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateStudentRequest")?;
    let student_id = normalize_student_id(&request.student_id);
    let phone = non_empty(&request.phone_number).map(normalize_phone);

    let values = StudentFields {
        user_id: Some(request.user_id),
        student_id: Some(&student_id),
        name: Some(request.name.trim()),
        middle_name: non_empty(&request.middle_name),
        surname: Some(request.surname.trim()),
        gpax: request.gpax,
        phone_number: phone.as_deref(),
        email: non_empty(&request.email),
        major: non_empty(&request.major),
        program: non_empty(&request.program),
        faculty: non_empty(&request.faculty),
        campus: non_empty(&request.campus),
    };
    let student = student_repository::create_student(&state.pg_pool, &values)
        .await
        .map_err(|e| {
            error!("Error creating student: {:?}", e);
            map_student_write_error(e)
        })?;

    info!(student_id = student.id, "Student created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/students/{}", student.id))],
        Json(ApiResponse::new(
            "Student created successfully",
            StoredStudent::from(student),
        )),
    )
        .into_response())
}

/// Paginated student list filtered by search term, major and faculty.
#[tracing::instrument(
    skip(state),
    fields(service.name = "student_service", service.operation = "get_students")
)]
pub async fn get_students(
    state: Arc<AppState>,
    query: StudentListQuery,
) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let search = search_term(&query.search);
    let filter = StudentFilter {
        search: search.as_deref(),
        major: non_empty(&query.major),
        faculty: non_empty(&query.faculty),
    };

    let students =
        student_repository::list_students(&state.pg_pool, &filter, window.limit, window.offset())
            .await?;
    let total = student_repository::count_students(&state.pg_pool, &filter).await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Students retrieved successfully",
            students.into_iter().map(StoredStudent::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "student_service", service.operation = "get_student_stats")
)]
pub async fn get_student_stats(state: Arc<AppState>) -> Result<Response, AppError> {
    let by_major = student_repository::count_students_by_major(&state.pg_pool).await?;
    let average_gpax = student_repository::average_gpax(&state.pg_pool).await?;
    let total: i64 = by_major.iter().map(|(_, count)| count).sum();

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Student statistics retrieved successfully",
            StudentStats {
                total,
                average_gpax,
                by_major: by_major.into_iter().map(GroupCount::from).collect(),
            },
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "student_service", service.operation = "get_student_by_id")
)]
pub async fn get_student_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let student = student_repository::get_student_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Student not found", "STUDENT_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Student retrieved successfully",
            StoredStudent::from(student),
        )),
    )
        .into_response())
}

/// Update a student profile. Absent fields keep their stored value.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "student_service", service.operation = "update_student")
)]
pub async fn update_student(
    state: Arc<AppState>,
    id: i64,
    request: UpdateStudentRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateStudentRequest")?;
    let student_id = request.student_id.as_deref().map(normalize_student_id);
    let phone = non_empty(&request.phone_number).map(normalize_phone);

    let values = StudentFields {
        user_id: None,
        student_id: student_id.as_deref(),
        name: non_empty(&request.name),
        middle_name: non_empty(&request.middle_name),
        surname: non_empty(&request.surname),
        gpax: request.gpax,
        phone_number: phone.as_deref(),
        email: non_empty(&request.email),
        major: non_empty(&request.major),
        program: non_empty(&request.program),
        faculty: non_empty(&request.faculty),
        campus: non_empty(&request.campus),
    };
    let student = student_repository::update_student(&state.pg_pool, id, &values)
        .await
        .map_err(map_student_write_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Student updated successfully",
            StoredStudent::from(student),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "student_service", service.operation = "delete_student")
)]
pub async fn delete_student(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = student_repository::delete_student(&state.pg_pool, id).await?;
    ensure_affected(rows, "Student not found", "STUDENT_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Student deleted successfully")),
    )
        .into_response())
}

/// Enroll a student into a course section.
///
/// # Errors
///
/// * `STUDENT_NOT_FOUND` or `SECTION_NOT_FOUND` (404) for unknown references.
/// * `SECTION_FULL` if the section reached `max_students`.
/// * `ALREADY_ENROLLED` if the student is already in the section.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "student_service", service.operation = "enroll_student")
)]
pub async fn enroll_student(
    state: Arc<AppState>,
    request: EnrollStudentRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "EnrollStudentRequest")?;
    student_repository::get_student_by_id(&state.pg_pool, request.student_id)
        .await
        .map_err(or_not_found("Student not found", "STUDENT_NOT_FOUND"))?;
    let status = non_empty(&request.status).unwrap_or(DEFAULT_ENROLLMENT_STATUS);

    // The section row lock serialises concurrent enrollments into the same section.
    let mut tx = state.pg_pool.begin().await.map_err(DbError::from)?;
    let section = course_section_repository::lock_section_by_id(&mut *tx, request.course_section_id)
        .await
        .map_err(or_not_found("Course section not found", "SECTION_NOT_FOUND"))?;

    let enrolled = course_section_repository::count_enrolled(&mut *tx, section.id).await?;
    if enrolled >= i64::from(section.max_students) {
        return Err(conflict("Course section is full", "SECTION_FULL"));
    }

    let enrollment =
        student_repository::create_enrollment(&mut *tx, request.student_id, section.id, status)
            .await
            .map_err(|e| {
                if e.is_unique_violation_on("student_enrolls_student_section_key") {
                    conflict(
                        "Student is already enrolled in this section",
                        "ALREADY_ENROLLED",
                    )
                } else {
                    error!("Error enrolling student: {:?}", e);
                    e.into()
                }
            })?;
    tx.commit().await.map_err(DbError::from)?;

    info!(
        student_id = request.student_id,
        course_section_id = section.id,
        "Student enrolled"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Student enrolled successfully",
            StoredEnrollment::from(enrollment),
        )),
    )
        .into_response())
}

/// Update status, grade or grade points of an enrollment.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "student_service", service.operation = "update_enrollment")
)]
pub async fn update_enrollment(
    state: Arc<AppState>,
    id: i64,
    request: UpdateEnrollmentRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateEnrollmentRequest")?;
    let enrollment = student_repository::update_enrollment(
        &state.pg_pool,
        id,
        non_empty(&request.status),
        non_empty(&request.grade),
        request.grade_points,
    )
    .await
    .map_err(or_not_found("Enrollment not found", "ENROLLMENT_NOT_FOUND"))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Enrollment updated successfully",
            StoredEnrollment::from(enrollment),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "student_service", service.operation = "get_student_enrollments")
)]
pub async fn get_student_enrollments(
    state: Arc<AppState>,
    student_id: i64,
) -> Result<Response, AppError> {
    student_repository::get_student_by_id(&state.pg_pool, student_id)
        .await
        .map_err(or_not_found("Student not found", "STUDENT_NOT_FOUND"))?;
    let enrollments =
        student_repository::list_enrollments_for_student(&state.pg_pool, student_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Enrollments retrieved successfully",
            enrollments
                .into_iter()
                .map(StoredEnrollment::from)
                .collect::<Vec<_>>(),
        )),
    )
        .into_response())
}
