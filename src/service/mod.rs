use crate::db::db_error::DbError;
use crate::error::error_model::{AppError, ErrorType};

pub mod auth_service;
pub mod company_service;
pub mod course_section_service;
pub mod course_service;
pub mod curriculum_service;
pub mod enrollment_status_service;
pub mod file_service;
pub mod instructor_service;
pub mod jwt_service;
pub mod staff_service;
pub mod student_service;
pub mod user_service;
pub mod visitor_service;

/// Maps `DbError::NotFound` to a resource specific 404 and passes other errors through.
pub(crate) fn or_not_found(
    message: &'static str,
    code: &'static str,
) -> impl FnOnce(DbError) -> AppError {
    move |e| match e {
        DbError::NotFound => AppError::new(ErrorType::NotFound, message).with_code(code),
        other => other.into(),
    }
}

/// Turns a zero row count from a delete or update into a 404.
pub(crate) fn ensure_affected(
    rows: u64,
    message: &'static str,
    code: &'static str,
) -> Result<(), AppError> {
    if rows == 0 {
        Err(AppError::new(ErrorType::NotFound, message).with_code(code))
    } else {
        Ok(())
    }
}

pub(crate) fn conflict(message: &'static str, code: &'static str) -> AppError {
    AppError::new(ErrorType::Conflict, message).with_code(code)
}

pub(crate) fn bad_request(message: &'static str, code: &'static str) -> AppError {
    AppError::new(ErrorType::BadRequest, message).with_code(code)
}

/// Empty strings from optional form fields are treated as absent.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn not_found_is_specialised() {
        let err = or_not_found("Course not found", "COURSE_NOT_FOUND")(DbError::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code, "COURSE_NOT_FOUND");

        let err = or_not_found("Course not found", "COURSE_NOT_FOUND")(DbError::Connection {
            message: "refused".to_string(),
        });
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn zero_rows_is_not_found() {
        assert!(ensure_affected(1, "Course not found", "COURSE_NOT_FOUND").is_ok());
        let err = ensure_affected(0, "Course not found", "COURSE_NOT_FOUND").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn blank_optional_values_are_dropped() {
        assert_eq!(non_empty(&Some("  ".to_string())), None);
        assert_eq!(non_empty(&Some(" CPE ".to_string())), Some("CPE"));
        assert_eq!(non_empty(&None), None);
    }
}
