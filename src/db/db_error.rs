use crate::error::error_model::{AppError, ErrorType};
use axum::http::StatusCode;
use derive_more::Display;
use sqlx::error::ErrorKind;
use tracing::error;

pub type DbResult<T> = Result<T, DbError>;

/// Persistence failures, classified from the driver's structured error kind.
#[derive(Debug, Display, derive_more::Error)]
pub enum DbError {
    #[display("record not found")]
    NotFound,
    #[display("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
    #[display("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },
    #[display("not null constraint violated: {message}")]
    NotNullViolation { message: String },
    #[display("check constraint violated: {constraint}")]
    CheckViolation { constraint: String },
    #[display("database unavailable: {message}")]
    Connection { message: String },
    #[display("database error: {message}")]
    Other { message: String },
}

impl DbError {
    /// True when the error is a unique violation on the named constraint.
    pub fn is_unique_violation_on(&self, name: &str) -> bool {
        matches!(self, DbError::UniqueViolation { constraint } if constraint == name)
    }

    pub fn is_foreign_key_violation_on(&self, name: &str) -> bool {
        matches!(self, DbError::ForeignKeyViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation { constraint },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { constraint },
                    ErrorKind::NotNullViolation => DbError::NotNullViolation {
                        message: db_err.message().to_string(),
                    },
                    ErrorKind::CheckViolation => DbError::CheckViolation { constraint },
                    _ => DbError::Other {
                        message: db_err.message().to_string(),
                    },
                }
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DbError::Connection {
                message: err.to_string(),
            },
            other => DbError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Other {
            message: err.to_string(),
        }
    }
}

// Generic mapping. Services handle the cases that deserve a resource specific message first.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AppError::new(ErrorType::NotFound, "Record not found"),
            DbError::UniqueViolation { constraint } => {
                AppError::new(ErrorType::Conflict, "Duplicate entry")
                    .with_code("DUPLICATE_ENTRY")
                    .with_details(constraint)
            }
            DbError::ForeignKeyViolation { constraint } => {
                AppError::new(ErrorType::Database, "Foreign key constraint violation")
                    .with_code("FOREIGN_KEY_VIOLATION")
                    .with_status(StatusCode::BAD_REQUEST)
                    .with_details(constraint)
            }
            DbError::NotNullViolation { message } => {
                AppError::new(ErrorType::BadRequest, "Required field is missing")
                    .with_code("NOT_NULL_VIOLATION")
                    .with_details(message)
            }
            DbError::CheckViolation { constraint } => {
                AppError::new(ErrorType::BadRequest, "Value violates a check constraint")
                    .with_code("CHECK_VIOLATION")
                    .with_details(constraint)
            }
            DbError::Connection { message } => {
                error!("Database connection error: {}", message);
                AppError::new(ErrorType::Database, "Database connection error")
                    .with_code("DATABASE_UNAVAILABLE")
                    .with_status(StatusCode::SERVICE_UNAVAILABLE)
            }
            DbError::Other { message } => {
                error!("Database operation failed: {}", message);
                AppError::new(ErrorType::Database, "Database operation failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_not_found() {
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound
        ));
    }

    #[test]
    fn pool_errors_are_connection_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::Connection { .. }
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::Connection { .. }
        ));
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let app_error = AppError::from(DbError::UniqueViolation {
            constraint: "courses_code_key".to_string(),
        });
        assert_eq!(app_error.status(), StatusCode::CONFLICT);
        assert_eq!(app_error.code, "DUPLICATE_ENTRY");
        assert_eq!(app_error.details.as_deref(), Some("courses_code_key"));
    }

    #[test]
    fn foreign_key_violation_is_a_bad_request_database_error() {
        let app_error = AppError::from(DbError::ForeignKeyViolation {
            constraint: "courses_curriculum_id_fkey".to_string(),
        });
        assert_eq!(app_error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app_error.error_type.to_string(), "database");
    }

    #[test]
    fn connection_error_is_service_unavailable() {
        let app_error = AppError::from(DbError::Connection {
            message: "connection refused".to_string(),
        });
        assert_eq!(app_error.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn unclassified_error_is_internal() {
        let app_error = AppError::from(DbError::Other {
            message: "syntax error".to_string(),
        });
        assert_eq!(app_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app_error.error_message, "Database operation failed");
    }

    #[test]
    fn constraint_helpers_match_by_name() {
        let err = DbError::UniqueViolation {
            constraint: "users_email_key".to_string(),
        };
        assert!(err.is_unique_violation_on("users_email_key"));
        assert!(!err.is_unique_violation_on("courses_code_key"));
        assert!(!err.is_foreign_key_violation_on("users_email_key"));
    }
}
