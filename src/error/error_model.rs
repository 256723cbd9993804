use axum::http::StatusCode;
use derive_more::Display;
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

// Application error carried from services to the HTTP layer.
// ToSchema is derived on `ApiError`, the serialized form, since `ValidationErrors` has no schema.
#[derive(Debug)]
pub struct AppError {
    pub error_type: ErrorType,
    pub error_message: String,
    pub code: String,
    pub details: Option<String>,
    pub status_override: Option<StatusCode>,
}

/// Error taxonomy. The display value is the machine readable `type` of the error body.
#[derive(Debug, Display, derive_more::Error, Clone)]
pub enum ErrorType {
    #[display("validation")]
    Validation {
        validation_error: ValidationErrors,
        object: String,
    },
    #[display("bad_request")]
    BadRequest,
    #[display("authentication")]
    Authentication,
    #[display("authorization")]
    Authorization,
    #[display("not_found")]
    NotFound,
    #[display("conflict")]
    Conflict,
    #[display("database")]
    Database,
    #[display("internal")]
    Internal,
}

impl ErrorType {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorType::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ErrorType::Authentication => StatusCode::UNAUTHORIZED,
            ErrorType::Authorization => StatusCode::FORBIDDEN,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::Conflict => StatusCode::CONFLICT,
            ErrorType::Database | ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn default_code(&self) -> &'static str {
        match self {
            ErrorType::Validation { .. } => "VALIDATION_ERROR",
            ErrorType::BadRequest => "BAD_REQUEST",
            ErrorType::Authentication => "UNAUTHORIZED",
            ErrorType::Authorization => "FORBIDDEN",
            ErrorType::NotFound => "NOT_FOUND",
            ErrorType::Conflict => "CONFLICT",
            ErrorType::Database => "DATABASE_ERROR",
            ErrorType::Internal => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    // constructor.
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        let code = error_type.default_code().to_string();
        Self {
            error_type,
            error_message: message.into(),
            code,
            details: None,
            status_override: None,
        }
    }

    /// Validation failure for the named request object.
    pub fn validation(validation_error: ValidationErrors, object: impl Into<String>) -> Self {
        Self::new(
            ErrorType::Validation {
                validation_error,
                object: object.into(),
            },
            "Validation failed",
        )
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_override = Some(status);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status_override
            .unwrap_or_else(|| self.error_type.status())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.error_type, self.code, self.error_message)
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = 404)]
    pub status: u16,
    #[schema(example = "Course not found")]
    pub error: String,
    #[schema(example = "COURSE_NOT_FOUND")]
    pub code: String,
    #[serde(rename = "type")]
    #[schema(example = "not_found")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[schema(example = "2024-01-01T12:00:00.000Z")]
    pub time: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationError {
    #[schema(example = "email")]
    pub field: String,
    #[schema(example = "email")]
    pub tag: String,
    #[schema(example = "notAValidEmail")]
    pub value: String,
    #[schema(example = "email must be a valid email address")]
    pub message: String,
}
