use crate::error::error_model::{ApiError, AppError, ErrorType, ValidationError};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Record error in current span
        let span = tracing::Span::current();
        span.record("error", true);
        span.record("error.message", self.error_message.as_str());
        span.record("error.type", self.error_type.to_string().as_str());

        let status = self.status();
        if status.is_server_error() {
            error!(code = %self.code, details = ?self.details, "{}", self.error_message);
        }

        let errors = match &self.error_type {
            ErrorType::Validation {
                validation_error,
                object,
            } => {
                let mut field_errors: Vec<ValidationError> = Vec::new();
                for (field, errs) in validation_error.field_errors() {
                    for field_error in errs.iter() {
                        field_errors.push(to_field_error(&field, field_error));
                    }
                }
                field_errors.sort_by(|a, b| a.field.cmp(&b.field).then(a.tag.cmp(&b.tag)));
                info!(
                    object = %object,
                    failed_fields = field_errors.len(),
                    "Request validation failed"
                );
                field_errors
            }
            _ => vec![],
        };

        let api_error = ApiError {
            success: false,
            status: status.as_u16(),
            error: self.error_message,
            code: self.code,
            error_type: self.error_type.to_string(),
            details: self.details,
            time: Utc::now().to_rfc3339(),
            errors,
        };

        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            serde_json::to_string(&api_error).unwrap_or_default(),
        )
            .into_response()
    }
}

fn to_field_error(field: &str, field_error: &validator::ValidationError) -> ValidationError {
    let value = if field.contains("password") {
        String::new()
    } else {
        match field_error.params.get("value") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    };
    ValidationError {
        field: field.to_string(),
        tag: field_error.code.to_string(),
        value,
        message: validation_message(field, field_error),
    }
}

/// Human readable message for a failed rule. Explicit rule messages win over the generated ones.
pub fn validation_message(field: &str, field_error: &validator::ValidationError) -> String {
    if let Some(message) = &field_error.message {
        return message.to_string();
    }
    let param = |name: &str| field_error.params.get(name).map(render_number);
    match field_error.code.as_ref() {
        "required" => format!("{} is required", field),
        "email" => format!("{} must be a valid email address", field),
        "url" => format!("{} must be a valid URL", field),
        "must_match" => match param("other") {
            Some(other) => format!("{} must match {}", field, other.trim_matches('"')),
            None => format!("{} does not match", field),
        },
        "length" => match (param("min"), param("max"), param("equal")) {
            (_, _, Some(equal)) => format!("{} must be exactly {} characters long", field, equal),
            (Some(min), Some(max), _) => {
                format!("{} must be between {} and {} characters long", field, min, max)
            }
            (Some(min), None, _) => format!("{} must be at least {} characters long", field, min),
            (None, Some(max), _) => format!("{} must be at most {} characters long", field, max),
            _ => format!("{} has an invalid length", field),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("{} must be between {} and {}", field, min, max),
            (Some(min), None) => format!("{} must be at least {}", field, min),
            (None, Some(max)) => format!("{} must be at most {}", field, max),
            _ => format!("{} is out of range", field),
        },
        _ => format!("{} is invalid", field),
    }
}

fn render_number(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::new(ErrorType::BadRequest, "Invalid request body")
            .with_code("INVALID_REQUEST_BODY")
            .with_details(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::new(ErrorType::BadRequest, "Invalid path parameter")
            .with_code("INVALID_ID")
            .with_details(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::new(ErrorType::BadRequest, "Invalid query parameters")
            .with_code("INVALID_QUERY")
            .with_details(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use validator::Validate;

    #[derive(Validate)]
    struct SampleRequest {
        #[validate(email)]
        email: String,
        #[validate(length(min = 3))]
        name: String,
        #[validate(range(min = 1, max = 10))]
        credits: i32,
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_are_aggregated_into_one_response() {
        let request = SampleRequest {
            email: "not-an-email".to_string(),
            name: "ab".to_string(),
            credits: 20,
        };
        let errors = request.validate().unwrap_err();
        let response = AppError::validation(errors, "SampleRequest").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["type"], "validation");
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0]["field"], "credits");
        assert_eq!(errors[0]["message"], "credits must be between 1 and 10");
        assert_eq!(errors[1]["field"], "email");
        assert_eq!(errors[1]["tag"], "email");
        assert_eq!(errors[1]["value"], "not-an-email");
        assert_eq!(errors[2]["message"], "name must be at least 3 characters long");
    }

    #[tokio::test]
    async fn error_types_map_to_http_status() {
        let cases = [
            (ErrorType::BadRequest, StatusCode::BAD_REQUEST),
            (ErrorType::Authentication, StatusCode::UNAUTHORIZED),
            (ErrorType::Authorization, StatusCode::FORBIDDEN),
            (ErrorType::NotFound, StatusCode::NOT_FOUND),
            (ErrorType::Conflict, StatusCode::CONFLICT),
            (ErrorType::Database, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorType::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error_type, status) in cases {
            let response = AppError::new(error_type, "boom").into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[tokio::test]
    async fn custom_code_and_details_are_serialized() {
        let response = AppError::new(ErrorType::Conflict, "User with this email already exists")
            .with_code("EMAIL_EXISTS")
            .with_details("users_email_key")
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], "EMAIL_EXISTS");
        assert_eq!(body["type"], "conflict");
        assert_eq!(body["details"], "users_email_key");
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn password_values_are_not_echoed() {
        let mut err = validator::ValidationError::new("password");
        err.add_param("value".into(), &"secret");
        let field_error = to_field_error("new_password", &err);
        assert_eq!(field_error.value, "");
    }
}
