use crate::api::model::user::StoredUser;
use crate::util::validation::{validate_password, validate_student_id};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "somchai@university.ac.th")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Password123!")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StudentLoginRequest {
    #[validate(custom(function = "validate_student_id"))]
    #[schema(example = "64010512345")]
    pub student_id: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Password123!")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    #[schema(example = "Somchai Jaidee")]
    pub full_name: String,
    #[validate(email)]
    #[schema(example = "somchai@university.ac.th")]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "Password123!")]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    #[schema(example = "Password123!")]
    pub confirm_password: String,
    #[validate(range(min = 1))]
    #[schema(example = 3)]
    pub role_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestPasswordResetRequest {
    #[validate(email)]
    #[schema(example = "somchai@university.ac.th")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "NewPassword123!")]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    #[schema(example = "NewPassword123!")]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "NewPassword123!")]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    #[schema(example = "NewPassword123!")]
    pub confirm_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: StoredUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PasswordResetRequested {
    /// Only returned in the development environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_matching_confirmation() {
        let request = RegisterRequest {
            full_name: "Somchai Jaidee".to_string(),
            email: "somchai@university.ac.th".to_string(),
            password: "Password123!".to_string(),
            confirm_password: "Password123?".to_string(),
            role_id: 3,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("confirm_password"));
    }

    #[test]
    fn student_login_checks_the_id_format() {
        let request = StudentLoginRequest {
            student_id: "6401-05".to_string(),
            password: "Password123!".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("student_id"));

        let request = StudentLoginRequest {
            student_id: "64-01-05-12345".to_string(),
            password: "Password123!".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn register_rejects_weak_password() {
        let request = RegisterRequest {
            full_name: "Somchai Jaidee".to_string(),
            email: "somchai@university.ac.th".to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
            role_id: 3,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
