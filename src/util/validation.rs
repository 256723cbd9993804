use crate::error::error_model::AppError;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const STUDENT_ID_LEN: usize = 11;

static THAI_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[0-9]{9}$").expect("valid phone regex"));
static STUDENT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{11}$").expect("valid student id regex"));

fn rule_error(code: &'static str, message: &'static str, value: &str) -> ValidationError {
    let mut err = ValidationError::new(code).with_message(Cow::from(message));
    err.add_param(Cow::from("value"), &value);
    err
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(rule_error("not_blank", "must not be blank", value))
    } else {
        Ok(())
    }
}

/// Password strength: 8 to 128 characters with upper case, lower case, digit and special character.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(rule_error(
            "password",
            "Password must be between 8 and 128 characters long",
            "",
        ));
    }
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    if has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(rule_error(
            "password",
            "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character",
            "",
        ))
    }
}

/// Removes the separators people type into phone numbers.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

pub fn validate_thai_phone(phone: &str) -> Result<(), ValidationError> {
    if THAI_PHONE_REGEX.is_match(&normalize_phone(phone)) {
        Ok(())
    } else {
        Err(rule_error(
            "phone",
            "Phone number must be 10 digits and start with 0",
            phone,
        ))
    }
}

/// Canonical student id: whitespace and dashes removed.
pub fn normalize_student_id(student_id: &str) -> String {
    student_id
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

// YYFFDDSSSSS: admission year, faculty, department, running number.
pub fn validate_student_id(student_id: &str) -> Result<(), ValidationError> {
    if STUDENT_ID_REGEX.is_match(&normalize_student_id(student_id)) {
        Ok(())
    } else {
        Err(rule_error(
            "student_id",
            "Student ID must be exactly 11 digits",
            student_id,
        ))
    }
}

pub const ENROLLMENT_STATUSES: &[&str] = &["enrolled", "dropped", "completed"];
pub const TERM_STATUSES: &[&str] = &["active", "inactive", "graduated", "dropped"];
pub const ASSIGNMENT_ROLES: &[&str] = &["instructor", "assistant", "coordinator"];

fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new("oneof")
        .with_message(Cow::from(format!("must be one of: {}", allowed.join(", "))));
    err.add_param(Cow::from("value"), &value);
    Err(err)
}

pub fn validate_enrollment_status(status: &str) -> Result<(), ValidationError> {
    one_of(status, ENROLLMENT_STATUSES)
}

pub fn validate_term_status(status: &str) -> Result<(), ValidationError> {
    one_of(status, TERM_STATUSES)
}

pub fn validate_assignment_role(role: &str) -> Result<(), ValidationError> {
    one_of(role, ASSIGNMENT_ROLES)
}

/// Explicit validation context shared through the application state.
#[derive(Debug, Default, Clone)]
pub struct RequestValidator {
    _private: (),
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every rule on the request and reports all failing fields at once.
    pub fn validate<T: Validate>(&self, request: &T, object: &str) -> Result<(), AppError> {
        request
            .validate()
            .map_err(|errors| AppError::validation(errors, object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_model::ErrorType;
    use validator::Validate;

    #[test]
    fn blank_values_are_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" CPE401 ").is_ok());
    }

    #[test]
    fn password_requires_all_character_classes() {
        assert!(validate_password("password123").is_err());
        assert!(validate_password("PASSWORD123!").is_err());
        assert!(validate_password("Password!!!").is_err());
        assert!(validate_password("Password123").is_err());
        assert!(validate_password("Password123!").is_ok());
    }

    #[test]
    fn password_length_bounds() {
        assert!(validate_password("Pa1!").is_err());
        assert!(validate_password("Pa1!abcd").is_ok());
        let long = format!("Aa1!{}", "x".repeat(125));
        assert_eq!(long.len(), 129);
        assert!(validate_password(&long).is_err());
    }

    #[test]
    fn thai_phone_numbers() {
        assert!(validate_thai_phone("0812345678").is_ok());
        assert!(validate_thai_phone("081-234-5678").is_ok());
        assert!(validate_thai_phone("(081) 234.5678").is_ok());
        assert!(validate_thai_phone("1234567890").is_err());
        assert!(validate_thai_phone("081234567").is_err());
        assert!(validate_thai_phone("08123456789").is_err());
        assert!(validate_thai_phone("08a2345678").is_err());
    }

    #[test]
    fn student_ids_are_eleven_digits() {
        assert!(validate_student_id("64010512345").is_ok());
        assert!(validate_student_id("64-01-05-12345").is_ok());
        assert!(validate_student_id("6401051234").is_err());
        assert!(validate_student_id("640105123456").is_err());
        assert!(validate_student_id("6401051234X").is_err());
        assert_eq!(normalize_student_id(" 64-01-05 12345 "), "64010512345");
    }

    #[test]
    fn status_and_role_vocabularies() {
        assert!(validate_enrollment_status("enrolled").is_ok());
        assert!(validate_enrollment_status("graduated").is_err());
        assert!(validate_term_status("graduated").is_ok());
        assert!(validate_assignment_role("coordinator").is_ok());
        let err = validate_assignment_role("dean").unwrap_err();
        assert_eq!(err.code, "oneof");
        assert_eq!(
            err.message.as_deref(),
            Some("must be one of: instructor, assistant, coordinator")
        );
    }

    #[derive(Validate)]
    struct SignUp {
        #[validate(email)]
        email: String,
        #[validate(custom(function = "validate_password"))]
        password: String,
    }

    #[test]
    fn request_validator_aggregates_failures() {
        let validator = RequestValidator::new();
        let err = validator
            .validate(
                &SignUp {
                    email: "nope".to_string(),
                    password: "password123".to_string(),
                },
                "SignUp",
            )
            .unwrap_err();
        match err.error_type {
            ErrorType::Validation {
                validation_error,
                object,
            } => {
                assert_eq!(object, "SignUp");
                let fields = validation_error.field_errors();
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("password"));
            }
            other => panic!("unexpected error type {other}"),
        }
    }
}
