use crate::api::model::auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, PasswordResetRequested,
    RefreshTokenRequest, RegisterRequest, RequestPasswordResetRequest, ResetPasswordRequest,
    StudentLoginRequest,
};
use crate::api::model::common::{ApiResponse, MessageResponse};
use crate::api::model::user::StoredUser;
use crate::db::db_error::DbError;
use crate::db::entity::user::Users;
use crate::db::repo::{auth_repository, users_repository};
use crate::error::error_model::{AppError, ErrorType};
use crate::middleware::auth::AuthContext;
use crate::service::jwt_service::{TokenSubject, TokenType};
use crate::util::crypto_helper;
use crate::util::validation::normalize_student_id;
use crate::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{error, info, warn};

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

fn invalid_credentials() -> AppError {
    AppError::new(ErrorType::Authentication, "Invalid email or password")
        .with_code("INVALID_CREDENTIALS")
}

fn invalid_student_credentials() -> AppError {
    AppError::new(ErrorType::Authentication, "Invalid student ID or password")
        .with_code("INVALID_CREDENTIALS")
}

fn invalid_token(message: &str) -> AppError {
    AppError::new(ErrorType::Authentication, message).with_code("TOKEN_INVALID")
}

fn email_exists() -> AppError {
    AppError::new(ErrorType::Conflict, "User with this email already exists")
        .with_code("EMAIL_EXISTS")
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Issues a fresh access and refresh token pair for the user.
fn issue_tokens(state: &AppState, user: Users) -> Result<AuthResponse, AppError> {
    let subject = TokenSubject {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role_name.clone(),
    };
    let access = state.jwt.generate_access_token(&subject)?;
    let refresh = state.jwt.generate_refresh_token(&subject)?;
    Ok(AuthResponse {
        access_token: access.token,
        refresh_token: refresh.token,
        token_type: "Bearer".to_string(),
        expires_in: access.expires_in,
        user: StoredUser::from(user),
    })
}

/// Authenticates a user with email and password.
///
/// An unknown email still runs a dummy hash verification so both failure paths take the
/// same time and return the same error.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The login request containing the email and password.
///
/// # Returns
///
/// * `Result<Response, AppError>` - Access token, refresh token and the user on success.
///
/// # Errors
///
/// * `VALIDATION_ERROR` if the request is invalid.
/// * `INVALID_CREDENTIALS` if the user is not found or the password does not match.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "auth_service", service.operation = "login")
)]
pub async fn login(state: Arc<AppState>, request: LoginRequest) -> Result<Response, AppError> {
    state.validator.validate(&request, "LoginRequest")?;
    let email = normalize_email(&request.email);

    let user = match users_repository::find_user_by_email(&state.pg_pool, &email).await? {
        Some(user) => user,
        None => {
            crypto_helper::run_fake_password_hash_check(&state);
            return Err(invalid_credentials());
        }
    };

    if !crypto_helper::verify_user_password(&state, &request.password, &user.password_hash) {
        warn!(user_id = user.id, "Failed login attempt");
        return Err(invalid_credentials());
    }

    info!(user_id = user.id, "User logged in");
    let tokens = issue_tokens(&state, user)?;
    Ok((StatusCode::OK, Json(ApiResponse::new("Login successful", tokens))).into_response())
}

/// Authenticates a student with the student id and password.
///
/// The id is matched in canonical form, so `64-01-05-12345` and `64010512345` are the same
/// student. An unknown id runs the same dummy hash check as [`login`].
///
/// # Errors
///
/// * `VALIDATION_ERROR` if the student id is not 11 digits or the password is empty.
/// * `INVALID_CREDENTIALS` if no student has the id or the password does not match.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "auth_service", service.operation = "student_login")
)]
pub async fn student_login(
    state: Arc<AppState>,
    request: StudentLoginRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "StudentLoginRequest")?;
    let student_id = normalize_student_id(&request.student_id);

    let user = match users_repository::find_user_by_student_id(&state.pg_pool, &student_id).await? {
        Some(user) => user,
        None => {
            crypto_helper::run_fake_password_hash_check(&state);
            return Err(invalid_student_credentials());
        }
    };

    if !crypto_helper::verify_user_password(&state, &request.password, &user.password_hash) {
        warn!(user_id = user.id, "Failed student login attempt");
        return Err(invalid_student_credentials());
    }

    info!(user_id = user.id, "Student logged in");
    let tokens = issue_tokens(&state, user)?;
    Ok((StatusCode::OK, Json(ApiResponse::new("Login successful", tokens))).into_response())
}

/// Registers a new user and logs them in.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - Name, email, password with confirmation and the role.
///
/// # Returns
///
/// * `Result<Response, AppError>` - HTTP 201 with the token pair and the created user.
///
/// # Errors
///
/// * `VALIDATION_ERROR` for invalid fields, a weak password or a mismatching confirmation.
/// * `INVALID_ROLE` if the role does not exist.
/// * `EMAIL_EXISTS` if the email is already registered.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "auth_service", service.operation = "register")
)]
pub async fn register(state: Arc<AppState>, request: RegisterRequest) -> Result<Response, AppError> {
    state.validator.validate(&request, "RegisterRequest")?;
    let email = normalize_email(&request.email);

    if users_repository::get_role_by_id(&state.pg_pool, request.role_id)
        .await?
        .is_none()
    {
        return Err(AppError::new(ErrorType::BadRequest, "Invalid role").with_code("INVALID_ROLE"));
    }
    if users_repository::find_user_by_email(&state.pg_pool, &email)
        .await?
        .is_some()
    {
        return Err(email_exists());
    }

    let password_hash = crypto_helper::hash_user_password(&state, &request.password)?;
    let user = users_repository::create_user(
        &state.pg_pool,
        request.full_name.trim(),
        &email,
        &password_hash,
        request.role_id,
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation_on(EMAIL_UNIQUE_CONSTRAINT) {
            email_exists()
        } else {
            error!("Error creating user: {:?}", e);
            AppError::from(e)
        }
    })?;

    info!(user_id = user.id, "User registered");
    let tokens = issue_tokens(&state, user)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User registered successfully", tokens)),
    )
        .into_response())
}

/// Exchanges a refresh token for a new token pair.
///
/// The presented refresh token is revoked, so each refresh token works once. Tokens issued
/// before the user's last logout or password change are rejected.
///
/// # Errors
///
/// * `TOKEN_EXPIRED` or `TOKEN_INVALID` if the token cannot be used.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "auth_service", service.operation = "refresh_token")
)]
pub async fn refresh_token(
    state: Arc<AppState>,
    request: RefreshTokenRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "RefreshTokenRequest")?;
    let claims = state
        .jwt
        .validate_token(&request.refresh_token, TokenType::Refresh)?;

    let user = match users_repository::get_user_by_id(&state.pg_pool, claims.user_id).await {
        Ok(user) => user,
        Err(DbError::NotFound) => return Err(invalid_token("User no longer exists")),
        Err(e) => return Err(e.into()),
    };
    if claims.iat < user.tokens_valid_after.timestamp() {
        return Err(invalid_token("Token has been revoked"));
    }

    let newly_revoked = auth_repository::revoke_token(
        &state.pg_pool,
        &claims.jti,
        user.id,
        claims.expires_at(),
    )
    .await?;
    if !newly_revoked {
        warn!(user_id = user.id, "Refresh token reuse detected");
        return Err(invalid_token("Token has been revoked"));
    }

    let tokens = issue_tokens(&state, user)?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new("Token refreshed successfully", tokens)),
    )
        .into_response())
}

/// Starts the password reset flow.
///
/// Always answers 200 so the response does not reveal whether the email is registered.
/// The reset token is returned in the response only in the development environment.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "auth_service", service.operation = "request_password_reset")
)]
pub async fn request_password_reset(
    state: Arc<AppState>,
    request: RequestPasswordResetRequest,
) -> Result<Response, AppError> {
    state
        .validator
        .validate(&request, "RequestPasswordResetRequest")?;
    let email = normalize_email(&request.email);

    let mut reset_token = None;
    if let Some(user) = users_repository::find_user_by_email(&state.pg_pool, &email).await? {
        let issued = state
            .jwt
            .generate_password_reset_token(user.id, &user.email)?;
        info!(user_id = user.id, expires_at = %issued.expires_at, "Password reset token issued");
        if state.config.is_development() {
            reset_token = Some(issued.token);
        }
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "If the email is registered, a password reset link has been sent",
            PasswordResetRequested { reset_token },
        )),
    )
        .into_response())
}

/// Sets a new password using a password reset token.
///
/// The token id is revoked in the same transaction that stores the new hash, so a reset
/// token can be used once.
///
/// # Errors
///
/// * `VALIDATION_ERROR` for a weak or mismatching password.
/// * `TOKEN_EXPIRED` or `TOKEN_INVALID` for an unusable or already used token.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "auth_service", service.operation = "reset_password")
)]
pub async fn reset_password(
    state: Arc<AppState>,
    request: ResetPasswordRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "ResetPasswordRequest")?;
    let claims = state
        .jwt
        .validate_token(&request.token, TokenType::PasswordReset)?;

    let password_hash = crypto_helper::hash_user_password(&state, &request.new_password)?;

    let mut tx = state.pg_pool.begin().await.map_err(DbError::from)?;
    let newly_revoked =
        auth_repository::revoke_token(&mut *tx, &claims.jti, claims.user_id, claims.expires_at())
            .await?;
    if !newly_revoked {
        return Err(invalid_token("Reset token has already been used"));
    }
    let updated = users_repository::update_password(&mut *tx, claims.user_id, &password_hash).await?;
    if updated == 0 {
        return Err(invalid_token("User no longer exists"));
    }
    tx.commit().await.map_err(DbError::from)?;

    info!(user_id = claims.user_id, "Password reset");
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Password has been reset successfully")),
    )
        .into_response())
}

/// Returns the authenticated user.
#[tracing::instrument(
    skip(state),
    fields(service.name = "auth_service", service.operation = "me")
)]
pub async fn me(state: Arc<AppState>, auth: AuthContext) -> Result<Response, AppError> {
    let user = users_repository::get_user_by_id(&state.pg_pool, auth.user_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => {
                AppError::new(ErrorType::NotFound, "User not found").with_code("USER_NOT_FOUND")
            }
            other => other.into(),
        })?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "User retrieved successfully",
            StoredUser::from(user),
        )),
    )
        .into_response())
}

/// Changes the password of the authenticated user after checking the current one.
///
/// Refresh tokens issued before the change stop working.
///
/// # Errors
///
/// * `VALIDATION_ERROR` for a weak or mismatching new password.
/// * `INVALID_PASSWORD` if the current password is wrong.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "auth_service", service.operation = "change_password")
)]
pub async fn change_password(
    state: Arc<AppState>,
    auth: AuthContext,
    request: ChangePasswordRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "ChangePasswordRequest")?;
    let user = users_repository::get_user_by_id(&state.pg_pool, auth.user_id).await?;

    if !crypto_helper::verify_user_password(&state, &request.current_password, &user.password_hash)
    {
        return Err(
            AppError::new(ErrorType::BadRequest, "Current password is incorrect")
                .with_code("INVALID_PASSWORD"),
        );
    }

    let password_hash = crypto_helper::hash_user_password(&state, &request.new_password)?;
    users_repository::update_password(&state.pg_pool, user.id, &password_hash).await?;

    info!(user_id = user.id, "Password changed");
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Password changed successfully")),
    )
        .into_response())
}

/// Revokes the presented access token and every refresh token issued so far.
#[tracing::instrument(
    skip(state),
    fields(service.name = "auth_service", service.operation = "logout")
)]
pub async fn logout(state: Arc<AppState>, auth: AuthContext) -> Result<Response, AppError> {
    auth_repository::revoke_token(&state.pg_pool, &auth.jti, auth.user_id, auth.expires_at).await?;
    users_repository::invalidate_sessions(&state.pg_pool, auth.user_id).await?;

    info!(user_id = auth.user_id, "User logged out");
    Ok((StatusCode::OK, Json(MessageResponse::new("Logged out successfully"))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lower_cased() {
        assert_eq!(normalize_email("  Somchai@University.AC.TH "), "somchai@university.ac.th");
    }
}
