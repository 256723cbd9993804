use crate::api::extract::AppJson;
use crate::api::model::auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, PasswordResetRequested,
    RefreshTokenRequest, RegisterRequest, RequestPasswordResetRequest, ResetPasswordRequest,
    StudentLoginRequest,
};
use crate::api::model::common::MessageResponse;
use crate::api::model::user::StoredUser;
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::middleware::auth::AuthContext;
use crate::service::auth_service;
use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

/// Authentication routes that do not require a token.
pub fn public_auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login_handler))
        .route("/student-login", post(student_login_handler))
        .route("/register", post(register_handler))
        .route("/refresh-token", post(refresh_token_handler))
        .route("/request-password-reset", post(request_password_reset_handler))
        .route("/reset-password", post(reset_password_handler))
}

/// Authentication routes for a signed-in user. Mounted behind `require_auth`.
pub fn protected_auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me_handler))
        .route("/change-password", post(change_password_handler))
        .route("/logout", post(logout_handler))
}

/// Login
///
/// Authenticate with email and password and receive an access and refresh token pair.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError),
    )
)]
pub(crate) async fn login_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): AppJson<LoginRequest>,
) -> Result<Response, AppError> {
    auth_service::login(state, body).await
}

/// Student login
///
/// Authenticate with an 11 digit student id and password. Dashes and spaces in the id are ignored.
#[utoipa::path(
    post,
    path = "/api/v1/student-login",
    tag = "Authentication",
    request_body = StudentLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid student ID or password", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError),
    )
)]
pub(crate) async fn student_login_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): AppJson<StudentLoginRequest>,
) -> Result<Response, AppError> {
    auth_service::student_login(state, body).await
}

/// Register
///
/// Create an account. The password confirmation must match.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Unknown role", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError),
    )
)]
pub(crate) async fn register_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): AppJson<RegisterRequest>,
) -> Result<Response, AppError> {
    auth_service::register(state, body).await
}

/// Refresh token
///
/// Exchange a refresh token for a new token pair. The used refresh token is revoked.
#[utoipa::path(
    post,
    path = "/api/v1/refresh-token",
    tag = "Authentication",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = AuthResponse),
        (status = 401, description = "Invalid, expired or reused refresh token", body = ApiError),
    )
)]
pub(crate) async fn refresh_token_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): AppJson<RefreshTokenRequest>,
) -> Result<Response, AppError> {
    auth_service::refresh_token(state, body).await
}

/// Request password reset
///
/// Always answers 200 whether or not the email is registered.
#[utoipa::path(
    post,
    path = "/api/v1/request-password-reset",
    tag = "Authentication",
    request_body = RequestPasswordResetRequest,
    responses(
        (status = 200, description = "Reset requested", body = PasswordResetRequested),
        (status = 422, description = "Validation failed", body = ApiError),
    )
)]
pub(crate) async fn request_password_reset_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): AppJson<RequestPasswordResetRequest>,
) -> Result<Response, AppError> {
    auth_service::request_password_reset(state, body).await
}

/// Reset password
///
/// Set a new password with a single-use reset token.
#[utoipa::path(
    post,
    path = "/api/v1/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 401, description = "Invalid or expired reset token", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError),
    )
)]
pub(crate) async fn reset_password_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): AppJson<ResetPasswordRequest>,
) -> Result<Response, AppError> {
    auth_service::reset_password(state, body).await
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = StoredUser),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub(crate) async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    auth_service::me(state, auth).await
}

/// Change password
///
/// Requires the current password. Other sessions are signed out.
#[utoipa::path(
    post,
    path = "/api/v1/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 422, description = "Validation failed", body = ApiError),
    )
)]
pub(crate) async fn change_password_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    WithRejection(Json(body), _): AppJson<ChangePasswordRequest>,
) -> Result<Response, AppError> {
    auth_service::change_password(state, auth, body).await
}

/// Logout
///
/// Revokes the presented access token and every refresh token issued so far.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub(crate) async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    auth_service::logout(state, auth).await
}
