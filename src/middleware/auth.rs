use crate::config::app_config::AppState;
use crate::db::repo::auth_repository;
use crate::error::error_model::{AppError, ErrorType};
use crate::service::jwt_service::TokenType;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, warn};

pub const ADMIN_ROLE: &str = "admin";

/// Context inserted into request extensions after successful auth.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
    pub role: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

fn unauthorized(message: &str) -> Response {
    AppError::new(ErrorType::Authentication, message).into_response()
}

/// Middleware function that enforces Bearer JWT authentication.
///
/// # Behavior
/// 1. Extracts the `Authorization` header and requires a non-empty Bearer token.
/// 2. Validates the HS256 signature, issuer, expiry and that the token is an access token.
/// 3. Rejects tokens whose `jti` was revoked by a logout.
/// 4. Inserts an `AuthContext` into the request extensions for downstream handlers.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let auth_header_val = match req.headers().get(header::AUTHORIZATION) {
        Some(v) => match v.to_str() {
            Ok(s) => s,
            Err(_) => return unauthorized("Invalid Authorization header"),
        },
        None => return unauthorized("Missing Authorization header"),
    };

    let token = match auth_header_val.strip_prefix("Bearer ") {
        Some(t) if !t.trim().is_empty() => t.trim(),
        _ => return unauthorized("Authorization header must be Bearer token"),
    };

    let claims = match state.jwt.validate_token(token, TokenType::Access) {
        Ok(claims) => claims,
        Err(e) => return AppError::from(e).into_response(),
    };

    match auth_repository::is_token_revoked(&state.pg_pool, &claims.jti).await {
        Ok(false) => {}
        Ok(true) => {
            warn!(user_id = claims.user_id, "Rejected revoked access token");
            return AppError::new(ErrorType::Authentication, "Token has been revoked")
                .with_code("TOKEN_INVALID")
                .into_response();
        }
        Err(e) => {
            error!("Error checking token revocation: {:?}", e);
            return AppError::from(e).into_response();
        }
    }

    let expires_at = claims.expires_at();
    req.extensions_mut().insert(AuthContext {
        user_id: claims.user_id,
        email: claims.email,
        role: claims.role,
        jti: claims.jti,
        expires_at,
    });

    next.run(req).await
}

/// Route layer allowing only administrators. Must run after `require_auth`.
pub async fn require_admin(req: Request, next: Next) -> Response {
    match req.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.is_admin() => next.run(req).await,
        Some(_) => AppError::new(
            ErrorType::Authorization,
            "You do not have permission to perform this action",
        )
        .into_response(),
        None => unauthorized("Authentication required"),
    }
}
