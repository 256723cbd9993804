use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::model::common::MessageResponse;
use crate::api::model::user::{
    BulkDeleteResult, BulkDeleteUsersRequest, CreateUserRequest, StoredRole, StoredUser,
    UpdateUserRequest, UserListQuery, UserStats,
};
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::middleware::auth::{require_admin, AuthContext};
use crate::service::user_service;
use axum::extract::{Path, Query, State};
use axum::middleware::from_fn;
use axum::response::Response;
use axum::routing::{delete, get};
use axum::{Extension, Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_users_handler).post(create_user_handler))
        .route("/stats", get(get_user_stats_handler))
        .route(
            "/bulk",
            delete(bulk_delete_users_handler).route_layer(from_fn(require_admin)),
        )
        .route(
            "/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
}

pub fn role_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_roles_handler))
}

// POST create user handler.
/// Create user
///
/// Create a user with name, email, password and role.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = StoredUser),
        (status = 400, description = "Unknown role", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
        (status = 422, description = "Unprocessable request", body = ApiError),
    )
)]
pub(crate) async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateUserRequest>,
) -> Result<Response, AppError> {
    user_service::create_user(state, request).await
}

// GET all users with pagination.
/// Get a list of users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(UserListQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = [StoredUser]),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub(crate) async fn get_users_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<UserListQuery>,
) -> Result<Response, AppError> {
    user_service::get_users(state, query).await
}

/// User statistics
///
/// Total number of users and the count per role.
#[utoipa::path(
    get,
    path = "/api/v1/users/stats",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User statistics", body = UserStats),
    )
)]
pub(crate) async fn get_user_stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    user_service::get_user_stats(state).await
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = StoredUser),
        (status = 404, description = "User not found for the ID", body = ApiError),
    )
)]
pub(crate) async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    user_service::get_user_by_id(state, id).await
}

// PUT update user by id.
/// Update user by id
///
/// Update name, email or role. The password is changed through the auth endpoints.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User updated successfully", body = StoredUser),
        (status = 404, description = "User not found for the ID", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
    )
)]
pub(crate) async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateUserRequest>,
) -> Result<Response, AppError> {
    user_service::update_user(state, id, request).await
}

/// Delete user by id
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 404, description = "User not found for the ID", body = ApiError),
    )
)]
pub(crate) async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    user_service::delete_user(state, id).await
}

/// Bulk delete users
///
/// Administrators only. Deletes all listed users or none of them.
#[utoipa::path(
    delete,
    path = "/api/v1/users/bulk",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = BulkDeleteUsersRequest,
    responses(
        (status = 200, description = "Users deleted successfully", body = BulkDeleteResult),
        (status = 400, description = "Caller tried to delete their own account", body = ApiError),
        (status = 403, description = "Caller is not an administrator", body = ApiError),
        (status = 404, description = "Some users were not found", body = ApiError),
    )
)]
pub(crate) async fn bulk_delete_users_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    WithRejection(Json(request), _): AppJson<BulkDeleteUsersRequest>,
) -> Result<Response, AppError> {
    user_service::bulk_delete_users(state, auth, request).await
}

/// List roles
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Roles retrieved successfully", body = [StoredRole]),
    )
)]
pub(crate) async fn get_roles_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    user_service::get_roles(state).await
}
