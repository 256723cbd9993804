use crate::api::model::common::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::api::model::user::{
    BulkDeleteResult, BulkDeleteUsersRequest, CreateUserRequest, RoleUserCount, StoredRole,
    StoredUser, UpdateUserRequest, UserListQuery, UserStats,
};
use crate::config::app_config::AppState;
use crate::db::db_error::DbError;
use crate::db::repo::users_repository;
use crate::error::error_model::{AppError, ErrorType};
use crate::middleware::auth::AuthContext;
use crate::service::auth_service::normalize_email;
use crate::service::{bad_request, conflict, ensure_affected, or_not_found};
use crate::util::crypto_helper;
use crate::util::pagination::{search_term, PageWindow};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

fn map_user_write_error(e: DbError) -> AppError {
    if e.is_unique_violation_on(EMAIL_UNIQUE_CONSTRAINT) {
        conflict("User with this email already exists", "EMAIL_EXISTS")
    } else if matches!(e, DbError::ForeignKeyViolation { .. }) {
        bad_request("Invalid role", "INVALID_ROLE")
    } else {
        or_not_found("User not found", "USER_NOT_FOUND")(e)
    }
}

async fn ensure_role_exists(state: &AppState, role_id: i64) -> Result<(), AppError> {
    match users_repository::get_role_by_id(&state.pg_pool, role_id).await? {
        Some(_) => Ok(()),
        None => Err(bad_request("Invalid role", "INVALID_ROLE")),
    }
}

/// Create a new user.
///
/// The password must satisfy the strength rule and is stored as an Argon2id hash. On
/// success the `Location` header points at the new resource.
///
/// # Arguments
///
/// * `state` - The application state containing the database pool.
/// * `request` - The request body containing user details.
///
/// # Returns
///
/// Returns a `Result` containing a `Response` with the created user data,
/// or an `AppError` on failure.
#[tracing::instrument(
    skip(state, request),
    fields(
        service.name = "user_service",
        service.operation = "create_user",
        user.email = %request.email
    )
)]
pub async fn create_user(
    state: Arc<AppState>,
    request: CreateUserRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateUserRequest")?;
    let email = normalize_email(&request.email);
    ensure_role_exists(&state, request.role_id).await?;
    if users_repository::find_user_by_email(&state.pg_pool, &email)
        .await?
        .is_some()
    {
        return Err(conflict("User with this email already exists", "EMAIL_EXISTS"));
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
        error!("Error creating user. {:?}", e);
        map_user_write_error(e)
    })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/users/{}", user.id))],
        Json(ApiResponse::new(
            "User created successfully",
            StoredUser::from(user),
        )),
    )
        .into_response())
}

/// Get a list of users with pagination.
///
/// Optional filters: free text `search` over name and email, and `role_id`.
///
/// # Returns
///
/// Returns a `Result` containing a `Response` with the paginated users,
/// or an `AppError` on failure.
#[tracing::instrument(
    skip(state),
    fields(service.name = "user_service", service.operation = "get_users")
)]
pub async fn get_users(state: Arc<AppState>, query: UserListQuery) -> Result<Response, AppError> {
    let window = PageWindow::new(query.page, query.limit);
    let search = search_term(&query.search);

    let users = users_repository::list_users(
        &state.pg_pool,
        search.as_deref(),
        query.role_id,
        window.limit,
        window.offset(),
    )
    .await?;
    let total = users_repository::count_users(&state.pg_pool, search.as_deref(), query.role_id).await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Users retrieved successfully",
            users.into_iter().map(StoredUser::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

/// Total number of users and the count per role.
#[tracing::instrument(
    skip(state),
    fields(service.name = "user_service", service.operation = "get_user_stats")
)]
pub async fn get_user_stats(state: Arc<AppState>) -> Result<Response, AppError> {
    let by_role = users_repository::count_users_by_role(&state.pg_pool).await?;
    let total: i64 = by_role.iter().map(|r| r.count).sum();
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "User statistics retrieved successfully",
            UserStats {
                total,
                by_role: by_role.into_iter().map(RoleUserCount::from).collect(),
            },
        )),
    )
        .into_response())
}

/// Get a user by id.
///
/// # Returns
///
/// Returns a `Result` containing a `Response` with the user data,
/// or an `AppError` if the user is not found or an error occurs.
#[tracing::instrument(
    skip(state),
    fields(service.name = "user_service", service.operation = "get_user_by_id")
)]
pub async fn get_user_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let user = users_repository::get_user_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("User not found", "USER_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "User retrieved successfully",
            StoredUser::from(user),
        )),
    )
        .into_response())
}

/// Update name, email or role of a user. Absent fields keep their stored value.
///
/// # Errors
///
/// * `USER_NOT_FOUND` if the user does not exist.
/// * `EMAIL_EXISTS` if the new email belongs to another user.
/// * `INVALID_ROLE` if the new role does not exist.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "user_service", service.operation = "update_user")
)]
pub async fn update_user(
    state: Arc<AppState>,
    id: i64,
    request: UpdateUserRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateUserRequest")?;
    if let Some(role_id) = request.role_id {
        ensure_role_exists(&state, role_id).await?;
    }
    let email = request.email.as_deref().map(normalize_email);
    let full_name = request.full_name.as_deref().map(str::trim);

    let user = users_repository::update_user(
        &state.pg_pool,
        id,
        full_name,
        email.as_deref(),
        request.role_id,
    )
    .await
    .map_err(map_user_write_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "User updated successfully",
            StoredUser::from(user),
        )),
    )
        .into_response())
}

/// Delete a user. Role records (student, instructor, staff) cascade with it.
#[tracing::instrument(
    skip(state),
    fields(service.name = "user_service", service.operation = "delete_user")
)]
pub async fn delete_user(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = users_repository::delete_user(&state.pg_pool, id).await?;
    ensure_affected(rows, "User not found", "USER_NOT_FOUND")?;
    info!(user_id = id, "User deleted");
    Ok((StatusCode::OK, Json(MessageResponse::new("User deleted successfully"))).into_response())
}

/// Delete several users at once. Administrators only.
///
/// The caller cannot delete their own account. Either every listed user is deleted or,
/// when any id does not exist, none is.
///
/// # Errors
///
/// * `CANNOT_DELETE_SELF` if the list contains the caller.
/// * `USERS_NOT_FOUND` if one or more ids do not exist; `details` lists them.
#[tracing::instrument(
    skip(state, request),
    fields(service.name = "user_service", service.operation = "bulk_delete_users")
)]
pub async fn bulk_delete_users(
    state: Arc<AppState>,
    auth: AuthContext,
    request: BulkDeleteUsersRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "BulkDeleteUsersRequest")?;
    let ids: Vec<i64> = request
        .user_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if ids.contains(&auth.user_id) {
        return Err(bad_request(
            "You cannot delete your own account",
            "CANNOT_DELETE_SELF",
        ));
    }

    let mut tx = state.pg_pool.begin().await.map_err(DbError::from)?;
    let existing: BTreeSet<i64> = users_repository::find_existing_user_ids(&mut *tx, &ids)
        .await?
        .into_iter()
        .collect();
    let missing: Vec<String> = ids
        .iter()
        .filter(|id| !existing.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(
            AppError::new(ErrorType::NotFound, "Some users were not found")
                .with_code("USERS_NOT_FOUND")
                .with_details(format!("missing user ids: {}", missing.join(", "))),
        );
    }

    let deleted = users_repository::delete_users(&mut *tx, &ids).await?;
    tx.commit().await.map_err(DbError::from)?;

    info!(deleted, by = auth.user_id, "Users bulk deleted");
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Users deleted successfully",
            BulkDeleteResult { deleted },
        )),
    )
        .into_response())
}

/// List the static roles.
#[tracing::instrument(
    skip(state),
    fields(service.name = "user_service", service.operation = "get_roles")
)]
pub async fn get_roles(state: Arc<AppState>) -> Result<Response, AppError> {
    let roles = users_repository::list_roles(&state.pg_pool).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Roles retrieved successfully",
            roles.into_iter().map(StoredRole::from).collect::<Vec<_>>(),
        )),
    )
        .into_response())
}
