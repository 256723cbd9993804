use crate::api::extract::{AppPath, AppQuery};
use crate::api::model::common::{ListQuery, MessageResponse};
use crate::api::model::file::StoredFile;
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::service::file_service;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn file_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_files_handler))
        .route(
            "/{filename}",
            get(download_file_handler).delete(delete_file_handler),
        )
}

/// List generated documents
#[utoipa::path(
    get,
    path = "/api/v1/files",
    tag = "Files",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Files retrieved successfully", body = [StoredFile]),
    )
)]
pub(crate) async fn list_files_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<ListQuery>,
) -> Result<Response, AppError> {
    file_service::list_files(state, query).await
}

/// Download a document
#[utoipa::path(
    get,
    path = "/api/v1/files/{filename}",
    tag = "Files",
    security(("bearer_auth" = [])),
    params(
        ("filename" = String, Path, description = "File name without directories")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid filename", body = ApiError),
        (status = 404, description = "File not found", body = ApiError),
    )
)]
pub(crate) async fn download_file_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(filename), _): AppPath<String>,
) -> Result<Response, AppError> {
    file_service::download_file(state, filename).await
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/api/v1/files/{filename}",
    tag = "Files",
    security(("bearer_auth" = [])),
    params(
        ("filename" = String, Path, description = "File name without directories")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = MessageResponse),
        (status = 400, description = "Invalid filename", body = ApiError),
        (status = 404, description = "File not found", body = ApiError),
    )
)]
pub(crate) async fn delete_file_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(filename), _): AppPath<String>,
) -> Result<Response, AppError> {
    file_service::delete_file(state, filename).await
}
