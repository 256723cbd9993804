use crate::config::app_config::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiInfo {
    #[schema(example = "API is working")]
    pub message: &'static str,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
}

/// Liveness and database readiness, mounted at the root.
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/db", get(db_health_handler))
}

/// Public smoke test endpoint under `/api/v1`.
pub fn api_info_routes() -> Router<Arc<AppState>> {
    Router::new().route("/test", get(api_info_handler))
}

/// Liveness
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus),
    )
)]
pub(crate) async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// Database readiness
///
/// Runs a trivial query against the pool.
#[utoipa::path(
    get,
    path = "/health/db",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = HealthStatus),
        (status = 503, description = "Database unreachable", body = HealthStatus),
    )
)]
pub(crate) async fn db_health_handler(State(state): State<Arc<AppState>>) -> Response {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pg_pool)
        .await
    {
        Ok(_) => (StatusCode::OK, Json(HealthStatus { status: "ok" })).into_response(),
        Err(e) => {
            warn!("Database health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus { status: "error" }),
            )
                .into_response()
        }
    }
}

/// API smoke test
#[utoipa::path(
    get,
    path = "/api/v1/test",
    tag = "Health",
    responses(
        (status = 200, description = "API is working", body = ApiInfo),
    )
)]
pub(crate) async fn api_info_handler() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "API is working",
        version: env!("CARGO_PKG_VERSION"),
    })
}
