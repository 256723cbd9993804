use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::api::model::common::{ListQuery, MessageResponse};
use crate::api::model::company::{CreateCompanyRequest, StoredCompany, UpdateCompanyRequest};
use crate::config::app_config::AppState;
use crate::error::error_model::{ApiError, AppError};
use crate::service::company_service;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn company_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_companies_handler).post(create_company_handler))
        .route(
            "/{id}",
            get(get_company_handler)
                .put(update_company_handler)
                .delete(delete_company_handler),
        )
}

/// Create company
///
/// Register a company that hosts internship students.
#[utoipa::path(
    post,
    path = "/api/v1/companies",
    tag = "Companies",
    security(("bearer_auth" = [])),
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created successfully", body = StoredCompany),
        (status = 422, description = "Unprocessable request", body = ApiError),
    )
)]
pub(crate) async fn create_company_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): AppJson<CreateCompanyRequest>,
) -> Result<Response, AppError> {
    company_service::create_company(state, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/companies",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Companies retrieved successfully", body = [StoredCompany]),
    )
)]
pub(crate) async fn get_companies_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): AppQuery<ListQuery>,
) -> Result<Response, AppError> {
    company_service::get_companies(state, query).await
}

#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Company id")
    ),
    responses(
        (status = 200, description = "Company retrieved successfully", body = StoredCompany),
        (status = 404, description = "Company not found", body = ApiError),
    )
)]
pub(crate) async fn get_company_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    company_service::get_company_by_id(state, id).await
}

#[utoipa::path(
    put,
    path = "/api/v1/companies/{id}",
    tag = "Companies",
    security(("bearer_auth" = [])),
    request_body = UpdateCompanyRequest,
    params(
        ("id" = i64, Path, description = "Company id")
    ),
    responses(
        (status = 200, description = "Company updated successfully", body = StoredCompany),
        (status = 404, description = "Company not found", body = ApiError),
    )
)]
pub(crate) async fn update_company_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
    WithRejection(Json(request), _): AppJson<UpdateCompanyRequest>,
) -> Result<Response, AppError> {
    company_service::update_company(state, id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/companies/{id}",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Company id")
    ),
    responses(
        (status = 200, description = "Company deleted successfully", body = MessageResponse),
        (status = 404, description = "Company not found", body = ApiError),
    )
)]
pub(crate) async fn delete_company_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): AppPath<i64>,
) -> Result<Response, AppError> {
    company_service::delete_company(state, id).await
}
