use crate::api::model::common::{ApiResponse, ListQuery, MessageResponse, PaginatedResponse};
use crate::api::model::company::{CreateCompanyRequest, StoredCompany, UpdateCompanyRequest};
use crate::config::app_config::AppState;
use crate::db::repo::company_repository;
use crate::db::repo::company_repository::CompanyFields;
use crate::error::error_model::AppError;
use crate::service::{ensure_affected, non_empty, or_not_found};
use crate::util::pagination::search_term;
use crate::util::validation::normalize_phone;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "company_service", service.operation = "create_company")
)]
pub async fn create_company(
    state: Arc<AppState>,
    request: CreateCompanyRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "CreateCompanyRequest")?;
    let phone = non_empty(&request.phone_number).map(normalize_phone);
    let values = CompanyFields {
        name: Some(request.name.trim()),
        address: non_empty(&request.address),
        province: non_empty(&request.province),
        phone_number: phone.as_deref(),
        email: non_empty(&request.email),
        website: non_empty(&request.website),
    };
    let company = company_repository::create_company(&state.pg_pool, &values).await?;

    info!(company_id = company.id, "Company created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/companies/{}", company.id))],
        Json(ApiResponse::new(
            "Company created successfully",
            StoredCompany::from(company),
        )),
    )
        .into_response())
}

/// Paginated company list. `search` matches the name or the province.
#[tracing::instrument(
    skip(state),
    fields(service.name = "company_service", service.operation = "get_companies")
)]
pub async fn get_companies(state: Arc<AppState>, query: ListQuery) -> Result<Response, AppError> {
    let window = query.window();
    let search = search_term(&query.search);
    let (companies, total) = company_repository::list_companies(
        &state.pg_pool,
        search.as_deref(),
        window.limit,
        window.offset(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            "Companies retrieved successfully",
            companies.into_iter().map(StoredCompany::from).collect(),
            window,
            total,
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "company_service", service.operation = "get_company_by_id")
)]
pub async fn get_company_by_id(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let company = company_repository::get_company_by_id(&state.pg_pool, id)
        .await
        .map_err(or_not_found("Company not found", "COMPANY_NOT_FOUND"))?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Company retrieved successfully",
            StoredCompany::from(company),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state, request),
    fields(service.name = "company_service", service.operation = "update_company")
)]
pub async fn update_company(
    state: Arc<AppState>,
    id: i64,
    request: UpdateCompanyRequest,
) -> Result<Response, AppError> {
    state.validator.validate(&request, "UpdateCompanyRequest")?;
    let phone = non_empty(&request.phone_number).map(normalize_phone);
    let values = CompanyFields {
        name: non_empty(&request.name),
        address: non_empty(&request.address),
        province: non_empty(&request.province),
        phone_number: phone.as_deref(),
        email: non_empty(&request.email),
        website: non_empty(&request.website),
    };
    let company = company_repository::update_company(&state.pg_pool, id, &values)
        .await
        .map_err(or_not_found("Company not found", "COMPANY_NOT_FOUND"))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(
            "Company updated successfully",
            StoredCompany::from(company),
        )),
    )
        .into_response())
}

#[tracing::instrument(
    skip(state),
    fields(service.name = "company_service", service.operation = "delete_company")
)]
pub async fn delete_company(state: Arc<AppState>, id: i64) -> Result<Response, AppError> {
    let rows = company_repository::delete_company(&state.pg_pool, id).await?;
    ensure_affected(rows, "Company not found", "COMPANY_NOT_FOUND")?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Company deleted successfully")),
    )
        .into_response())
}
