//! Handlers for the `/companies` resource.

use agency_core::error::CoreError;
use agency_core::types::DbId;
use agency_db::models::company::{Company, CreateCompany, UpdateCompany};
use agency_db::repositories::CompanyRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_company_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/companies
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<DataResponse<Company>>)> {
    input.validate()?;
    let company = CompanyRepo::create(&state.pool, &input).await?;
    tracing::info!(company_id = company.id, code = %company.code, "Company created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}

/// GET /api/v1/companies
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Company>>>> {
    let companies = CompanyRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/companies/{company_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Company>>> {
    let company = ensure_company_exists(&state.pool, company_id).await?;
    Ok(Json(DataResponse { data: company }))
}

/// PUT /api/v1/companies/{company_id}
pub async fn update(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<Json<DataResponse<Company>>> {
    input.validate()?;
    let company = CompanyRepo::update(&state.pool, company_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: company_id,
        }))?;
    Ok(Json(DataResponse { data: company }))
}

/// DELETE /api/v1/companies/{company_id}
pub async fn delete(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CompanyRepo::delete(&state.pool, company_id).await? {
        tracing::info!(company_id, "Company deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: company_id,
        }))
    }
}
