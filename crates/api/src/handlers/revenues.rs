//! Handlers for `/companies/{company_id}/revenues`.

use agency_core::error::CoreError;
use agency_core::revenue::validate_revenue_type;
use agency_core::types::DbId;
use agency_core::validation::validate_non_negative;
use agency_db::models::monthly_revenue::{
    CreateMonthlyRevenue, MonthlyRevenue, UpdateMonthlyRevenue,
};
use agency_db::repositories::MonthlyRevenueRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{check_client_ref, check_project_ref, ensure_company_exists};
use crate::query::YearParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_revenue_fields(
    revenue_type: Option<&str>,
    revenue: Option<Decimal>,
) -> Result<(), CoreError> {
    if let Some(revenue_type) = revenue_type {
        validate_revenue_type(revenue_type)?;
    }
    if let Some(revenue) = revenue {
        validate_non_negative(revenue, "revenue")?;
    }
    Ok(())
}

async fn check_refs(
    pool: &PgPool,
    company_id: DbId,
    client_id: Option<DbId>,
    project_id: Option<DbId>,
) -> AppResult<()> {
    check_client_ref(pool, company_id, client_id).await?;
    check_project_ref(pool, company_id, project_id).await
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "MonthlyRevenue",
        id,
    })
}

/// POST /api/v1/companies/{company_id}/revenues
pub async fn create(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateMonthlyRevenue>,
) -> AppResult<(StatusCode, Json<DataResponse<MonthlyRevenue>>)> {
    input.validate()?;
    validate_revenue_fields(input.revenue_type.as_deref(), Some(input.revenue))?;
    ensure_company_exists(&state.pool, company_id).await?;
    check_refs(&state.pool, company_id, input.client_id, input.project_id).await?;

    let revenue = MonthlyRevenueRepo::create(&state.pool, company_id, &input).await?;
    tracing::info!(
        company_id,
        revenue_id = revenue.id,
        year = revenue.year,
        month = revenue.month,
        "Monthly revenue recorded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: revenue })))
}

/// GET /api/v1/companies/{company_id}/revenues?year=
pub async fn list(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<Vec<MonthlyRevenue>>>> {
    ensure_company_exists(&state.pool, company_id).await?;
    let revenues = MonthlyRevenueRepo::list(&state.pool, company_id, params.year).await?;
    Ok(Json(DataResponse { data: revenues }))
}

/// GET /api/v1/companies/{company_id}/revenues/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<MonthlyRevenue>>> {
    let revenue = MonthlyRevenueRepo::find_by_id(&state.pool, company_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: revenue }))
}

/// PUT /api/v1/companies/{company_id}/revenues/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMonthlyRevenue>,
) -> AppResult<Json<DataResponse<MonthlyRevenue>>> {
    input.validate()?;
    validate_revenue_fields(input.revenue_type.as_deref(), input.revenue)?;
    check_refs(&state.pool, company_id, input.client_id, input.project_id).await?;

    let revenue = MonthlyRevenueRepo::update(&state.pool, company_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: revenue }))
}

/// DELETE /api/v1/companies/{company_id}/revenues/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if MonthlyRevenueRepo::delete(&state.pool, company_id, id).await? {
        tracing::info!(company_id, revenue_id = id, "Monthly revenue deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
