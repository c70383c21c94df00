//! Handlers for `/companies/{company_id}/costs`.

use agency_core::calendar::validate_project_dates;
use agency_core::cost::{validate_cost_type, validate_frequency};
use agency_core::error::CoreError;
use agency_core::types::DbId;
use agency_core::validation::validate_non_negative;
use agency_db::models::cost::{Cost, CreateCost, UpdateCost};
use agency_db::repositories::CostRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{check_project_ref, ensure_company_exists};
use crate::query::ActiveOnlyParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_cost_fields(
    cost_type: Option<&str>,
    frequency: Option<&str>,
    amount: Option<Decimal>,
) -> Result<(), CoreError> {
    if let Some(cost_type) = cost_type {
        validate_cost_type(cost_type)?;
    }
    if let Some(frequency) = frequency {
        validate_frequency(frequency)?;
    }
    if let Some(amount) = amount {
        validate_non_negative(amount, "amount")?;
    }
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Cost", id })
}

/// POST /api/v1/companies/{company_id}/costs
pub async fn create(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateCost>,
) -> AppResult<(StatusCode, Json<DataResponse<Cost>>)> {
    input.validate()?;
    validate_cost_fields(
        input.cost_type.as_deref(),
        input.frequency.as_deref(),
        Some(input.amount),
    )?;
    validate_project_dates(Some(input.start_date), input.end_date)?;
    ensure_company_exists(&state.pool, company_id).await?;
    check_project_ref(&state.pool, company_id, input.project_id).await?;

    let cost = CostRepo::create(&state.pool, company_id, &input).await?;
    tracing::info!(company_id, cost_id = cost.id, cost_type = %cost.cost_type, "Cost created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: cost })))
}

/// GET /api/v1/companies/{company_id}/costs?active_only=
pub async fn list(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Query(params): Query<ActiveOnlyParams>,
) -> AppResult<Json<DataResponse<Vec<Cost>>>> {
    ensure_company_exists(&state.pool, company_id).await?;
    let costs = CostRepo::list(&state.pool, company_id, params.active_only).await?;
    Ok(Json(DataResponse { data: costs }))
}

/// GET /api/v1/companies/{company_id}/costs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Cost>>> {
    let cost = CostRepo::find_by_id(&state.pool, company_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: cost }))
}

/// PUT /api/v1/companies/{company_id}/costs/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCost>,
) -> AppResult<Json<DataResponse<Cost>>> {
    input.validate()?;
    validate_cost_fields(
        input.cost_type.as_deref(),
        input.frequency.as_deref(),
        input.amount,
    )?;
    let existing = CostRepo::find_by_id(&state.pool, company_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    validate_project_dates(
        Some(input.start_date.unwrap_or(existing.start_date)),
        input.end_date.or(existing.end_date),
    )?;
    check_project_ref(&state.pool, company_id, input.project_id).await?;

    let cost = CostRepo::update(&state.pool, company_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: cost }))
}

/// DELETE /api/v1/companies/{company_id}/costs/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if CostRepo::delete(&state.pool, company_id, id).await? {
        tracing::info!(company_id, cost_id = id, "Cost deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn unknown_type_or_frequency_is_rejected() {
        assert_matches!(
            validate_cost_fields(Some("rent"), None, None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_cost_fields(None, Some("daily"), None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert_matches!(
            validate_cost_fields(None, None, Some(Decimal::from(-1))),
            Err(CoreError::Validation(msg)) if msg.contains("amount")
        );
        assert!(validate_cost_fields(Some("payroll"), Some("annual"), Some(Decimal::ZERO)).is_ok());
    }
}
