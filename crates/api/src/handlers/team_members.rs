//! Handlers for `/companies/{company_id}/team-members`.

use agency_core::error::CoreError;
use agency_core::team::{validate_member_status, validate_role};
use agency_core::types::DbId;
use agency_core::validation::validate_non_negative;
use agency_db::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};
use agency_db::repositories::TeamMemberRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{ensure_company_exists, ensure_member_exists};
use crate::response::DataResponse;
use crate::state::AppState;

/// Field checks shared by create and update. `None` means "not supplied".
fn validate_member_fields(
    role: Option<&str>,
    status: Option<&str>,
    hourly_rate: Option<Decimal>,
    annual_salary: Option<Decimal>,
    weekly_capacity_hours: Option<Decimal>,
) -> Result<(), CoreError> {
    if let Some(role) = role {
        validate_role(role)?;
    }
    if let Some(status) = status {
        validate_member_status(status)?;
    }
    if let Some(rate) = hourly_rate {
        validate_non_negative(rate, "hourly_rate")?;
    }
    if let Some(salary) = annual_salary {
        validate_non_negative(salary, "annual_salary")?;
    }
    if let Some(hours) = weekly_capacity_hours {
        validate_non_negative(hours, "weekly_capacity_hours")?;
    }
    Ok(())
}

/// POST /api/v1/companies/{company_id}/team-members
pub async fn create(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateTeamMember>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamMember>>)> {
    input.validate()?;
    validate_member_fields(
        input.role.as_deref(),
        input.status.as_deref(),
        input.hourly_rate,
        input.annual_salary,
        input.weekly_capacity_hours,
    )?;
    ensure_company_exists(&state.pool, company_id).await?;

    let member = TeamMemberRepo::create(&state.pool, company_id, &input).await?;
    tracing::info!(company_id, team_member_id = member.id, "Team member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// GET /api/v1/companies/{company_id}/team-members
pub async fn list(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TeamMember>>>> {
    ensure_company_exists(&state.pool, company_id).await?;
    let members = TeamMemberRepo::list_by_company(&state.pool, company_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/companies/{company_id}/team-members/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<TeamMember>>> {
    let member = ensure_member_exists(&state.pool, company_id, id).await?;
    Ok(Json(DataResponse { data: member }))
}

/// PUT /api/v1/companies/{company_id}/team-members/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTeamMember>,
) -> AppResult<Json<DataResponse<TeamMember>>> {
    input.validate()?;
    validate_member_fields(
        input.role.as_deref(),
        input.status.as_deref(),
        input.hourly_rate,
        input.annual_salary,
        input.weekly_capacity_hours,
    )?;
    let member = TeamMemberRepo::update(&state.pool, company_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TeamMember",
            id,
        }))?;
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/companies/{company_id}/team-members/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if TeamMemberRepo::delete(&state.pool, company_id, id).await? {
        tracing::info!(company_id, team_member_id = id, "Team member deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "TeamMember",
            id,
        }))
    }
}
