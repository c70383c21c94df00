//! Handlers for `/companies/{company_id}/projects`.

use agency_core::calendar::validate_project_dates;
use agency_core::error::CoreError;
use agency_core::project::validate_project_status;
use agency_core::revenue::validate_revenue_type;
use agency_core::types::DbId;
use agency_core::validation::validate_non_negative;
use agency_db::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use agency_db::repositories::ProjectRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{
    check_client_ref, check_member_ref, ensure_company_exists, ensure_project_exists,
};
use crate::response::DataResponse;
use crate::state::AppState;

/// Field checks shared by create and update. `None` means "not supplied".
fn validate_project_fields(
    status: Option<&str>,
    revenue_type: Option<&str>,
    total_revenue: Option<Decimal>,
    total_hours: Option<Decimal>,
) -> Result<(), CoreError> {
    if let Some(status) = status {
        validate_project_status(status)?;
    }
    if let Some(revenue_type) = revenue_type {
        validate_revenue_type(revenue_type)?;
    }
    if let Some(revenue) = total_revenue {
        validate_non_negative(revenue, "total_revenue")?;
    }
    if let Some(hours) = total_hours {
        validate_non_negative(hours, "total_hours")?;
    }
    Ok(())
}

/// POST /api/v1/companies/{company_id}/projects
pub async fn create(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;
    validate_project_fields(
        input.status.as_deref(),
        input.revenue_type.as_deref(),
        input.total_revenue,
        input.total_hours,
    )?;
    validate_project_dates(input.start_date, input.end_date)?;
    ensure_company_exists(&state.pool, company_id).await?;
    check_client_ref(&state.pool, company_id, Some(input.client_id)).await?;
    check_member_ref(
        &state.pool,
        company_id,
        input.project_manager_id,
        "project_manager_id",
    )
    .await?;

    let project = ProjectRepo::create(&state.pool, company_id, &input).await?;
    tracing::info!(company_id, project_id = project.id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/companies/{company_id}/projects?status=&revenue_type=&client_id=
pub async fn list(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    ensure_company_exists(&state.pool, company_id).await?;
    let projects = ProjectRepo::list(&state.pool, company_id, &filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/companies/{company_id}/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ensure_project_exists(&state.pool, company_id, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/companies/{company_id}/projects/{id}
///
/// Date order is checked against the merged result so a lone `end_date`
/// cannot move before the stored `start_date`.
pub async fn update(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    validate_project_fields(
        input.status.as_deref(),
        input.revenue_type.as_deref(),
        input.total_revenue,
        input.total_hours,
    )?;
    let existing = ensure_project_exists(&state.pool, company_id, id).await?;
    validate_project_dates(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;
    check_client_ref(&state.pool, company_id, input.client_id).await?;
    check_member_ref(
        &state.pool,
        company_id,
        input.project_manager_id,
        "project_manager_id",
    )
    .await?;

    let project = ProjectRepo::update(&state.pool, company_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/companies/{company_id}/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, company_id, id).await? {
        tracing::info!(company_id, project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
