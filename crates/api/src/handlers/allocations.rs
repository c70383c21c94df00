//! Handlers for a project's allocation grid and team membership.
//!
//! The grid is edited per week and stored per month: a save collapses the
//! submitted weekly cells into monthly rows and replaces the project's
//! whole allocation set in one transaction; a read exposes each monthly row
//! at week 1 of its month.

use std::collections::{BTreeMap, HashSet};

use agency_core::allocation::{
    cell_key, collapse_to_monthly, parse_cell, remaining_hours, totals, validate_cell_count,
    AllocationCell, AllocationTotals, MONTHLY_ROW_WEEK,
};
use agency_core::calendar::{project_weeks, Week, YearMonth};
use agency_core::error::CoreError;
use agency_core::team::{display_name, initials, is_assignable, role_label};
use agency_core::types::DbId;
use agency_db::models::allocation::ProjectAllocation;
use agency_db::models::team_member::TeamMember;
use agency_db::repositories::{AllocationRepo, ProjectRepo, TeamMemberRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::{ensure_member_exists, ensure_project_exists};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One submitted grid cell. `hours` is taken as-is from the client and
/// parsed leniently; `week` defaults to 1.
#[derive(Debug, Deserialize)]
pub struct AllocationInput {
    pub member_id: DbId,
    pub year: i32,
    pub month: u32,
    pub week: Option<u32>,
    #[serde(default)]
    pub hours: serde_json::Value,
}

/// Body of `PUT .../allocations`.
#[derive(Debug, Deserialize)]
pub struct SaveAllocationsRequest {
    pub allocations: Vec<AllocationInput>,
}

/// Body of `POST .../team`.
#[derive(Debug, Deserialize)]
pub struct AddTeamMemberRequest {
    pub member_id: DbId,
}

/// A team member as shown in the grid's row headers.
#[derive(Debug, Serialize)]
pub struct GridMember {
    pub id: DbId,
    pub name: String,
    pub initials: String,
    pub role: String,
    pub role_label: &'static str,
    pub hourly_rate: Decimal,
}

impl From<&TeamMember> for GridMember {
    fn from(member: &TeamMember) -> Self {
        Self {
            id: member.id,
            name: display_name(&member.first_name, &member.last_name),
            initials: initials(&member.first_name, &member.last_name),
            role: member.role.clone(),
            role_label: role_label(&member.role),
            hourly_rate: member.hourly_rate,
        }
    }
}

/// Everything the allocation grid needs to render.
#[derive(Debug, Serialize)]
pub struct AllocationGrid {
    pub project_id: DbId,
    /// False when the project has no start or end date; `weeks` is then empty.
    pub dates_set: bool,
    pub team_members: Vec<GridMember>,
    pub weeks: Vec<Week>,
    /// Hours keyed `"{member}_{year}_{month}_{week}"`.
    pub allocations: BTreeMap<String, Decimal>,
    pub totals: AllocationTotals,
    /// Target hours for the project, if set.
    pub total_hours: Option<Decimal>,
    /// Target minus allocated; negative when over-allocated.
    pub remaining_hours: Option<Decimal>,
}

/// Result of a save.
#[derive(Debug, Serialize)]
pub struct SaveAllocationsResponse {
    pub rows_saved: usize,
    pub allocations: Vec<ProjectAllocation>,
    pub totals: AllocationTotals,
    pub remaining_hours: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Stored monthly rows as grid cells at [`MONTHLY_ROW_WEEK`].
fn stored_cells(rows: &[ProjectAllocation]) -> Vec<AllocationCell> {
    rows.iter()
        .filter_map(|row| {
            let period = YearMonth::from_row(row.year, row.month)?;
            Some(AllocationCell {
                team_member_id: row.team_member_id,
                period,
                week: MONTHLY_ROW_WEEK,
                hours: row.allocated_hours,
            })
        })
        .collect()
}

/// GET /api/v1/companies/{company_id}/projects/{id}/allocations
pub async fn get_grid(
    State(state): State<AppState>,
    Path((company_id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<AllocationGrid>>> {
    let project = ensure_project_exists(&state.pool, company_id, project_id).await?;
    let members = TeamMemberRepo::list_by_project(&state.pool, project.id).await?;
    let rows = AllocationRepo::list_by_project(&state.pool, project.id).await?;

    let cells = stored_cells(&rows);
    let allocations = cells
        .iter()
        .map(|c| {
            (
                cell_key(c.team_member_id, c.period.year(), c.period.month(), c.week),
                c.hours,
            )
        })
        .collect();
    let totals = totals(&cells);
    let remaining = remaining_hours(project.total_hours, totals.grand_total);

    let grid = AllocationGrid {
        project_id: project.id,
        dates_set: project.start_date.is_some() && project.end_date.is_some(),
        team_members: members.iter().map(GridMember::from).collect(),
        weeks: project_weeks(project.start_date, project.end_date),
        allocations,
        totals,
        total_hours: project.total_hours,
        remaining_hours: remaining,
    };
    Ok(Json(DataResponse { data: grid }))
}

/// PUT /api/v1/companies/{company_id}/projects/{id}/allocations
///
/// Every cell is validated before anything is written; a single bad cell
/// rejects the whole save. Totals are computed from the stored rows, the same
/// way the grid read computes them.
pub async fn save(
    State(state): State<AppState>,
    Path((company_id, project_id)): Path<(DbId, DbId)>,
    Json(input): Json<SaveAllocationsRequest>,
) -> AppResult<Json<DataResponse<SaveAllocationsResponse>>> {
    let project = ensure_project_exists(&state.pool, company_id, project_id).await?;
    validate_cell_count(input.allocations.len())?;

    let team: HashSet<DbId> = TeamMemberRepo::list_by_project(&state.pool, project.id)
        .await?
        .iter()
        .map(|m| m.id)
        .collect();

    let cells = input
        .allocations
        .iter()
        .map(|cell| {
            if !team.contains(&cell.member_id) {
                return Err(CoreError::Validation(format!(
                    "Team member {} is not on this project's team",
                    cell.member_id
                )));
            }
            parse_cell(cell.member_id, cell.year, cell.month, cell.week, &cell.hours)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let monthly = collapse_to_monthly(&cells);
    let saved = AllocationRepo::replace_for_project(&state.pool, project.id, &monthly).await?;

    let totals = totals(&stored_cells(&saved));
    tracing::info!(
        project_id = project.id,
        cells = cells.len(),
        rows = saved.len(),
        total_hours = %totals.grand_total,
        "Project allocations saved",
    );

    let response = SaveAllocationsResponse {
        rows_saved: saved.len(),
        remaining_hours: remaining_hours(project.total_hours, totals.grand_total),
        allocations: saved,
        totals,
    };
    Ok(Json(DataResponse { data: response }))
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// GET /api/v1/companies/{company_id}/projects/{id}/team/available
pub async fn available_members(
    State(state): State<AppState>,
    Path((company_id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Vec<TeamMember>>>> {
    let project = ensure_project_exists(&state.pool, company_id, project_id).await?;
    let members =
        TeamMemberRepo::list_available_for_project(&state.pool, company_id, project.id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/companies/{company_id}/projects/{id}/team
///
/// 201 when the member joins, 200 when they were already on the team.
pub async fn add_member(
    State(state): State<AppState>,
    Path((company_id, project_id)): Path<(DbId, DbId)>,
    Json(input): Json<AddTeamMemberRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamMember>>)> {
    let project = ensure_project_exists(&state.pool, company_id, project_id).await?;
    let member = ensure_member_exists(&state.pool, company_id, input.member_id).await?;
    if !is_assignable(&member.status) {
        return Err(CoreError::Validation(format!(
            "Team member {} is {} and cannot join a project",
            member.id, member.status
        ))
        .into());
    }

    let added = ProjectRepo::add_team_member(&state.pool, project.id, member.id).await?;
    let status = if added {
        tracing::info!(project_id = project.id, team_member_id = member.id, "Team member added");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: member })))
}

/// DELETE /api/v1/companies/{company_id}/projects/{id}/team/{member_id}
///
/// Also deletes every allocation row the member holds on the project.
pub async fn remove_member(
    State(state): State<AppState>,
    Path((company_id, project_id, member_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let project = ensure_project_exists(&state.pool, company_id, project_id).await?;
    let removed = ProjectRepo::remove_team_member(&state.pool, project.id, member_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TeamMember",
            id: member_id,
        }))?;
    tracing::info!(
        project_id = project.id,
        team_member_id = member_id,
        rows = removed,
        "Team member removed",
    );
    Ok(StatusCode::NO_CONTENT)
}
