//! HTTP handlers, one module per resource.
//!
//! The `ensure_*` helpers below load a company-scoped row or fail with a
//! 404, and the `check_*` helpers reject references to rows that live in
//! another company.

pub mod allocations;
pub mod capacity_snapshots;
pub mod clients;
pub mod companies;
pub mod costs;
pub mod dashboard;
pub mod projects;
pub mod revenues;
pub mod team_members;

use agency_core::error::CoreError;
use agency_core::types::DbId;
use agency_db::models::client::Client;
use agency_db::models::company::Company;
use agency_db::models::project::Project;
use agency_db::models::team_member::TeamMember;
use agency_db::repositories::{ClientRepo, CompanyRepo, ProjectRepo, TeamMemberRepo};
use chrono::{Datelike, Utc};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Verify that a company exists, returning the full row.
pub(crate) async fn ensure_company_exists(pool: &PgPool, company_id: DbId) -> AppResult<Company> {
    CompanyRepo::find_by_id(pool, company_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: company_id,
        })
    })
}

/// Verify that a team member exists in the company.
pub(crate) async fn ensure_member_exists(
    pool: &PgPool,
    company_id: DbId,
    id: DbId,
) -> AppResult<TeamMember> {
    TeamMemberRepo::find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "TeamMember",
                id,
            })
        })
}

/// Verify that a client exists in the company.
pub(crate) async fn ensure_client_exists(
    pool: &PgPool,
    company_id: DbId,
    id: DbId,
) -> AppResult<Client> {
    ClientRepo::find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Client", id }))
}

/// Verify that a project exists in the company.
pub(crate) async fn ensure_project_exists(
    pool: &PgPool,
    company_id: DbId,
    id: DbId,
) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Project", id }))
}

/// Reject a member reference that does not resolve inside the company.
pub(crate) async fn check_member_ref(
    pool: &PgPool,
    company_id: DbId,
    id: Option<DbId>,
    field: &str,
) -> AppResult<()> {
    let Some(id) = id else { return Ok(()) };
    if TeamMemberRepo::find_by_id(pool, company_id, id).await?.is_none() {
        return Err(CoreError::Validation(format!(
            "{field} {id} is not a member of this company"
        ))
        .into());
    }
    Ok(())
}

/// Reject a client reference that does not resolve inside the company.
pub(crate) async fn check_client_ref(
    pool: &PgPool,
    company_id: DbId,
    id: Option<DbId>,
) -> AppResult<()> {
    let Some(id) = id else { return Ok(()) };
    if ClientRepo::find_by_id(pool, company_id, id).await?.is_none() {
        return Err(CoreError::Validation(format!(
            "client_id {id} does not belong to this company"
        ))
        .into());
    }
    Ok(())
}

/// Reject a project reference that does not resolve inside the company.
pub(crate) async fn check_project_ref(
    pool: &PgPool,
    company_id: DbId,
    id: Option<DbId>,
) -> AppResult<()> {
    let Some(id) = id else { return Ok(()) };
    if ProjectRepo::find_by_id(pool, company_id, id).await?.is_none() {
        return Err(CoreError::Validation(format!(
            "project_id {id} does not belong to this company"
        ))
        .into());
    }
    Ok(())
}

/// The current calendar year and month in UTC.
pub(crate) fn current_year_month() -> (i32, u32) {
    let today = Utc::now().date_naive();
    (today.year(), today.month())
}
