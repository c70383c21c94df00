//! Repository for the `team_members` table.

use agency_core::team::STATUS_INACTIVE;
use agency_core::types::DbId;
use sqlx::PgPool;

use crate::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};

const COLUMNS: &str = "id, company_id, first_name, last_name, email, role, status, \
    hourly_rate, annual_salary, weekly_capacity_hours, is_project_manager, \
    created_at, updated_at";

/// Same columns qualified with the `tm` alias, for joins.
const TM_COLUMNS: &str = "tm.id, tm.company_id, tm.first_name, tm.last_name, tm.email, \
    tm.role, tm.status, tm.hourly_rate, tm.annual_salary, tm.weekly_capacity_hours, \
    tm.is_project_manager, tm.created_at, tm.updated_at";

/// Provides CRUD and lookup operations for team members.
pub struct TeamMemberRepo;

impl TeamMemberRepo {
    /// Insert a new team member, applying column defaults for omitted fields.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateTeamMember,
    ) -> Result<TeamMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_members
                (company_id, first_name, last_name, email, role, status, hourly_rate,
                 annual_salary, weekly_capacity_hours, is_project_manager)
             VALUES ($1, $2, COALESCE($3, ''), $4, COALESCE($5, 'employee'),
                     COALESCE($6, 'full_time'), COALESCE($7, 0), $8,
                     COALESCE($9, 40), COALESCE($10, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(company_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.status)
            .bind(input.hourly_rate)
            .bind(input.annual_salary)
            .bind(input.weekly_capacity_hours)
            .bind(input.is_project_manager)
            .fetch_one(pool)
            .await
    }

    /// Find a member by id within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM team_members WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's members ordered by name.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_members
             WHERE company_id = $1
             ORDER BY first_name, last_name, id"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Members on a project's team, ordered by name.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {TM_COLUMNS} FROM team_members tm
             JOIN project_team_members ptm ON ptm.team_member_id = tm.id
             WHERE ptm.project_id = $1
             ORDER BY tm.first_name, tm.last_name, tm.id"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Company members who are not inactive and not yet on the project team.
    pub async fn list_available_for_project(
        pool: &PgPool,
        company_id: DbId,
        project_id: DbId,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_members tm
             WHERE tm.company_id = $1
               AND tm.status <> $3
               AND NOT EXISTS (
                   SELECT 1 FROM project_team_members ptm
                   WHERE ptm.project_id = $2 AND ptm.team_member_id = tm.id
               )
             ORDER BY tm.first_name, tm.last_name, tm.id"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(company_id)
            .bind(project_id)
            .bind(STATUS_INACTIVE)
            .fetch_all(pool)
            .await
    }

    /// Update a member. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the member does not exist in the company.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &UpdateTeamMember,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!(
            "UPDATE team_members SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                role = COALESCE($6, role),
                status = COALESCE($7, status),
                hourly_rate = COALESCE($8, hourly_rate),
                annual_salary = COALESCE($9, annual_salary),
                weekly_capacity_hours = COALESCE($10, weekly_capacity_hours),
                is_project_manager = COALESCE($11, is_project_manager)
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.status)
            .bind(input.hourly_rate)
            .bind(input.annual_salary)
            .bind(input.weekly_capacity_hours)
            .bind(input.is_project_manager)
            .fetch_optional(pool)
            .await
    }

    /// Delete a member. Team links and allocations cascade; projects and
    /// clients referencing the member as manager are set to NULL.
    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
