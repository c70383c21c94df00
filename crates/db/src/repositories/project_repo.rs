//! Repository for the `projects` table and project team membership.

use agency_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, client_id, name, project_type, status, revenue_type, \
    start_date, end_date, total_revenue, total_hours, project_manager_id, created_at, updated_at";

/// Provides CRUD and team operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// Missing `status`, `revenue_type` and `total_revenue` fall back to
    /// `planning`, `forecast` and 0.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (company_id, client_id, name, project_type, status, revenue_type,
                 start_date, end_date, total_revenue, total_hours, project_manager_id)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'planning'), COALESCE($6, 'forecast'),
                     $7, $8, COALESCE($9, 0), $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .bind(input.client_id)
            .bind(&input.name)
            .bind(&input.project_type)
            .bind(&input.status)
            .bind(&input.revenue_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.total_revenue)
            .bind(input.total_hours)
            .bind(input.project_manager_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by id within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's projects, newest first, narrowed by any filters set.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE company_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT IS NULL OR revenue_type = $3)
               AND ($4::BIGINT IS NULL OR client_id = $4)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .bind(&filter.status)
            .bind(&filter.revenue_type)
            .bind(filter.client_id)
            .fetch_all(pool)
            .await
    }

    /// Projects managed by a team member, ordered by start date.
    pub async fn list_managed_by(
        pool: &PgPool,
        company_id: DbId,
        project_manager_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE company_id = $1 AND project_manager_id = $2
             ORDER BY start_date NULLS LAST, name"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .bind(project_manager_id)
            .fetch_all(pool)
            .await
    }

    /// Count projects whose date span overlaps `[from, to]`. Projects with a
    /// missing start or end date are open-ended on that side.
    pub async fn count_overlapping(
        pool: &PgPool,
        company_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM projects
             WHERE company_id = $1
               AND (start_date IS NULL OR start_date <= $3)
               AND (end_date IS NULL OR end_date >= $2)",
        )
        .bind(company_id)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the project does not exist in the company.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                client_id = COALESCE($3, client_id),
                name = COALESCE($4, name),
                project_type = COALESCE($5, project_type),
                status = COALESCE($6, status),
                revenue_type = COALESCE($7, revenue_type),
                start_date = COALESCE($8, start_date),
                end_date = COALESCE($9, end_date),
                total_revenue = COALESCE($10, total_revenue),
                total_hours = COALESCE($11, total_hours),
                project_manager_id = COALESCE($12, project_manager_id)
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(company_id)
            .bind(input.client_id)
            .bind(&input.name)
            .bind(&input.project_type)
            .bind(&input.status)
            .bind(&input.revenue_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.total_revenue)
            .bind(input.total_hours)
            .bind(input.project_manager_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project with its team links and allocations.
    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Team ---------------------------------------------------------------

    /// Put a member on the project team. Adding an existing member is a
    /// no-op; returns `true` only when a new link was created.
    pub async fn add_team_member(
        pool: &PgPool,
        project_id: DbId,
        team_member_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_team_members (project_id, team_member_id)
             VALUES ($1, $2)
             ON CONFLICT (project_id, team_member_id) DO NOTHING",
        )
        .bind(project_id)
        .bind(team_member_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Take a member off the team and delete every allocation row they have
    /// on the project, in one transaction.
    ///
    /// Returns the number of allocation rows removed, or `None` when the
    /// member was not on the team (nothing is changed in that case).
    pub async fn remove_team_member(
        pool: &PgPool,
        project_id: DbId,
        team_member_id: DbId,
    ) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let unlinked = sqlx::query(
            "DELETE FROM project_team_members WHERE project_id = $1 AND team_member_id = $2",
        )
        .bind(project_id)
        .bind(team_member_id)
        .execute(&mut *tx)
        .await?;

        if unlinked.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let removed = sqlx::query(
            "DELETE FROM project_allocations WHERE project_id = $1 AND team_member_id = $2",
        )
        .bind(project_id)
        .bind(team_member_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(removed.rows_affected()))
    }

    /// Number of members on a project's team.
    pub async fn team_size(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_team_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
