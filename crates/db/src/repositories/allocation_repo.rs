//! Repository for the `project_allocations` table.
//!
//! Rows are only ever written by [`AllocationRepo::replace_for_project`],
//! which swaps a project's whole allocation set inside one transaction.

use agency_core::allocation::MonthlyAllocation;
use agency_core::calendar::YearMonth;
use agency_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::allocation::{MemberProjectHours, MonthlyHours, ProjectAllocation};

const COLUMNS: &str = "id, project_id, team_member_id, year, month, allocated_hours, \
    hourly_rate, created_at, updated_at";

/// Provides reads and the atomic replace for allocation rows.
pub struct AllocationRepo;

impl AllocationRepo {
    /// All rows for a project, ordered by member then month.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectAllocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_allocations
             WHERE project_id = $1
             ORDER BY team_member_id, year, month"
        );
        sqlx::query_as::<_, ProjectAllocation>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every allocation row of a project with `rows`.
    ///
    /// Runs in a single transaction that first locks the project row, so two
    /// saves for the same project serialize and the later one wins in full.
    /// Each row stores the member's current hourly rate. Returns
    /// `RowNotFound` (and writes nothing) if the project or any member has
    /// gone away.
    pub async fn replace_for_project(
        pool: &PgPool,
        project_id: DbId,
        rows: &[MonthlyAllocation],
    ) -> Result<Vec<ProjectAllocation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM project_allocations WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO project_allocations
                (project_id, team_member_id, year, month, allocated_hours, hourly_rate)
             SELECT $1::BIGINT, tm.id, $3::INTEGER, $4::INTEGER, $5::NUMERIC, tm.hourly_rate
             FROM team_members tm
             WHERE tm.id = $2
             ON CONFLICT ON CONSTRAINT uq_project_allocations_member_month
             DO UPDATE SET allocated_hours = EXCLUDED.allocated_hours,
                           hourly_rate = EXCLUDED.hourly_rate
             RETURNING {COLUMNS}"
        );

        let mut saved = Vec::with_capacity(rows.len());
        for row in rows {
            let allocation = sqlx::query_as::<_, ProjectAllocation>(&query)
                .bind(project_id)
                .bind(row.team_member_id)
                .bind(row.period.year())
                .bind(row.period.month() as i32)
                .bind(row.hours)
                .fetch_one(&mut *tx)
                .await?;
            saved.push(allocation);
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// Total allocated hours on a project.
    pub async fn total_hours_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Decimal, sqlx::Error> {
        let (hours,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(allocated_hours), 0) FROM project_allocations
             WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;
        Ok(hours)
    }

    /// Hours per month across all of a company's projects within `[from, to]`.
    pub async fn monthly_hours_for_company(
        pool: &PgPool,
        company_id: DbId,
        from: YearMonth,
        to: YearMonth,
    ) -> Result<Vec<MonthlyHours>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyHours>(
            "SELECT pa.year, pa.month, SUM(pa.allocated_hours) AS hours
             FROM project_allocations pa
             JOIN projects p ON p.id = pa.project_id
             WHERE p.company_id = $1
               AND (pa.year * 12 + pa.month - 1) BETWEEN $2 AND $3
             GROUP BY pa.year, pa.month
             ORDER BY pa.year, pa.month",
        )
        .bind(company_id)
        .bind(from.ordinal())
        .bind(to.ordinal())
        .fetch_all(pool)
        .await
    }

    /// Hours per month for one member across all projects within `[from, to]`.
    pub async fn monthly_hours_for_member(
        pool: &PgPool,
        team_member_id: DbId,
        from: YearMonth,
        to: YearMonth,
    ) -> Result<Vec<MonthlyHours>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyHours>(
            "SELECT year, month, SUM(allocated_hours) AS hours
             FROM project_allocations
             WHERE team_member_id = $1
               AND (year * 12 + month - 1) BETWEEN $2 AND $3
             GROUP BY year, month
             ORDER BY year, month",
        )
        .bind(team_member_id)
        .bind(from.ordinal())
        .bind(to.ordinal())
        .fetch_all(pool)
        .await
    }

    /// A member's rows for one month, with the project each belongs to.
    pub async fn member_projects_in_month(
        pool: &PgPool,
        team_member_id: DbId,
        period: YearMonth,
    ) -> Result<Vec<MemberProjectHours>, sqlx::Error> {
        sqlx::query_as::<_, MemberProjectHours>(
            "SELECT p.id AS project_id, p.name AS project_name, p.status AS project_status,
                    pa.allocated_hours AS hours, pa.hourly_rate
             FROM project_allocations pa
             JOIN projects p ON p.id = pa.project_id
             WHERE pa.team_member_id = $1 AND pa.year = $2 AND pa.month = $3
             ORDER BY pa.allocated_hours DESC, p.name",
        )
        .bind(team_member_id)
        .bind(period.year())
        .bind(period.month() as i32)
        .fetch_all(pool)
        .await
    }

    /// Hours booked on any of `project_ids` in one month.
    pub async fn hours_for_projects_in_month(
        pool: &PgPool,
        project_ids: &[DbId],
        period: YearMonth,
    ) -> Result<Decimal, sqlx::Error> {
        let (hours,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(allocated_hours), 0) FROM project_allocations
             WHERE project_id = ANY($1) AND year = $2 AND month = $3",
        )
        .bind(project_ids)
        .bind(period.year())
        .bind(period.month() as i32)
        .fetch_one(pool)
        .await?;
        Ok(hours)
    }

    /// Distinct members holding any allocation on `project_ids`.
    pub async fn count_members_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT team_member_id) FROM project_allocations
             WHERE project_id = ANY($1)",
        )
        .bind(project_ids)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
