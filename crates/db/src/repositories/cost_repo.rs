//! Repository for the `costs` table.

use agency_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::cost::{Cost, CreateCost, UpdateCost};

const COLUMNS: &str = "id, company_id, project_id, name, cost_type, amount, frequency, \
    start_date, end_date, is_active, created_at, updated_at";

/// Provides CRUD operations for operating costs.
pub struct CostRepo;

impl CostRepo {
    /// Insert a new cost, defaulting to an active monthly `other` cost.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateCost,
    ) -> Result<Cost, sqlx::Error> {
        let query = format!(
            "INSERT INTO costs
                (company_id, project_id, name, cost_type, amount, frequency,
                 start_date, end_date, is_active)
             VALUES ($1, $2, $3, COALESCE($4, 'other'), $5, COALESCE($6, 'monthly'),
                     $7, $8, COALESCE($9, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cost>(&query)
            .bind(company_id)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.cost_type)
            .bind(input.amount)
            .bind(&input.frequency)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Cost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM costs WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, Cost>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's costs, most recent start first. With `active_only`
    /// inactive costs are left out.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        active_only: bool,
    ) -> Result<Vec<Cost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM costs
             WHERE company_id = $1 AND (NOT $2::BOOLEAN OR is_active)
             ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, Cost>(&query)
            .bind(company_id)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Active costs whose window overlaps `[from, to]`.
    pub async fn list_active_between(
        pool: &PgPool,
        company_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Cost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM costs
             WHERE company_id = $1
               AND is_active
               AND start_date <= $3
               AND (end_date IS NULL OR end_date >= $2)
             ORDER BY start_date, id"
        );
        sqlx::query_as::<_, Cost>(&query)
            .bind(company_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Update a cost. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &UpdateCost,
    ) -> Result<Option<Cost>, sqlx::Error> {
        let query = format!(
            "UPDATE costs SET
                project_id = COALESCE($3, project_id),
                name = COALESCE($4, name),
                cost_type = COALESCE($5, cost_type),
                amount = COALESCE($6, amount),
                frequency = COALESCE($7, frequency),
                start_date = COALESCE($8, start_date),
                end_date = COALESCE($9, end_date),
                is_active = COALESCE($10, is_active)
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cost>(&query)
            .bind(id)
            .bind(company_id)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.cost_type)
            .bind(input.amount)
            .bind(&input.frequency)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM costs WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
