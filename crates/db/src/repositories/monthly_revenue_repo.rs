//! Repository for the `monthly_revenues` table.

use agency_core::calendar::YearMonth;
use agency_core::types::DbId;
use sqlx::PgPool;

use crate::models::monthly_revenue::{
    CreateMonthlyRevenue, MonthlyRevenue, RevenueByMonth, UpdateMonthlyRevenue,
};

const COLUMNS: &str = "id, company_id, client_id, project_id, year, month, revenue, \
    revenue_type, created_at, updated_at";

/// Provides CRUD operations and monthly sums for recorded revenue.
pub struct MonthlyRevenueRepo;

impl MonthlyRevenueRepo {
    /// Record revenue for a month. `revenue_type` defaults to `booked`.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateMonthlyRevenue,
    ) -> Result<MonthlyRevenue, sqlx::Error> {
        let query = format!(
            "INSERT INTO monthly_revenues
                (company_id, client_id, project_id, year, month, revenue, revenue_type)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'booked'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MonthlyRevenue>(&query)
            .bind(company_id)
            .bind(input.client_id)
            .bind(input.project_id)
            .bind(input.year)
            .bind(input.month)
            .bind(input.revenue)
            .bind(&input.revenue_type)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<MonthlyRevenue>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM monthly_revenues WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, MonthlyRevenue>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's revenue rows, optionally for one year, newest first.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        year: Option<i32>,
    ) -> Result<Vec<MonthlyRevenue>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM monthly_revenues
             WHERE company_id = $1 AND ($2::INTEGER IS NULL OR year = $2)
             ORDER BY year DESC, month DESC, id DESC"
        );
        sqlx::query_as::<_, MonthlyRevenue>(&query)
            .bind(company_id)
            .bind(year)
            .fetch_all(pool)
            .await
    }

    /// Revenue summed per month and type within `[from, to]`.
    pub async fn totals_by_month(
        pool: &PgPool,
        company_id: DbId,
        from: YearMonth,
        to: YearMonth,
    ) -> Result<Vec<RevenueByMonth>, sqlx::Error> {
        sqlx::query_as::<_, RevenueByMonth>(
            "SELECT year, month, revenue_type, SUM(revenue) AS revenue
             FROM monthly_revenues
             WHERE company_id = $1
               AND (year * 12 + month - 1) BETWEEN $2 AND $3
             GROUP BY year, month, revenue_type
             ORDER BY year, month, revenue_type",
        )
        .bind(company_id)
        .bind(from.ordinal())
        .bind(to.ordinal())
        .fetch_all(pool)
        .await
    }

    /// Update a revenue row. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &UpdateMonthlyRevenue,
    ) -> Result<Option<MonthlyRevenue>, sqlx::Error> {
        let query = format!(
            "UPDATE monthly_revenues SET
                client_id = COALESCE($3, client_id),
                project_id = COALESCE($4, project_id),
                year = COALESCE($5, year),
                month = COALESCE($6, month),
                revenue = COALESCE($7, revenue),
                revenue_type = COALESCE($8, revenue_type)
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MonthlyRevenue>(&query)
            .bind(id)
            .bind(company_id)
            .bind(input.client_id)
            .bind(input.project_id)
            .bind(input.year)
            .bind(input.month)
            .bind(input.revenue)
            .bind(&input.revenue_type)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM monthly_revenues WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
