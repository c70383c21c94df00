//! Repository for the `capacity_snapshots` table.

use agency_core::types::DbId;
use sqlx::PgPool;

use crate::models::capacity_snapshot::{CapacitySnapshot, NewCapacitySnapshot};

const COLUMNS: &str = "id, company_id, year, month, team_member_count, total_capacity_hours, \
    allocated_hours, utilization_rate, created_at, updated_at";

/// Stores one computed snapshot per company month.
pub struct CapacitySnapshotRepo;

impl CapacitySnapshotRepo {
    /// Insert or overwrite the snapshot for `(company, year, month)`.
    pub async fn upsert(
        pool: &PgPool,
        company_id: DbId,
        input: &NewCapacitySnapshot,
    ) -> Result<CapacitySnapshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO capacity_snapshots
                (company_id, year, month, team_member_count, total_capacity_hours,
                 allocated_hours, utilization_rate)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_capacity_snapshots_company_month
             DO UPDATE SET team_member_count = EXCLUDED.team_member_count,
                           total_capacity_hours = EXCLUDED.total_capacity_hours,
                           allocated_hours = EXCLUDED.allocated_hours,
                           utilization_rate = EXCLUDED.utilization_rate
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CapacitySnapshot>(&query)
            .bind(company_id)
            .bind(input.year)
            .bind(input.month)
            .bind(input.team_member_count)
            .bind(input.total_capacity_hours)
            .bind(input.allocated_hours)
            .bind(input.utilization_rate)
            .fetch_one(pool)
            .await
    }

    /// List snapshots, optionally for one year, oldest month first.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        year: Option<i32>,
    ) -> Result<Vec<CapacitySnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM capacity_snapshots
             WHERE company_id = $1 AND ($2::INTEGER IS NULL OR year = $2)
             ORDER BY year, month"
        );
        sqlx::query_as::<_, CapacitySnapshot>(&query)
            .bind(company_id)
            .bind(year)
            .fetch_all(pool)
            .await
    }
}
