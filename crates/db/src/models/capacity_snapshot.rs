//! Monthly capacity snapshot model.

use agency_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `capacity_snapshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CapacitySnapshot {
    pub id: DbId,
    pub company_id: DbId,
    pub year: i32,
    pub month: i32,
    pub team_member_count: i32,
    pub total_capacity_hours: Decimal,
    pub allocated_hours: Decimal,
    pub utilization_rate: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Computed figures to store for one company month.
#[derive(Debug, Clone)]
pub struct NewCapacitySnapshot {
    pub year: i32,
    pub month: i32,
    pub team_member_count: i32,
    pub total_capacity_hours: Decimal,
    pub allocated_hours: Decimal,
    pub utilization_rate: Decimal,
}
