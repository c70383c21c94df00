//! Allocation rows and the aggregates read from `project_allocations`.

use agency_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_allocations` table: hours for one member on one
/// project in one calendar month.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAllocation {
    pub id: DbId,
    pub project_id: DbId,
    pub team_member_id: DbId,
    pub year: i32,
    pub month: i32,
    pub allocated_hours: Decimal,
    /// The member's hourly rate when the row was saved.
    pub hourly_rate: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Allocated hours summed over one calendar month.
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyHours {
    pub year: i32,
    pub month: i32,
    pub hours: Decimal,
}

/// A member's allocation on one project in one month, with project context.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberProjectHours {
    pub project_id: DbId,
    pub project_name: String,
    pub project_status: String,
    pub hours: Decimal,
    pub hourly_rate: Decimal,
}
