//! Recorded monthly revenue model and DTOs.

use agency_core::calendar::{MAX_YEAR, MIN_YEAR};
use agency_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `monthly_revenues` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyRevenue {
    pub id: DbId,
    pub company_id: DbId,
    pub client_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub year: i32,
    pub month: i32,
    pub revenue: Decimal,
    pub revenue_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording revenue. `revenue_type` defaults to `booked`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMonthlyRevenue {
    pub client_id: Option<DbId>,
    pub project_id: Option<DbId>,
    #[validate(range(min = MIN_YEAR, max = MAX_YEAR))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: i32,
    pub revenue: Decimal,
    pub revenue_type: Option<String>,
}

/// DTO for updating recorded revenue. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMonthlyRevenue {
    pub client_id: Option<DbId>,
    pub project_id: Option<DbId>,
    #[validate(range(min = MIN_YEAR, max = MAX_YEAR))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub month: Option<i32>,
    pub revenue: Option<Decimal>,
    pub revenue_type: Option<String>,
}

/// Revenue summed per month and revenue type.
#[derive(Debug, Clone, FromRow)]
pub struct RevenueByMonth {
    pub year: i32,
    pub month: i32,
    pub revenue_type: String,
    pub revenue: Decimal,
}
