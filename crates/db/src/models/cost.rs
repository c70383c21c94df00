//! Operating cost entity model and DTOs.

use agency_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `costs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cost {
    pub id: DbId,
    pub company_id: DbId,
    pub project_id: Option<DbId>,
    pub name: String,
    pub cost_type: String,
    pub amount: Decimal,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a cost. `cost_type` defaults to `other`, `frequency` to
/// `monthly` and `is_active` to true.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCost {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub project_id: Option<DbId>,
    pub cost_type: Option<String>,
    pub amount: Decimal,
    pub frequency: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// DTO for updating a cost. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCost {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub project_id: Option<DbId>,
    pub cost_type: Option<String>,
    pub amount: Option<Decimal>,
    pub frequency: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}
