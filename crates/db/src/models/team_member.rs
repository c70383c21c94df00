//! Team member entity model and DTOs.

use agency_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `team_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub id: DbId,
    pub company_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: String,
    pub status: String,
    pub hourly_rate: Decimal,
    pub annual_salary: Option<Decimal>,
    pub weekly_capacity_hours: Decimal,
    pub is_project_manager: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a team member.
///
/// `role` defaults to `employee`, `status` to `full_time`, `hourly_rate` to 0
/// and `weekly_capacity_hours` to 40.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeamMember {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub annual_salary: Option<Decimal>,
    pub weekly_capacity_hours: Option<Decimal>,
    pub is_project_manager: Option<bool>,
}

/// DTO for updating a team member. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTeamMember {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub annual_salary: Option<Decimal>,
    pub weekly_capacity_hours: Option<Decimal>,
    pub is_project_manager: Option<bool>,
}
