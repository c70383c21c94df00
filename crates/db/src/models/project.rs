//! Project entity model, DTOs and list filters.

use agency_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub company_id: DbId,
    pub client_id: DbId,
    pub name: String,
    pub project_type: Option<String>,
    pub status: String,
    pub revenue_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_revenue: Decimal,
    /// Target hours for the whole project.
    pub total_hours: Option<Decimal>,
    pub project_manager_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
///
/// `status` defaults to `planning`, `revenue_type` to `forecast` and
/// `total_revenue` to 0.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    pub client_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 100))]
    pub project_type: Option<String>,
    pub status: Option<String>,
    pub revenue_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_revenue: Option<Decimal>,
    pub total_hours: Option<Decimal>,
    pub project_manager_id: Option<DbId>,
}

/// DTO for updating a project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    pub client_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub project_type: Option<String>,
    pub status: Option<String>,
    pub revenue_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_revenue: Option<Decimal>,
    pub total_hours: Option<Decimal>,
    pub project_manager_id: Option<DbId>,
}

/// Optional filters for listing projects (`?status=&revenue_type=&client_id=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<String>,
    pub revenue_type: Option<String>,
    pub client_id: Option<DbId>,
}
