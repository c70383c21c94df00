//! Project and client status values plus allocation-health helpers.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::metrics::percentage;
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Project status
// ---------------------------------------------------------------------------

pub const PROJECT_PLANNING: &str = "planning";
pub const PROJECT_ACTIVE: &str = "active";
pub const PROJECT_ON_HOLD: &str = "on_hold";
pub const PROJECT_COMPLETED: &str = "completed";
pub const PROJECT_CANCELLED: &str = "cancelled";

/// All valid project status values.
pub const VALID_PROJECT_STATUSES: &[&str] = &[
    PROJECT_PLANNING,
    PROJECT_ACTIVE,
    PROJECT_ON_HOLD,
    PROJECT_COMPLETED,
    PROJECT_CANCELLED,
];

/// Statuses of projects still being staffed.
pub const OPEN_PROJECT_STATUSES: &[&str] = &[PROJECT_PLANNING, PROJECT_ACTIVE];

pub fn validate_project_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_PROJECT_STATUSES, "project status")
}

// ---------------------------------------------------------------------------
// Client status
// ---------------------------------------------------------------------------

pub const CLIENT_ACTIVE: &str = "active";
pub const CLIENT_PROSPECT: &str = "prospect";
pub const CLIENT_INACTIVE: &str = "inactive";

/// All valid client status values.
pub const VALID_CLIENT_STATUSES: &[&str] = &[CLIENT_ACTIVE, CLIENT_PROSPECT, CLIENT_INACTIVE];

pub fn validate_client_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_CLIENT_STATUSES, "client status")
}

// ---------------------------------------------------------------------------
// Allocation health
// ---------------------------------------------------------------------------

/// Allocation percentage at or above which a project is healthy.
pub const HEALTH_GOOD_PCT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
/// Allocation percentage at or above which a project needs attention.
pub const HEALTH_WARNING_PCT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Staffing health of a project relative to its hour target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationHealth {
    Good,
    Warning,
    Critical,
}

impl AllocationHealth {
    pub fn from_percentage(pct: Decimal) -> Self {
        if pct >= HEALTH_GOOD_PCT {
            Self::Good
        } else if pct >= HEALTH_WARNING_PCT {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

/// Allocated hours as a percentage of the project's target (0 without one).
pub fn allocation_percentage(allocated: Decimal, target: Option<Decimal>) -> Decimal {
    percentage(allocated, target.unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_validate() {
        assert!(validate_project_status(PROJECT_ON_HOLD).is_ok());
        assert!(validate_project_status("paused").is_err());
        assert!(validate_client_status(CLIENT_PROSPECT).is_ok());
        assert!(validate_client_status("lost").is_err());
    }

    #[test]
    fn health_thresholds() {
        assert_eq!(
            AllocationHealth::from_percentage(Decimal::from(80)),
            AllocationHealth::Good
        );
        assert_eq!(
            AllocationHealth::from_percentage(Decimal::new(7999, 2)),
            AllocationHealth::Warning
        );
        assert_eq!(
            AllocationHealth::from_percentage(Decimal::from(50)),
            AllocationHealth::Warning
        );
        assert_eq!(
            AllocationHealth::from_percentage(Decimal::from(10)),
            AllocationHealth::Critical
        );
    }

    #[test]
    fn allocation_percentage_without_target_is_zero() {
        assert_eq!(allocation_percentage(Decimal::from(35), None), Decimal::ZERO);
        assert_eq!(
            allocation_percentage(Decimal::from(35), Some(Decimal::ZERO)),
            Decimal::ZERO
        );
    }

    #[test]
    fn allocation_percentage_against_target() {
        assert_eq!(
            allocation_percentage(Decimal::from(30), Some(Decimal::from(120))),
            Decimal::from(25)
        );
    }
}
