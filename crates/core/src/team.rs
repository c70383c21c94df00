//! Team member roles, employment statuses and per-member arithmetic.
//!
//! Capacity and payroll are derived from a member's weekly capacity, hourly
//! rate and optional salary; nothing here reads the database.

use rust_decimal::Decimal;

use crate::calendar::WEEKS_PER_MONTH;
use crate::error::CoreError;
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

pub const ROLE_LEADERSHIP: &str = "leadership";
pub const ROLE_ACCOUNT: &str = "account";
pub const ROLE_PROJECT_MANAGER: &str = "project_manager";
pub const ROLE_CREATIVE: &str = "creative";
pub const ROLE_DEVELOPER: &str = "developer";
pub const ROLE_STRATEGY: &str = "strategy";
pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_CONTRACTOR: &str = "contractor";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[
    ROLE_LEADERSHIP,
    ROLE_ACCOUNT,
    ROLE_PROJECT_MANAGER,
    ROLE_CREATIVE,
    ROLE_DEVELOPER,
    ROLE_STRATEGY,
    ROLE_EMPLOYEE,
    ROLE_CONTRACTOR,
];

/// Human-readable label for a role.
pub fn role_label(role: &str) -> &'static str {
    match role {
        ROLE_LEADERSHIP => "Leadership",
        ROLE_ACCOUNT => "Account Management",
        ROLE_PROJECT_MANAGER => "Project Manager",
        ROLE_CREATIVE => "Creative",
        ROLE_DEVELOPER => "Developer",
        ROLE_STRATEGY => "Strategy",
        ROLE_EMPLOYEE => "Employee",
        ROLE_CONTRACTOR => "Contractor",
        _ => "Unknown",
    }
}

pub fn validate_role(role: &str) -> Result<(), CoreError> {
    validate_one_of(role, VALID_ROLES, "role")
}

// ---------------------------------------------------------------------------
// Employment status
// ---------------------------------------------------------------------------

pub const STATUS_FULL_TIME: &str = "full_time";
pub const STATUS_PART_TIME: &str = "part_time";
pub const STATUS_CONTRACTOR: &str = "contractor";
pub const STATUS_INACTIVE: &str = "inactive";

/// All valid employment status values.
pub const VALID_MEMBER_STATUSES: &[&str] = &[
    STATUS_FULL_TIME,
    STATUS_PART_TIME,
    STATUS_CONTRACTOR,
    STATUS_INACTIVE,
];

/// Statuses whose members can be put on a project team.
pub const ASSIGNABLE_STATUSES: &[&str] = &[STATUS_FULL_TIME, STATUS_PART_TIME, STATUS_CONTRACTOR];

pub fn validate_member_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_MEMBER_STATUSES, "status")
}

/// Whether a member with this status may join a project team.
pub fn is_assignable(status: &str) -> bool {
    ASSIGNABLE_STATUSES.contains(&status)
}

/// Whether a member's hours count toward company capacity.
///
/// Employees (full- and part-time) do; contractors are bought in per
/// project and inactive members are gone.
pub fn counts_toward_capacity(status: &str) -> bool {
    matches!(status, STATUS_FULL_TIME | STATUS_PART_TIME)
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// Hours in an average month for a given weekly capacity.
pub fn monthly_hours(weekly_capacity_hours: Decimal) -> Decimal {
    (weekly_capacity_hours * WEEKS_PER_MONTH).round_dp(2)
}

/// Available hours in an average month for a member who counts toward
/// capacity; zero otherwise.
pub fn monthly_capacity(status: &str, weekly_capacity_hours: Decimal) -> Decimal {
    if counts_toward_capacity(status) {
        monthly_hours(weekly_capacity_hours)
    } else {
        Decimal::ZERO
    }
}

/// Monthly payroll cost of an employee.
///
/// Uses the annual salary when set, otherwise hourly rate × monthly
/// capacity. Contractors are paid through contractor cost entries and
/// inactive members cost nothing, so both yield zero.
pub fn monthly_payroll_cost(
    status: &str,
    hourly_rate: Decimal,
    annual_salary: Option<Decimal>,
    weekly_capacity_hours: Decimal,
) -> Decimal {
    if !counts_toward_capacity(status) {
        return Decimal::ZERO;
    }
    match annual_salary {
        Some(salary) if salary > Decimal::ZERO => (salary / Decimal::from(12)).round_dp(2),
        _ => (hourly_rate * monthly_capacity(status, weekly_capacity_hours)).round_dp(2),
    }
}

/// `"First Last"`, falling back to whichever part is present.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    let full = format!("{} {}", first_name.trim(), last_name.trim());
    full.trim().to_string()
}

/// Up to two uppercase initials from the first and last name.
pub fn initials(first_name: &str, last_name: &str) -> String {
    [first_name, last_name]
        .iter()
        .filter_map(|part| part.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
