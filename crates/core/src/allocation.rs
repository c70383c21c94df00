//! Allocation grid arithmetic.
//!
//! The grid is edited per (team member, week) but persisted per
//! (team member, year, month). Everything here is pure: parsing and
//! validating submitted hours, collapsing weekly cells into monthly rows,
//! and computing the totals shown beside the grid.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::YearMonth;
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Most hours a member can be booked on one project in one week.
pub const MAX_WEEKLY_HOURS: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Hours are entered in half-hour steps.
pub const HOURS_STEP: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Highest week ordinal a cell may carry.
pub const MAX_WEEK_OF_MONTH: u32 = 6;

/// Upper bound on cells accepted by a single save.
pub const MAX_CELLS_PER_SAVE: usize = 10_000;

/// Monthly rows are exposed in the grid under this week ordinal.
pub const MONTHLY_ROW_WEEK: u32 = 1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One validated grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationCell {
    pub team_member_id: DbId,
    pub period: YearMonth,
    pub week: u32,
    pub hours: Decimal,
}

/// Identifies one grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct WeekKey {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

/// Sum of hours in one grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekTotal {
    #[serde(flatten)]
    pub key: WeekKey,
    pub hours: Decimal,
}

/// Row, column and grand totals for a set of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllocationTotals {
    /// Hours per team member, keyed by member id.
    pub by_member: BTreeMap<DbId, Decimal>,
    /// Hours per week, in calendar order.
    pub by_week: Vec<WeekTotal>,
    pub grand_total: Decimal,
}

/// A monthly row ready to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyAllocation {
    pub team_member_id: DbId,
    pub period: YearMonth,
    pub hours: Decimal,
}

// ---------------------------------------------------------------------------
// Parsing and validation
// ---------------------------------------------------------------------------

/// Parse a submitted hours value.
///
/// Numbers and numeric strings are accepted; anything that does not parse
/// (empty strings, text, `null`, booleans) is treated as zero hours.
pub fn parse_hours(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .unwrap_or(Decimal::ZERO),
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Check that weekly hours lie in `[0, MAX_WEEKLY_HOURS]` on a half-hour step.
pub fn validate_hours(hours: Decimal) -> Result<Decimal, CoreError> {
    if hours < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "Hours must not be negative, got {hours}"
        )));
    }
    if hours > MAX_WEEKLY_HOURS {
        return Err(CoreError::Validation(format!(
            "Hours must not exceed {MAX_WEEKLY_HOURS} per week, got {hours}"
        )));
    }
    if !(hours % HOURS_STEP).is_zero() {
        return Err(CoreError::Validation(format!(
            "Hours must be a multiple of {HOURS_STEP}, got {hours}"
        )));
    }
    Ok(hours.normalize())
}

/// Build a validated cell from raw request values.
pub fn parse_cell(
    team_member_id: DbId,
    year: i32,
    month: u32,
    week: Option<u32>,
    hours: &serde_json::Value,
) -> Result<AllocationCell, CoreError> {
    let period = YearMonth::new(year, month)?;
    let week = week.unwrap_or(MONTHLY_ROW_WEEK);
    if !(1..=MAX_WEEK_OF_MONTH).contains(&week) {
        return Err(CoreError::Validation(format!(
            "week must be between 1 and {MAX_WEEK_OF_MONTH}, got {week}"
        )));
    }
    let hours = validate_hours(parse_hours(hours))?;
    Ok(AllocationCell {
        team_member_id,
        period,
        week,
        hours,
    })
}

/// Reject oversized submissions before any per-cell work.
pub fn validate_cell_count(count: usize) -> Result<(), CoreError> {
    if count > MAX_CELLS_PER_SAVE {
        return Err(CoreError::Validation(format!(
            "A save may contain at most {MAX_CELLS_PER_SAVE} cells, got {count}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-member, per-week and grand totals.
///
/// The save response and the grid read both go through this function so the
/// figures can never drift apart.
pub fn totals(cells: &[AllocationCell]) -> AllocationTotals {
    let mut by_member: BTreeMap<DbId, Decimal> = BTreeMap::new();
    let mut by_week: BTreeMap<WeekKey, Decimal> = BTreeMap::new();
    let mut grand_total = Decimal::ZERO;

    for cell in cells {
        *by_member.entry(cell.team_member_id).or_default() += cell.hours;
        let key = WeekKey {
            year: cell.period.year(),
            month: cell.period.month(),
            week: cell.week,
        };
        *by_week.entry(key).or_default() += cell.hours;
        grand_total += cell.hours;
    }

    AllocationTotals {
        by_member,
        by_week: by_week
            .into_iter()
            .map(|(key, hours)| WeekTotal { key, hours })
            .collect(),
        grand_total,
    }
}

/// Collapse weekly cells into one row per (member, year, month).
///
/// Months that sum to zero are dropped; the result is ordered by member then
/// month.
pub fn collapse_to_monthly(cells: &[AllocationCell]) -> Vec<MonthlyAllocation> {
    let mut sums: BTreeMap<(DbId, YearMonth), Decimal> = BTreeMap::new();
    for cell in cells {
        *sums.entry((cell.team_member_id, cell.period)).or_default() += cell.hours;
    }
    sums.into_iter()
        .filter(|(_, hours)| !hours.is_zero())
        .map(|((team_member_id, period), hours)| MonthlyAllocation {
            team_member_id,
            period,
            hours,
        })
        .collect()
}

/// Hours still unallocated against a project's target.
///
/// Negative when the project is over-allocated; `None` when no target is set.
pub fn remaining_hours(target: Option<Decimal>, allocated: Decimal) -> Option<Decimal> {
    target.map(|t| t - allocated)
}

/// Key used by the grid's allocation map: `"{member}_{year}_{month}_{week}"`.
pub fn cell_key(team_member_id: DbId, year: i32, month: u32, week: u32) -> String {
    format!("{team_member_id}_{year}_{month}_{week}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
