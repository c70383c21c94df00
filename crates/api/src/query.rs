//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?year=` filter used by revenue, snapshot and chart endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct YearParams {
    pub year: Option<i32>,
}

/// `?year=&month=` selecting one calendar month; both default to today.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// `?active_only=` flag for cost listings.
#[derive(Debug, Deserialize)]
pub struct ActiveOnlyParams {
    #[serde(default)]
    pub active_only: bool,
}
