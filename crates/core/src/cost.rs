//! Operating cost categories, billing frequencies and monthly proration.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::YearMonth;
use crate::error::CoreError;
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Cost types
// ---------------------------------------------------------------------------

pub const COST_PAYROLL: &str = "payroll";
pub const COST_CONTRACTOR: &str = "contractor";
pub const COST_OTHER: &str = "other";

/// All valid cost type values.
pub const VALID_COST_TYPES: &[&str] = &[COST_PAYROLL, COST_CONTRACTOR, COST_OTHER];

pub fn validate_cost_type(cost_type: &str) -> Result<(), CoreError> {
    validate_one_of(cost_type, VALID_COST_TYPES, "cost type")
}

// ---------------------------------------------------------------------------
// Frequencies
// ---------------------------------------------------------------------------

pub const FREQ_ONE_TIME: &str = "one_time";
pub const FREQ_WEEKLY: &str = "weekly";
pub const FREQ_MONTHLY: &str = "monthly";
pub const FREQ_QUARTERLY: &str = "quarterly";
pub const FREQ_ANNUAL: &str = "annual";

/// All valid frequency values.
pub const VALID_FREQUENCIES: &[&str] = &[
    FREQ_ONE_TIME,
    FREQ_WEEKLY,
    FREQ_MONTHLY,
    FREQ_QUARTERLY,
    FREQ_ANNUAL,
];

pub fn validate_frequency(frequency: &str) -> Result<(), CoreError> {
    validate_one_of(frequency, VALID_FREQUENCIES, "frequency")
}

// ---------------------------------------------------------------------------
// Proration
// ---------------------------------------------------------------------------

/// Monthly equivalent of a recurring amount.
///
/// One-time amounts are returned unchanged; callers decide which month they
/// land in.
pub fn monthly_equivalent(amount: Decimal, frequency: &str) -> Decimal {
    let monthly = match frequency {
        FREQ_WEEKLY => amount * Decimal::from(52) / Decimal::from(12),
        FREQ_QUARTERLY => amount / Decimal::from(3),
        FREQ_ANNUAL => amount / Decimal::from(12),
        _ => amount,
    };
    monthly.round_dp(2)
}

/// Whether a cost is in effect at some point during `month`.
pub fn is_active_in_month(
    is_active: bool,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    month: YearMonth,
) -> bool {
    is_active
        && start_date <= month.last_day()
        && end_date.is_none_or(|end| end >= month.first_day())
}

/// What a cost contributes to `month`.
///
/// Recurring costs contribute their monthly equivalent for every month they
/// are active in; one-time costs contribute their full amount in the month
/// of their start date only.
pub fn amount_for_month(
    amount: Decimal,
    frequency: &str,
    is_active: bool,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    month: YearMonth,
) -> Decimal {
    if !is_active_in_month(is_active, start_date, end_date, month) {
        return Decimal::ZERO;
    }
    if frequency == FREQ_ONE_TIME {
        return if month.contains(start_date) {
            amount
        } else {
            Decimal::ZERO
        };
    }
    monthly_equivalent(amount, frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    #[test]
    fn validates_types_and_frequencies() {
        assert!(validate_cost_type(COST_CONTRACTOR).is_ok());
        assert!(validate_cost_type("rent").is_err());
        assert!(validate_frequency(FREQ_QUARTERLY).is_ok());
        assert!(validate_frequency("daily").is_err());
    }

    #[test]
    fn monthly_equivalents() {
        let amount = Decimal::from(1200);
        assert_eq!(monthly_equivalent(amount, FREQ_MONTHLY), Decimal::from(1200));
        assert_eq!(monthly_equivalent(amount, FREQ_ANNUAL), Decimal::from(100));
        assert_eq!(monthly_equivalent(amount, FREQ_QUARTERLY), Decimal::from(400));
        assert_eq!(monthly_equivalent(amount, FREQ_WEEKLY), Decimal::from(5200));
    }

    #[test]
    fn cost_outside_its_window_contributes_nothing() {
        let start = date(2025, 3, 15);
        let end = Some(date(2025, 5, 1));
        let amount = Decimal::from(100);
        assert_eq!(
            amount_for_month(amount, FREQ_MONTHLY, true, start, end, ym(2025, 2)),
            Decimal::ZERO
        );
        assert_eq!(
            amount_for_month(amount, FREQ_MONTHLY, true, start, end, ym(2025, 3)),
            amount
        );
        assert_eq!(
            amount_for_month(amount, FREQ_MONTHLY, true, start, end, ym(2025, 5)),
            amount
        );
        assert_eq!(
            amount_for_month(amount, FREQ_MONTHLY, true, start, end, ym(2025, 6)),
            Decimal::ZERO
        );
    }

    #[test]
    fn inactive_cost_contributes_nothing() {
        assert_eq!(
            amount_for_month(
                Decimal::from(100),
                FREQ_MONTHLY,
                false,
                date(2025, 1, 1),
                None,
                ym(2025, 2)
            ),
            Decimal::ZERO
        );
    }

    #[test]
    fn one_time_cost_lands_in_start_month_only() {
        let start = date(2025, 4, 20);
        let amount = Decimal::from(5000);
        assert_eq!(
            amount_for_month(amount, FREQ_ONE_TIME, true, start, None, ym(2025, 4)),
            amount
        );
        assert_eq!(
            amount_for_month(amount, FREQ_ONE_TIME, true, start, None, ym(2025, 5)),
            Decimal::ZERO
        );
    }
}
