//! Calendar helpers: month keys, Sunday-aligned weeks and date parameters.
//!
//! Allocations are persisted per calendar month while the editing grid is
//! laid out per week. A week always starts on Sunday and is attributed to the
//! month its Sunday falls in, even when it runs into the next month.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Short month names indexed by `month - 1`.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Earliest year accepted for allocation and revenue rows.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted for allocation and revenue rows.
pub const MAX_YEAR: i32 = 9999;

/// Weekly capacity hours are converted to monthly with this factor
/// (52 weeks / 12 months, rounded).
pub const WEEKS_PER_MONTH: rust_decimal::Decimal = rust_decimal::Decimal::from_parts(433, 0, 0, false, 2);

// ---------------------------------------------------------------------------
// YearMonth
// ---------------------------------------------------------------------------

/// A calendar month, stored as its first day so every value is a real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "YearMonthParts")]
pub struct YearMonth(NaiveDate);

/// Wire shape of a [`YearMonth`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YearMonthParts {
    pub year: i32,
    pub month: u32,
}

impl From<YearMonth> for YearMonthParts {
    fn from(value: YearMonth) -> Self {
        Self {
            year: value.year(),
            month: value.month(),
        }
    }
}

impl YearMonth {
    /// Build a month key, rejecting months outside 1–12 and years outside
    /// [`MIN_YEAR`]..=[`MAX_YEAR`].
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CoreError::Validation(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
            )));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| {
                CoreError::Validation(format!("month must be between 1 and 12, got {month}"))
            })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Quarter number, 1–4.
    pub fn quarter(self) -> u32 {
        (self.month() - 1) / 3 + 1
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Last day of the month.
    pub fn last_day(self) -> NaiveDate {
        match self.next() {
            Some(next) => next.0 - Duration::days(1),
            None => NaiveDate::MAX,
        }
    }

    /// The following month, or `None` at the end of the representable range.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// The preceding month, or `None` at the start of the representable range.
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Self)
    }

    /// Whether `date` falls inside this month.
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::from_date(date) == self
    }

    /// Label such as `"Jan 2025"`.
    pub fn label(self) -> String {
        format!("{} {}", month_abbreviation(self.month()), self.year())
    }

    /// Months since year 0, used for range comparisons on `(year, month)`
    /// columns (`year * 12 + month - 1`).
    pub fn ordinal(self) -> i32 {
        self.year() * 12 + self.month() as i32 - 1
    }

    /// Month key for a database row's `year`/`month` integers.
    pub fn from_row(year: i32, month: i32) -> Option<Self> {
        u32::try_from(month)
            .ok()
            .and_then(|m| NaiveDate::from_ymd_opt(year, m, 1))
            .map(Self)
    }
}

/// Short name for a month number (1–12). Out-of-range values yield `"?"`.
pub fn month_abbreviation(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBREVIATIONS.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Every month from `from` through `to`, inclusive. Empty when `to < from`.
pub fn months_between(from: YearMonth, to: YearMonth) -> Vec<YearMonth> {
    let mut months = Vec::new();
    let mut current = Some(from);
    while let Some(month) = current {
        if month > to {
            break;
        }
        months.push(month);
        current = month.next();
    }
    months
}

/// The `count` months ending at (and including) `last`, oldest first.
pub fn trailing_months(last: YearMonth, count: usize) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(count);
    let mut current = Some(last);
    while let Some(month) = current {
        if months.len() == count {
            break;
        }
        months.push(month);
        current = month.prev();
    }
    months.reverse();
    months
}

// ---------------------------------------------------------------------------
// Weeks
// ---------------------------------------------------------------------------

/// One column of the allocation grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Week {
    /// Sunday the week starts on.
    pub start_date: NaiveDate,
    /// Saturday the week ends on.
    pub end_date: NaiveDate,
    /// Year of `start_date`.
    pub year: i32,
    /// Month of `start_date`; the week is booked against this month.
    pub month: u32,
    /// Ordinal of `start_date` among the Sundays of its month (1–5).
    pub week: u32,
    /// Display label, e.g. `"Jan 5"`.
    pub label: String,
}

impl Week {
    fn starting(sunday: NaiveDate) -> Self {
        Self {
            start_date: sunday,
            end_date: sunday + Duration::days(6),
            year: sunday.year(),
            month: sunday.month(),
            week: week_of_month(sunday),
            label: format!("{} {}", month_abbreviation(sunday.month()), sunday.day()),
        }
    }

    /// Whether `date` falls on one of this week's seven days.
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start_date..=self.end_date).contains(&date)
    }
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Ordinal of a day's week within its month, counting from the 1st.
pub fn week_of_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// Enumerate the grid weeks for a project.
///
/// Starts at the Sunday on or before `start` and ends with the week that
/// contains `end`. Returns an empty list when either date is missing or the
/// span is inverted.
pub fn project_weeks(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<Week> {
    let (Some(start), Some(end)) = (start, end) else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }

    let mut weeks = Vec::new();
    let mut sunday = week_start(start);
    while sunday <= end {
        weeks.push(Week::starting(sunday));
        sunday += Duration::days(7);
    }
    weeks
}

// ---------------------------------------------------------------------------
// Date parameters
// ---------------------------------------------------------------------------

/// Parse a required `YYYY-MM-DD` parameter.
pub fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate, CoreError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::Validation(format!("{field} is required")))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!(
            "{field} must be a date in YYYY-MM-DD format, got '{raw}'"
        ))
    })
}

/// Validate a reporting range and return its first and last month.
///
/// The range must not be inverted and may cover at most `max_months` months.
pub fn validate_month_range(
    start: NaiveDate,
    end: NaiveDate,
    max_months: usize,
) -> Result<(YearMonth, YearMonth), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "end_date {end} is before start_date {start}"
        )));
    }
    let from = YearMonth::from_date(start);
    let to = YearMonth::from_date(end);
    let span = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32 + 1;
    if span as usize > max_months {
        return Err(CoreError::Validation(format!(
            "Date range covers {span} months; at most {max_months} are allowed"
        )));
    }
    Ok((from, to))
}

/// Validate that a project's end date is not before its start date.
pub fn validate_project_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(CoreError::Validation(format!(
            "end_date {e} is before start_date {s}"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -- YearMonth -----------------------------------------------------------

    #[test]
    fn year_month_rejects_month_thirteen() {
        assert!(YearMonth::new(2025, 13).is_err());
        assert!(YearMonth::new(2025, 0).is_err());
    }

    #[test]
    fn year_month_rejects_absurd_year() {
        assert!(YearMonth::new(42, 1).is_err());
    }

    #[test]
    fn last_day_handles_leap_february() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.last_day(), date(2024, 2, 29));
    }

    #[test]
    fn next_rolls_over_year() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), Some(YearMonth::new(2025, 1).unwrap()));
    }

    #[test]
    fn quarter_boundaries() {
        assert_eq!(YearMonth::new(2025, 3).unwrap().quarter(), 1);
        assert_eq!(YearMonth::new(2025, 4).unwrap().quarter(), 2);
        assert_eq!(YearMonth::new(2025, 12).unwrap().quarter(), 4);
    }

    #[test]
    fn months_between_is_inclusive() {
        let from = YearMonth::new(2024, 11).unwrap();
        let to = YearMonth::new(2025, 2).unwrap();
        let months: Vec<_> = months_between(from, to)
            .into_iter()
            .map(|m| (m.year(), m.month()))
            .collect();
        assert_eq!(months, vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]);
    }

    #[test]
    fn months_between_empty_when_inverted() {
        let from = YearMonth::new(2025, 3).unwrap();
        let to = YearMonth::new(2025, 1).unwrap();
        assert!(months_between(from, to).is_empty());
    }

    #[test]
    fn trailing_months_ends_at_last() {
        let last = YearMonth::new(2025, 2).unwrap();
        let months = trailing_months(last, 3);
        assert_eq!(months.first().unwrap().month(), 12);
        assert_eq!(months.last().copied(), Some(last));
    }

    #[test]
    fn ordinal_is_contiguous_across_years() {
        let dec = YearMonth::new(2024, 12).unwrap();
        let jan = YearMonth::new(2025, 1).unwrap();
        assert_eq!(jan.ordinal() - dec.ordinal(), 1);
    }

    #[test]
    fn from_row_rejects_bad_month() {
        assert_eq!(YearMonth::from_row(2025, 3), YearMonth::new(2025, 3).ok());
        assert!(YearMonth::from_row(2025, 0).is_none());
        assert!(YearMonth::from_row(2025, -4).is_none());
    }

    #[test]
    fn year_month_serializes_as_parts() {
        let json = serde_json::to_value(YearMonth::new(2025, 7).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"year": 2025, "month": 7}));
    }

    // -- Weeks ---------------------------------------------------------------

    #[test]
    fn week_start_of_sunday_is_itself() {
        assert_eq!(week_start(date(2025, 1, 5)), date(2025, 1, 5));
    }

    #[test]
    fn week_start_of_saturday_goes_back_six_days() {
        assert_eq!(week_start(date(2025, 1, 11)), date(2025, 1, 5));
    }

    #[test]
    fn project_weeks_cover_start_and_end() {
        let start = date(2025, 1, 6);
        let end = date(2025, 1, 19);
        let weeks = project_weeks(Some(start), Some(end));

        assert_eq!(weeks.len(), 3);
        let first = weeks.first().unwrap();
        assert_eq!(first.start_date, date(2025, 1, 5));
        assert_eq!(first.start_date.weekday(), Weekday::Sun);
        assert!(first.start_date <= start);
        assert!(weeks.last().unwrap().contains(end));
        assert_eq!(
            weeks.iter().map(|w| w.week).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn project_weeks_hold_for_every_start_weekday() {
        for offset in 0..14 {
            let start = date(2025, 3, 1) + Duration::days(offset);
            for len in [0, 1, 6, 7, 30, 61] {
                let end = start + Duration::days(len);
                let weeks = project_weeks(Some(start), Some(end));
                let first = weeks.first().unwrap();
                assert_eq!(first.start_date.weekday(), Weekday::Sun);
                assert!(first.start_date <= start && start <= first.end_date);
                assert!(weeks.last().unwrap().contains(end));
                for pair in weeks.windows(2) {
                    assert_eq!(pair[1].start_date - pair[0].start_date, Duration::days(7));
                }
            }
        }
    }

    #[test]
    fn week_spanning_month_boundary_belongs_to_sunday_month() {
        let weeks = project_weeks(Some(date(2025, 1, 27)), Some(date(2025, 2, 3)));
        let first = &weeks[0];
        assert_eq!(first.start_date, date(2025, 1, 26));
        assert_eq!((first.year, first.month, first.week), (2025, 1, 4));
        assert_eq!((weeks[1].month, weeks[1].week), (2, 1));
    }

    #[test]
    fn week_spanning_year_boundary_belongs_to_december() {
        let weeks = project_weeks(Some(date(2025, 1, 1)), Some(date(2025, 1, 2)));
        assert_eq!(weeks.len(), 1);
        assert_eq!((weeks[0].year, weeks[0].month, weeks[0].week), (2024, 12, 5));
    }

    #[test]
    fn project_weeks_empty_without_dates() {
        assert!(project_weeks(None, Some(date(2025, 1, 1))).is_empty());
        assert!(project_weeks(Some(date(2025, 1, 1)), None).is_empty());
        assert!(project_weeks(Some(date(2025, 2, 1)), Some(date(2025, 1, 1))).is_empty());
    }

    #[test]
    fn week_label_uses_start_day() {
        let weeks = project_weeks(Some(date(2025, 1, 6)), Some(date(2025, 1, 6)));
        assert_eq!(weeks[0].label, "Jan 5");
    }

    // -- Parameters ----------------------------------------------------------

    #[test]
    fn parse_date_requires_value() {
        assert!(parse_date("start_date", None).is_err());
        assert!(parse_date("start_date", Some("  ")).is_err());
    }

    #[test]
    fn parse_date_rejects_bad_format() {
        let err = parse_date("start_date", Some("01/06/2025")).unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn parse_date_accepts_iso() {
        assert_eq!(
            parse_date("start_date", Some("2025-01-06")).unwrap(),
            date(2025, 1, 6)
        );
    }

    #[test]
    fn month_range_rejects_inverted_dates() {
        assert!(validate_month_range(date(2025, 2, 1), date(2025, 1, 1), 120).is_err());
    }

    #[test]
    fn month_range_enforces_limit() {
        assert!(validate_month_range(date(2025, 1, 1), date(2025, 12, 31), 12).is_ok());
        assert!(validate_month_range(date(2025, 1, 1), date(2026, 1, 1), 12).is_err());
    }

    #[test]
    fn project_dates_allow_missing_values() {
        assert!(validate_project_dates(None, None).is_ok());
        assert!(validate_project_dates(Some(date(2025, 1, 1)), None).is_ok());
        assert!(validate_project_dates(Some(date(2025, 2, 1)), Some(date(2025, 1, 1))).is_err());
    }
}
