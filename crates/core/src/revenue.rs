//! Revenue types and the yearly revenue chart.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::{months_between, YearMonth, MONTH_ABBREVIATIONS};
use crate::error::CoreError;
use crate::validation::validate_one_of;

pub const REVENUE_BOOKED: &str = "booked";
pub const REVENUE_FORECAST: &str = "forecast";

/// All valid revenue type values.
pub const VALID_REVENUE_TYPES: &[&str] = &[REVENUE_BOOKED, REVENUE_FORECAST];

pub fn validate_revenue_type(revenue_type: &str) -> Result<(), CoreError> {
    validate_one_of(revenue_type, VALID_REVENUE_TYPES, "revenue type")
}

/// Where the chart's revenue figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueSource {
    /// Recorded monthly revenue rows.
    MonthlyRevenue,
    /// Project totals spread across their date spans.
    Projects,
}

/// Twelve monthly points for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueChart {
    pub year: i32,
    pub months: Vec<&'static str>,
    pub booked: Vec<Decimal>,
    pub forecast: Vec<Decimal>,
    pub combined: Vec<Decimal>,
    pub expenses: Vec<Decimal>,
    pub total_booked: Decimal,
    pub total_forecast: Decimal,
    pub total_expenses: Decimal,
    pub data_source: RevenueSource,
}

/// Accumulates per-month revenue for a single year.
#[derive(Debug, Clone)]
pub struct YearRevenue {
    year: i32,
    booked: [Decimal; 12],
    forecast: [Decimal; 12],
}

impl YearRevenue {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            booked: [Decimal::ZERO; 12],
            forecast: [Decimal::ZERO; 12],
        }
    }

    /// Add an amount to a month. Months outside 1–12 and unknown revenue
    /// types are ignored.
    pub fn add(&mut self, month: u32, revenue_type: &str, amount: Decimal) {
        let Some(slot) = month.checked_sub(1).map(|m| m as usize).filter(|m| *m < 12) else {
            return;
        };
        match revenue_type {
            REVENUE_BOOKED => self.booked[slot] += amount,
            REVENUE_FORECAST => self.forecast[slot] += amount,
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.booked.iter().chain(self.forecast.iter()).all(Decimal::is_zero)
    }

    /// Spread a project's total evenly over the months of its date span that
    /// fall in this year. The span is clipped to the year before dividing.
    pub fn distribute_project(
        &mut self,
        total: Decimal,
        revenue_type: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) {
        let (Some(start), Some(end)) = (start, end) else {
            return;
        };
        let (Ok(year_start), Ok(year_end)) =
            (YearMonth::new(self.year, 1), YearMonth::new(self.year, 12))
        else {
            return;
        };
        let first = YearMonth::from_date(start).max(year_start);
        let last = YearMonth::from_date(end).min(year_end);
        let months = months_between(first, last);
        if months.is_empty() {
            return;
        }
        let share = (total / Decimal::from(months.len())).round_dp(2);
        let revenue_type = if revenue_type == REVENUE_FORECAST {
            REVENUE_FORECAST
        } else {
            REVENUE_BOOKED
        };
        for month in months {
            self.add(month.month(), revenue_type, share);
        }
    }

    /// Finish the chart with per-month expenses.
    pub fn into_chart(self, expenses: [Decimal; 12], data_source: RevenueSource) -> RevenueChart {
        let combined: Vec<Decimal> = self
            .booked
            .iter()
            .zip(self.forecast.iter())
            .map(|(b, f)| b + f)
            .collect();
        RevenueChart {
            year: self.year,
            months: MONTH_ABBREVIATIONS.to_vec(),
            total_booked: self.booked.iter().sum(),
            total_forecast: self.forecast.iter().sum(),
            total_expenses: expenses.iter().sum(),
            booked: self.booked.to_vec(),
            forecast: self.forecast.to_vec(),
            combined,
            expenses: expenses.to_vec(),
            data_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validates_revenue_type() {
        assert!(validate_revenue_type(REVENUE_FORECAST).is_ok());
        assert!(validate_revenue_type("maybe").is_err());
    }

    #[test]
    fn add_ignores_out_of_range_month_and_unknown_type() {
        let mut year = YearRevenue::new(2025);
        year.add(0, REVENUE_BOOKED, Decimal::ONE);
        year.add(13, REVENUE_BOOKED, Decimal::ONE);
        year.add(3, "other", Decimal::ONE);
        assert!(year.is_empty());
    }

    #[test]
    fn distributes_evenly_over_months_in_year() {
        let mut year = YearRevenue::new(2025);
        year.distribute_project(
            Decimal::from(9_000),
            REVENUE_FORECAST,
            Some(date(2025, 2, 10)),
            Some(date(2025, 4, 5)),
        );
        let chart = year.into_chart([Decimal::ZERO; 12], RevenueSource::Projects);
        assert_eq!(chart.forecast[0], Decimal::ZERO);
        assert_eq!(chart.forecast[1], Decimal::from(3_000));
        assert_eq!(chart.forecast[3], Decimal::from(3_000));
        assert_eq!(chart.total_forecast, Decimal::from(9_000));
        assert_eq!(chart.total_booked, Decimal::ZERO);
    }

    #[test]
    fn distribution_clips_to_year() {
        let mut year = YearRevenue::new(2025);
        year.distribute_project(
            Decimal::from(1_200),
            REVENUE_BOOKED,
            Some(date(2024, 6, 1)),
            Some(date(2025, 3, 31)),
        );
        let chart = year.into_chart([Decimal::ZERO; 12], RevenueSource::Projects);
        // Clipped to January through March 2025.
        assert_eq!(chart.booked[0], Decimal::from(400));
        assert_eq!(chart.booked[2], Decimal::from(400));
        assert_eq!(chart.booked[3], Decimal::ZERO);
        assert_eq!(chart.total_booked, Decimal::from(1_200));
    }

    #[test]
    fn project_crossing_year_start_keeps_full_total_in_year() {
        let mut year = YearRevenue::new(2025);
        year.distribute_project(
            Decimal::from(4_000),
            REVENUE_BOOKED,
            Some(date(2024, 11, 1)),
            Some(date(2025, 2, 28)),
        );
        let chart = year.into_chart([Decimal::ZERO; 12], RevenueSource::Projects);
        assert_eq!(chart.booked[0], Decimal::from(2_000));
        assert_eq!(chart.booked[1], Decimal::from(2_000));
        assert_eq!(chart.total_booked, Decimal::from(4_000));
    }

    #[test]
    fn undated_or_disjoint_projects_are_skipped() {
        let mut year = YearRevenue::new(2025);
        year.distribute_project(Decimal::from(100), REVENUE_BOOKED, None, None);
        year.distribute_project(
            Decimal::from(100),
            REVENUE_BOOKED,
            Some(date(2023, 1, 1)),
            Some(date(2023, 12, 31)),
        );
        assert!(year.is_empty());
    }

    #[test]
    fn chart_combines_series() {
        let mut year = YearRevenue::new(2025);
        year.add(1, REVENUE_BOOKED, Decimal::from(10_000));
        year.add(1, REVENUE_FORECAST, Decimal::from(5_000));
        let mut expenses = [Decimal::ZERO; 12];
        expenses[0] = Decimal::from(7_000);
        let chart = year.into_chart(expenses, RevenueSource::MonthlyRevenue);

        assert_eq!(chart.months.len(), 12);
        assert_eq!(chart.months[0], "Jan");
        assert_eq!(chart.combined[0], Decimal::from(15_000));
        assert_eq!(chart.total_expenses, Decimal::from(7_000));
        assert_eq!(
            serde_json::to_value(chart.data_source).unwrap(),
            "monthly_revenue"
        );
    }
}
