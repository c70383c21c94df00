//! Dashboard metrics: revenue, costs, profit and utilization over a range.
//!
//! Callers assemble one [`MonthFigures`] per calendar month in the requested
//! range; [`compute`] sums them into range totals and groups them into
//! chart buckets. Every ratio has a defined zero when its denominator is
//! zero, so a tenant with no data yields a well-formed snapshot.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::YearMonth;
use crate::error::CoreError;

/// Longest range, in months, accepted by the metrics endpoint.
pub const MAX_RANGE_MONTHS: usize = 120;

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// `numerator / denominator * 100`, rounded to two places.
///
/// Returns zero when the denominator is zero.
pub fn percentage(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    (numerator / denominator * Decimal::ONE_HUNDRED).round_dp(2)
}

/// `total / count`, rounded to two places, or zero when `count` is zero.
pub fn average(total: Decimal, count: i64) -> Decimal {
    if count <= 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(2)
}

// ---------------------------------------------------------------------------
// Granularity
// ---------------------------------------------------------------------------

/// How the accompanying time series is bucketed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annual" => Ok(Self::Annual),
            other => Err(CoreError::Validation(format!(
                "Invalid granularity '{other}'. Must be one of: monthly, quarterly, annual"
            ))),
        }
    }
}

impl Granularity {
    /// Parse an optional query value; missing means monthly.
    pub fn parse_optional(value: Option<&str>) -> Result<Self, CoreError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.parse(),
            None => Ok(Self::default()),
        }
    }

    /// Bucket label for a month.
    pub fn label(self, month: YearMonth) -> String {
        match self {
            Self::Monthly => month.label(),
            Self::Quarterly => format!("Q{} {}", month.quarter(), month.year()),
            Self::Annual => month.year().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Raw figures for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFigures {
    pub period: YearMonth,
    pub booked_revenue: Decimal,
    pub forecast_revenue: Decimal,
    pub payroll_costs: Decimal,
    pub contractor_costs: Decimal,
    pub other_costs: Decimal,
    pub capacity_hours: Decimal,
    pub allocated_hours: Decimal,
}

impl MonthFigures {
    /// A month with every figure at zero.
    pub fn empty(period: YearMonth) -> Self {
        Self {
            period,
            booked_revenue: Decimal::ZERO,
            forecast_revenue: Decimal::ZERO,
            payroll_costs: Decimal::ZERO,
            contractor_costs: Decimal::ZERO,
            other_costs: Decimal::ZERO,
            capacity_hours: Decimal::ZERO,
            allocated_hours: Decimal::ZERO,
        }
    }

    pub fn revenue(&self) -> Decimal {
        self.booked_revenue + self.forecast_revenue
    }

    pub fn costs(&self) -> Decimal {
        self.payroll_costs + self.contractor_costs + self.other_costs
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Revenue split by certainty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RevenueBreakdown {
    pub total: Decimal,
    pub booked: Decimal,
    pub forecast: Decimal,
}

/// Operating costs split by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    pub total: Decimal,
    pub payroll: Decimal,
    pub contractor: Decimal,
    pub other: Decimal,
}

/// One point of the metrics time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsBucket {
    pub label: String,
    pub start: YearMonth,
    pub end: YearMonth,
    pub revenue: RevenueBreakdown,
    pub costs: CostBreakdown,
    pub profit: Decimal,
    pub profit_margin: Decimal,
    pub team_capacity: Decimal,
    pub allocated_hours: Decimal,
    pub utilization_rate: Decimal,
}

/// Range totals plus the bucketed series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub granularity: Granularity,
    pub revenue: RevenueBreakdown,
    pub costs: CostBreakdown,
    pub profit: Decimal,
    /// Profit as a percentage of revenue; 0 when there is no revenue.
    pub profit_margin: Decimal,
    pub team_capacity: Decimal,
    pub allocated_hours: Decimal,
    /// Allocated hours as a percentage of capacity; 0 without capacity.
    pub utilization_rate: Decimal,
    pub project_count: i64,
    /// Revenue per project; 0 when there are no projects.
    pub avg_project_value: Decimal,
    pub series: Vec<MetricsBucket>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Accumulator {
    revenue: RevenueBreakdown,
    costs: CostBreakdown,
    capacity: Decimal,
    allocated: Decimal,
}

impl Accumulator {
    fn add(&mut self, month: &MonthFigures) {
        self.revenue.booked += month.booked_revenue;
        self.revenue.forecast += month.forecast_revenue;
        self.revenue.total += month.revenue();
        self.costs.payroll += month.payroll_costs;
        self.costs.contractor += month.contractor_costs;
        self.costs.other += month.other_costs;
        self.costs.total += month.costs();
        self.capacity += month.capacity_hours;
        self.allocated += month.allocated_hours;
    }

    fn profit(&self) -> Decimal {
        self.revenue.total - self.costs.total
    }
}

/// Bucket key: months sharing a key land in the same series point.
fn bucket_key(granularity: Granularity, month: YearMonth) -> (i32, u32) {
    match granularity {
        Granularity::Monthly => (month.year(), month.month()),
        Granularity::Quarterly => (month.year(), month.quarter()),
        Granularity::Annual => (month.year(), 0),
    }
}

/// Sum monthly figures into a metrics snapshot.
///
/// `months` must be in calendar order. Totals are range sums and do not
/// depend on `granularity`; only `series` does.
pub fn compute(months: &[MonthFigures], project_count: i64, granularity: Granularity) -> Metrics {
    let mut total = Accumulator::default();
    let mut series: Vec<MetricsBucket> = Vec::new();
    let mut current: Option<((i32, u32), YearMonth, YearMonth, Accumulator)> = None;

    for month in months {
        total.add(month);

        let key = bucket_key(granularity, month.period);
        if let Some((_, _, end, acc)) = current.as_mut().filter(|(k, ..)| *k == key) {
            *end = month.period;
            acc.add(month);
            continue;
        }
        if let Some((_, start, end, acc)) = current.take() {
            series.push(finish_bucket(granularity, start, end, &acc));
        }
        let mut acc = Accumulator::default();
        acc.add(month);
        current = Some((key, month.period, month.period, acc));
    }
    if let Some((_, start, end, acc)) = current {
        series.push(finish_bucket(granularity, start, end, &acc));
    }

    let profit = total.profit();
    Metrics {
        granularity,
        revenue: total.revenue,
        costs: total.costs,
        profit,
        profit_margin: percentage(profit, total.revenue.total),
        team_capacity: total.capacity,
        allocated_hours: total.allocated,
        utilization_rate: percentage(total.allocated, total.capacity),
        project_count,
        avg_project_value: average(total.revenue.total, project_count),
        series,
    }
}

fn finish_bucket(
    granularity: Granularity,
    start: YearMonth,
    end: YearMonth,
    acc: &Accumulator,
) -> MetricsBucket {
    let profit = acc.profit();
    MetricsBucket {
        label: granularity.label(start),
        start,
        end,
        revenue: acc.revenue,
        costs: acc.costs,
        profit,
        profit_margin: percentage(profit, acc.revenue.total),
        team_capacity: acc.capacity,
        allocated_hours: acc.allocated,
        utilization_rate: percentage(acc.allocated, acc.capacity),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::months_between;

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn month(y: i32, m: u32, booked: i64, costs: i64, capacity: i64, allocated: i64) -> MonthFigures {
        MonthFigures {
            booked_revenue: Decimal::from(booked),
            payroll_costs: Decimal::from(costs),
            capacity_hours: Decimal::from(capacity),
            allocated_hours: Decimal::from(allocated),
            ..MonthFigures::empty(ym(y, m))
        }
    }

    // -- ratios --------------------------------------------------------------

    #[test]
    fn percentage_of_zero_denominator_is_zero() {
        assert_eq!(percentage(Decimal::from(5), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn percentage_rounds_to_two_places() {
        assert_eq!(
            percentage(Decimal::ONE, Decimal::from(3)),
            Decimal::new(3333, 2)
        );
    }

    #[test]
    fn average_of_zero_count_is_zero() {
        assert_eq!(average(Decimal::from(100), 0), Decimal::ZERO);
        assert_eq!(average(Decimal::from(100), 4), Decimal::from(25));
    }

    // -- granularity ---------------------------------------------------------

    #[test]
    fn granularity_parsing() {
        assert_eq!(Granularity::parse_optional(None).unwrap(), Granularity::Monthly);
        assert_eq!(
            Granularity::parse_optional(Some("quarterly")).unwrap(),
            Granularity::Quarterly
        );
        assert!(Granularity::parse_optional(Some("weekly")).is_err());
    }

    // -- compute -------------------------------------------------------------

    #[test]
    fn empty_range_yields_zeroes_not_errors() {
        let months: Vec<_> = months_between(ym(2025, 1), ym(2025, 3))
            .into_iter()
            .map(MonthFigures::empty)
            .collect();
        let m = compute(&months, 0, Granularity::Monthly);

        assert_eq!(m.revenue.total, Decimal::ZERO);
        assert_eq!(m.profit_margin, Decimal::ZERO);
        assert_eq!(m.utilization_rate, Decimal::ZERO);
        assert_eq!(m.avg_project_value, Decimal::ZERO);
        assert_eq!(m.series.len(), 3);
    }

    #[test]
    fn totals_and_ratios() {
        let months = vec![
            MonthFigures {
                forecast_revenue: Decimal::from(2_000),
                contractor_costs: Decimal::from(500),
                other_costs: Decimal::from(500),
                ..month(2025, 1, 8_000, 4_000, 200, 150)
            },
            month(2025, 2, 10_000, 5_000, 200, 50),
        ];
        let m = compute(&months, 4, Granularity::Monthly);

        assert_eq!(m.revenue.booked, Decimal::from(18_000));
        assert_eq!(m.revenue.forecast, Decimal::from(2_000));
        assert_eq!(m.revenue.total, Decimal::from(20_000));
        assert_eq!(m.costs.payroll, Decimal::from(9_000));
        assert_eq!(m.costs.total, Decimal::from(10_000));
        assert_eq!(m.profit, Decimal::from(10_000));
        assert_eq!(m.profit_margin, Decimal::from(50));
        assert_eq!(m.team_capacity, Decimal::from(400));
        assert_eq!(m.allocated_hours, Decimal::from(200));
        assert_eq!(m.utilization_rate, Decimal::from(50));
        assert_eq!(m.avg_project_value, Decimal::from(5_000));
    }

    #[test]
    fn loss_gives_negative_margin() {
        let m = compute(&[month(2025, 1, 1_000, 1_500, 0, 0)], 1, Granularity::Monthly);
        assert_eq!(m.profit, Decimal::from(-500));
        assert_eq!(m.profit_margin, Decimal::from(-50));
    }

    #[test]
    fn granularity_changes_series_not_totals() {
        let months: Vec<_> = months_between(ym(2024, 11), ym(2025, 7))
            .into_iter()
            .map(|p| month(p.year(), p.month(), 1_000, 400, 100, 60))
            .collect();

        let monthly = compute(&months, 2, Granularity::Monthly);
        let quarterly = compute(&months, 2, Granularity::Quarterly);
        let annual = compute(&months, 2, Granularity::Annual);

        assert_eq!(monthly.series.len(), 9);
        assert_eq!(quarterly.series.len(), 4);
        assert_eq!(annual.series.len(), 2);

        for m in [&quarterly, &annual] {
            assert_eq!(m.revenue, monthly.revenue);
            assert_eq!(m.costs, monthly.costs);
            assert_eq!(m.utilization_rate, monthly.utilization_rate);
        }

        let q = &quarterly.series;
        assert_eq!(q[0].label, "Q4 2024");
        assert_eq!(q[0].revenue.total, Decimal::from(2_000));
        assert_eq!(q[1].label, "Q1 2025");
        assert_eq!(q[1].start, ym(2025, 1));
        assert_eq!(q[1].end, ym(2025, 3));
        assert_eq!(q[3].label, "Q3 2025");
        assert_eq!(q[3].revenue.total, Decimal::from(1_000));

        let bucket_sum: Decimal = annual.series.iter().map(|b| b.revenue.total).sum();
        assert_eq!(bucket_sum, annual.revenue.total);
        assert_eq!(annual.series[0].label, "2024");
    }

    #[test]
    fn series_bucket_ratios_are_per_bucket() {
        let months = vec![month(2025, 1, 1_000, 0, 100, 100), month(2025, 2, 0, 0, 0, 0)];
        let m = compute(&months, 1, Granularity::Monthly);
        assert_eq!(m.series[0].utilization_rate, Decimal::from(100));
        assert_eq!(m.series[1].utilization_rate, Decimal::ZERO);
        assert_eq!(m.series[1].profit_margin, Decimal::ZERO);
    }

    #[test]
    fn metrics_serialize_numbers() {
        let m = compute(&[month(2025, 1, 1_000, 250, 100, 25)], 1, Granularity::Annual);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["granularity"], "annual");
        assert_eq!(json["profit_margin"].as_f64(), Some(75.0));
        assert_eq!(json["series"][0]["start"]["month"], 1);
    }
}
