//! Gathers per-month figures from the repositories for the dashboard,
//! revenue chart and capacity snapshot handlers.

use std::collections::BTreeMap;

use agency_core::calendar::{months_between, YearMonth};
use agency_core::cost::{amount_for_month, COST_CONTRACTOR, COST_OTHER, COST_PAYROLL};
use agency_core::metrics::{percentage, MonthFigures};
use agency_core::revenue::{REVENUE_BOOKED, REVENUE_FORECAST};
use agency_core::team::{counts_toward_capacity, monthly_capacity, monthly_payroll_cost};
use agency_core::types::DbId;
use agency_db::models::capacity_snapshot::NewCapacitySnapshot;
use agency_db::models::team_member::TeamMember;
use agency_db::repositories::{AllocationRepo, CostRepo, MonthlyRevenueRepo, TeamMemberRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Largest value the `capacity_snapshots.utilization_rate` column holds.
// 999_999_999_999 with scale 2 (9_999_999_999.99); `Decimal::new` is not const.
pub const MAX_STORED_UTILIZATION: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// One [`MonthFigures`] per calendar month in `[from, to]`, oldest first.
///
/// Member payroll and capacity use current member rows for every month;
/// cost rows are prorated month by month.
pub async fn month_figures(
    pool: &PgPool,
    company_id: DbId,
    from: YearMonth,
    to: YearMonth,
) -> Result<Vec<MonthFigures>, sqlx::Error> {
    let members = TeamMemberRepo::list_by_company(pool, company_id).await?;
    let costs =
        CostRepo::list_active_between(pool, company_id, from.first_day(), to.last_day()).await?;
    let revenue = MonthlyRevenueRepo::totals_by_month(pool, company_id, from, to).await?;
    let hours = AllocationRepo::monthly_hours_for_company(pool, company_id, from, to).await?;

    let payroll = member_payroll(&members);
    let capacity = member_capacity(&members);

    let mut by_month: BTreeMap<YearMonth, MonthFigures> = months_between(from, to)
        .into_iter()
        .map(|period| {
            let figures = MonthFigures {
                payroll_costs: payroll,
                capacity_hours: capacity,
                ..MonthFigures::empty(period)
            };
            (period, figures)
        })
        .collect();

    for row in revenue {
        let Some(figures) =
            YearMonth::from_row(row.year, row.month).and_then(|p| by_month.get_mut(&p))
        else {
            continue;
        };
        match row.revenue_type.as_str() {
            REVENUE_BOOKED => figures.booked_revenue += row.revenue,
            REVENUE_FORECAST => figures.forecast_revenue += row.revenue,
            other => tracing::warn!(revenue_type = other, "Skipping unknown revenue type"),
        }
    }

    for row in hours {
        if let Some(figures) =
            YearMonth::from_row(row.year, row.month).and_then(|p| by_month.get_mut(&p))
        {
            figures.allocated_hours += row.hours;
        }
    }

    for figures in by_month.values_mut() {
        for cost in &costs {
            let amount = amount_for_month(
                cost.amount,
                &cost.frequency,
                cost.is_active,
                cost.start_date,
                cost.end_date,
                figures.period,
            );
            match cost.cost_type.as_str() {
                COST_PAYROLL => figures.payroll_costs += amount,
                COST_CONTRACTOR => figures.contractor_costs += amount,
                COST_OTHER => figures.other_costs += amount,
                other => tracing::warn!(cost_type = other, "Skipping unknown cost type"),
            }
        }
    }

    Ok(by_month.into_values().collect())
}

/// Compute the capacity snapshot for one company month.
pub async fn capacity_snapshot(
    pool: &PgPool,
    company_id: DbId,
    period: YearMonth,
) -> Result<NewCapacitySnapshot, sqlx::Error> {
    let members = TeamMemberRepo::list_by_company(pool, company_id).await?;
    let allocated: Decimal =
        AllocationRepo::monthly_hours_for_company(pool, company_id, period, period)
            .await?
            .iter()
            .map(|row| row.hours)
            .sum();
    let capacity = member_capacity(&members);
    let counted = members
        .iter()
        .filter(|m| counts_toward_capacity(&m.status))
        .count();

    Ok(NewCapacitySnapshot {
        year: period.year(),
        month: period.month() as i32,
        team_member_count: i32::try_from(counted).unwrap_or(i32::MAX),
        total_capacity_hours: capacity,
        allocated_hours: allocated,
        utilization_rate: percentage(allocated, capacity).min(MAX_STORED_UTILIZATION),
    })
}

fn member_payroll(members: &[TeamMember]) -> Decimal {
    members
        .iter()
        .map(|m| {
            monthly_payroll_cost(
                &m.status,
                m.hourly_rate,
                m.annual_salary,
                m.weekly_capacity_hours,
            )
        })
        .sum()
}

fn member_capacity(members: &[TeamMember]) -> Decimal {
    members
        .iter()
        .map(|m| monthly_capacity(&m.status, m.weekly_capacity_hours))
        .sum()
}
