//! Company dashboard, revenue chart and the per-member dashboards.
//!
//! All figures are computed on read from the current rows; nothing here
//! writes.

use agency_core::calendar::{parse_date, trailing_months, validate_month_range, YearMonth};
use agency_core::metrics::{compute, percentage, Granularity, Metrics, MAX_RANGE_MONTHS};
use agency_core::project::{
    allocation_percentage, AllocationHealth, OPEN_PROJECT_STATUSES, PROJECT_ACTIVE,
    PROJECT_COMPLETED,
};
use agency_core::revenue::{RevenueChart, RevenueSource, YearRevenue};
use agency_core::team::{display_name, monthly_hours};
use agency_core::types::DbId;
use agency_db::models::allocation::MemberProjectHours;
use agency_db::models::project::ProjectFilter;
use agency_db::repositories::{AllocationRepo, MonthlyRevenueRepo, ProjectRepo};
use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::{current_year_month, ensure_company_exists, ensure_member_exists};
use crate::query::{PeriodParams, YearParams};
use crate::reporting;
use crate::response::DataResponse;
use crate::state::AppState;

/// Length of the member dashboard's history, current month included.
const HISTORY_MONTHS: usize = 6;

// ---------------------------------------------------------------------------
// Company metrics
// ---------------------------------------------------------------------------

/// Raw query for the metrics endpoint. Dates stay strings so that a missing
/// or malformed value produces a validation error rather than a rejection
/// from the extractor.
#[derive(Debug, Deserialize)]
pub struct MetricsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub granularity: Option<String>,
}

/// GET /api/v1/companies/{company_id}/dashboard/metrics
pub async fn metrics(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Query(params): Query<MetricsParams>,
) -> AppResult<Json<DataResponse<Metrics>>> {
    let start = parse_date("start_date", params.start_date.as_deref())?;
    let end = parse_date("end_date", params.end_date.as_deref())?;
    let (from, to) = validate_month_range(start, end, MAX_RANGE_MONTHS)?;
    let granularity = Granularity::parse_optional(params.granularity.as_deref())?;
    ensure_company_exists(&state.pool, company_id).await?;

    let months = reporting::month_figures(&state.pool, company_id, from, to).await?;
    let project_count = ProjectRepo::count_overlapping(&state.pool, company_id, start, end).await?;

    Ok(Json(DataResponse {
        data: compute(&months, project_count, granularity),
    }))
}

// ---------------------------------------------------------------------------
// Revenue chart
// ---------------------------------------------------------------------------

/// GET /api/v1/companies/{company_id}/dashboard/revenue-chart?year=
///
/// Uses recorded monthly revenue when the year has any rows; otherwise spreads
/// each dated project's total across its months within the year.
pub async fn revenue_chart(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<RevenueChart>>> {
    let year = params.year.unwrap_or_else(|| current_year_month().0);
    let (first, last) = (YearMonth::new(year, 1)?, YearMonth::new(year, 12)?);
    ensure_company_exists(&state.pool, company_id).await?;

    let mut revenue = YearRevenue::new(year);
    let recorded = MonthlyRevenueRepo::totals_by_month(&state.pool, company_id, first, last).await?;
    for row in &recorded {
        if let Ok(month) = u32::try_from(row.month) {
            revenue.add(month, &row.revenue_type, row.revenue);
        }
    }

    // Recorded rows win even when they sum to zero.
    let source = if recorded.is_empty() {
        let projects =
            ProjectRepo::list(&state.pool, company_id, &ProjectFilter::default()).await?;
        for project in &projects {
            revenue.distribute_project(
                project.total_revenue,
                &project.revenue_type,
                project.start_date,
                project.end_date,
            );
        }
        RevenueSource::Projects
    } else {
        RevenueSource::MonthlyRevenue
    };

    let mut expenses = [Decimal::ZERO; 12];
    for figures in reporting::month_figures(&state.pool, company_id, first, last).await? {
        expenses[figures.period.month() as usize - 1] = figures.costs();
    }

    Ok(Json(DataResponse {
        data: revenue.into_chart(expenses, source),
    }))
}

// ---------------------------------------------------------------------------
// Member dashboard
// ---------------------------------------------------------------------------

/// One project line on the member dashboard.
#[derive(Debug, Serialize)]
pub struct ProjectHours {
    pub project_id: DbId,
    pub project_name: String,
    pub status: String,
    pub hours: Decimal,
    pub hourly_rate: Decimal,
    /// `hours × hourly_rate`.
    pub value: Decimal,
}

impl From<MemberProjectHours> for ProjectHours {
    fn from(row: MemberProjectHours) -> Self {
        Self {
            value: (row.hours * row.hourly_rate).round_dp(2),
            project_id: row.project_id,
            project_name: row.project_name,
            status: row.project_status,
            hours: row.hours,
            hourly_rate: row.hourly_rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MonthHours {
    pub period: YearMonth,
    pub label: String,
    pub hours: Decimal,
    pub utilization_rate: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MemberDashboard {
    pub team_member_id: DbId,
    pub name: String,
    pub period: YearMonth,
    pub allocated_hours: Decimal,
    pub capacity_hours: Decimal,
    pub utilization_rate: Decimal,
    pub projects: Vec<ProjectHours>,
    pub history: Vec<MonthHours>,
}

/// Resolve `?year=&month=`, defaulting each part to the current month.
fn resolve_period(params: &PeriodParams) -> AppResult<YearMonth> {
    let (year, month) = current_year_month();
    Ok(YearMonth::new(
        params.year.unwrap_or(year),
        params.month.unwrap_or(month),
    )?)
}

/// GET /api/v1/companies/{company_id}/team-members/{id}/dashboard?year=&month=
pub async fn member_dashboard(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<DataResponse<MemberDashboard>>> {
    let period = resolve_period(&params)?;
    let member = ensure_member_exists(&state.pool, company_id, id).await?;
    let capacity = monthly_hours(member.weekly_capacity_hours);

    let projects: Vec<ProjectHours> =
        AllocationRepo::member_projects_in_month(&state.pool, member.id, period)
            .await?
            .into_iter()
            .map(ProjectHours::from)
            .collect();
    let allocated: Decimal = projects.iter().map(|p| p.hours).sum();

    let months = trailing_months(period, HISTORY_MONTHS);
    let first = months.first().copied().unwrap_or(period);
    let rows = AllocationRepo::monthly_hours_for_member(&state.pool, member.id, first, period)
        .await?;
    let history = months
        .into_iter()
        .map(|month| {
            let hours: Decimal = rows
                .iter()
                .filter(|r| YearMonth::from_row(r.year, r.month) == Some(month))
                .map(|r| r.hours)
                .sum();
            MonthHours {
                period: month,
                label: month.label(),
                hours,
                utilization_rate: percentage(hours, capacity),
            }
        })
        .collect();

    let dashboard = MemberDashboard {
        team_member_id: member.id,
        name: display_name(&member.first_name, &member.last_name),
        period,
        allocated_hours: allocated,
        capacity_hours: capacity,
        utilization_rate: percentage(allocated, capacity),
        projects,
        history,
    };
    Ok(Json(DataResponse { data: dashboard }))
}

// ---------------------------------------------------------------------------
// PM dashboard
// ---------------------------------------------------------------------------

/// Staffing status of one open project on the PM dashboard.
#[derive(Debug, Serialize)]
pub struct ManagedProject {
    pub project_id: DbId,
    pub name: String,
    pub status: String,
    pub total_hours: Option<Decimal>,
    pub allocated_hours: Decimal,
    pub allocation_percentage: Decimal,
    pub team_size: i64,
    pub health: AllocationHealth,
}

#[derive(Debug, Serialize)]
pub struct PmDashboard {
    pub team_member_id: DbId,
    pub name: String,
    pub period: YearMonth,
    pub project_count: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_revenue_managed: Decimal,
    /// Distinct members holding allocations on any managed project.
    pub team_members_allocated: i64,
    pub allocated_hours_this_month: Decimal,
    pub open_projects: Vec<ManagedProject>,
}

/// GET /api/v1/companies/{company_id}/team-members/{id}/pm-dashboard?year=&month=
pub async fn pm_dashboard(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<DataResponse<PmDashboard>>> {
    let period = resolve_period(&params)?;
    let member = ensure_member_exists(&state.pool, company_id, id).await?;
    let projects = ProjectRepo::list_managed_by(&state.pool, company_id, member.id).await?;
    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();

    let team_members_allocated =
        AllocationRepo::count_members_for_projects(&state.pool, &ids).await?;
    let allocated_this_month =
        AllocationRepo::hours_for_projects_in_month(&state.pool, &ids, period).await?;

    let mut open_projects = Vec::new();
    for project in projects
        .iter()
        .filter(|p| OPEN_PROJECT_STATUSES.contains(&p.status.as_str()))
    {
        let allocated = AllocationRepo::total_hours_for_project(&state.pool, project.id).await?;
        let pct = allocation_percentage(allocated, project.total_hours);
        open_projects.push(ManagedProject {
            project_id: project.id,
            name: project.name.clone(),
            status: project.status.clone(),
            total_hours: project.total_hours,
            allocated_hours: allocated,
            allocation_percentage: pct,
            team_size: ProjectRepo::team_size(&state.pool, project.id).await?,
            health: AllocationHealth::from_percentage(pct),
        });
    }

    let count_status = |status: &str| projects.iter().filter(|p| p.status == status).count();
    let dashboard = PmDashboard {
        team_member_id: member.id,
        name: display_name(&member.first_name, &member.last_name),
        period,
        project_count: projects.len(),
        active_projects: count_status(PROJECT_ACTIVE),
        completed_projects: count_status(PROJECT_COMPLETED),
        total_revenue_managed: projects.iter().map(|p| p.total_revenue).sum(),
        team_members_allocated,
        allocated_hours_this_month: allocated_this_month,
        open_projects,
    };
    Ok(Json(DataResponse { data: dashboard }))
}
