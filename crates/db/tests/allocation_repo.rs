//! Integration tests for allocation persistence and project team links.

use agency_core::allocation::MonthlyAllocation;
use agency_core::calendar::YearMonth;
use agency_db::models::client::CreateClient;
use agency_db::models::company::CreateCompany;
use agency_db::models::project::CreateProject;
use agency_db::models::team_member::{CreateTeamMember, UpdateTeamMember};
use agency_db::repositories::{
    AllocationRepo, ClientRepo, CompanyRepo, ProjectRepo, TeamMemberRepo,
};
use assert_matches::assert_matches;
use rust_decimal::Decimal;
use sqlx::PgPool;

struct Fixture {
    company_id: i64,
    project_id: i64,
    member_id: i64,
}

async fn setup(pool: &PgPool) -> Fixture {
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            name: "Alloc".to_string(),
            code: "ALLOC".to_string(),
        },
    )
    .await
    .unwrap();
    let member = TeamMemberRepo::create(
        pool,
        company.id,
        &CreateTeamMember {
            first_name: "Ada".to_string(),
            last_name: None,
            email: None,
            role: None,
            status: None,
            hourly_rate: Some(Decimal::from(50)),
            annual_salary: None,
            weekly_capacity_hours: None,
            is_project_manager: None,
        },
    )
    .await
    .unwrap();
    let client = ClientRepo::create(
        pool,
        company.id,
        &CreateClient {
            name: "Client".to_string(),
            status: None,
            account_manager_id: None,
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(
        pool,
        company.id,
        &CreateProject {
            client_id: client.id,
            name: "Project".to_string(),
            project_type: None,
            status: None,
            revenue_type: None,
            start_date: None,
            end_date: None,
            total_revenue: None,
            total_hours: None,
            project_manager_id: None,
        },
    )
    .await
    .unwrap();
    ProjectRepo::add_team_member(pool, project.id, member.id)
        .await
        .unwrap();
    Fixture {
        company_id: company.id,
        project_id: project.id,
        member_id: member.id,
    }
}

fn row(member_id: i64, year: i32, month: u32, hours: i64) -> MonthlyAllocation {
    MonthlyAllocation {
        team_member_id: member_id,
        period: YearMonth::new(year, month).unwrap(),
        hours: Decimal::from(hours),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_snapshots_hourly_rate(pool: PgPool) {
    let f = setup(&pool).await;
    let saved = AllocationRepo::replace_for_project(&pool, f.project_id, &[row(f.member_id, 2025, 1, 35)])
        .await
        .unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].allocated_hours, Decimal::from(35));
    assert_eq!(saved[0].hourly_rate, Decimal::from(50));
    assert_eq!(saved[0].month, 1);

    // A later rate change does not rewrite stored rows.
    TeamMemberRepo::update(
        &pool,
        f.company_id,
        f.member_id,
        &UpdateTeamMember {
            first_name: None,
            last_name: None,
            email: None,
            role: None,
            status: None,
            hourly_rate: Some(Decimal::from(80)),
            annual_salary: None,
            weekly_capacity_hours: None,
            is_project_manager: None,
        },
    )
    .await
    .unwrap();
    let rows = AllocationRepo::list_by_project(&pool, f.project_id).await.unwrap();
    assert_eq!(rows[0].hourly_rate, Decimal::from(50));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_removes_stale_rows(pool: PgPool) {
    let f = setup(&pool).await;
    AllocationRepo::replace_for_project(
        &pool,
        f.project_id,
        &[row(f.member_id, 2025, 1, 10), row(f.member_id, 2025, 2, 20)],
    )
    .await
    .unwrap();
    AllocationRepo::replace_for_project(&pool, f.project_id, &[row(f.member_id, 2025, 3, 5)])
        .await
        .unwrap();

    let rows = AllocationRepo::list_by_project(&pool, f.project_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].month, 3);
    assert_eq!(
        AllocationRepo::total_hours_for_project(&pool, f.project_id)
            .await
            .unwrap(),
        Decimal::from(5)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_with_unknown_member_writes_nothing(pool: PgPool) {
    let f = setup(&pool).await;
    AllocationRepo::replace_for_project(&pool, f.project_id, &[row(f.member_id, 2025, 1, 10)])
        .await
        .unwrap();

    let result = AllocationRepo::replace_for_project(
        &pool,
        f.project_id,
        &[row(f.member_id, 2025, 2, 10), row(999_999, 2025, 2, 10)],
    )
    .await;
    assert_matches!(result, Err(sqlx::Error::RowNotFound));

    // The earlier set is untouched.
    let rows = AllocationRepo::list_by_project(&pool, f.project_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].month, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_for_missing_project_fails(pool: PgPool) {
    let result = AllocationRepo::replace_for_project(&pool, 999_999, &[]).await;
    assert_matches!(result, Err(sqlx::Error::RowNotFound));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_team_member_deletes_allocations(pool: PgPool) {
    let f = setup(&pool).await;
    AllocationRepo::replace_for_project(
        &pool,
        f.project_id,
        &[row(f.member_id, 2025, 1, 10), row(f.member_id, 2025, 2, 20)],
    )
    .await
    .unwrap();

    let removed = ProjectRepo::remove_team_member(&pool, f.project_id, f.member_id)
        .await
        .unwrap();
    assert_eq!(removed, Some(2));
    assert!(AllocationRepo::list_by_project(&pool, f.project_id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(ProjectRepo::team_size(&pool, f.project_id).await.unwrap(), 0);

    // Removing again reports the member was not on the team.
    let again = ProjectRepo::remove_team_member(&pool, f.project_id, f.member_id)
        .await
        .unwrap();
    assert_eq!(again, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_team_member_is_idempotent(pool: PgPool) {
    let f = setup(&pool).await;
    let added = ProjectRepo::add_team_member(&pool, f.project_id, f.member_id)
        .await
        .unwrap();
    assert!(!added);
    assert_eq!(ProjectRepo::team_size(&pool, f.project_id).await.unwrap(), 1);

    let available = TeamMemberRepo::list_available_for_project(&pool, f.company_id, f.project_id)
        .await
        .unwrap();
    assert!(available.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_monthly_hours_for_company_within_range(pool: PgPool) {
    let f = setup(&pool).await;
    AllocationRepo::replace_for_project(
        &pool,
        f.project_id,
        &[
            row(f.member_id, 2024, 12, 8),
            row(f.member_id, 2025, 1, 10),
            row(f.member_id, 2025, 4, 20),
        ],
    )
    .await
    .unwrap();

    let months = AllocationRepo::monthly_hours_for_company(
        &pool,
        f.company_id,
        YearMonth::new(2024, 12).unwrap(),
        YearMonth::new(2025, 3).unwrap(),
    )
    .await
    .unwrap();
    let got: Vec<_> = months.iter().map(|m| (m.year, m.month, m.hours)).collect();
    assert_eq!(
        got,
        vec![(2024, 12, Decimal::from(8)), (2025, 1, Decimal::from(10))]
    );
}
