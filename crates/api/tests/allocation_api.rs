//! HTTP-level tests for the allocation grid and project team endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create, create_company, delete, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

struct Setup {
    base: String,
    member_id: i64,
}

/// Company with one $50/hr member on the team of a project running
/// 2025-01-06 to 2025-01-19 with a 100 hour target.
async fn setup(pool: &PgPool) -> Setup {
    let company_id = create_company(pool, "ACME").await;
    let member = create(
        pool,
        &format!("/api/v1/companies/{company_id}/team-members"),
        json!({"first_name": "Ada", "last_name": "Lovelace", "role": "developer", "hourly_rate": 50}),
    )
    .await;
    let client = create(
        pool,
        &format!("/api/v1/companies/{company_id}/clients"),
        json!({"name": "Globex"}),
    )
    .await;
    let project = create(
        pool,
        &format!("/api/v1/companies/{company_id}/projects"),
        json!({
            "client_id": client["id"],
            "name": "Website",
            "start_date": "2025-01-06",
            "end_date": "2025-01-19",
            "total_hours": 100
        }),
    )
    .await;

    let base = format!(
        "/api/v1/companies/{company_id}/projects/{}",
        project["id"].as_i64().unwrap()
    );
    let member_id = member["id"].as_i64().unwrap();
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("{base}/team"),
        json!({"member_id": member_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    Setup { base, member_id }
}

async fn save(pool: &PgPool, base: &str, cells: Value) -> axum::http::Response<axum::body::Body> {
    put_json(
        common::build_test_app(pool.clone()),
        &format!("{base}/allocations"),
        json!({ "allocations": cells }),
    )
    .await
}

async fn grid(pool: &PgPool, base: &str) -> Value {
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("{base}/allocations"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_weekly_hours_collapse_into_one_monthly_row(pool: PgPool) {
    let Setup { base, member_id } = setup(&pool).await;

    let response = save(
        &pool,
        &base,
        json!([
            {"member_id": member_id, "year": 2025, "month": 1, "week": 1, "hours": 20},
            {"member_id": member_id, "year": 2025, "month": 1, "week": 2, "hours": "15"}
        ]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await["data"].clone();

    assert_eq!(saved["rows_saved"], 1);
    let row = &saved["allocations"][0];
    assert_eq!(row["year"], 2025);
    assert_eq!(row["month"], 1);
    assert_eq!(row["allocated_hours"].as_f64(), Some(35.0));
    assert_eq!(row["hourly_rate"].as_f64(), Some(50.0));
    assert_eq!(saved["totals"]["grand_total"].as_f64(), Some(35.0));
    assert_eq!(saved["remaining_hours"].as_f64(), Some(65.0));

    let data = grid(&pool, &base).await;
    assert_eq!(saved["totals"], data["totals"]);
    assert_eq!(saved["totals"]["by_week"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grid_reflects_exactly_the_last_save(pool: PgPool) {
    let Setup { base, member_id } = setup(&pool).await;

    save(
        &pool,
        &base,
        json!([
            {"member_id": member_id, "year": 2025, "month": 1, "week": 1, "hours": 20},
            {"member_id": member_id, "year": 2025, "month": 1, "week": 2, "hours": 15}
        ]),
    )
    .await;
    let response = save(
        &pool,
        &base,
        json!([{"member_id": member_id, "year": 2025, "month": 1, "week": 2, "hours": 8}]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = grid(&pool, &base).await;
    assert_eq!(data["dates_set"], true);
    assert!(!data["weeks"].as_array().unwrap().is_empty());
    assert_eq!(data["team_members"][0]["initials"], "AL");
    assert_eq!(data["team_members"][0]["role_label"], "Developer");

    let allocations = data["allocations"].as_object().unwrap();
    assert_eq!(allocations.len(), 1);
    assert_eq!(
        allocations[&format!("{member_id}_2025_1_1")].as_f64(),
        Some(8.0)
    );
    assert_eq!(data["totals"]["grand_total"].as_f64(), Some(8.0));
    assert_eq!(
        data["totals"]["by_member"][member_id.to_string()].as_f64(),
        Some(8.0)
    );
    assert_eq!(data["remaining_hours"].as_f64(), Some(92.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_save_clears_allocations(pool: PgPool) {
    let Setup { base, member_id } = setup(&pool).await;
    save(
        &pool,
        &base,
        json!([{"member_id": member_id, "year": 2025, "month": 1, "hours": 10}]),
    )
    .await;

    let response = save(&pool, &base, json!([])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = grid(&pool, &base).await;
    assert!(data["allocations"].as_object().unwrap().is_empty());
    assert_eq!(data["totals"]["grand_total"].as_f64(), Some(0.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_cells_reject_the_whole_save(pool: PgPool) {
    let Setup { base, member_id } = setup(&pool).await;
    save(
        &pool,
        &base,
        json!([{"member_id": member_id, "year": 2025, "month": 1, "hours": 10}]),
    )
    .await;

    for bad in [
        json!({"member_id": member_id, "year": 2025, "month": 1, "week": 1, "hours": 41}),
        json!({"member_id": member_id, "year": 2025, "month": 1, "week": 1, "hours": 0.25}),
        json!({"member_id": member_id, "year": 2025, "month": 13, "week": 1, "hours": 4}),
        json!({"member_id": 999_999, "year": 2025, "month": 1, "week": 1, "hours": 4}),
    ] {
        let response = save(
            &pool,
            &base,
            json!([
                {"member_id": member_id, "year": 2025, "month": 1, "week": 2, "hours": 5},
                bad
            ]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let data = grid(&pool, &base).await;
    assert_eq!(data["totals"]["grand_total"].as_f64(), Some(10.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_hours_count_as_zero(pool: PgPool) {
    let Setup { base, member_id } = setup(&pool).await;

    let response = save(
        &pool,
        &base,
        json!([
            {"member_id": member_id, "year": 2025, "month": 1, "week": 1, "hours": "lots"},
            {"member_id": member_id, "year": 2025, "month": 1, "week": 2, "hours": 6}
        ]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await["data"].clone();
    assert_eq!(saved["allocations"][0]["allocated_hours"].as_f64(), Some(6.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grid_for_undated_project_has_no_weeks(pool: PgPool) {
    let company_id = create_company(&pool, "ACME").await;
    let client = create(
        &pool,
        &format!("/api/v1/companies/{company_id}/clients"),
        json!({"name": "Globex"}),
    )
    .await;
    let project = create(
        &pool,
        &format!("/api/v1/companies/{company_id}/projects"),
        json!({"client_id": client["id"], "name": "Someday"}),
    )
    .await;

    let base = format!("/api/v1/companies/{company_id}/projects/{}", project["id"]);
    let data = grid(&pool, &base).await;
    assert_eq!(data["dates_set"], false);
    assert!(data["weeks"].as_array().unwrap().is_empty());
    assert!(data["remaining_hours"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grid_for_unknown_project_returns_404(pool: PgPool) {
    let company_id = create_company(&pool, "ACME").await;
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/companies/{company_id}/projects/999999/allocations"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_adding_existing_member_is_idempotent(pool: PgPool) {
    let Setup { base, member_id } = setup(&pool).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("{base}/team"),
        json!({"member_id": member_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = grid(&pool, &base).await;
    assert_eq!(data["team_members"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removing_member_deletes_their_allocations(pool: PgPool) {
    let Setup { base, member_id } = setup(&pool).await;
    save(
        &pool,
        &base,
        json!([{"member_id": member_id, "year": 2025, "month": 1, "hours": 12}]),
    )
    .await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("{base}/team/{member_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let data = grid(&pool, &base).await;
    assert!(data["team_members"].as_array().unwrap().is_empty());
    assert!(data["allocations"].as_object().unwrap().is_empty());

    let response = delete(
        common::build_test_app(pool),
        &format!("{base}/team/{member_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_available_members_excludes_team_and_inactive(pool: PgPool) {
    let Setup { base, .. } = setup(&pool).await;
    let company_base = base.split("/projects/").next().unwrap().to_string();

    let free = create(
        &pool,
        &format!("{company_base}/team-members"),
        json!({"first_name": "Grace", "last_name": "Hopper"}),
    )
    .await;
    let inactive = create(
        &pool,
        &format!("{company_base}/team-members"),
        json!({"first_name": "Old", "status": "inactive"}),
    )
    .await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("{base}/team/available"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let available = body_json(response).await["data"].clone();
    let ids: Vec<i64> = available
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![free["id"].as_i64().unwrap()]);

    let response = post_json(
        common::build_test_app(pool),
        &format!("{base}/team"),
        json!({"member_id": inactive["id"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
