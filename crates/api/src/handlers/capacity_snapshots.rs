//! Handlers for `/companies/{company_id}/capacity-snapshots`.

use agency_core::calendar::YearMonth;
use agency_core::types::DbId;
use agency_db::models::capacity_snapshot::CapacitySnapshot;
use agency_db::repositories::CapacitySnapshotRepo;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::ensure_company_exists;
use crate::query::YearParams;
use crate::reporting;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST .../capacity-snapshots`.
#[derive(Debug, Deserialize)]
pub struct RefreshSnapshotRequest {
    pub year: i32,
    pub month: u32,
}

/// GET /api/v1/companies/{company_id}/capacity-snapshots?year=
pub async fn list(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<Vec<CapacitySnapshot>>>> {
    ensure_company_exists(&state.pool, company_id).await?;
    let snapshots = CapacitySnapshotRepo::list(&state.pool, company_id, params.year).await?;
    Ok(Json(DataResponse { data: snapshots }))
}

/// POST /api/v1/companies/{company_id}/capacity-snapshots
///
/// Recomputes the month from current data and overwrites any stored row.
pub async fn refresh(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(input): Json<RefreshSnapshotRequest>,
) -> AppResult<Json<DataResponse<CapacitySnapshot>>> {
    let period = YearMonth::new(input.year, input.month)?;
    ensure_company_exists(&state.pool, company_id).await?;

    let figures = reporting::capacity_snapshot(&state.pool, company_id, period).await?;
    let snapshot = CapacitySnapshotRepo::upsert(&state.pool, company_id, &figures).await?;
    tracing::info!(
        company_id,
        period = %period.label(),
        utilization_rate = %snapshot.utilization_rate,
        "Capacity snapshot refreshed",
    );
    Ok(Json(DataResponse { data: snapshot }))
}
