//! Handlers for `/companies/{company_id}/clients`.

use agency_core::error::CoreError;
use agency_core::project::validate_client_status;
use agency_core::types::DbId;
use agency_db::models::client::{Client, CreateClient, UpdateClient};
use agency_db::repositories::ClientRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{check_member_ref, ensure_client_exists, ensure_company_exists};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/companies/{company_id}/clients
pub async fn create(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    input.validate()?;
    if let Some(status) = input.status.as_deref() {
        validate_client_status(status)?;
    }
    ensure_company_exists(&state.pool, company_id).await?;
    check_member_ref(
        &state.pool,
        company_id,
        input.account_manager_id,
        "account_manager_id",
    )
    .await?;

    let client = ClientRepo::create(&state.pool, company_id, &input).await?;
    tracing::info!(company_id, client_id = client.id, "Client created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// GET /api/v1/companies/{company_id}/clients
pub async fn list(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    ensure_company_exists(&state.pool, company_id).await?;
    let clients = ClientRepo::list(&state.pool, company_id).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/companies/{company_id}/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ensure_client_exists(&state.pool, company_id, id).await?;
    Ok(Json(DataResponse { data: client }))
}

/// PUT /api/v1/companies/{company_id}/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    input.validate()?;
    if let Some(status) = input.status.as_deref() {
        validate_client_status(status)?;
    }
    check_member_ref(
        &state.pool,
        company_id,
        input.account_manager_id,
        "account_manager_id",
    )
    .await?;

    let client = ClientRepo::update(&state.pool, company_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/companies/{company_id}/clients/{id}
///
/// Deletes the client's projects with it.
pub async fn delete(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if ClientRepo::delete(&state.pool, company_id, id).await? {
        tracing::info!(company_id, client_id = id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
    }
}
