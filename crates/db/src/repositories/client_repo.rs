//! Repository for the `clients` table.

use agency_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, CreateClient, UpdateClient};

const COLUMNS: &str = "id, company_id, name, status, account_manager_id, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client. `status` defaults to `active`.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateClient,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (company_id, name, status, account_manager_id)
             VALUES ($1, $2, COALESCE($3, 'active'), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(input.account_manager_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's clients ordered by name.
    pub async fn list(pool: &PgPool, company_id: DbId) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE company_id = $1 ORDER BY name");
        sqlx::query_as::<_, Client>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($3, name),
                status = COALESCE($4, status),
                account_manager_id = COALESCE($5, account_manager_id)
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(input.account_manager_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client together with its projects. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
