//! Repository for the `funnels` table.

use sqlx::types::Json;
use sqlx::PgPool;
use kickflip_core::types::DbId;

use crate::models::funnel::{CreateFunnel, FunnelRow, UpdateFunnel};

const COLUMNS: &str = "id, name, description, elements, created_at, updated_at";

pub struct FunnelRepo;

impl FunnelRepo {
    /// Insert a funnel, returning the created row with its new id.
    pub async fn create(pool: &PgPool, input: &CreateFunnel) -> Result<FunnelRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO funnels (name, description, elements, created_at, updated_at)
             VALUES ($1, $2, $3, $4, NOW())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FunnelRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(Json(&input.elements))
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FunnelRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM funnels WHERE id = $1");
        sqlx::query_as::<_, FunnelRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All funnels in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<FunnelRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM funnels ORDER BY id ASC");
        sqlx::query_as::<_, FunnelRow>(&query).fetch_all(pool).await
    }

    /// Replace name, description and elements and bump `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFunnel,
    ) -> Result<Option<FunnelRow>, sqlx::Error> {
        let query = format!(
            "UPDATE funnels SET
                name = $2,
                description = $3,
                elements = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FunnelRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(Json(&input.elements))
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM funnels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
