//! [`FunnelService`] backed by PostgreSQL.

use async_trait::async_trait;
use kickflip_core::error::CoreError;
use kickflip_core::funnel::Funnel;
use kickflip_core::service::FunnelService;
use kickflip_core::types::DbId;

use crate::models::funnel::{CreateFunnel, UpdateFunnel};
use crate::repositories::FunnelRepo;
use crate::DbPool;

#[derive(Clone)]
pub struct PgFunnelService {
    pool: DbPool,
}

impl PgFunnelService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn unavailable(op: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |err| {
        tracing::error!(error = %err, op, "Funnel store query failed");
        CoreError::Unavailable(format!("Funnel store unavailable: {err}"))
    }
}

#[async_trait]
impl FunnelService for PgFunnelService {
    async fn get_funnels(&self) -> Result<Vec<Funnel>, CoreError> {
        let rows = FunnelRepo::list(&self.pool)
            .await
            .map_err(unavailable("list"))?;
        Ok(rows.into_iter().map(Funnel::from).collect())
    }

    async fn save_funnel(&self, funnel: Funnel) -> Result<Funnel, CoreError> {
        match funnel.id {
            None => {
                let row = FunnelRepo::create(&self.pool, &CreateFunnel::from(&funnel))
                    .await
                    .map_err(unavailable("create"))?;
                tracing::debug!(funnel_id = row.id, "Inserted funnel");
                Ok(row.into())
            }
            Some(id) => FunnelRepo::update(&self.pool, id, &UpdateFunnel::from(&funnel))
                .await
                .map_err(unavailable("update"))?
                .map(Funnel::from)
                .ok_or_else(|| CoreError::not_found("Funnel", id)),
        }
    }

    async fn delete_funnel(&self, id: DbId) -> Result<(), CoreError> {
        let removed = FunnelRepo::delete(&self.pool, id)
            .await
            .map_err(unavailable("delete"))?;
        if removed {
            Ok(())
        } else {
            Err(CoreError::not_found("Funnel", id))
        }
    }
}
