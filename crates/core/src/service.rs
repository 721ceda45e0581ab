//! Port to the durable funnel store.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::funnel::Funnel;
use crate::types::DbId;

/// Storage collaborator used by [`crate::workspace::FunnelWorkspace`].
///
/// Every call may fail; implementations report I/O problems as
/// [`CoreError::Unavailable`].
#[async_trait]
pub trait FunnelService: Send + Sync {
    /// All funnels owned by the session.
    async fn get_funnels(&self) -> Result<Vec<Funnel>, CoreError>;

    /// Persist `funnel`. A funnel without an id is inserted and gets one;
    /// otherwise the stored record is replaced. The returned funnel always
    /// has `id` set and a refreshed `updated_at`.
    async fn save_funnel(&self, funnel: Funnel) -> Result<Funnel, CoreError>;

    async fn delete_funnel(&self, id: DbId) -> Result<(), CoreError>;
}
