//! Process-local [`FunnelService`].
//!
//! Used when no `DATABASE_URL` is configured and as the test double for the
//! workspace and HTTP layers. Failures can be injected per operation with
//! [`InMemoryFunnelService::fail_next`].

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use kickflip_core::error::CoreError;
use kickflip_core::funnel::Funnel;
use kickflip_core::service::FunnelService;
use kickflip_core::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailOp {
    List,
    Save,
    Delete,
}

#[derive(Default)]
struct Store {
    funnels: Vec<Funnel>,
    last_id: DbId,
    failures: HashSet<FailOp>,
}

impl Store {
    fn take_failure(&mut self, op: FailOp) -> Result<(), CoreError> {
        if self.failures.remove(&op) {
            return Err(CoreError::Unavailable(format!("Injected {op:?} failure")));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryFunnelService {
    store: Mutex<Store>,
}

impl InMemoryFunnelService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. Funnels without an id are assigned one.
    pub fn with_funnels(funnels: impl IntoIterator<Item = Funnel>) -> Self {
        let mut store = Store::default();
        for mut funnel in funnels {
            let id = match funnel.id {
                Some(id) => id,
                None => store.last_id + 1,
            };
            store.last_id = store.last_id.max(id);
            funnel.id = Some(id);
            store.funnels.push(funnel);
        }
        Self {
            store: Mutex::new(store),
        }
    }

    /// Make the next call of `op` fail with [`CoreError::Unavailable`].
    pub async fn fail_next(&self, op: FailOp) {
        self.store.lock().await.failures.insert(op);
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.funnels.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl FunnelService for InMemoryFunnelService {
    async fn get_funnels(&self) -> Result<Vec<Funnel>, CoreError> {
        let mut store = self.store.lock().await;
        store.take_failure(FailOp::List)?;
        Ok(store.funnels.clone())
    }

    async fn save_funnel(&self, mut funnel: Funnel) -> Result<Funnel, CoreError> {
        let mut store = self.store.lock().await;
        store.take_failure(FailOp::Save)?;
        funnel.updated_at = Utc::now();

        match funnel.id {
            None => {
                store.last_id += 1;
                funnel.id = Some(store.last_id);
                store.funnels.push(funnel.clone());
            }
            Some(id) => {
                let slot = store
                    .funnels
                    .iter_mut()
                    .find(|f| f.id == Some(id))
                    .ok_or_else(|| CoreError::not_found("Funnel", id))?;
                *slot = funnel.clone();
            }
        }
        Ok(funnel)
    }

    async fn delete_funnel(&self, id: DbId) -> Result<(), CoreError> {
        let mut store = self.store.lock().await;
        store.take_failure(FailOp::Delete)?;
        let before = store.funnels.len();
        store.funnels.retain(|f| f.id != Some(id));
        if store.funnels.len() == before {
            return Err(CoreError::not_found("Funnel", id));
        }
        Ok(())
    }
}
