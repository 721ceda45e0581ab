use std::sync::Arc;
use std::time::Duration;

use kickflip_core::advisory::AdvisoryEngine;
use kickflip_core::chat::ChatTranscript;
use kickflip_core::service::FunnelService;
use kickflip_core::session::{AuthSession, SessionStore};
use kickflip_core::workspace::FunnelWorkspace;
use tokio::sync::{Mutex, RwLock};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// The server hosts a single builder session: one workspace, one signed-in
/// user and one chat transcript. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub workspace: Arc<FunnelWorkspace>,
    pub auth: Arc<RwLock<AuthSession>>,
    pub session_store: Arc<dyn SessionStore>,
    pub advisory: Arc<AdvisoryEngine>,
    pub chat: Arc<Mutex<ChatTranscript>>,
    /// Present when funnels are stored in PostgreSQL.
    pub pool: Option<kickflip_db::DbPool>,
}

impl AppState {
    /// Restore the persisted session and load the funnel collection.
    ///
    /// A failed initial load is not fatal: the workspace records the error
    /// and `POST /api/v1/funnels/reload` can retry.
    pub async fn initialise(
        config: ServerConfig,
        service: Arc<dyn FunnelService>,
        session_store: Arc<dyn SessionStore>,
        advisory: AdvisoryEngine,
        pool: Option<kickflip_db::DbPool>,
    ) -> Self {
        let auth = AuthSession::restore(session_store.as_ref()).await;
        if let Some(user) = auth.user() {
            tracing::info!(email = %user.email, "Restored session");
        }

        let workspace = FunnelWorkspace::new(service);
        // Failure is already recorded in the workspace's load state.
        let _ = workspace.load().await;

        Self {
            config: Arc::new(config),
            workspace: Arc::new(workspace),
            auth: Arc::new(RwLock::new(auth)),
            session_store,
            advisory: Arc::new(advisory),
            chat: Arc::new(Mutex::new(ChatTranscript::new())),
            pool,
        }
    }

    /// Advisory engine with OS-seeded randomness and the configured latency.
    pub fn advisory_from_config(config: &ServerConfig) -> AdvisoryEngine {
        AdvisoryEngine::with_delay(Duration::from_millis(config.advisory_delay_ms))
    }
}
