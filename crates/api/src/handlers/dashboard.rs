use axum::extract::State;
use axum::Json;
use kickflip_core::dashboard::{recent, DashboardStats};
use kickflip_core::funnel::Funnel;
use serde::Serialize;

use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Funnels listed under "Recent Funnels".
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub recent: Vec<Funnel>,
}

pub async fn summary_for(state: &AppState) -> DashboardSummary {
    let funnels = state.workspace.funnels().await;
    DashboardSummary {
        stats: DashboardStats::compute(funnels.len(), &mut rand::rng()),
        recent: recent(&funnels, RECENT_LIMIT),
    }
}

/// GET /api/v1/dashboard
pub async fn summary(
    _user: SessionUser,
    State(state): State<AppState>,
) -> Json<DataResponse<DashboardSummary>> {
    Json(DataResponse::new(summary_for(&state).await))
}
