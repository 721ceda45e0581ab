//! Handlers for the `/funnels` collection.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use kickflip_core::element::FunnelElement;
use kickflip_core::element_list::ElementList;
use kickflip_core::funnel::{Funnel, DEFAULT_FUNNEL_NAME};
use kickflip_core::types::DbId;
use kickflip_core::workspace::LoadState;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelList {
    pub load_state: LoadState,
    pub funnels: Vec<Funnel>,
    pub error: Option<String>,
}

/// Body of `POST /funnels`. Without an `id` the funnel is created.
#[derive(Debug, Deserialize)]
pub struct SaveFunnelRequest {
    pub id: Option<DbId>,
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub elements: Vec<FunnelElement>,
}

/// GET /api/v1/funnels
pub async fn list(
    _user: SessionUser,
    State(state): State<AppState>,
) -> Json<DataResponse<FunnelList>> {
    let snapshot = state.workspace.snapshot().await;
    Json(DataResponse::new(FunnelList {
        load_state: snapshot.load_state,
        funnels: snapshot.funnels,
        error: snapshot.error,
    }))
}

/// POST /api/v1/funnels/reload
pub async fn reload(
    _user: SessionUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Funnel>>>> {
    state.workspace.load().await?;
    Ok(Json(DataResponse::new(state.workspace.funnels().await)))
}

/// POST /api/v1/funnels
///
/// Returns 201 when a new funnel was created, 200 when an existing one was
/// replaced.
pub async fn save(
    _user: SessionUser,
    State(state): State<AppState>,
    Json(input): Json<SaveFunnelRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Funnel>>)> {
    let elements = ElementList::try_from_vec(input.elements)?;
    let existing = match input.id {
        Some(id) => state
            .workspace
            .funnels()
            .await
            .into_iter()
            .find(|f| f.id == Some(id)),
        None => None,
    };

    let mut funnel = existing.unwrap_or_else(|| Funnel::draft(Utc::now()));
    funnel.id = input.id;
    if let Some(name) = input.name {
        funnel.name = name;
    } else if funnel.name.is_empty() {
        funnel.name = DEFAULT_FUNNEL_NAME.to_string();
    }
    funnel.description = input.description;
    funnel.set_elements(elements);

    let created = funnel.id.is_none();
    let saved = state.workspace.save(funnel).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse::new(saved))))
}

/// DELETE /api/v1/funnels/{id}
pub async fn delete(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.workspace.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/funnels/{id}/select
pub async fn select(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Funnel>>> {
    let funnel = state
        .workspace
        .select(id)
        .await
        .ok_or_else(|| AppError::not_found("Funnel", id))?;
    Ok(Json(DataResponse::new(funnel)))
}
