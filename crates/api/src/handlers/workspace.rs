//! Handlers for `/workspace`: editing the current funnel.
//!
//! Element ids that do not exist in the current funnel produce 404. The
//! core treats them as no-ops and reports `false`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kickflip_core::advisory::FunnelTemplate;
use kickflip_core::element::{ElementId, ElementPatch, ElementType, FunnelElement};
use kickflip_core::element_list::ElementList;
use kickflip_core::error::CoreError;
use kickflip_core::funnel::Funnel;
use kickflip_core::workspace::{WorkspaceSnapshot, NO_CURRENT_FUNNEL};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddElementRequest {
    #[serde(rename = "type")]
    pub element_type: ElementType,
}

/// A drag result. A missing `to` means the drop landed outside the list.
#[derive(Debug, Deserialize)]
pub struct DropRequest {
    pub from: usize,
    pub to: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Deserialize)]
pub struct EditBufferRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplyTemplateRequest {
    pub template: FunnelTemplate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditState {
    pub element_id: ElementId,
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMode {
    pub element_id: ElementId,
    pub editing: bool,
}

#[derive(Debug, Serialize)]
pub struct DropResult {
    pub moved: bool,
    pub elements: ElementList,
}

#[derive(Debug, Serialize)]
pub struct PreviewState {
    pub preview: bool,
}

fn element_not_found(id: &ElementId) -> AppError {
    AppError::not_found("Element", id)
}

async fn current_elements(state: &AppState) -> AppResult<ElementList> {
    state
        .workspace
        .current()
        .await
        .map(|f| f.elements)
        .ok_or_else(|| AppError::Core(CoreError::Validation(NO_CURRENT_FUNNEL.to_string())))
}

// ---------------------------------------------------------------------------
// Current funnel
// ---------------------------------------------------------------------------

/// GET /api/v1/workspace
pub async fn snapshot(
    _user: SessionUser,
    State(state): State<AppState>,
) -> Json<DataResponse<WorkspaceSnapshot>> {
    Json(DataResponse::new(state.workspace.snapshot().await))
}

/// POST /api/v1/workspace/new
pub async fn create_new(
    _user: SessionUser,
    State(state): State<AppState>,
) -> (StatusCode, Json<DataResponse<Funnel>>) {
    let funnel = state.workspace.create_new().await;
    (StatusCode::CREATED, Json(DataResponse::new(funnel)))
}

/// POST /api/v1/workspace/save
pub async fn save_current(
    _user: SessionUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Funnel>>> {
    let saved = state.workspace.save_current().await?;
    Ok(Json(DataResponse::new(saved)))
}

/// PATCH /api/v1/workspace/details
pub async fn update_details(
    _user: SessionUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateDetailsRequest>,
) -> AppResult<Json<DataResponse<Funnel>>> {
    let funnel = state
        .workspace
        .update_current_details(input.name, input.description)
        .await?;
    Ok(Json(DataResponse::new(funnel)))
}

/// POST /api/v1/workspace/preview
pub async fn toggle_preview(
    _user: SessionUser,
    State(state): State<AppState>,
) -> Json<DataResponse<PreviewState>> {
    let preview = state.workspace.toggle_preview().await;
    Json(DataResponse::new(PreviewState { preview }))
}

/// POST /api/v1/workspace/template
pub async fn apply_template(
    _user: SessionUser,
    State(state): State<AppState>,
    Json(input): Json<ApplyTemplateRequest>,
) -> Json<DataResponse<Funnel>> {
    let funnel = state.workspace.apply_template(&input.template).await;
    Json(DataResponse::new(funnel))
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// PUT /api/v1/workspace/elements
pub async fn replace_elements(
    _user: SessionUser,
    State(state): State<AppState>,
    Json(elements): Json<Vec<FunnelElement>>,
) -> AppResult<Json<DataResponse<Funnel>>> {
    let elements = ElementList::try_from_vec(elements)?;
    let funnel = state
        .workspace
        .update_current_elements(elements)
        .await
        .ok_or_else(|| AppError::Core(CoreError::Validation(NO_CURRENT_FUNNEL.to_string())))?;
    Ok(Json(DataResponse::new(funnel)))
}

/// POST /api/v1/workspace/elements
pub async fn add_element(
    _user: SessionUser,
    State(state): State<AppState>,
    Json(input): Json<AddElementRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FunnelElement>>)> {
    if input.element_type == ElementType::Unknown {
        return Err(AppError::BadRequest("Unknown element type".into()));
    }
    let element = state.workspace.add_element(input.element_type).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(element))))
}

/// POST /api/v1/workspace/elements/reorder
pub async fn drop_element(
    _user: SessionUser,
    State(state): State<AppState>,
    Json(input): Json<DropRequest>,
) -> AppResult<Json<DataResponse<DropResult>>> {
    let moved = state.workspace.drop_element(input.from, input.to).await?;
    let elements = current_elements(&state).await?;
    Ok(Json(DataResponse::new(DropResult { moved, elements })))
}

/// POST /api/v1/workspace/elements/move
pub async fn move_element(
    _user: SessionUser,
    State(state): State<AppState>,
    Json(input): Json<MoveRequest>,
) -> AppResult<Json<DataResponse<ElementList>>> {
    state.workspace.reorder_elements(input.from, input.to).await?;
    Ok(Json(DataResponse::new(current_elements(&state).await?)))
}

/// PATCH /api/v1/workspace/elements/{element_id}
pub async fn update_element(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(element_id): Path<ElementId>,
    Json(patch): Json<ElementPatch>,
) -> AppResult<Json<DataResponse<ElementList>>> {
    if !state.workspace.update_element(&element_id, &patch).await? {
        return Err(element_not_found(&element_id));
    }
    Ok(Json(DataResponse::new(current_elements(&state).await?)))
}

/// DELETE /api/v1/workspace/elements/{element_id}
pub async fn delete_element(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(element_id): Path<ElementId>,
) -> AppResult<StatusCode> {
    if !state.workspace.delete_element(&element_id).await? {
        return Err(element_not_found(&element_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Edit buffers
// ---------------------------------------------------------------------------

/// POST /api/v1/workspace/elements/{element_id}/edit
pub async fn begin_edit(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(element_id): Path<ElementId>,
) -> AppResult<Json<DataResponse<EditState>>> {
    let text = state.workspace.begin_edit(&element_id).await?;
    Ok(Json(DataResponse::new(EditState { element_id, text })))
}

/// POST /api/v1/workspace/elements/{element_id}/edit/toggle
pub async fn toggle_edit(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(element_id): Path<ElementId>,
) -> AppResult<Json<DataResponse<EditMode>>> {
    let editing = state.workspace.toggle_edit(&element_id).await?;
    Ok(Json(DataResponse::new(EditMode {
        element_id,
        editing,
    })))
}

/// PUT /api/v1/workspace/elements/{element_id}/edit
pub async fn set_edit_buffer(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(element_id): Path<ElementId>,
    Json(input): Json<EditBufferRequest>,
) -> AppResult<Json<DataResponse<EditState>>> {
    if !state
        .workspace
        .set_edit_buffer(&element_id, input.text.clone())
        .await
    {
        return Err(element_not_found(&element_id));
    }
    Ok(Json(DataResponse::new(EditState {
        element_id,
        text: input.text,
    })))
}

/// DELETE /api/v1/workspace/elements/{element_id}/edit
pub async fn cancel_edit(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(element_id): Path<ElementId>,
) -> AppResult<StatusCode> {
    if !state.workspace.cancel_edit(&element_id).await {
        return Err(element_not_found(&element_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/workspace/elements/{element_id}/edit/commit
pub async fn commit_edit(
    _user: SessionUser,
    State(state): State<AppState>,
    Path(element_id): Path<ElementId>,
) -> AppResult<Json<DataResponse<ElementList>>> {
    if !state.workspace.commit_edit(&element_id).await? {
        return Err(element_not_found(&element_id));
    }
    Ok(Json(DataResponse::new(current_elements(&state).await?)))
}
