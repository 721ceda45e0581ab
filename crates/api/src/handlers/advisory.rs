//! Handlers for `/advisory`: the scripted assistant and funnel generator.

use axum::extract::State;
use axum::Json;
use kickflip_core::advisory::{GeneratedFunnel, FUNNEL_TYPES, INDUSTRIES};
use kickflip_core::chat::{ChatMessage, SUGGESTIONS};
use kickflip_core::element::ElementType;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub funnel_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub industries: &'static [&'static str],
    pub funnel_types: &'static [&'static str],
    pub suggestions: &'static [&'static str],
    pub palette: Vec<ElementType>,
}

/// GET /api/v1/advisory/chat
pub async fn transcript(State(state): State<AppState>) -> Json<DataResponse<Vec<ChatMessage>>> {
    let chat = state.chat.lock().await;
    Json(DataResponse::new(chat.messages().to_vec()))
}

/// POST /api/v1/advisory/chat
///
/// The transcript lock is released while the engine "thinks", so the
/// transcript stays readable during the simulated delay.
pub async fn chat(
    State(state): State<AppState>,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<DataResponse<ChatMessage>>> {
    if state.chat.lock().await.push_user(&input.message).is_none() {
        return Err(AppError::BadRequest("Message must not be empty".into()));
    }

    let reply = state.advisory.respond(&input.message).await;
    let message = state.chat.lock().await.push_reply(reply);
    Ok(Json(DataResponse::new(message)))
}

/// POST /api/v1/advisory/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<DataResponse<GeneratedFunnel>>> {
    let generated = state
        .advisory
        .generate(&input.industry, &input.funnel_type)
        .await?;
    Ok(Json(DataResponse::new(generated)))
}

/// GET /api/v1/advisory/catalog
pub async fn catalog() -> Json<DataResponse<Catalog>> {
    Json(DataResponse::new(Catalog {
        industries: &INDUSTRIES,
        funnel_types: &FUNNEL_TYPES,
        suggestions: &SUGGESTIONS,
        palette: ElementType::PALETTE.to_vec(),
    }))
}
