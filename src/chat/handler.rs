//! `POST /api/chat`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::chat::conversation::Conversation;
use crate::chat::provider::{ChatError, ChatMessage, Persona, ResponseProvider};
use crate::observability::metrics;

#[derive(Clone)]
pub struct ChatState {
    pub provider: Arc<dyn ResponseProvider>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub persona: Persona,
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub messages: Vec<ChatMessage>,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match self {
            ChatError::Provider(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn chat_handler(
    State(state): State<ChatState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let Json(request) = payload.map_err(|e| ChatError::InvalidRequest(e.body_text()))?;
    request.persona.validate()?;

    let mut conversation = Conversation::with_history(request.persona, request.history);
    let reply = conversation.send(state.provider.as_ref(), &request.message).await?;

    tracing::info!(persona = %conversation.persona().id, "Chat reply sent");
    metrics::record_chat_reply();

    Ok(Json(ChatResponse {
        reply,
        messages: conversation.into_messages(),
    }))
}
