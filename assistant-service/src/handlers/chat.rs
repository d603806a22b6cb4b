use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::providers::ProviderError;
use crate::services::{confirmation, dispatch, metrics};
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub mensaje: String,
    pub uid: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub respuesta: String,
}

/// POST /api/chat
///
/// Relays the user message to the completion API and scans the reply for
/// a purchase confirmation. This route reports every failure inside the
/// `respuesta` field.
#[tracing::instrument(skip(state, request))]
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    if !state.chat.is_configured() {
        tracing::error!("Chat request rejected: completion API key is not configured");
        metrics::record_chat_request("unconfigured");
        return chat_error("Error: Falta la API key");
    }

    tracing::info!(message_len = request.mensaje.len(), "Relaying chat message");

    let respuesta = match state.chat.complete(&request.mensaje).await {
        Ok(respuesta) => {
            metrics::record_provider_call("openai", "sent");
            respuesta
        }
        Err(ProviderError::Api(message)) => {
            tracing::error!(error = %message, "Completion API returned an error");
            metrics::record_provider_call("openai", "failed");
            metrics::record_chat_request("error");
            return chat_error(&format!("Error OpenAI: {}", message));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reach the completion API");
            metrics::record_provider_call("openai", "failed");
            metrics::record_chat_request("error");
            return chat_error("Error con el servidor de IA");
        }
    };

    // The dispatch is detached on purpose: its outcome is logged by the
    // task and never joins the chat response.
    if confirmation::contains_confirmation_phrase(&respuesta) {
        if let Some(uid) = request.uid {
            let users = state.users.clone();
            let push = state.fcm.clone();
            tokio::spawn(async move {
                dispatch::notify_purchase_confirmed(users, push, &uid).await;
            });
        }
    }

    metrics::record_chat_request("ok");
    Json(ChatResponse { respuesta }).into_response()
}

fn chat_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatResponse {
            respuesta: message.to_string(),
        }),
    )
        .into_response()
}
