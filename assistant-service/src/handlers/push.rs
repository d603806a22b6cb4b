use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::metrics;
use crate::services::providers::{ProviderResponse, PushMessage};
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct SendPushRequest {
    #[validate(
        required(message = "Falta el token del usuario"),
        length(min = 1, message = "Falta el token del usuario")
    )]
    pub token: Option<String>,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub mensaje: String,
}

#[derive(Debug, Serialize)]
pub struct SendPushResponse {
    pub success: bool,
    pub response: ProviderResponse,
}

/// POST /api/enviar-push
///
/// Sends a notification to the given device token via FCM and relays the
/// provider's response.
#[tracing::instrument(skip(state, request))]
pub async fn enviar_push(
    State(state): State<AppState>,
    Json(request): Json<SendPushRequest>,
) -> Result<Json<SendPushResponse>, AppError> {
    request.validate()?;
    let token = request.token.as_deref().unwrap_or_default();

    let message = PushMessage {
        device_token: token.to_string(),
        title: request.titulo,
        body: request.mensaje,
    };

    match state.fcm.send(&message).await {
        Ok(response) => {
            metrics::record_provider_call("fcm", "sent");
            tracing::info!(
                provider_id = ?response.provider_id,
                "Push notification sent"
            );
            Ok(Json(SendPushResponse {
                success: true,
                response,
            }))
        }
        Err(e) => {
            metrics::record_provider_call("fcm", "failed");
            tracing::error!(error = %e, "Failed to send push notification");
            Err(AppError::InternalError(anyhow::anyhow!(e.to_string())))
        }
    }
}
