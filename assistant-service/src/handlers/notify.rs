use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::services::metrics;
use crate::services::providers::PushMessage;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub uid: Option<String>,
}

/// POST /api/notificar
///
/// Resolves the stored push token for `uid` and delivers through
/// OneSignal. This route wraps every outcome in an `ok` flag, so
/// responses are shaped here instead of going through `AppError`.
#[tracing::instrument(skip(state, request))]
pub async fn notificar(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Response {
    let Some(uid) = request.uid else {
        return notify_error(StatusCode::BAD_REQUEST, "Falta el uid del usuario");
    };

    let record = match state.users.find_user(&uid).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(uid = %uid, error = %e, "User lookup failed");
            return notify_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    let Some(token) = record.and_then(|r| r.push_token) else {
        tracing::warn!(uid = %uid, "User has no push token");
        return notify_error(StatusCode::BAD_REQUEST, "Este usuario no tiene pushToken");
    };

    let message = PushMessage {
        device_token: token,
        title: request.title,
        body: request.body,
    };

    match state.onesignal.send(&message).await {
        Ok(_) => {
            metrics::record_provider_call("onesignal", "sent");
            Json(json!({ "ok": true })).into_response()
        }
        Err(e) => {
            metrics::record_provider_call("onesignal", "failed");
            tracing::error!(uid = %uid, error = %e, "Failed to send push via OneSignal");
            notify_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn notify_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "ok": false, "error": message }))).into_response()
}
