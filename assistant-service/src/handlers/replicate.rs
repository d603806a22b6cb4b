use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::metrics;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub prompt: String,
}

/// POST /api/replicate
///
/// Forwards the image/prompt pair to the prediction API and relays the
/// raw prediction object. No polling: callers get the initial (possibly
/// pending) prediction.
#[tracing::instrument(skip(state, request))]
pub async fn create_prediction(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<Value>, AppError> {
    let prediction = state
        .replicate
        .create_prediction(&request.image, &request.prompt)
        .await
        .map_err(|e| {
            metrics::record_provider_call("replicate", "failed");
            tracing::error!(error = %e, "Failed to create prediction");
            AppError::InternalError(anyhow::anyhow!("Error interno"))
        })?;

    metrics::record_provider_call("replicate", "sent");
    Ok(Json(json!({ "prediction": prediction })))
}
