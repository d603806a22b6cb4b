use super::{PredictionProvider, ProviderError};
use crate::config::ReplicateConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const REPLICATE_API_URL: &str = "https://api.replicate.com/v1/predictions";

/// Image-edit model version pinned for this deployment.
const MODEL_VERSION: &str = "e3d8c079a7424ad2bfa31bb6d56a5eb2";

pub struct ReplicateProvider {
    config: ReplicateConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct PredictionRequest {
    version: &'static str,
    input: PredictionInput,
}

#[derive(Debug, Serialize)]
struct PredictionInput {
    image: String,
    prompt: String,
}

impl ReplicateProvider {
    pub fn new(config: ReplicateConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl PredictionProvider for ReplicateProvider {
    async fn create_prediction(
        &self,
        image: &str,
        prompt: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        if self.config.api_token.is_empty() {
            return Err(ProviderError::NotConfigured(
                "REPLICATE_API_TOKEN is not set".to_string(),
            ));
        }

        let request = PredictionRequest {
            version: MODEL_VERSION,
            input: PredictionInput {
                image: image.to_string(),
                prompt: prompt.to_string(),
            },
        };

        let response = self
            .client
            .post(REPLICATE_API_URL)
            .header("Authorization", format!("Token {}", self.config.api_token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Connection(format!("Failed to connect to Replicate: {}", e))
            })?;

        // The prediction body is relayed whatever the upstream status;
        // callers receive the initial (possibly pending) prediction object.
        let prediction: serde_json::Value = response.json().await.map_err(|e| {
            ProviderError::Api(format!("Failed to parse Replicate response: {}", e))
        })?;

        tracing::info!(
            status = ?prediction.get("status"),
            "Prediction created via Replicate"
        );

        Ok(prediction)
    }
}

/// Mock prediction provider for testing.
pub struct MockPredictionProvider {
    prediction: serde_json::Value,
    call_count: AtomicU64,
    last_input: Mutex<Option<(String, String)>>,
    fail: bool,
}

impl MockPredictionProvider {
    pub fn new(prediction: serde_json::Value) -> Self {
        Self {
            prediction,
            call_count: AtomicU64::new(0),
            last_input: Mutex::new(None),
            fail: false,
        }
    }

    /// A provider that fails every call at the transport layer.
    pub fn failing() -> Self {
        Self {
            prediction: serde_json::Value::Null,
            call_count: AtomicU64::new(0),
            last_input: Mutex::new(None),
            fail: true,
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<(String, String)> {
        self.last_input
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }
}

#[async_trait]
impl PredictionProvider for MockPredictionProvider {
    async fn create_prediction(
        &self,
        image: &str,
        prompt: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().expect("mock lock poisoned") =
            Some((image.to_string(), prompt.to_string()));

        if self.fail {
            return Err(ProviderError::Connection(
                "mock transport failure".to_string(),
            ));
        }

        tracing::info!(prompt = %prompt, "[MOCK] Prediction would be created");

        Ok(self.prediction.clone())
    }
}
