pub mod openai;
pub mod push;
pub mod replicate;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use openai::{MockCompletionProvider, OpenAiProvider};
pub use push::{FcmProvider, MockPushProvider, OneSignalProvider};
pub use replicate::{MockPredictionProvider, ReplicateProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Connection error: {0}")]
    Connection(String),

    // The upstream message is relayed as-is; callers put it on the wire.
    #[error("{0}")]
    Api(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
    pub success: bool,
}

impl ProviderResponse {
    pub fn success(provider_id: Option<String>) -> Self {
        Self {
            provider_id,
            success: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PushMessage {
    pub device_token: String,
    pub title: String,
    pub body: String,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, message: &str) -> Result<String, ProviderError>;
    fn is_configured(&self) -> bool;
}

#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError>;
}

#[async_trait]
pub trait PredictionProvider: Send + Sync {
    async fn create_prediction(
        &self,
        image: &str,
        prompt: &str,
    ) -> Result<serde_json::Value, ProviderError>;
}
