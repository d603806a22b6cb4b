use super::{CompletionProvider, ProviderError};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Fixed instructions for the shop assistant.
const SYSTEM_PROMPT: &str = "Sos una asistente virtual para un emprendimiento. \
     Respondé consultas de productos, envíos, pagos, talles. Sé clara, amable y breve.";

/// Reply used when the completion comes back without any choice text.
const EMPTY_REPLY: &str = "Sin respuesta";

pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

fn extract_reply(completion: ChatCompletionResponse) -> String {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| EMPTY_REPLY.to_string())
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, message: &str) -> Result<String, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: message.to_string(),
                },
            ],
        };

        tracing::debug!(
            model = %self.config.model,
            message_len = message.len(),
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Connection(format!("Failed to connect to OpenAI: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or_else(|| format!("OpenAI API returned error status {}", status));
            return Err(ProviderError::Api(message));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::Api(format!("Failed to parse OpenAI response: {}", e))
        })?;

        Ok(extract_reply(completion))
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }
}

/// Mock completion provider for testing.
pub struct MockCompletionProvider {
    configured: bool,
    reply: String,
    call_count: AtomicU64,
    last_message: Mutex<Option<String>>,
}

impl MockCompletionProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            configured: true,
            reply: reply.to_string(),
            call_count: AtomicU64::new(0),
            last_message: Mutex::new(None),
        }
    }

    /// A provider whose credential is missing; `complete` still counts the
    /// attempt so tests can assert that no call was made.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            reply: String::new(),
            call_count: AtomicU64::new(0),
            last_message: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_message(&self) -> Option<String> {
        self.last_message
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, message: &str) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().expect("mock lock poisoned") = Some(message.to_string());

        if !self.configured {
            return Err(ProviderError::NotConfigured(
                "Mock completion provider is not configured".to_string(),
            ));
        }

        tracing::info!(message_len = message.len(), "[MOCK] Completion would be requested");

        Ok(self.reply.clone())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
