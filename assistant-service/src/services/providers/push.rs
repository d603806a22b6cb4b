use super::{ProviderError, ProviderResponse, PushMessage, PushProvider};
use crate::config::{FcmConfig, OneSignalConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const FCM_API_URL: &str = "https://fcm.googleapis.com/v1/projects";
const ONESIGNAL_API_URL: &str = "https://onesignal.com/api/v1/notifications";

pub struct FcmProvider {
    config: FcmConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct FcmRequest {
    message: FcmMessage,
}

#[derive(Debug, Serialize)]
struct FcmMessage {
    token: String,
    notification: FcmNotification,
}

#[derive(Debug, Serialize)]
struct FcmNotification {
    title: String,
    body: String,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    name: Option<String>,
    #[serde(default)]
    error: Option<FcmError>,
}

#[derive(Debug, Deserialize)]
struct FcmError {
    message: String,
    status: String,
}

impl FcmProvider {
    pub fn new(config: FcmConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    // The deployment injects a ready-to-use OAuth2 access token; exchanging
    // service-account credentials happens outside this service.
    fn access_token(&self) -> Result<&str, ProviderError> {
        if self.config.access_token.is_empty() {
            return Err(ProviderError::NotConfigured(
                "FCM access token is not set".to_string(),
            ));
        }
        Ok(&self.config.access_token)
    }
}

#[async_trait]
impl PushProvider for FcmProvider {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError> {
        if self.config.project_id.is_empty() {
            return Err(ProviderError::NotConfigured(
                "FCM project_id is not set".to_string(),
            ));
        }

        let access_token = self.access_token()?;

        let request = FcmRequest {
            message: FcmMessage {
                token: push.device_token.clone(),
                notification: FcmNotification {
                    title: push.title.clone(),
                    body: push.body.clone(),
                },
            },
        };

        let url = format!("{}/{}/messages:send", FCM_API_URL, self.config.project_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("Failed to connect to FCM: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "FCM API returned error status {}: {}",
                status, body
            )));
        }

        let fcm_response: FcmResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(format!("Failed to parse FCM response: {}", e)))?;

        if let Some(error) = fcm_response.error {
            return Err(ProviderError::Api(format!(
                "FCM error ({}): {}",
                error.status, error.message
            )));
        }

        tracing::info!(
            device_token = %push.device_token,
            "Push notification sent via FCM"
        );

        Ok(ProviderResponse::success(fcm_response.name))
    }
}

pub struct OneSignalProvider {
    config: OneSignalConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct OneSignalRequest {
    app_id: String,
    include_player_ids: Vec<String>,
    headings: LocalizedText,
    contents: LocalizedText,
}

/// OneSignal takes localized maps; this service always sends locale "en".
#[derive(Debug, Serialize)]
struct LocalizedText {
    en: String,
}

#[derive(Debug, Deserialize)]
struct OneSignalResponse {
    id: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl OneSignalProvider {
    pub fn new(config: OneSignalConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn build_request(&self, push: &PushMessage) -> OneSignalRequest {
        OneSignalRequest {
            app_id: self.config.app_id.clone(),
            include_player_ids: vec![push.device_token.clone()],
            headings: LocalizedText {
                en: push.title.clone(),
            },
            contents: LocalizedText {
                en: push.body.clone(),
            },
        }
    }
}

#[async_trait]
impl PushProvider for OneSignalProvider {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError> {
        if self.config.api_key.is_empty() || self.config.app_id.is_empty() {
            return Err(ProviderError::NotConfigured(
                "OneSignal credentials are not set".to_string(),
            ));
        }

        let request = self.build_request(push);

        let response = self
            .client
            .post(ONESIGNAL_API_URL)
            .header("Authorization", format!("Basic {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Connection(format!("Failed to connect to OneSignal: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "OneSignal API returned error status {}: {}",
                status, body
            )));
        }

        let onesignal_response: OneSignalResponse = response.json().await.map_err(|e| {
            ProviderError::Api(format!("Failed to parse OneSignal response: {}", e))
        })?;

        // Per-recipient errors are reported inline; log them without parsing.
        if let Some(errors) = &onesignal_response.errors {
            tracing::warn!(errors = %errors, "OneSignal reported delivery errors");
        }

        tracing::info!(
            id = ?onesignal_response.id,
            device_token = %push.device_token,
            "Push notification sent via OneSignal"
        );

        Ok(ProviderResponse::success(onesignal_response.id))
    }
}

/// Mock push provider for testing.
pub struct MockPushProvider {
    send_count: AtomicU64,
    last_message: Mutex<Option<PushMessage>>,
    fail_with: Option<String>,
}

impl MockPushProvider {
    pub fn new() -> Self {
        Self {
            send_count: AtomicU64::new(0),
            last_message: Mutex::new(None),
            fail_with: None,
        }
    }

    /// A provider that fails every send with the given upstream message.
    pub fn failing(message: &str) -> Self {
        Self {
            send_count: AtomicU64::new(0),
            last_message: Mutex::new(None),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn last_message(&self) -> Option<PushMessage> {
        self.last_message
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }
}

impl Default for MockPushProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushProvider for MockPushProvider {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().expect("mock lock poisoned") = Some(push.clone());

        if let Some(message) = &self.fail_with {
            return Err(ProviderError::Api(message.clone()));
        }

        tracing::info!(
            device_token = %push.device_token,
            title = %push.title,
            "[MOCK] Push notification would be sent"
        );

        Ok(ProviderResponse::success(Some(format!(
            "mock-push-{}",
            self.send_count.load(Ordering::SeqCst)
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onesignal_request_uses_the_en_locale_for_heading_and_content() {
        let provider = OneSignalProvider::new(OneSignalConfig {
            api_key: "key".to_string(),
            app_id: "app".to_string(),
        });
        let push = PushMessage {
            device_token: "player-1".to_string(),
            title: "Aviso".to_string(),
            body: "Tu pedido salió".to_string(),
        };

        let request = provider.build_request(&push);
        let value = serde_json::to_value(&request).expect("request should serialize");

        assert_eq!(value["app_id"], "app");
        assert_eq!(value["include_player_ids"], serde_json::json!(["player-1"]));
        assert_eq!(value["headings"], serde_json::json!({ "en": "Aviso" }));
        assert_eq!(value["contents"], serde_json::json!({ "en": "Tu pedido salió" }));
    }
}
