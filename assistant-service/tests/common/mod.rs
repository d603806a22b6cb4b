use assistant_service::config::{
    AppConfig, FcmConfig, MongoConfig, OneSignalConfig, OpenAiConfig, ReplicateConfig,
};
use assistant_service::models::UserRecord;
use assistant_service::services::{
    MemoryUserStore, MockCompletionProvider, MockPredictionProvider, MockPushProvider,
};
use assistant_service::startup::{router, AppState};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use std::time::Duration;

/// Mock collaborators injected into a [`TestApp`]. Override individual
/// fields to shape a scenario.
pub struct Mocks {
    pub chat: MockCompletionProvider,
    pub fcm: MockPushProvider,
    pub onesignal: MockPushProvider,
    pub replicate: MockPredictionProvider,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            chat: MockCompletionProvider::new("Hola, ¿en qué te puedo ayudar?"),
            fcm: MockPushProvider::new(),
            onesignal: MockPushProvider::new(),
            replicate: MockPredictionProvider::new(serde_json::json!({
                "id": "mock-prediction",
                "status": "starting",
            })),
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub users: Arc<MemoryUserStore>,
    pub chat: Arc<MockCompletionProvider>,
    pub fcm: Arc<MockPushProvider>,
    pub onesignal: Arc<MockPushProvider>,
    pub replicate: Arc<MockPredictionProvider>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Mocks::default()).await
    }

    pub async fn spawn_with(mocks: Mocks) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let chat = Arc::new(mocks.chat);
        let fcm = Arc::new(mocks.fcm);
        let onesignal = Arc::new(mocks.onesignal);
        let replicate = Arc::new(mocks.replicate);

        let config = AppConfig {
            common: CoreConfig { port: 0 },
            mongodb: MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "asistente_test".to_string(),
            },
            openai: OpenAiConfig {
                api_key: "test-key".to_string(),
                model: "gpt-4o".to_string(),
            },
            fcm: FcmConfig {
                project_id: "test-project".to_string(),
                access_token: "test-token".to_string(),
            },
            onesignal: OneSignalConfig {
                api_key: "test-key".to_string(),
                app_id: "test-app".to_string(),
            },
            replicate: ReplicateConfig {
                api_token: "test-token".to_string(),
            },
            static_dir: "public".to_string(),
        };

        let state = AppState {
            config,
            users: users.clone(),
            chat: chat.clone(),
            fcm: fcm.clone(),
            onesignal: onesignal.clone(),
            replicate: replicate.clone(),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener
            .local_addr()
            .expect("Failed to read local address")
            .port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.ok();
        });

        // Wait for the server to accept requests.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            users,
            chat,
            fcm,
            onesignal,
            replicate,
        }
    }

    pub fn seed_user(&self, uid: &str, push_token: Option<&str>, plan: &str) {
        self.users.insert(
            uid,
            UserRecord {
                push_token: push_token.map(str::to_string),
                plan: plan.to_string(),
            },
        );
    }
}

/// Polls until `count()` returns `expected`, for work that runs in a
/// detached task.
pub async fn wait_for_count(count: impl Fn() -> u64, expected: u64) -> bool {
    for _ in 0..40 {
        if count() == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    count() == expected
}
