//! Application startup and lifecycle management.
//!
//! Builds the shared state, the router, and the HTTP server. All
//! collaborators are process-lifetime singletons injected at build time
//! so tests can substitute their own implementations.

use crate::config::AppConfig;
use crate::handlers;
use crate::services::{
    get_metrics, CompletionProvider, FcmProvider, MongoUserStore, OneSignalProvider,
    OpenAiProvider, PredictionProvider, PushProvider, ReplicateProvider, UserStore,
};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub users: Arc<dyn UserStore>,
    pub chat: Arc<dyn CompletionProvider>,
    pub fcm: Arc<dyn PushProvider>,
    pub onesignal: Arc<dyn PushProvider>,
    pub replicate: Arc<dyn PredictionProvider>,
}

/// Prometheus metrics endpoint.
async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

/// Build the router for the given state.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/enviar-push", post(handlers::push::enviar_push))
        .route("/api/notificar", post(handlers::notify::notificar))
        .route("/api/replicate", post(handlers::replicate::create_prediction))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        let users = MongoUserStore::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        tracing::info!(
            openai_configured = !config.openai.api_key.is_empty(),
            fcm_configured = !config.fcm.access_token.is_empty(),
            onesignal_configured = !config.onesignal.api_key.is_empty(),
            replicate_configured = !config.replicate.api_token.is_empty(),
            "Provider credentials loaded"
        );

        let chat: Arc<dyn CompletionProvider> =
            Arc::new(OpenAiProvider::new(config.openai.clone()));
        let fcm: Arc<dyn PushProvider> = Arc::new(FcmProvider::new(config.fcm.clone()));
        let onesignal: Arc<dyn PushProvider> =
            Arc::new(OneSignalProvider::new(config.onesignal.clone()));
        let replicate: Arc<dyn PredictionProvider> =
            Arc::new(ReplicateProvider::new(config.replicate.clone()));

        let state = AppState {
            config: config.clone(),
            users: Arc::new(users),
            chat,
            fcm,
            onesignal,
            replicate,
        };

        // Port 0 selects a random port, used by the test harness.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("assistant-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
