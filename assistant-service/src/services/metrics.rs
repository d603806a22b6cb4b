//! Metrics collection for assistant-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
static CHAT_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
static PROVIDER_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize metrics collection. Called once from `main`.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }

    let registry = Registry::new();

    let chat_counter = IntCounterVec::new(
        Opts::new("chat_requests_total", "Total chat requests by outcome"),
        &["outcome"],
    )
    .expect("Failed to create chat_requests_total metric");

    let provider_calls_counter = IntCounterVec::new(
        Opts::new(
            "provider_calls_total",
            "Total provider API calls by provider and status",
        ),
        &["provider", "status"],
    )
    .expect("Failed to create provider_calls_total metric");

    registry
        .register(Box::new(chat_counter.clone()))
        .expect("Failed to register chat_requests_total");
    registry
        .register(Box::new(provider_calls_counter.clone()))
        .expect("Failed to register provider_calls_total");

    PROMETHEUS_REGISTRY
        .set(registry)
        .expect("Failed to set prometheus registry");
    CHAT_REQUESTS_TOTAL
        .set(chat_counter)
        .expect("Failed to set chat_requests_total");
    PROVIDER_CALLS_TOTAL
        .set(provider_calls_counter)
        .expect("Failed to set provider_calls_total");
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

/// Record a chat request outcome.
pub fn record_chat_request(outcome: &str) {
    if let Some(counter) = CHAT_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record a provider API call.
pub fn record_provider_call(provider: &str, status: &str) {
    if let Some(counter) = PROVIDER_CALLS_TOTAL.get() {
        counter.with_label_values(&[provider, status]).inc();
    }
}
