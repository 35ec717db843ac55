//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MetricsConfig;

static ARTIFACT_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/erd/[^/]+\.[A-Za-z0-9]+$").expect("valid regex"));

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Install the global Prometheus recorder. Returns `None` when disabled or
/// when a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig, generator_version: &str) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!(
                "dmsa_service_info",
                "version" => env!("CARGO_PKG_VERSION"),
                "generator_version" => generator_version.to_string()
            )
            .set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path().to_string();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Parameters for generator invocation metrics
pub struct GenerationMetricParams<'a> {
    /// "ddl" or "erd"
    pub kind: &'static str,
    pub model: &'a str,
    pub duration: Duration,
    pub success: bool,
}

/// Record one call to an external generator
pub fn record_generation(params: GenerationMetricParams) {
    let labels = [
        ("kind", params.kind.to_string()),
        ("model", params.model.to_string()),
        ("status", if params.success { "success" } else { "error" }.to_string()),
    ];

    counter!("dmsa_generations_total", &labels).increment(1);
    histogram!("dmsa_generation_duration_seconds", &labels).record(params.duration.as_secs_f64());

    if !params.success {
        counter!("dmsa_generation_errors_total", &labels).increment(1);
    }
}

/// Collapse artifact filenames and cap length so unmatched paths do not
/// explode label cardinality
fn sanitize_path(path: &str) -> String {
    let path = ARTIFACT_FILENAME.replace(path, "/erd/{filename}");

    match path.char_indices().nth(64) {
        Some((end, _)) => path[..end].to_string(),
        None => path.into_owned(),
    }
}
