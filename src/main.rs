mod app_state;
mod auth;
mod config;
mod error;
mod models;
mod routes;
mod services;

use axum::response::Html;
use axum::{routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use app_state::AppState;
use auth::SessionVerifier;
use config::AppConfig;
use services::{tryon::VModelClient, vision::AnthropicClient};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing virtual-stylist server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!("tryon_jobs_total", "Total try-on jobs submitted");
    metrics::describe_counter!("tryon_jobs_succeeded", "Total try-on jobs that produced an image");
    metrics::describe_counter!("tryon_jobs_failed", "Total try-on jobs that failed or timed out");
    metrics::describe_histogram!(
        "tryon_duration_seconds",
        "End-to-end time for one try-on submit-and-poll sequence"
    );
    metrics::describe_histogram!(
        "tryon_poll_attempts",
        "Number of get-job calls needed to finish a try-on job"
    );
    metrics::describe_counter!("analyze_requests_total", "Total outfit analysis requests");

    // Initialize upstream provider clients
    tracing::info!("Initializing VModel try-on client");
    let tryon_client = VModelClient::new(&config.vmodel_base_url, &config.vmodel_api_key);

    tracing::info!(model = %config.anthropic_model, "Initializing Anthropic vision client");
    let vision_client = AnthropicClient::new(
        &config.anthropic_base_url,
        &config.anthropic_api_key,
        &config.anthropic_model,
    );

    // Initialize session token verification
    let sessions = SessionVerifier::new(&config.session_secret);

    // Create shared application state
    let state = AppState::new(tryon_client, vision_client, sessions);

    // API endpoints sit behind the session gate; everything else is public
    let api = Router::new()
        .route("/api/v1/tryon", post(routes::tryon::submit_tryon))
        .route("/api/v1/analyze", post(routes::analyze::analyze_outfit))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let app = Router::new()
        // Static demo UI (embedded at compile time)
        .route("/", get(|| async { Html(include_str!("../static/index.html")) }))
        .route("/health", get(routes::health::health_check))
        .merge(api)
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)); // 10 MB limit

    tracing::info!("Starting virtual-stylist on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
