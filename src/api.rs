//! Unified API router for ContentGuard
//!
//! Merges the module routers into a single axum `Router` with CORS and
//! request tracing.
//!
//! ## Endpoint Map
//!
//! | Prefix                  | Module    | Description                        |
//! |-------------------------|-----------|------------------------------------|
//! | `/health`               | api       | Liveness probe                     |
//! | `/api/compliance/*`     | screening | Single and batch compliance checks |
//! | `/api/scaninfo`         | screening | ID-card and phone number scan      |
//! | `/api/training/*`       | training  | Training task start/stop/status    |

use crate::config::ContentGuardConfig;
use crate::error::{Error, Result};
use crate::screening::{screening_router, ScreeningService};
use crate::training::{training_router, TrainingOrchestrator};
use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Services exposed by this process
const SERVICES: [&str; 3] = ["compliance", "scaninfo", "training"];

/// Build the complete ContentGuard HTTP application
pub fn build_app(
    screening: ScreeningService,
    training: TrainingOrchestrator,
    cors_origins: &[String],
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(screening_router(screening))
        .merge(training_router(training))
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until Ctrl+C.
pub async fn serve(config: ContentGuardConfig) -> Result<()> {
    let screening = ScreeningService::from_config(&config)?;
    tracing::info!(
        terms = screening.matcher().term_count(),
        llm_configured = screening.llm_defaults().is_configured(),
        model = %screening.llm_defaults().model,
        "Screening service ready"
    );

    let training = TrainingOrchestrator::from_config(&config.training);
    let app = build_app(screening, training, &config.server.cors_origins);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| Error::Config(format!("Failed to bind to {}: {}", bind_addr, e)))?;

    tracing::info!("ContentGuard listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    services: [&'static str; 3],
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: "contentguard",
        version: env!("CARGO_PKG_VERSION"),
        services: SERVICES,
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}
