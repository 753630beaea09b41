//! HTTP server: recognition endpoint, pages, and health probes.

pub mod predict;
pub mod state;

pub use predict::PredictResponse;
pub use state::AppState;

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

/// The HTTP server.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Load the model and prepare the server.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_state(AppState::load(config))
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind and serve until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.addr;
        if !self.state.model_loaded() {
            tracing::warn!("server starting without a model; /predict_sign will return 500");
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(%addr, "listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        info!("server shutdown complete");
        Ok(())
    }
}

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let templates = state.config.templates_dir();
    let mut router = Router::new()
        .route_service("/", ServeFile::new(templates.join("index.html")))
        .route_service("/sign", ServeFile::new(templates.join("sign.html")))
        .nest_service("/static", ServeDir::new(state.config.static_dir()))
        .route("/predict_sign", post(predict::predict_sign))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .layer(TraceLayer::new_for_http());

    if state.config.cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn ready(State(state): State<Arc<AppState>>) -> Response {
    if state.model_loaded() {
        (StatusCode::OK, "Ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "No model loaded").into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
