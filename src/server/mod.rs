//! HTTP surface: one POST route over the analysis pipeline.
//!
//! The router is a plain function over [`AppState`] so integration tests can
//! drive it in-process (tower `oneshot`) with an injected mock model, and
//! the binary can serve the identical router over a real listener.

pub mod envelope;
pub mod handler;

use crate::config::AnalysisConfig;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: AnalysisConfig,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    // Scanned transcripts can be large; accept up to 50 MB bodies.
    let body_limit = axum::extract::DefaultBodyLimit::max(50 * 1024 * 1024);

    Router::new()
        .route("/analiseHistorico", post(handler::analise_historico))
        .layer(body_limit)
        .with_state(state)
}
