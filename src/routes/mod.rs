//! Route modules for the PDF split server

pub mod health;
pub mod split;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the application router (without the tracing layer added in `main`)
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().server.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .merge(split::router(body_limit))
        .with_state(state)
}
