//! Health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub extractor: ExtractorStatus,
}

#[derive(Serialize)]
pub struct ExtractorStatus {
    pub name: String,
    pub available: bool,
}

/// Reports "degraded" when the page extractor cannot be run
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let extractor = state.split_service().extractor();
    let available = extractor.is_available().await;

    Json(HealthResponse {
        status: if available { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        service: "pdf-split-server",
        extractor: ExtractorStatus {
            name: extractor.name().to_string(),
            available,
        },
    })
}
