use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub chain: String,
    pub signer: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let chain_status = if state.reader.block_number().await.is_ok() {
        "connected".to_string()
    } else {
        "disconnected".to_string()
    };

    let signer_status = if state.executor.has_signer() {
        "configured".to_string()
    } else {
        "not configured".to_string()
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        chain: chain_status,
        signer: signer_status,
    })
}
