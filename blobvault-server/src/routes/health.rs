use crate::state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub network: String,
    pub mirrors: Vec<MirrorHealth>,
}

#[derive(Serialize)]
pub struct MirrorHealth {
    pub name: String,
    pub healthy: bool,
    pub upload: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let set = state.relay.mirrors();
    let mirrors = set
        .mirrors()
        .iter()
        .enumerate()
        .map(|(idx, mirror)| MirrorHealth {
            name: mirror.name().to_string(),
            healthy: set.is_healthy(idx),
            upload: mirror.can_upload(),
        })
        .collect();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        network: state.config.network.to_string(),
        mirrors,
    })
}
