//! Health endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for `GET /healthz`.
#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: String,
    /// Document being previewed.
    document: String,
}

/// Handle `GET /healthz`.
pub(crate) async fn healthz(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: state.version.clone(),
        document: state.file.display().to_string(),
    })
}
