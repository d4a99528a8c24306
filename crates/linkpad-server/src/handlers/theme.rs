//! Theme endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use linkpad_pipeline::Theme;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Body for `POST /api/theme`.
#[derive(Debug, Deserialize)]
pub(crate) struct ThemeRequest {
    theme: Theme,
}

/// Response for both theme endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct ThemeResponse {
    theme: Theme,
}

/// Handle `GET /api/theme`.
pub(crate) async fn get_theme(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    let theme = *state.theme.read().unwrap();
    Json(ThemeResponse { theme })
}

/// Handle `POST /api/theme`.
///
/// Switches the preview theme. Clients hear about it over the WebSocket
/// and re-rendered frames follow.
pub(crate) async fn set_theme(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ThemeRequest>,
) -> Json<ThemeResponse> {
    *state.theme.write().unwrap() = request.theme;
    state.driver.set_theme(request.theme).await;
    tracing::info!(theme = %request.theme, "preview theme switched");
    Json(ThemeResponse {
        theme: request.theme,
    })
}
