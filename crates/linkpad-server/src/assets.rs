//! Embedded preview page assets.
//!
//! The page, its client script, and the highlight stylesheet are baked
//! into the binary so the server runs from a single executable.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};

use crate::state::AppState;

/// The preview page markup.
const PREVIEW_PAGE: &str = include_str!("../assets/preview.html");

/// Client script wiring the frame stream to the preview pane.
const PREVIEW_SCRIPT: &str = include_str!("../assets/preview.js");

/// Handle `GET /`.
pub(crate) async fn preview_page() -> Html<&'static str> {
    Html(PREVIEW_PAGE)
}

/// Handle `GET /assets/preview.js`.
pub(crate) async fn preview_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        PREVIEW_SCRIPT,
    )
}

/// Handle `GET /assets/highlight.css`.
///
/// Serves the stylesheet for the active theme, marked no-cache so a
/// theme switch takes effect on the next fetch.
pub(crate) async fn highlight_css(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let theme = *state.theme.read().unwrap();
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        state.stylesheets.for_theme(theme).to_owned(),
    )
}
