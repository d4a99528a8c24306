//! Share link endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use linkpad_share::CONTENT_PARAM;
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for `GET /api/share`.
#[derive(Debug, Serialize)]
pub(crate) struct ShareResponse {
    /// Full share link, or null when the document is empty.
    url: Option<String>,
    /// Bare token, or null when the document is empty.
    token: Option<String>,
}

/// Handle `GET /api/share`.
///
/// Encodes the current document into a share link. An empty document has
/// nothing worth carrying, so both fields come back null.
pub(crate) async fn get_share(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ShareResponse>, ServerError> {
    let text = tokio::fs::read_to_string(&state.file).await?;

    if text.trim().is_empty() {
        return Ok(Json(ShareResponse {
            url: None,
            token: None,
        }));
    }

    let token = linkpad_share::encode(&text);
    let url = share_link(&state.share_base, &token);
    tracing::debug!(
        document_bytes = text.len(),
        token_chars = token.len(),
        "share link built"
    );

    Ok(Json(ShareResponse {
        url: Some(url),
        token: Some(token),
    }))
}

/// Build the share link for an already encoded token.
fn share_link(base: &str, token: &str) -> String {
    format!("{}#{CONTENT_PARAM}={token}", base.trim_end_matches('#'))
}
