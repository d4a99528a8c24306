//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::security;
use crate::state::AppState;
use crate::{assets, handlers, preview};

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/share", get(handlers::share::get_share))
        .route(
            "/api/theme",
            get(handlers::theme::get_theme).post(handlers::theme::set_theme),
        )
        .route("/healthz", get(handlers::status::healthz));

    Router::new()
        .route("/", get(assets::preview_page))
        .route("/assets/preview.js", get(assets::preview_script))
        .route("/assets/highlight.css", get(assets::highlight_css))
        .route("/ws/preview", get(preview::ws_handler))
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
