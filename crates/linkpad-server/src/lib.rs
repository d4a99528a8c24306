//! HTTP server for the Linkpad preview.
//!
//! This crate serves a watched markdown document as a live HTML preview:
//! - Embedded preview page and client script
//! - WebSocket endpoint streaming rendered frames
//! - API endpoints for share links and theme switching
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use linkpad_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 7878,
//!         file: PathBuf::from("pad.md"),
//!         kroki_url: Some("https://kroki.io".to_string()),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Editor saves ──► notify watcher ──► debouncer ──► render pipeline
//!                                                        │
//! Browser ◄──WebSocket frames─── broadcast channel ◄─────┘
//!    │
//!    └──HTTP──► preview page, highlight stylesheet, share/theme API
//! ```

mod app;
mod assets;
mod error;
mod handlers;
mod middleware;
mod preview;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use linkpad_diagrams::KrokiRenderer;
use linkpad_pipeline::{DEFAULT_DEBOUNCE, RenderPipeline, Theme};
use preview::{BroadcastSurface, LatestFrame, PreviewDriver};
use state::{AppState, Stylesheets};
use tokio::sync::broadcast;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Markdown document to watch and preview.
    pub file: PathBuf,
    /// Initial preview theme.
    pub theme: Theme,
    /// Quiet period between a save and its render.
    pub debounce: Duration,
    /// Kroki URL for diagrams (`None` leaves diagram source as text).
    pub kroki_url: Option<String>,
    /// Timeout for diagram service requests.
    pub kroki_timeout: Duration,
    /// Base URL for share links (`None` derives it from host and port).
    pub share_base_url: Option<String>,
    /// Share link to seed the document from before serving.
    pub from_link: Option<String>,
    /// Overwrite an existing document when seeding from a link.
    pub force_seed: bool,
    /// Application version (reported by the health endpoint).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            file: PathBuf::from("pad.md"),
            theme: Theme::default(),
            debounce: DEFAULT_DEBOUNCE,
            kroki_url: None,
            kroki_timeout: Duration::from_secs(30),
            share_base_url: None,
            from_link: None,
            force_seed: false,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the document cannot be seeded, the watcher cannot
/// be created, or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    seed_document(&config)?;

    // Frame fan-out: the pipeline publishes, every websocket subscribes
    let (events, _rx) = broadcast::channel(100);
    let latest: LatestFrame = Arc::default();
    let surface = BroadcastSurface::new(events.clone(), Arc::clone(&latest));

    let mut pipeline = RenderPipeline::new(surface)
        .with_theme(config.theme)
        .with_debounce(config.debounce);
    if let Some(kroki_url) = &config.kroki_url {
        let renderer = KrokiRenderer::new(kroki_url.clone()).timeout(config.kroki_timeout);
        pipeline = pipeline.with_diagram_renderer(renderer);
    } else {
        tracing::info!("no diagram service configured, diagram blocks keep their source text");
    }

    let mut driver = PreviewDriver::new(config.file.clone(), events, latest);
    driver.start(pipeline)?;

    let share_base = config
        .share_base_url
        .clone()
        .unwrap_or_else(|| format!("http://{}:{}/", config.host, config.port));

    // Create app state
    let state = Arc::new(AppState {
        file: config.file.clone(),
        driver,
        theme: RwLock::new(config.theme),
        stylesheets: Stylesheets::generate()?,
        share_base,
        version: config.version.clone(),
    });

    // Create router
    let app = app::create_router(state);

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, document = %config.file.display(), "Starting preview server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Make sure the watched document exists before the server starts.
///
/// A share link seeds the document when the file is missing (or `--force`
/// is given); otherwise a missing file gets the welcome document.
fn seed_document(config: &ServerConfig) -> std::io::Result<()> {
    if let Some(link) = &config.from_link {
        if config.file.exists() && !config.force_seed {
            tracing::warn!(
                path = %config.file.display(),
                "document already exists, ignoring share link (use --force to overwrite)"
            );
            return Ok(());
        }
        if let Some(text) = linkpad_share::document_from_url(link) {
            std::fs::write(&config.file, text)?;
            tracing::info!(path = %config.file.display(), "document seeded from share link");
            return Ok(());
        }
        tracing::warn!("share link carries no document, falling back to the welcome document");
    }

    if !config.file.exists() {
        std::fs::write(&config.file, linkpad_editor::DEFAULT_DOCUMENT)?;
        tracing::info!(path = %config.file.display(), "created document with the welcome content");
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Linkpad config.
///
/// # Arguments
///
/// * `config` - Linkpad configuration
/// * `file` - Document to watch
/// * `version` - Application version
#[must_use]
pub fn server_config_from_linkpad_config(
    config: &linkpad_config::Config,
    file: PathBuf,
    version: String,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        file,
        // Validated at load time, so an unparsable theme cannot get here.
        theme: config.preview.theme.parse().unwrap_or_default(),
        debounce: Duration::from_millis(config.preview.debounce_ms),
        kroki_url: config.diagrams_resolved.kroki_url.clone(),
        kroki_timeout: Duration::from_secs(config.diagrams_resolved.timeout_secs),
        share_base_url: config.share.base_url.clone(),
        from_link: None,
        force_seed: false,
        version,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config_for(file: PathBuf) -> ServerConfig {
        ServerConfig {
            file,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn seeding_creates_the_welcome_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pad.md");

        seed_document(&config_for(file.clone())).unwrap();

        let text = std::fs::read_to_string(&file).unwrap();
        assert_eq!(text, linkpad_editor::DEFAULT_DOCUMENT);
    }

    #[test]
    fn seeding_leaves_an_existing_document_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pad.md");
        std::fs::write(&file, "# Mine\n").unwrap();

        seed_document(&config_for(file.clone())).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "# Mine\n");
    }

    #[test]
    fn seeding_from_a_share_link_writes_the_decoded_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pad.md");
        let link = format!(
            "http://localhost:7878/#content={}",
            linkpad_share::encode("# Shared\n\ncarried by the link\n")
        );

        let mut config = config_for(file.clone());
        config.from_link = Some(link);
        seed_document(&config).unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "# Shared\n\ncarried by the link\n"
        );
    }

    #[test]
    fn share_link_does_not_clobber_an_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pad.md");
        std::fs::write(&file, "# Mine\n").unwrap();
        let link = format!(
            "http://localhost:7878/#content={}",
            linkpad_share::encode("# Theirs\n")
        );

        let mut config = config_for(file.clone());
        config.from_link = Some(link);
        seed_document(&config).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "# Mine\n");
    }

    #[test]
    fn force_overwrites_an_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pad.md");
        std::fs::write(&file, "# Mine\n").unwrap();
        let link = format!(
            "http://localhost:7878/#content={}",
            linkpad_share::encode("# Theirs\n")
        );

        let mut config = config_for(file.clone());
        config.from_link = Some(link);
        config.force_seed = true;
        seed_document(&config).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "# Theirs\n");
    }

    #[test]
    fn an_unreadable_share_link_falls_back_to_the_welcome_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pad.md");

        let mut config = config_for(file.clone());
        config.from_link = Some("http://localhost:7878/#content=%%%garbage".to_string());
        seed_document(&config).unwrap();

        let text = std::fs::read_to_string(&file).unwrap();
        assert_eq!(text, linkpad_editor::DEFAULT_DOCUMENT);
    }

    #[test]
    fn linkpad_config_maps_onto_server_config() {
        let mut config = linkpad_config::Config::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 9000;
        config.preview.theme = "light".to_string();
        config.preview.debounce_ms = 150;
        config.share.base_url = Some("https://pad.example.com/".to_string());

        let server = server_config_from_linkpad_config(
            &config,
            PathBuf::from("notes.md"),
            "1.2.3".to_string(),
        );

        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 9000);
        assert_eq!(server.file, PathBuf::from("notes.md"));
        assert_eq!(server.theme, Theme::Light);
        assert_eq!(server.debounce, Duration::from_millis(150));
        assert_eq!(
            server.share_base_url.as_deref(),
            Some("https://pad.example.com/")
        );
        assert_eq!(server.version, "1.2.3");
    }
}
