//! Diagram rendering backends.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use ureq::Agent;

/// Default HTTP timeout for diagram service requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Theme passed to the diagram service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiagramTheme {
    /// Mermaid's default (light) theme.
    #[default]
    Default,
    /// Mermaid's dark theme.
    Dark,
}

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("diagram service request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("diagram service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("diagram render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Renders diagram source text to inline markup.
///
/// Implementations are theme-aware: [`configure`](Self::configure) applies
/// to every subsequent render, and callers drop cached markup when they
/// switch theme.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Apply the preview theme to subsequent renders.
    fn configure(&mut self, theme: DiagramTheme);

    /// Render one diagram. `id` identifies the container being filled and
    /// only serves logging; the markup is addressed by source text.
    async fn render(&self, id: &str, source: &str) -> Result<String, DiagramError>;
}

/// Diagram renderer backed by a Kroki server.
///
/// POSTs mermaid source to `{base_url}/mermaid/svg` and returns the SVG
/// body. The dark theme is applied by prepending a mermaid init directive
/// to the posted source; the caller's cache key stays the raw source.
pub struct KrokiRenderer {
    base_url: String,
    agent: Agent,
    theme: DiagramTheme,
}

impl KrokiRenderer {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            agent: create_agent(DEFAULT_TIMEOUT),
            theme: DiagramTheme::default(),
        }
    }

    /// Set the HTTP timeout for render requests.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    fn themed_source(&self, source: &str) -> String {
        match self.theme {
            DiagramTheme::Default => source.to_owned(),
            DiagramTheme::Dark => format!("%%{{init: {{\"theme\": \"dark\"}}}}%%\n{source}"),
        }
    }
}

#[async_trait]
impl DiagramRenderer for KrokiRenderer {
    fn configure(&mut self, theme: DiagramTheme) {
        self.theme = theme;
    }

    async fn render(&self, id: &str, source: &str) -> Result<String, DiagramError> {
        let url = format!("{}/mermaid/svg", self.base_url);
        let agent = self.agent.clone();
        let body = self.themed_source(source);
        let id = id.to_owned();
        tokio::task::spawn_blocking(move || post_diagram(&agent, &url, &body, &id)).await?
    }
}

/// Create an HTTP agent with the specified timeout.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

fn post_diagram(agent: &Agent, url: &str, source: &str, id: &str) -> Result<String, DiagramError> {
    let started = Instant::now();
    let response = agent
        .post(url)
        .header("Content-Type", "text/plain")
        .send(source.as_bytes())?;

    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let details = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(DiagramError::Status {
            status,
            body: details,
        });
    }

    let svg = body.read_to_string()?;
    tracing::debug!(
        id,
        status,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "diagram rendered"
    );
    Ok(svg)
}
