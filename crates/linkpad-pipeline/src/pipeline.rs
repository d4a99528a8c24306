//! The render pipeline behind the live preview.
//!
//! A single driver task owns a [`RenderPipeline`] and calls
//! [`tick`](RenderPipeline::tick) on an interval. Edits arrive through
//! [`request_render`](RenderPipeline::request_render) and sit in the
//! debouncer; theme switches and initial loads go through
//! [`on_theme_change`](RenderPipeline::on_theme_change) and
//! [`render_now`](RenderPipeline::render_now). Each pass renders markdown
//! to HTML, pushes it to the [`PreviewSurface`], then materializes
//! diagrams one by one, reusing cached markup for unchanged sources.

use std::sync::Arc;
use std::time::{Duration, Instant};

use syntect::parsing::SyntaxSet;
use thiserror::Error;

use linkpad_diagrams::{
    DiagramCache, DiagramProcessor, DiagramRenderer, error_markup, extract_placeholders,
    substitute,
};
use linkpad_renderer::{
    HighlightProcessor, HtmlRenderer, default_syntaxes, escape_html, theme_stylesheet,
};

use crate::debounce::RenderDebouncer;
use crate::surface::PreviewSurface;
use crate::theme::Theme;

/// Quiet period applied to debounced render requests.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Markup shown when the document is empty or whitespace-only.
pub const EMPTY_STATE_HTML: &str = r#"<div class="preview-empty">
  <svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round">
    <path d="M11 4H4a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2v-7"/>
    <path d="M18.5 2.5a2.121 2.121 0 0 1 3 3L12 15l-4 1 1-4 9.5-9.5z"/>
  </svg>
  <p>Start typing in your editor to see the markdown rendered here.</p>
</div>"#;

/// Error from the structural markdown render.
///
/// Raised by [`DocumentRenderer`] implementations when the document cannot
/// be turned into HTML. The pipeline contains it as an inline error
/// paragraph instead of propagating.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StructuralError {
    message: String,
}

impl StructuralError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Structural markdown rendering stage.
///
/// Takes the full document text and produces the preview HTML fragment,
/// including diagram containers and highlighted code.
pub trait DocumentRenderer: Send {
    fn render(&mut self, markdown: &str) -> Result<String, StructuralError>;
}

/// Production [`DocumentRenderer`]: pulldown-cmark with diagram containers
/// and syntect highlighting.
///
/// The syntax set loads once and is shared across passes; the event-loop
/// renderer and processors are rebuilt per pass so diagram ids and heading
/// slugs restart from a clean state.
pub struct PreviewRenderer {
    syntaxes: Arc<SyntaxSet>,
}

impl PreviewRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntaxes: Arc::new(default_syntaxes()),
        }
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for PreviewRenderer {
    fn render(&mut self, markdown: &str) -> Result<String, StructuralError> {
        let html = HtmlRenderer::new()
            .with_processor(DiagramProcessor::new())
            .with_processor(HighlightProcessor::new(Arc::clone(&self.syntaxes)))
            .render_markdown(markdown);
        Ok(html)
    }
}

/// Debounced, cache-aware preview pipeline.
///
/// Owned by a single driver task. Requests arrive through the shared
/// debouncer from any thread; rendering happens only in `tick`,
/// `render_now` and `on_theme_change` on the owning task, so one pass can
/// never overlap another and the newest text always renders last.
pub struct RenderPipeline<S> {
    renderer: Box<dyn DocumentRenderer>,
    diagram_renderer: Option<Box<dyn DiagramRenderer>>,
    cache: DiagramCache,
    debouncer: Arc<RenderDebouncer>,
    surface: S,
    theme: Theme,
    stylesheet: String,
    last_text: String,
}

impl<S: PreviewSurface> RenderPipeline<S> {
    /// Create a pipeline rendering onto `surface` with defaults: the
    /// production renderer, no diagram service, dark theme, 300 ms
    /// debounce.
    #[must_use]
    pub fn new(surface: S) -> Self {
        let theme = Theme::default();
        Self {
            renderer: Box::new(PreviewRenderer::new()),
            diagram_renderer: None,
            cache: DiagramCache::new(),
            debouncer: Arc::new(RenderDebouncer::new(DEFAULT_DEBOUNCE)),
            surface,
            theme,
            stylesheet: stylesheet_for(theme),
            last_text: String::new(),
        }
    }

    /// Replace the structural renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl DocumentRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Attach a diagram renderer. Without one, diagram containers keep
    /// their interim source text.
    #[must_use]
    pub fn with_diagram_renderer(mut self, mut renderer: impl DiagramRenderer + 'static) -> Self {
        renderer.configure(self.theme.diagram_theme());
        self.diagram_renderer = Some(Box::new(renderer));
        self
    }

    /// Set the debounce quiet period.
    #[must_use]
    pub fn with_debounce(mut self, quiet_period: Duration) -> Self {
        self.debouncer = Arc::new(RenderDebouncer::new(quiet_period));
        self
    }

    /// Set the initial theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self.stylesheet = stylesheet_for(theme);
        if let Some(renderer) = self.diagram_renderer.as_mut() {
            renderer.configure(theme.diagram_theme());
        }
        self
    }

    /// Queue a render of `text` behind the debounce quiet period.
    pub fn request_render(&self, text: impl Into<String>) {
        self.debouncer.record(text);
    }

    /// Handle for queueing renders from other tasks, e.g. the file
    /// watcher callback.
    #[must_use]
    pub fn debouncer(&self) -> Arc<RenderDebouncer> {
        Arc::clone(&self.debouncer)
    }

    /// Current preview theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Highlight stylesheet for the current theme.
    #[must_use]
    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    /// The surface the pipeline renders onto.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Cached diagram markup.
    #[must_use]
    pub fn cache(&self) -> &DiagramCache {
        &self.cache
    }

    /// Deadline of the pending debounced request, for driver scheduling.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Render any debounced text whose quiet period has elapsed.
    ///
    /// Called on an interval by the driver task. At most one pass runs per
    /// call; text recorded while a pass is in flight stays pending and is
    /// picked up by a later tick.
    pub async fn tick(&mut self) {
        if let Some(text) = self.debouncer.drain_ready() {
            self.do_render(text).await;
        }
    }

    /// Render `text` immediately, dropping any pending debounced request.
    pub async fn render_now(&mut self, text: impl Into<String>) {
        self.debouncer.cancel();
        self.do_render(text.into()).await;
    }

    /// Switch the preview theme.
    ///
    /// Clears the diagram cache, reconfigures the diagram renderer,
    /// regenerates the highlight stylesheet and re-renders the newest
    /// known text so every diagram and code block picks up the new colors.
    pub async fn on_theme_change(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        self.theme = theme;
        self.cache.clear();
        self.stylesheet = stylesheet_for(theme);
        if let Some(renderer) = self.diagram_renderer.as_mut() {
            renderer.configure(theme.diagram_theme());
        }
        tracing::debug!(%theme, "theme changed, re-rendering");

        let text = self
            .debouncer
            .take_pending()
            .unwrap_or_else(|| self.last_text.clone());
        self.do_render(text).await;
    }

    /// One render pass: structural render, then diagram materialization.
    async fn do_render(&mut self, text: String) {
        let started = Instant::now();
        self.last_text = text;

        if self.last_text.trim().is_empty() {
            self.cache.clear();
            Self::show(&mut self.surface, EMPTY_STATE_HTML);
            tracing::debug!("empty document, showing placeholder");
            return;
        }

        let mut html = match self.renderer.render(&self.last_text) {
            Ok(html) => html,
            Err(error) => {
                tracing::warn!(%error, "markdown render failed");
                let markup = format!(
                    r#"<p class="render-error">Error rendering markdown: {}</p>"#,
                    escape_html(&error.to_string())
                );
                Self::show(&mut self.surface, &markup);
                return;
            }
        };

        let placeholders = extract_placeholders(&html);
        Self::show(&mut self.surface, &html);

        if placeholders.is_empty() {
            // No diagrams left in the document, so drop their cached markup.
            self.cache.clear();
            tracing::debug!(
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "render pass complete"
            );
            return;
        }

        let Some(renderer) = &self.diagram_renderer else {
            tracing::debug!(
                diagrams = placeholders.len(),
                "no diagram renderer configured, containers keep their source text"
            );
            return;
        };

        let mut cache_hits = 0_usize;
        for placeholder in &placeholders {
            let markup = if let Some(cached) = self.cache.get(&placeholder.source) {
                cache_hits += 1;
                cached.to_owned()
            } else {
                match renderer.render(&placeholder.id, &placeholder.source).await {
                    Ok(markup) => {
                        self.cache.insert(&placeholder.source, markup.clone());
                        markup
                    }
                    Err(error) => {
                        tracing::warn!(id = %placeholder.id, %error, "diagram render failed");
                        error_markup(&error.to_string())
                    }
                }
            };
            if substitute(&mut html, &placeholder.id, &markup) {
                Self::show(&mut self.surface, &html);
            }
        }

        tracing::debug!(
            diagrams = placeholders.len(),
            cache_hits,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "render pass complete"
        );
    }

    /// Push `html` to the surface, preserving the scroll position across
    /// the content swap.
    fn show(surface: &mut S, html: &str) {
        let offset = surface.scroll_offset();
        surface.replace_content(html);
        surface.set_scroll_offset(offset);
    }
}

/// Highlight stylesheet for a theme, empty when generation fails.
fn stylesheet_for(theme: Theme) -> String {
    theme_stylesheet(theme.highlight_theme()).unwrap_or_else(|error| {
        tracing::error!(%error, %theme, "highlight stylesheet generation failed");
        String::new()
    })
}
