//! Diagram handling for the Linkpad preview.
//!
//! Mermaid code blocks never block the structural render. This crate
//! provides the three pieces that make that work:
//! - [`DiagramProcessor`] implements `CodeBlockProcessor` and swaps mermaid
//!   blocks for container divs holding the escaped source
//! - [`DiagramCache`] keeps rendered markup addressed by source text, so
//!   unchanged diagrams are reused without touching the renderer
//! - [`DiagramRenderer`] is the async rendering seam, with [`KrokiRenderer`]
//!   as the HTTP-backed implementation
//!
//! The materialization step is driven by the render pipeline: it extracts
//! the containers from rendered HTML, resolves each through the cache or
//! the renderer, and substitutes the markup back in document order.
//!
//! # Example
//!
//! ```
//! use linkpad_diagrams::{DiagramProcessor, extract_placeholders};
//! use linkpad_renderer::HtmlRenderer;
//!
//! let html = HtmlRenderer::new()
//!     .with_processor(DiagramProcessor::new())
//!     .render_markdown("```mermaid\ngraph TD; A-->B\n```");
//!
//! let placeholders = extract_placeholders(&html);
//! assert_eq!(placeholders[0].source, "graph TD; A-->B");
//! ```

mod cache;
mod processor;
mod renderer;

pub use cache::{DiagramCache, source_key};
pub use processor::{
    DIAGRAM_LANGUAGE, DiagramPlaceholder, DiagramProcessor, error_markup, extract_placeholders,
    substitute,
};
pub use renderer::{DiagramError, DiagramRenderer, DiagramTheme, KrokiRenderer};
