//! Markdown rendering for the Linkpad preview.
//!
//! This crate turns markdown text into the HTML fragment shown in the
//! preview pane. The [`HtmlRenderer`] walks pulldown-cmark events and
//! delegates fenced code blocks to [`CodeBlockProcessor`]s, so callers
//! decide what becomes a highlighted block, a diagram container, or a
//! plain `<pre>`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use linkpad_renderer::{HighlightProcessor, HtmlRenderer, default_syntaxes};
//!
//! let syntaxes = Arc::new(default_syntaxes());
//! let html = HtmlRenderer::new()
//!     .with_processor(HighlightProcessor::new(syntaxes))
//!     .render_markdown("# Hello\n\n**Bold** text");
//! assert!(html.contains("<strong>Bold</strong>"));
//! ```

mod code_block;
mod highlight;
mod renderer;
mod state;

pub use code_block::{CodeBlockProcessor, ProcessResult, parse_fence_language};
pub use highlight::{
    CLASS_STYLE, HighlightProcessor, StylesheetError, default_syntaxes, theme_stylesheet,
};
pub use renderer::HtmlRenderer;
pub use state::escape_html;
