//! Debounced render pipeline for the Linkpad preview.
//!
//! Ties the structural renderer, diagram materialization and theme state
//! together behind a small driving surface: feed text in with
//! [`RenderPipeline::request_render`], call [`RenderPipeline::tick`] from
//! an interval, and the freshest document lands on the [`PreviewSurface`]
//! with diagrams filled in from cache or the diagram renderer.
//!
//! # Example
//!
//! ```
//! use linkpad_pipeline::{PreviewSurface, RenderPipeline};
//!
//! struct Sink(String);
//!
//! impl PreviewSurface for Sink {
//!     fn replace_content(&mut self, html: &str) {
//!         self.0 = html.to_owned();
//!     }
//!     fn scroll_offset(&self) -> f64 {
//!         0.0
//!     }
//!     fn set_scroll_offset(&mut self, _offset: f64) {}
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut pipeline = RenderPipeline::new(Sink(String::new()));
//! pipeline.render_now("# Hello").await;
//! assert!(pipeline.surface().0.contains("<h1"));
//! # }
//! ```

mod debounce;
mod pipeline;
mod surface;
mod theme;

pub use debounce::RenderDebouncer;
pub use pipeline::{
    DEFAULT_DEBOUNCE, DocumentRenderer, EMPTY_STATE_HTML, PreviewRenderer, RenderPipeline,
    StructuralError,
};
pub use surface::PreviewSurface;
pub use theme::{ParseThemeError, Theme, ThemeController};
