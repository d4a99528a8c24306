//! `linkpad render` command implementation.

use std::path::PathBuf;

use clap::Args;
use linkpad_diagrams::KrokiRenderer;
use linkpad_pipeline::{PreviewSurface, RenderPipeline, Theme};
use linkpad_renderer::{escape_html, theme_stylesheet};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    file: PathBuf,

    /// Write the HTML document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Theme for highlighting and diagrams, light or dark.
    #[arg(long, default_value_t = Theme::default())]
    theme: Theme,

    /// Kroki server URL for diagram rendering.
    #[arg(long)]
    kroki_url: Option<String>,
}

/// Surface that keeps the last frame for the one-shot render.
#[derive(Default)]
struct CaptureSurface {
    html: String,
}

impl PreviewSurface for CaptureSurface {
    fn replace_content(&mut self, html: &str) {
        html.clone_into(&mut self.html);
    }

    fn scroll_offset(&self) -> f64 {
        0.0
    }

    fn set_scroll_offset(&mut self, _offset: f64) {}
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the output cannot
    /// be written.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let text = std::fs::read_to_string(&self.file)?;

        let mut pipeline = RenderPipeline::new(CaptureSurface::default()).with_theme(self.theme);
        if let Some(kroki_url) = self.kroki_url {
            pipeline = pipeline.with_diagram_renderer(KrokiRenderer::new(kroki_url));
        }
        pipeline.render_now(text).await;

        let title = self
            .file
            .file_stem()
            .map_or_else(|| "Linkpad".to_string(), |s| s.to_string_lossy().into_owned());
        let stylesheet = theme_stylesheet(self.theme.highlight_theme())?;
        let document = standalone_html(&title, self.theme, &pipeline.surface().html, &stylesheet);

        match self.output {
            Some(path) => {
                std::fs::write(&path, document)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => println!("{document}"),
        }

        Ok(())
    }
}

/// Base page styles for the standalone document.
fn page_css(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => {
            "body { margin: 2rem auto; max-width: 820px; padding: 0 1rem; \
             font-family: system-ui, sans-serif; line-height: 1.6; \
             background: #ffffff; color: #1f2328; }\n\
             pre { background: #f6f8fa; border-radius: 8px; padding: 14px 16px; overflow-x: auto; }\n\
             code { font-family: ui-monospace, monospace; }\n\
             .diagram-container { text-align: center; }\n\
             .diagram-error { color: #d1242f; }"
        }
        Theme::Dark => {
            "body { margin: 2rem auto; max-width: 820px; padding: 0 1rem; \
             font-family: system-ui, sans-serif; line-height: 1.6; \
             background: #15171c; color: #e6e8eb; }\n\
             pre { background: #1c1f26; border-radius: 8px; padding: 14px 16px; overflow-x: auto; }\n\
             code { font-family: ui-monospace, monospace; }\n\
             a { color: #539bf5; }\n\
             .diagram-container { text-align: center; }\n\
             .diagram-error { color: #f47067; }"
        }
    }
}

/// Wrap a rendered fragment into a complete HTML document.
fn standalone_html(title: &str, theme: Theme, body: &str, highlight_css: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n\
         <style>\n{}\n{}\n</style>\n\
         </head>\n\
         <body>\n{}\n</body>\n\
         </html>\n",
        escape_html(title),
        page_css(theme),
        highlight_css,
        body
    )
}
