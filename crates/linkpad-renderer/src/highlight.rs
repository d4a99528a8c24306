//! Syntax highlighting for fenced code blocks.
//!
//! Highlighting emits CSS classes rather than inline colors, so switching
//! the preview theme only swaps a stylesheet and never re-parses code.

use std::sync::Arc;

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

use crate::code_block::{CodeBlockProcessor, ProcessResult};
use crate::state::escape_html;

/// Class prefix shared by generated spans and the theme stylesheet.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Load the bundled syntax definitions.
///
/// Loading is not cheap; callers keep the returned set in an `Arc` and
/// reuse it across renders.
#[must_use]
pub fn default_syntaxes() -> SyntaxSet {
    SyntaxSet::load_defaults_newlines()
}

#[derive(Debug, Error)]
pub enum StylesheetError {
    #[error("unknown highlight theme: {0}")]
    UnknownTheme(String),
    #[error("stylesheet generation failed: {0}")]
    Css(#[from] syntect::Error),
}

/// Generate the CSS that colors highlighted code for the named theme.
///
/// Theme names come from syntect's bundled [`ThemeSet`]
/// (`"InspiredGitHub"`, `"base16-ocean.dark"`, ...).
pub fn theme_stylesheet(theme_name: &str) -> Result<String, StylesheetError> {
    let themes = ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(theme_name)
        .ok_or_else(|| StylesheetError::UnknownTheme(theme_name.to_owned()))?;
    Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
}

/// Code block processor that syntax-highlights every block it sees.
///
/// Lookup ladder: the declared language token, then first-line detection,
/// then plain escaped text. A block that fails to highlight still renders;
/// it just loses its colors. This processor never passes a block through,
/// so it belongs last in the processor chain.
pub struct HighlightProcessor {
    syntaxes: Arc<SyntaxSet>,
}

impl HighlightProcessor {
    #[must_use]
    pub fn new(syntaxes: Arc<SyntaxSet>) -> Self {
        Self { syntaxes }
    }

    fn highlight(&self, language: Option<&str>, source: &str) -> String {
        let label = language.unwrap_or("plaintext");

        if let Some(syntax) = language.and_then(|token| find_syntax(&self.syntaxes, token)) {
            match generate(&self.syntaxes, syntax, source) {
                Ok(highlighted) => return wrap(label, &highlighted),
                Err(error) => {
                    tracing::debug!(language = label, %error, "highlighting failed");
                }
            }
        }

        if let Some(syntax) = self.syntaxes.find_syntax_by_first_line(source) {
            match generate(&self.syntaxes, syntax, source) {
                Ok(highlighted) => return wrap(label, &highlighted),
                Err(error) => {
                    tracing::debug!(detected = syntax.name, %error, "auto-detect highlighting failed");
                }
            }
        }

        wrap(label, &escape_html(source))
    }
}

impl CodeBlockProcessor for HighlightProcessor {
    fn process(&mut self, language: Option<&str>, source: &str, _index: usize) -> ProcessResult {
        ProcessResult::Inline(self.highlight(language, source))
    }
}

fn wrap(label: &str, body: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{body}</code></pre>"#,
        escape_html(label)
    )
}

fn generate(
    syntaxes: &SyntaxSet,
    syntax: &SyntaxReference,
    source: &str,
) -> Result<String, syntect::Error> {
    let mut source = source.to_owned();
    if !source.ends_with('\n') {
        source.push('\n');
    }

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, syntaxes, CLASS_STYLE);
    for line in LinesWithEndings::from(&source) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

fn find_syntax<'a>(syntaxes: &'a SyntaxSet, token: &str) -> Option<&'a SyntaxReference> {
    let lowercase = token.to_ascii_lowercase();
    syntaxes
        .find_syntax_by_token(&lowercase)
        .or_else(|| syntaxes.find_syntax_by_name(&lowercase))
        .or_else(|| syntaxes.find_syntax_by_extension(&lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> HighlightProcessor {
        HighlightProcessor::new(Arc::new(default_syntaxes()))
    }

    fn process(language: Option<&str>, source: &str) -> String {
        match processor().process(language, source, 0) {
            ProcessResult::Inline(html) => html,
            ProcessResult::PassThrough => panic!("highlight processor never passes through"),
        }
    }

    #[test]
    fn test_known_language_gets_spans() {
        let html = process(Some("rust"), "fn main() {}\n");
        assert!(html.starts_with(r#"<pre><code class="language-rust">"#));
        assert!(html.contains("<span class=\"hl-"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain() {
        let html = process(Some("no-such-lang"), "a < b\n");
        assert!(html.contains("a &lt; b"));
        assert!(!html.contains("<span"));
    }

    #[test]
    fn test_missing_language_detected_from_first_line() {
        let html = process(None, "#!/bin/bash\necho hi\n");
        assert!(html.contains("<span class=\"hl-"));
    }

    #[test]
    fn test_missing_language_without_detection_is_plain() {
        let html = process(None, "just some words\n");
        assert_eq!(
            html,
            r#"<pre><code class="language-plaintext">just some words
</code></pre>"#
        );
    }

    #[test]
    fn test_source_without_trailing_newline() {
        let html = process(Some("rust"), "let x = 1;");
        assert!(html.contains("<span class=\"hl-"));
    }

    #[test]
    fn test_language_token_case_insensitive() {
        let html = process(Some("RUST"), "fn main() {}\n");
        assert!(html.contains("<span class=\"hl-"));
    }

    #[test]
    fn test_theme_stylesheet_known_theme() {
        let css = theme_stylesheet("base16-ocean.dark").unwrap();
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_theme_stylesheet_unknown_theme() {
        let err = theme_stylesheet("no-such-theme").unwrap_err();
        assert!(matches!(err, StylesheetError::UnknownTheme(_)));
    }
}
