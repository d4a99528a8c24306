//! Diagram container emission, extraction and substitution.
//!
//! During the structural render, [`DiagramProcessor`] turns every mermaid
//! code block into a container `<div>` holding the escaped source as
//! interim content. The container carries the raw source percent-encoded
//! in a data attribute, so the asynchronous materialization step can
//! recover it with [`extract_placeholders`] and swap rendered markup in
//! with [`substitute`] without re-parsing the document.

use linkpad_renderer::{CodeBlockProcessor, ProcessResult, escape_html};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Fence language claimed by the diagram processor.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// Characters escaped when embedding diagram source in a data attribute.
/// `%` itself must be escaped so decoding is unambiguous.
const SOURCE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'%');

/// A diagram container found in rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramPlaceholder {
    /// Container id, unique within one render pass (`diagram-1`, `diagram-2`, ...).
    pub id: String,
    /// Decoded diagram source text.
    pub source: String,
}

/// Code block processor that claims mermaid blocks.
///
/// Ids restart at 1 for every processor instance; the render pipeline
/// builds a fresh processor per pass so ids always match what
/// [`extract_placeholders`] finds in that pass's output.
#[derive(Debug, Default)]
pub struct DiagramProcessor {
    counter: usize,
}

impl DiagramProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeBlockProcessor for DiagramProcessor {
    fn process(&mut self, language: Option<&str>, source: &str, _index: usize) -> ProcessResult {
        if language != Some(DIAGRAM_LANGUAGE) {
            return ProcessResult::PassThrough;
        }
        self.counter += 1;
        let source = source.strip_suffix('\n').unwrap_or(source);
        ProcessResult::Inline(container_html(self.counter, source))
    }
}

fn container_html(counter: usize, source: &str) -> String {
    let encoded = utf8_percent_encode(source, SOURCE_ENCODE_SET);
    format!(
        r#"<div class="diagram-container" data-diagram-id="diagram-{counter}" data-diagram-source="{encoded}">{}</div>"#,
        escape_html(source)
    )
}

/// Markup shown inside a container whose diagram failed to render.
#[must_use]
pub fn error_markup(message: &str) -> String {
    format!(
        r#"<div class="diagram-error">Diagram rendering failed: {}</div>"#,
        escape_html(message)
    )
}

/// Find all diagram containers in rendered HTML, in document order.
#[must_use]
pub fn extract_placeholders(html: &str) -> Vec<DiagramPlaceholder> {
    const ID_ATTR: &str = r#"data-diagram-id=""#;
    const SOURCE_ATTR: &str = r#"data-diagram-source=""#;

    let mut placeholders = Vec::new();
    let mut remaining = html;

    while let Some(pos) = remaining.find(ID_ATTR) {
        remaining = &remaining[pos + ID_ATTR.len()..];
        let Some(id_end) = remaining.find('"') else {
            break;
        };
        let id = remaining[..id_end].to_owned();
        remaining = &remaining[id_end..];

        let Some(source_pos) = remaining.find(SOURCE_ATTR) else {
            break;
        };
        remaining = &remaining[source_pos + SOURCE_ATTR.len()..];
        let Some(source_end) = remaining.find('"') else {
            break;
        };
        let source = percent_decode_str(&remaining[..source_end])
            .decode_utf8_lossy()
            .into_owned();
        remaining = &remaining[source_end..];

        placeholders.push(DiagramPlaceholder { id, source });
    }

    placeholders
}

/// Replace the interim content of the container with the given id,
/// keeping the container element and its attributes in place.
///
/// Returns `false` when no container with that id exists, which happens
/// when a newer render replaced the document while a diagram was still
/// in flight.
pub fn substitute(html: &mut String, id: &str, markup: &str) -> bool {
    let marker = format!(r#" data-diagram-id="{id}""#);
    let Some(marker_pos) = html.find(&marker) else {
        return false;
    };
    let Some(tag_end) = html[marker_pos..].find('>') else {
        return false;
    };
    let content_start = marker_pos + tag_end + 1;
    let Some(close) = html[content_start..].find("</div>") else {
        return false;
    };
    html.replace_range(content_start..content_start + close, markup);
    true
}
