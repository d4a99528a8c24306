//! Rendering state tracked across events.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// Escape HTML special characters in text content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Build a URL-friendly slug from heading text.
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Accumulates the content of the code block currently being parsed.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    content: String,
}

impl CodeBlockState {
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.content.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub fn push_newline(&mut self) {
        self.content.push('\n');
    }

    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.content))
    }
}

/// Tracks column alignments and head/body position for the current table.
#[derive(Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    cell_index: usize,
    in_head: bool,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.cell_index = 0;
        self.in_head = false;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Inline style attribute for the current cell, empty for default alignment.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Collects heading text and inner HTML so the opening tag can be written
/// with its slug id once the heading ends. Slugs are deduplicated with a
/// numeric suffix within one render pass.
#[derive(Default)]
pub(crate) struct HeadingState {
    level: Option<u8>,
    text: String,
    html: String,
    used_slugs: HashMap<String, usize>,
}

impl HeadingState {
    pub fn start(&mut self, level: u8) {
        self.level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    pub fn is_active(&self) -> bool {
        self.level.is_some()
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    /// Close the current heading, returning `(level, id, inner_html)`.
    pub fn complete(&mut self) -> Option<(u8, String, String)> {
        let level = self.level.take()?;
        let mut base = slugify(&self.text);
        if base.is_empty() {
            base.push_str("section");
        }
        let count = self.used_slugs.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        self.text.clear();
        Some((level, id, std::mem::take(&mut self.html)))
    }
}

/// Collects image alt text between `Image` start and end tags.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt: String,
}

impl ImageState {
    pub fn start(&mut self) {
        self.active = true;
        self.alt.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt.push_str(text);
    }

    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt)
    }
}
