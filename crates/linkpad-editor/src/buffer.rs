//! A plain-text buffer with a selection, the target of all edit helpers.

use std::ops::Range;

/// Editable document text plus the active selection.
///
/// Indices are character offsets, not bytes, so edits land on the same
/// positions a cursor moves over regardless of how wide the characters
/// are. The selection is kept ordered; a collapsed selection is the
/// cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    selection: Range<usize>,
}

impl EditBuffer {
    /// Creates a buffer with the cursor at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: 0..0,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Number of characters in the buffer.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Moves the selection, clamping to the buffer and ordering the ends.
    pub fn select(&mut self, range: Range<usize>) {
        let len = self.char_len();
        let a = range.start.min(len);
        let b = range.end.min(len);
        self.selection = a.min(b)..a.max(b);
    }

    /// Char-indexed slice of the buffer text.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = byte_index(&self.text, range.start);
        let end = byte_index(&self.text, range.end);
        &self.text[start..end]
    }

    #[must_use]
    pub fn selected_text(&self) -> &str {
        self.slice(self.selection.clone())
    }

    /// Char index of the start of the line the selection begins on.
    #[must_use]
    pub fn line_start(&self) -> usize {
        let cursor = byte_index(&self.text, self.selection.start);
        let line_start = self.text[..cursor].rfind('\n').map_or(0, |i| i + 1);
        self.text[..line_start].chars().count()
    }

    /// Replaces the selection and leaves the cursor after the new text.
    pub fn replace_selection(&mut self, replacement: &str) {
        let start_char = self.selection.start;
        let start = byte_index(&self.text, self.selection.start);
        let end = byte_index(&self.text, self.selection.end);
        self.text.replace_range(start..end, replacement);
        let cursor = start_char + replacement.chars().count();
        self.selection = cursor..cursor;
    }

    /// Inserts `snippet` at the cursor, replacing any active selection.
    pub fn insert_at_cursor(&mut self, snippet: &str) {
        self.replace_selection(snippet);
    }

    /// Wraps the selection in `before`/`after` markers.
    ///
    /// An empty selection gets the `placeholder` as content. The inner
    /// text stays selected afterwards so a follow-up keystroke replaces
    /// it.
    pub fn wrap_selection(&mut self, before: &str, after: &str, placeholder: &str) {
        let start_char = self.selection.start;
        let content = match self.selected_text() {
            "" => placeholder.to_owned(),
            selected => selected.to_owned(),
        };
        self.replace_selection(&format!("{before}{content}{after}"));
        let inner_start = start_char + before.chars().count();
        let inner_end = inner_start + content.chars().count();
        self.selection = inner_start..inner_end;
    }

    /// Inserts `prefix` at the start of the current line.
    ///
    /// When the rest of the line is blank the `placeholder` is inserted
    /// after the prefix and selected, ready to be typed over.
    pub fn prefix_line(&mut self, prefix: &str, placeholder: &str) {
        let line_start = self.line_start();
        self.select(line_start..line_start);
        self.insert_at_cursor(prefix);

        let after_prefix = self.selection.start;
        if self.rest_of_line(after_prefix).trim().is_empty() {
            self.insert_at_cursor(placeholder);
            self.selection = after_prefix..after_prefix + placeholder.chars().count();
        }
    }

    fn rest_of_line(&self, from: usize) -> &str {
        let start = byte_index(&self.text, from);
        self.text[start..].split('\n').next().unwrap_or_default()
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}
