//! Toolbar actions mapped onto buffer edits.

use crate::buffer::EditBuffer;

/// Inserted in place of a literal tab when the Tab key is pressed.
pub const SOFT_TAB: &str = "  ";

const TABLE_TEMPLATE: &str = "\n| Header 1 | Header 2 | Header 3 |\n| --- | --- | --- |\n| Cell 1 | Cell 2 | Cell 3 |\n| Cell 4 | Cell 5 | Cell 6 |\n";

const DIAGRAM_TEMPLATE: &str = "\n```mermaid\ngraph TD\n    A[Start] --> B{Decision}\n    B -->|Yes| C[Result 1]\n    B -->|No| D[Result 2]\n    C --> E[End]\n    D --> E\n```\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::H1 => "# ",
            Self::H2 => "## ",
            Self::H3 => "### ",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::H1 => "Heading 1",
            Self::H2 => "Heading 2",
            Self::H3 => "Heading 3",
        }
    }
}

/// One formatting action, as triggered from a toolbar or key binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorAction {
    Bold,
    Italic,
    Strikethrough,
    Heading(HeadingLevel),
    BulletList,
    NumberedList,
    TaskList,
    Quote,
    InlineCode,
    CodeBlock,
    Link,
    Image,
    Table,
    HorizontalRule,
    DiagramTemplate,
}

impl EditorAction {
    /// Applies the action to `buffer`, leaving the selection where a
    /// follow-up keystroke makes sense (placeholder or URL selected,
    /// cursor after inserted templates).
    pub fn apply(self, buffer: &mut EditBuffer) {
        match self {
            Self::Bold => buffer.wrap_selection("**", "**", "bold text"),
            Self::Italic => buffer.wrap_selection("*", "*", "italic text"),
            Self::Strikethrough => buffer.wrap_selection("~~", "~~", "strikethrough"),
            Self::Heading(level) => buffer.prefix_line(level.prefix(), level.placeholder()),
            Self::BulletList => buffer.prefix_line("- ", "List item"),
            Self::NumberedList => buffer.prefix_line("1. ", "List item"),
            Self::TaskList => buffer.prefix_line("- [ ] ", "Task"),
            Self::Quote => buffer.prefix_line("> ", "Quote"),
            Self::InlineCode => buffer.wrap_selection("`", "`", "code"),
            Self::CodeBlock => buffer.wrap_selection("\n```\n", "\n```\n", "code here"),
            Self::Link => insert_link(buffer),
            Self::Image => insert_image(buffer),
            Self::Table => buffer.insert_at_cursor(TABLE_TEMPLATE),
            Self::HorizontalRule => buffer.insert_at_cursor("\n\n---\n\n"),
            Self::DiagramTemplate => buffer.insert_at_cursor(DIAGRAM_TEMPLATE),
        }
    }
}

/// Inserts `[label](url)` and selects the `url` part for typing over.
fn insert_link(buffer: &mut EditBuffer) {
    let label = match buffer.selected_text() {
        "" => "link text".to_owned(),
        selected => selected.to_owned(),
    };
    buffer.replace_selection(&format!("[{label}](url)"));
    let end = buffer.selection().end;
    buffer.select(end - 4..end - 1);
}

/// Inserts `![alt](image-url)` and selects the `image-url` part.
fn insert_image(buffer: &mut EditBuffer) {
    let alt = match buffer.selected_text() {
        "" => "alt text".to_owned(),
        selected => selected.to_owned(),
    };
    buffer.replace_selection(&format!("![{alt}](image-url)"));
    let end = buffer.selection().end;
    buffer.select(end - 10..end - 1);
}
