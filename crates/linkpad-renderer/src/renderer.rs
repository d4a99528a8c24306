//! Markdown renderer producing preview HTML.

use std::fmt::Write;

use pulldown_cmark::{
    BlockQuoteKind, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use crate::code_block::{CodeBlockProcessor, ProcessResult, parse_fence_language};
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, escape_html};

/// Markdown renderer for the live preview.
///
/// Walks pulldown-cmark events and writes HTML, delegating fenced code
/// blocks to registered [`CodeBlockProcessor`]s. Soft breaks render as
/// `<br>` so single newlines in the source show up as line breaks, the
/// behavior editors expect from a live preview.
///
/// # Code Block Processors
///
/// Custom code block handling is added via [`with_processor`](Self::with_processor).
/// Processors are checked in order; the first returning a non-`PassThrough`
/// result wins.
pub struct HtmlRenderer {
    output: String,
    list_stack: Vec<bool>,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    pending_image: Option<(String, String)>,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    code_block_index: usize,
    /// Marks whether each open blockquote is a GitHub-style alert.
    alert_stack: Vec<bool>,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            list_stack: Vec::new(),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            pending_image: None,
            processors: Vec::new(),
            code_block_index: 0,
            alert_stack: Vec::new(),
        }
    }

    /// Add a code block processor.
    ///
    /// Processors are checked in order when a code block is encountered.
    /// The first processor returning a non-`PassThrough` result wins.
    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Parser options for the preview dialect: GFM tables, strikethrough,
    /// task lists and alerts.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
    }

    /// Render markdown text to HTML.
    pub fn render_markdown(&mut self, markdown: &str) -> String {
        self.render(Parser::new_ext(markdown, Self::parser_options()))
    }

    /// Render a stream of markdown events to HTML.
    pub fn render<'a, I>(&mut self, events: I) -> String
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }
        std::mem::take(&mut self.output)
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => self.horizontal_rule(),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the slug id is known.
                self.heading.start(heading_level_to_num(level));
            }
            Tag::BlockQuote(kind) => {
                if let Some(kind) = kind {
                    let label = alert_label(kind);
                    self.alert_stack.push(true);
                    write!(
                        self.output,
                        r#"<div class="alert alert-{}"><p class="alert-title">{label}</p><div class="alert-content">"#,
                        label.to_ascii_lowercase()
                    )
                    .unwrap();
                } else {
                    self.alert_stack.push(false);
                    self.output.push_str("<blockquote>");
                }
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => parse_fence_language(info),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => {
                self.list_stack.push(start.is_some());
                match start {
                    Some(1) => self.output.push_str("<ol>"),
                    Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                    None => self.output.push_str("<ul>"),
                }
            }
            Tag::Item => {
                self.output.push_str("<li>");
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => {
                self.output.push_str("<dl>");
            }
            Tag::DefinitionListTitle => {
                self.output.push_str("<dt>");
            }
            Tag::DefinitionListDefinition => {
                self.output.push_str("<dd>");
            }
            Tag::Table(alignments) => {
                self.table.start(alignments.clone());
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let link_tag = format!(r#"<a href="{}">"#, escape_html(&dest_url));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Start collecting alt text; image is written in end_tag.
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_level) => {
                if let Some((level, id, html)) = self.heading.complete() {
                    write!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        html.trim()
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => {
                if self.alert_stack.pop().unwrap_or(false) {
                    self.output.push_str("</div></div>");
                } else {
                    self.output.push_str("</blockquote>");
                }
            }
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                let index = self.code_block_index;
                self.code_block_index += 1;

                // Try processors in order, fall back to a plain escaped block
                let processed = self.processors.iter_mut().any(|processor| {
                    match processor.process(lang.as_deref(), &content, index) {
                        ProcessResult::Inline(html) => {
                            self.output.push_str(&html);
                            true
                        }
                        ProcessResult::PassThrough => false,
                    }
                });

                if !processed {
                    plain_code_block(lang.as_deref(), &content, &mut self.output);
                }
            }
            TagEnd::List(ordered) => {
                self.list_stack.pop();
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => {
                self.output.push_str("</li>");
            }
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    write!(
                        self.output,
                        r#"<img src="{}"{title_attr} alt="{}">"#,
                        escape_html(&src),
                        escape_html(&alt)
                    )
                    .unwrap();
                }
            }
            TagEnd::DefinitionList => {
                self.output.push_str("</dl>");
            }
            TagEnd::DefinitionListTitle => {
                self.output.push_str("</dt>");
            }
            TagEnd::DefinitionListDefinition => {
                self.output.push_str("</dd>");
            }
            TagEnd::Table => {
                self.output.push_str("</tbody></table>");
            }
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => {
                self.output.push_str("</tr>");
            }
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading.is_active() {
            self.heading.push_text(code);
            write!(
                self.heading.html_buffer(),
                "<code>{}</code>",
                escape_html(code)
            )
            .unwrap();
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn raw_html(&mut self, html: &str) {
        self.output.push_str(html);
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else {
            self.push_inline("<br>");
        }
    }

    fn hard_break(&mut self) {
        self.push_inline("<br>");
    }

    fn horizontal_rule(&mut self) {
        self.output.push_str("<hr>");
    }

    fn task_list_marker(&mut self, checked: bool) {
        self.output.push_str(if checked {
            r#"<input type="checkbox" checked disabled> "#
        } else {
            r#"<input type="checkbox" disabled> "#
        });
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn plain_code_block(lang: Option<&str>, content: &str, out: &mut String) {
    if let Some(lang) = lang {
        write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap();
    } else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alert_label(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "Note",
        BlockQuoteKind::Tip => "Tip",
        BlockQuoteKind::Important => "Important",
        BlockQuoteKind::Warning => "Warning",
        BlockQuoteKind::Caution => "Caution",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> String {
        HtmlRenderer::new().render_markdown(markdown)
    }

    struct ClaimingProcessor {
        language: &'static str,
    }

    impl ClaimingProcessor {
        fn new(language: &'static str) -> Self {
            Self { language }
        }
    }

    impl CodeBlockProcessor for ClaimingProcessor {
        fn process(
            &mut self,
            language: Option<&str>,
            _source: &str,
            index: usize,
        ) -> ProcessResult {
            if language == Some(self.language) {
                ProcessResult::Inline(format!("<claimed index=\"{index}\">"))
            } else {
                ProcessResult::PassThrough
            }
        }
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, world!"), "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_with_slug_id() {
        assert_eq!(
            render("## Section Title"),
            r#"<h2 id="section-title">Section Title</h2>"#
        );
    }

    #[test]
    fn test_duplicate_headings_get_distinct_ids() {
        let html = render("## Setup\n\n## Setup");
        assert!(html.contains(r#"<h2 id="setup">"#));
        assert!(html.contains(r#"<h2 id="setup-1">"#));
    }

    #[test]
    fn test_heading_with_inline_code() {
        assert_eq!(
            render("# Using `rename`"),
            r#"<h1 id="using-rename">Using <code>rename</code></h1>"#
        );
    }

    #[test]
    fn test_soft_break_renders_as_line_break() {
        assert_eq!(render("first\nsecond"), "<p>first<br>second</p>");
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(render("first  \nsecond"), "<p>first<br>second</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(
            render("a <b> & \"c\""),
            "<p>a &lt;b&gt; &amp; &quot;c&quot;</p>"
        );
    }

    #[test]
    fn test_unclaimed_code_block_renders_plain() {
        let html = render("```weirdlang\nx <- 1\n```");
        assert_eq!(
            html,
            r#"<pre><code class="language-weirdlang">x &lt;- 1
</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        assert_eq!(render("```\nplain\n```"), "<pre><code>plain\n</code></pre>");
    }

    #[test]
    fn test_processor_claims_matching_language() {
        let html = HtmlRenderer::new()
            .with_processor(ClaimingProcessor::new("mermaid"))
            .render_markdown("```mermaid\ngraph TD\n```");
        assert_eq!(html, r#"<claimed index="0">"#);
    }

    #[test]
    fn test_first_claiming_processor_wins() {
        let html = HtmlRenderer::new()
            .with_processor(ClaimingProcessor::new("rust"))
            .with_processor(ClaimingProcessor::new("rust"))
            .render_markdown("```rust\nfn main() {}\n```");
        // Only one claimed marker, from the first processor
        assert_eq!(html, r#"<claimed index="0">"#);
    }

    #[test]
    fn test_anonymous_block_falls_through_processors() {
        let html = HtmlRenderer::new()
            .with_processor(ClaimingProcessor::new("never-matches"))
            .render_markdown("```\nanonymous\n```");
        assert_eq!(html, "<pre><code>anonymous\n</code></pre>");
    }

    #[test]
    fn test_code_block_index_increments_across_blocks() {
        let html = HtmlRenderer::new()
            .with_processor(ClaimingProcessor::new("mermaid"))
            .render_markdown("```mermaid\na\n```\n\n```mermaid\nb\n```");
        assert_eq!(html, r#"<claimed index="0"><claimed index="1">"#);
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(render("> Note"), "<blockquote><p>Note</p></blockquote>");
    }

    #[test]
    fn test_note_alert() {
        let html = render("> [!NOTE]\n> This is a **note**.");
        assert!(html.contains(r#"class="alert alert-note""#));
        assert!(html.contains(r#"<p class="alert-title">Note</p>"#));
        assert!(html.contains("<strong>note</strong>"));
        assert!(html.ends_with("</div></div>"));
    }

    #[test]
    fn test_warning_alert() {
        let html = render("> [!WARNING]\n> Careful.");
        assert!(html.contains(r#"class="alert alert-warning""#));
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            render("- one\n- two"),
            "<ul><li>one</li><li>two</li></ul>"
        );
    }

    #[test]
    fn test_ordered_list_with_start() {
        let html = render("3. three\n4. four");
        assert_eq!(html, r#"<ol start="3"><li>three</li><li>four</li></ol>"#);
    }

    #[test]
    fn test_task_list() {
        let html = render("- [ ] open\n- [x] done");
        assert!(html.contains(r#"<input type="checkbox" disabled> open"#));
        assert!(html.contains(r#"<input type="checkbox" checked disabled> done"#));
    }

    #[test]
    fn test_table_with_alignment() {
        let html = render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert!(html.contains(r#"<th style="text-align: left">a</th>"#));
        assert!(html.contains(r#"<th style="text-align: right">b</th>"#));
        assert!(html.contains(r#"<td style="text-align: left">1</td>"#));
        assert!(html.ends_with("</tbody></table>"));
    }

    #[test]
    fn test_link_href_escaped() {
        assert_eq!(
            render(r#"[x](https://example.com/?a=1&b=2)"#),
            r#"<p><a href="https://example.com/?a=1&amp;b=2">x</a></p>"#
        );
    }

    #[test]
    fn test_image_with_title() {
        assert_eq!(
            render(r#"![Alt text](image.png "Image title")"#),
            r#"<p><img src="image.png" title="Image title" alt="Alt text"></p>"#
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(render("~~gone~~"), "<p><s>gone</s></p>");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(render("---"), "<hr>");
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render("before\n\n<div class=\"x\">kept</div>\n\nafter");
        assert!(html.contains(r#"<div class="x">kept</div>"#));
    }

    #[test]
    fn test_renderer_reusable_across_passes() {
        let mut renderer = HtmlRenderer::new();
        assert_eq!(renderer.render_markdown("one"), "<p>one</p>");
        assert_eq!(renderer.render_markdown("two"), "<p>two</p>");
    }
}
