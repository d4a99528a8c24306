//! The document seeded into a fresh pad.

/// Welcome document used when no file and no shared link provide content.
///
/// Walks through everything the preview can show: emphasis, code with
/// highlighting, a mermaid diagram, tables, quotes and task lists.
pub const DEFAULT_DOCUMENT: &str = r#"# 🔗 Welcome to Linkpad

A local-first **Markdown workbench** with live preview, **Mermaid diagram** support, and shareable links.

## Features

- ✏️ **Live Preview** — save in any editor, the preview follows
- 🎨 **Syntax Highlighting** — fenced code blocks, themed per mode
- 📊 **Mermaid Diagrams** — flowcharts, sequences, and more
- 🌗 **Dark & Light Mode** — code and diagrams switch together
- 🔗 **Share via URL** — the whole document packed into one link

---

## Code Example

```rust
fn fibonacci(n: u64) -> u64 {
    match n {
        0 | 1 => n,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}

// First 10 Fibonacci numbers
let result: Vec<u64> = (0..10).map(fibonacci).collect();
println!("{result:?}"); // [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]
```

## Mermaid Diagram

```mermaid
graph TD
    A[📝 Write Markdown] --> B{Has Mermaid?}
    B -->|Yes| C[🎨 Render Diagram]
    B -->|No| D[📄 Render Text]
    C --> E[👁️ Live Preview]
    D --> E
    E --> F[🔗 Share Link]
```

## Table

| Feature | Status | Notes |
| --- | --- | --- |
| Markdown Parsing | ✅ Done | pulldown-cmark |
| Syntax Highlighting | ✅ Done | syntect classes |
| Mermaid Support | ✅ Done | rendered via Kroki |
| Dark Mode | ✅ Done | per-theme stylesheets |
| Share via URL | ✅ Done | brotli + base64 |

## Blockquote

> "The best way to predict the future is to invent it."
> — *Alan Kay*

## Task List

- [x] Start the workbench
- [x] Watch the preview follow this file
- [x] Toggle the theme
- [ ] Write even more markdown!

---

*Built with ❤️ in Rust*
"#;
