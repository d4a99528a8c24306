//! Benchmarks for markdown rendering performance.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use linkpad_renderer::{HighlightProcessor, HtmlRenderer, default_syntaxes};
use syntect::parsing::SyntaxSet;

/// Generate markdown content with specified structure.
fn generate_markdown(headings: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(headings * 50 + headings * paragraphs_per_section * 200);
    md.push_str("# Document Title\n\n");

    for i in 0..headings {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "This is paragraph {j} in section {i}. It contains **bold** and *italic* text.\n\n"
            ));
        }
    }
    md
}

fn renderer(syntaxes: &Arc<SyntaxSet>) -> HtmlRenderer {
    HtmlRenderer::new().with_processor(HighlightProcessor::new(Arc::clone(syntaxes)))
}

fn bench_render_simple(c: &mut Criterion) {
    let syntaxes = Arc::new(default_syntaxes());

    c.bench_function("render_simple_markdown", |b| {
        b.iter(|| renderer(&syntaxes).render_markdown("# Hello\n\nSimple content."));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let syntaxes = Arc::new(default_syntaxes());
    let mut group = c.benchmark_group("render_by_size");

    for (headings, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_markdown(headings, paragraphs);

        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{headings}h_{paragraphs}p")),
            &markdown,
            |b, markdown| b.iter(|| renderer(&syntaxes).render_markdown(markdown)),
        );
    }

    group.finish();
}

fn bench_render_gfm_features(c: &mut Criterion) {
    let syntaxes = Arc::new(default_syntaxes());

    let markdown = r"# GFM Features

| Column A | Column B | Column C |
|----------|----------|----------|
| Value 1  | Value 2  | Value 3  |
| Value 4  | Value 5  | Value 6  |

- [x] Completed task
- [ ] Pending task
- [ ] Another task

This has ~~strikethrough~~ and **bold** and *italic*.
";

    c.bench_function("render_gfm_features", |b| {
        b.iter(|| renderer(&syntaxes).render_markdown(markdown));
    });
}

fn bench_render_code_blocks(c: &mut Criterion) {
    let syntaxes = Arc::new(default_syntaxes());

    let markdown = r#"# Code Examples

## Rust

```rust
fn main() {
    println!("Hello, world!");
    let x = 42;
    for i in 0..10 {
        println!("{}", i * x);
    }
}
```

## Python

```python
def greet(name):
    return f"Hello, {name}!"

if __name__ == "__main__":
    print(greet("World"))
```

## JavaScript

```javascript
function fibonacci(n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

console.log(fibonacci(10));
```
"#;

    c.bench_function("render_code_blocks", |b| {
        b.iter(|| renderer(&syntaxes).render_markdown(markdown));
    });
}

fn bench_render_large_document(c: &mut Criterion) {
    let syntaxes = Arc::new(default_syntaxes());
    let markdown = generate_markdown(100, 5); // ~100KB document

    let mut group = c.benchmark_group("large_document");
    group.throughput(Throughput::Bytes(markdown.len() as u64));
    group.bench_function("render", |b| {
        b.iter(|| renderer(&syntaxes).render_markdown(&markdown));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_varying_sizes,
    bench_render_gfm_features,
    bench_render_code_blocks,
    bench_render_large_document,
);

criterion_main!(benches);
