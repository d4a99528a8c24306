//! Benchmarks for the structural preview render.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use linkpad_pipeline::{DocumentRenderer, PreviewRenderer};
use std::fmt::Write;

/// Build a markdown document with `sections` sections of mixed content.
fn generate_document(sections: usize) -> String {
    let mut text = String::from("# Benchmark Document\n\n");
    for i in 0..sections {
        let _ = write!(
            text,
            "## Section {i}\n\n\
             Some paragraph text with **bold**, *italic* and `inline code`.\n\n\
             ```rust\nfn section_{i}() -> usize {{\n    {i}\n}}\n```\n\n"
        );
        if i % 4 == 0 {
            let _ = write!(text, "```mermaid\ngraph TD; S{i}-->E{i}\n```\n\n");
        }
        if i % 5 == 0 {
            text.push_str("| Name | Value |\n| --- | --- |\n| a | 1 |\n| b | 2 |\n\n");
        }
    }
    text
}

fn bench_structural_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("structural_render");
    for sections in [5, 25, 100] {
        let document = generate_document(sections);
        group.throughput(Throughput::Bytes(document.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &document,
            |b, document| {
                let mut renderer = PreviewRenderer::new();
                b.iter(|| renderer.render(document).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_structural_render);
criterion_main!(benches);
