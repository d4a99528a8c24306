//! Benchmarks for share token encoding and decoding.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use linkpad_share::{decode, encode};

/// Generate markdown-shaped text of roughly the requested size.
fn generate_document(sections: usize) -> String {
    let mut md = String::with_capacity(sections * 300);
    md.push_str("# Benchmark Document\n\n");
    for i in 0..sections {
        md.push_str(&format!(
            "## Section {i}\n\nParagraph with **bold**, *italic* and `code`. \
             Lists, links and a bit of unicode: 世界.\n\n- item one\n- item two\n\n"
        ));
    }
    md
}

fn bench_encode_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_by_size");
    for sections in [2, 20, 100] {
        let text = generate_document(sections);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("sections", sections),
            &text,
            |b, text| b.iter(|| encode(text)),
        );
    }
    group.finish();
}

fn bench_decode_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_by_size");
    for sections in [2, 20, 100] {
        let token = encode(&generate_document(sections));
        group.throughput(Throughput::Bytes(token.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("sections", sections),
            &token,
            |b, token| b.iter(|| decode(token)),
        );
    }
    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let text = generate_document(20);
    c.bench_function("encode_decode_round_trip", |b| {
        b.iter(|| decode(&encode(&text)));
    });
}

criterion_group!(
    benches,
    bench_encode_by_size,
    bench_decode_by_size,
    bench_round_trip,
);

criterion_main!(benches);
