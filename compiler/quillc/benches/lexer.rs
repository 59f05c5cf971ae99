//! Lexer throughput benchmark.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use quill_diagnostic::{Diagnostic, DiagnosticSink};
use quill_ir::SourceId;

struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Build a representative source of roughly 64 KiB.
fn sample_source() -> String {
    let snippet = concat!(
        "// sample function\n",
        "fn mix(a: int, b: int) -> int {\n",
        "    let scale = 0xff;\n",
        "    let ratio = 2.5e2;\n",
        "    let label = \"mix\\t(a, b)\";\n",
        "    if a >= b { return a * scale; }\n",
        "    while a < b { a = a + 1; }\n",
        "    return b % scale;\n",
        "}\n",
    );

    let mut source = String::with_capacity(64 * 1024 + snippet.len());
    while source.len() < 64 * 1024 {
        source.push_str(snippet);
    }
    source
}

fn bench_tokenize(c: &mut Criterion) {
    let source = sample_source();

    let mut group = c.benchmark_group("lexer");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("tokenize_64kb", |b| {
        b.iter(|| {
            quill_lexer::tokenize(SourceId::new(0), black_box(&source), &NullSink)
                .expect("benchmark source is valid")
        });
    });
    group.finish();
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
