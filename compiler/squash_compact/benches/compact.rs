#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Compactor benchmarks.
//!
//! Measures both modes across script sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use squash_compact::{compact, CompactMode};
use squash_ir::SyntaxTree;

/// Generate a script with `n` small classes.
fn generate_n_classes(n: usize) -> String {
    let mut source = String::from("using System;\n\nnamespace Bench\n{\n");
    for i in 0..n {
        source.push_str(&format!(
            "    // Class number {i}\n    public class C{i}\n    {{\n        private int value = {i};\n\n        /* Adds to the value. */\n        public int Add(int x) {{ return value + x * 2 - -x; }}\n    }}\n\n"
        ));
    }
    source.push_str("}\n");
    source
}

fn parse(source: &str) -> SyntaxTree {
    squash_parse::parse_source(source).expect("benchmark input parses")
}

fn bench_compact(c: &mut Criterion) {
    let mut group = c.benchmark_group("compact");
    for n in [10, 100, 1000] {
        let source = generate_n_classes(n);
        let tree = parse(&source);
        group.throughput(Throughput::Bytes(source.len() as u64));

        group.bench_with_input(BenchmarkId::new("full", n), &tree, |b, tree| {
            b.iter(|| compact(black_box(tree.clone()), CompactMode::Full).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("strip_comments", n), &tree, |b, tree| {
            b.iter(|| compact(black_box(tree.clone()), CompactMode::StripComments).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compact);
criterion_main!(benches);
