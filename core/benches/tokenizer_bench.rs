use criterion::{criterion_group, criterion_main, Criterion};
use termindex_core::{build, MemorySource, Normalizer, Stopwords};

const TEXT: &str = "Shares in the company fell sharply yesterday after the board warned that \
    profits for the year would fall short of expectations. Analysts said the warning, the \
    second this year, raised questions about the group's strategy in its core markets.";

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::new(Stopwords::english());
    c.bench_function("normalize_document", |b| b.iter(|| normalizer.normalize_document(TEXT)));
}

fn bench_build(c: &mut Criterion) {
    let normalizer = Normalizer::new(Stopwords::english());
    let source = (0..200).fold(MemorySource::new(), |s, i| s.with(format!("ft911-{i}"), TEXT));
    c.bench_function("build_200_docs", |b| b.iter(|| build(&source, &normalizer).unwrap()));
}

criterion_group!(benches, bench_normalize, bench_build);
criterion_main!(benches);
