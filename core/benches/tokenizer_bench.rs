use criterion::{criterion_group, criterion_main, Criterion};
use wikirank_core::tokenizer::analyze;
use wikirank_core::{build_index, Document, PageRankParams};

fn corpus(n: u32) -> Vec<Document> {
    (0..n)
        .map(|i| {
            let body = format!(
                "Page {i} talks about [[Page {}|its neighbour]] and [[Category:Topic {}]]. {}",
                (i * 13 + 1) % n,
                i % 7,
                "Filler words keep the tokenizer honest. ".repeat(20)
            );
            Document::new(i + 1, &format!("Page {i}"), Some(body))
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let docs = corpus(1);
    let text = docs[0].text.clone().unwrap_or_default();
    c.bench_function("analyze_page", |b| b.iter(|| analyze("Page 0", Some(&text))));
}

fn bench_build(c: &mut Criterion) {
    let docs = corpus(500);
    c.bench_function("build_index_500", |b| b.iter(|| build_index(&docs, &PageRankParams::default())));
}

criterion_group!(benches, bench_tokenize, bench_build);
criterion_main!(benches);
