//! Benchmarks for configuration compilation and formatting.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mdtf_directives::{ConfigSnapshot, compile};
use mdtf_renderer::Formatter;

fn full_config() -> ConfigSnapshot {
    ConfigSnapshot::new()
        .with("html5ElementSuffix", true)
        .with(
            "abbreviations",
            "HTML=HyperText Markup Language\nCSS=Cascading Style Sheets\nW3C=World Wide Web Consortium",
        )
        .with("linkAttributes", "class=link")
        .with("externalLinkAttributes", "target=_blank, rel=nofollow")
        .with("imageAttributes", "loading=lazy")
        .with("tableClass", "table")
        .with("tableAlignClass", "text-%s")
}

/// Generate a document with sections, links, tables and footnotes.
fn generate_markdown(sections: usize) -> String {
    let mut md = String::from("# Document\n\n");
    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        md.push_str(&format!(
            "HTML and CSS per the W3C[^n{i}], see https://example.com/{i} or [docs](/docs/{i}).\n\n"
        ));
        md.push_str("| a | b |\n|:--|--:|\n| 1 | 2 |\n\n");
        md.push_str(&format!("```rust\nfn section_{i}() {{}}\n```\n\n"));
        md.push_str(&format!("[^n{i}]: Footnote {i}.\n\n"));
    }
    md
}

fn bench_compile(c: &mut Criterion) {
    let config = full_config();
    c.bench_function("compile_full_config", |b| b.iter(|| compile(&config)));
}

fn bench_format_sizes(c: &mut Criterion) {
    let formatter = Formatter::new();
    let config = full_config();

    let mut group = c.benchmark_group("format");
    for sections in [1, 10, 100] {
        let markdown = generate_markdown(sections);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &markdown, |b, md| {
            b.iter(|| formatter.format(md, &config));
        });
    }
    group.finish();
}

fn bench_format_batch(c: &mut Criterion) {
    let formatter = Formatter::new();
    let config = full_config();
    let documents: Vec<String> = (0..64).map(|_| generate_markdown(5)).collect();

    c.bench_function("format_batch_64_documents", |b| {
        b.iter(|| formatter.format_batch(&documents, &config));
    });
}

criterion_group!(benches, bench_compile, bench_format_sizes, bench_format_batch);
criterion_main!(benches);
