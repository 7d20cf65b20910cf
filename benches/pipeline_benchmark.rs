//! Benchmarks for docsift analysis performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic span documents, so no PDF parsing is measured.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docsift::model::BBox;
use docsift::relevance::{RankOptions, RelevanceRanker, TfIdfBackend};
use docsift::{HeadingLevel, Lexicon, Pipeline, Query, Section, Span, SpanDocument, SpanLine, SpanPage};

const BODY: &[&str] = &[
    "The committee reviewed the annual budget and approved the spending plan.",
    "Each region reported its revenue figures for the third quarter of 2023.",
    "Our methodology relies on a public dataset and a shared benchmark suite.",
    "Staff turnover fell slightly after the new training program was introduced.",
];

/// Creates a synthetic document with a chapter heading, a section heading and
/// body lines on every page.
fn create_test_document(page_count: usize) -> SpanDocument {
    let mut doc = SpanDocument::new();
    for n in 0..page_count {
        let mut page = SpanPage::letter(n as u32 + 1);
        page.add_line(SpanLine::new(vec![Span::new(
            format!("{}. Chapter {}", n + 1, n + 1),
            18.0,
            BBox::new(72.0, 60.0, 260.0, 78.0),
        )
        .bold()]));
        page.add_line(SpanLine::new(vec![Span::new(
            format!("{}.1 Details", n + 1),
            14.0,
            BBox::new(72.0, 90.0, 200.0, 104.0),
        )]));
        for i in 0..30 {
            let y = 120.0 + i as f32 * 14.0;
            page.add_line(SpanLine::new(vec![Span::new(
                BODY[i % BODY.len()],
                11.0,
                BBox::new(72.0, y, 520.0, y + 11.0),
            )]));
        }
        doc.pages.push(page);
    }
    doc
}

fn create_sections(count: usize) -> Vec<Section> {
    (0..count)
        .map(|i| {
            let mut section = Section::new(
                "bench.pdf",
                format!("Section {}", i),
                HeadingLevel::H2,
                i as u32 / 4 + 1,
                BODY[i % BODY.len()].repeat(5),
            );
            section.order = i;
            section
        })
        .collect()
}

/// Benchmark format detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_header = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n<< /Type /Catalog >>\nendobj\n";
    let span_json = br#"{"title": null, "pages": []}"#;

    c.bench_function("detect_pdf", |b| {
        b.iter(|| docsift::detect_format_from_bytes(black_box(pdf_header)).unwrap());
    });

    c.bench_function("detect_span_json", |b| {
        b.iter(|| docsift::detect_format_from_bytes(black_box(span_json)).unwrap());
    });
}

/// Benchmark feature extraction, scoring and outline building at various sizes.
fn bench_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline");
    let analyzer = Pipeline::default().analyzer();

    for page_count in [1, 10, 50].iter() {
        let doc = create_test_document(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| analyzer.analyze("bench.pdf", black_box(&doc)));
        });
    }

    group.finish();
}

/// Benchmark TF-IDF ranking at various corpus sizes.
fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");
    let lexicon = Arc::new(Lexicon::new());
    let ranker = RelevanceRanker::new(
        Arc::new(TfIdfBackend::new(lexicon.clone())),
        lexicon,
        RankOptions::default(),
    );
    let query = Query::new("Research Analyst", "Compare benchmark methodology");

    for count in [10, 100, 500].iter() {
        let sections = create_sections(*count);

        group.bench_function(format!("{}_sections", count), |b| {
            b.iter(|| ranker.rank(black_box(&query), sections.clone()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_format_detection, bench_outline, bench_ranking);
criterion_main!(benches);
