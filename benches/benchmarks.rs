//! Benchmarks for the pagination engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use page_flow::layout::FontMetrics;
use page_flow::{
    measure_pass, paginate, Document, EditOp, LayoutMode, OverlaySet, PageProfile,
    TextLayoutRenderer,
};

fn renderer() -> TextLayoutRenderer {
    TextLayoutRenderer::new(PageProfile::default(), FontMetrics::default())
}

fn medium_document() -> Document {
    // Roughly ten pages of content
    let text = (0..150)
        .map(|i| {
            format!(
                "Paragraph {} contains enough text to span multiple lines and test the line \
                 breaking algorithm.",
                i
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    Document::from_text(&text)
}

fn bench_layout_medium(c: &mut Criterion) {
    c.bench_function("layout_medium_document", |b| {
        let document = medium_document();
        let renderer = renderer();

        b.iter(|| {
            black_box(renderer.layout(&document));
        });
    });
}

fn bench_measure_pass(c: &mut Criterion) {
    c.bench_function("measure_pass_medium_document", |b| {
        let document = medium_document();
        let profile = PageProfile::default();
        let geometry = renderer().layout(&document);

        b.iter(|| {
            black_box(measure_pass(
                &document,
                &geometry,
                &profile,
                LayoutMode::Paged,
            ));
        });
    });
}

fn bench_paginate_oversized(c: &mut Criterion) {
    c.bench_function("paginate_oversized_paragraph", |b| {
        let profile = PageProfile::default();
        let text = "lorem ipsum dolor sit amet ".repeat(2000);

        b.iter(|| {
            let mut document = Document::from_text(&text);
            let mut renderer = renderer();
            black_box(paginate(&mut document, &mut renderer, &profile, LayoutMode::Paged, 64).ok());
        });
    });
}

fn bench_remap_overlays(c: &mut Criterion) {
    c.bench_function("remap_overlays_after_insert", |b| {
        let mut document = medium_document();
        let mut renderer = renderer();
        let overlays = paginate(
            &mut document,
            &mut renderer,
            &PageProfile::default(),
            LayoutMode::Paged,
            64,
        )
        .map(|result| result.overlays)
        .unwrap_or_else(|_| OverlaySet::empty());

        let result = document.apply_edit(EditOp::insert(0, "x"));
        let mapping = result.map(|r| r.mapping).unwrap_or_default();
        let size = document.len();

        b.iter(|| {
            black_box(overlays.map(&mapping, size));
        });
    });
}

criterion_group!(
    benches,
    bench_layout_medium,
    bench_measure_pass,
    bench_paginate_oversized,
    bench_remap_overlays,
);

criterion_main!(benches);
