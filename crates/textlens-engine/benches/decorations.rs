use criterion::{Criterion, black_box, criterion_group, criterion_main};
use textlens_engine::decorations::{DecorationSet, RangeRegistry, build_raw_decorations, merge_overlapping};
use textlens_engine::editing::{Document, Viewport, flatten_visible};
mod common;

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset_map");
    group.sample_size(20);

    let doc = Document::from_text(&common::generate_paragraphs(1_000));
    group.bench_function("flatten_all", |b| {
        b.iter(|| {
            let visible = flatten_visible(black_box(&doc), &Viewport::all());
            black_box(visible);
        });
    });
    group.bench_function("flatten_window", |b| {
        b.iter(|| {
            let visible = flatten_visible(black_box(&doc), &Viewport::new(400..460));
            black_box(visible);
        });
    });

    group.finish();
}

fn bench_decoration_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("decorations");
    group.sample_size(20);

    let doc = Document::from_text(&common::generate_paragraphs(200));
    let visible = flatten_visible(&doc, &Viewport::all());
    let issues = common::generate_issues(200);

    group.bench_function("build_raw", |b| {
        let mut registry = RangeRegistry::new();
        b.iter(|| {
            let raw = build_raw_decorations(&doc, &visible.map, black_box(&issues), &mut registry);
            black_box(raw);
        });
    });

    let mut registry = RangeRegistry::new();
    let raw = build_raw_decorations(&doc, &visible.map, &issues, &mut registry);
    group.bench_function("merge", |b| {
        b.iter(|| {
            let merged = merge_overlapping(black_box(raw.clone()));
            black_box(merged);
        });
    });

    group.bench_function("full_pass", |b| {
        let mut registry = RangeRegistry::new();
        b.iter(|| {
            let set = DecorationSet::build(&doc, &visible.map, black_box(&issues), &mut registry);
            black_box(set);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_decoration_pass);
criterion_main!(benches);
