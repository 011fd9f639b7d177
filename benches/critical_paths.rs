//! Criterion benchmarks for plainweave critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Pattern: repeat unit expansion and pattern space
//! - Weave: document building and WIF serialization
//! - Shed: per-crossing color resolution
//! - Renderer: document to PNG

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use plainweave::color::parse_rgb;
use plainweave::pattern::{pattern_space, repeat_unit};
use plainweave::renderer::{render_canvas, render_image};
use plainweave::shed::ShedResolver;
use plainweave::{build, serialize_document, Options, Pattern};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Pattern of `n` runs cycling through lengths 1..=4
fn make_pattern(n: usize) -> Pattern {
    Pattern::new((0..n).map(|i| (i % 4) as u32 + 1).collect()).expect("non-empty pattern")
}

fn options_for(size: usize) -> Options {
    Options::default().with_size(Some(size))
}

// =============================================================================
// Pattern Benchmarks
// =============================================================================

fn bench_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern");

    for runs in [2, 8, 32].iter() {
        let pattern = make_pattern(*runs);
        group.bench_with_input(BenchmarkId::new("repeat_unit", runs), &pattern, |b, p| {
            b.iter(|| repeat_unit(black_box(p), 2))
        });
    }

    let unit = repeat_unit(&make_pattern(8), 2).expect("valid unit");
    for size in [50, 500, 5000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("pattern_space", size), size, |b, &size| {
            b.iter(|| pattern_space(black_box(&unit), size))
        });
    }

    group.finish();
}

// =============================================================================
// Weave Benchmarks
// =============================================================================

fn bench_weave(c: &mut Criterion) {
    let mut group = c.benchmark_group("weave");
    let pattern = make_pattern(6);

    for size in [48, 200, 800].iter() {
        let options = options_for(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &options, |b, options| {
            b.iter(|| build(black_box(&pattern), options))
        });

        let doc = build(&pattern, &options).expect("weave builds").document;
        group.bench_with_input(BenchmarkId::new("serialize", size), &doc, |b, doc| {
            b.iter(|| serialize_document(black_box(doc)))
        });
    }

    group.bench_function("parse_rgb", |b| b.iter(|| parse_rgb(black_box("0,0,128"))));

    group.finish();
}

// =============================================================================
// Shed Benchmarks
// =============================================================================

fn bench_shed(c: &mut Criterion) {
    let mut group = c.benchmark_group("shed");
    let doc = build(&make_pattern(4), &options_for(64)).expect("weave builds").document;
    let resolver = ShedResolver::new(&doc).expect("complete document");

    let keys: Vec<String> = (1..=64).map(|i| i.to_string()).collect();
    group.throughput(Throughput::Elements((keys.len() * keys.len()) as u64));
    group.bench_function("color_key_64x64", |b| {
        b.iter(|| {
            for shot in &keys {
                for thread in &keys {
                    let _ = black_box(resolver.color_key(thread, shot));
                }
            }
        })
    });

    group.finish();
}

// =============================================================================
// Renderer Benchmarks
// =============================================================================

fn bench_renderer(c: &mut Criterion) {
    let mut group = c.benchmark_group("renderer");
    group.sample_size(20);

    for size in [16, 48, 128].iter() {
        let options = options_for(*size);
        let doc = build(&make_pattern(3), &options).expect("weave builds").document;

        group.throughput(Throughput::Elements((*size * *size) as u64));
        group.bench_with_input(BenchmarkId::new("render_canvas", size), &doc, |b, doc| {
            b.iter(|| render_canvas(black_box(doc), &options))
        });
        group.bench_with_input(BenchmarkId::new("render_png", size), &doc, |b, doc| {
            b.iter(|| render_image(black_box(doc), &options))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pattern, bench_weave, bench_shed, bench_renderer);

criterion_main!(benches);
