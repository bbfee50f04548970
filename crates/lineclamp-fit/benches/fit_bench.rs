//! Benchmarks for the fitting search.
//!
//! Run with: cargo bench -p lineclamp-fit

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lineclamp_fit::{BoxStyle, CellProbe, LineBudget, fit};
use lineclamp_text::{Atom, Content, Node};
use std::hint::black_box;

// =============================================================================
// Test Data
// =============================================================================

fn prose(len: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn cjk(len: usize) -> String {
    "\u{4E2D}\u{6587}\u{6D4B}\u{8BD5}\u{6587}\u{672C}"
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// Alternating text runs and inline atoms.
fn mixed(runs: usize) -> Content<'static> {
    let mut content = Content::new();
    for i in 0..runs {
        content.push(Node::text(prose(37 + i % 11)));
        content.push(Node::opaque(Atom::new("a", format!("link{i}"))));
    }
    content
}

fn trailer() -> [Node<'static>; 1] {
    [Node::opaque(Atom::new("a", "Expand"))]
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_single_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit/single_run");
    let trailer = trailer();

    for len in [100, 1_000, 10_000] {
        let content = Content::raw(prose(len));
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &content, |b, content| {
            let mut probe = CellProbe::new(80, 1.0);
            let budget = LineBudget::compute(1.0, 3, 0.0, 0.0);
            b.iter(|| black_box(fit(&mut probe, content, &trailer, budget, "...")))
        });
    }

    group.finish();
}

fn bench_cjk_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit/cjk_run");
    let trailer = trailer();

    for len in [100, 1_000] {
        let content = Content::raw(cjk(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &content, |b, content| {
            let mut probe = CellProbe::new(40, 1.0);
            let budget = LineBudget::compute(1.0, 2, 0.0, 0.0);
            b.iter(|| black_box(fit(&mut probe, content, &trailer, budget, "...")))
        });
    }

    group.finish();
}

fn bench_mixed_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit/mixed_nodes");
    let trailer = trailer();

    for runs in [4, 32, 256] {
        let content = mixed(runs);
        group.bench_with_input(BenchmarkId::from_parameter(runs), &content, |b, content| {
            let mut probe = CellProbe::new(60, 1.0);
            let budget = LineBudget::compute(1.0, 4, 0.0, 0.0);
            b.iter(|| black_box(fit(&mut probe, content, &trailer, budget, "...")))
        });
    }

    group.finish();
}

fn bench_whole_fits(c: &mut Criterion) {
    let content = Content::raw(prose(60));
    let trailer = trailer();
    c.bench_function("fit/whole_fits", |b| {
        let mut probe = CellProbe::new(80, 1.0);
        let budget = LineBudget::compute(1.0, 3, 0.0, 0.0);
        b.iter(|| black_box(fit(&mut probe, &content, &trailer, budget, "...")))
    });
}

fn bench_line_budget(c: &mut Criterion) {
    let style = BoxStyle::from_css("21px", "4px", "4px");
    c.bench_function("budget/measure", |b| {
        let mut probe = CellProbe::new(80, 21.0);
        b.iter(|| black_box(LineBudget::measure(&mut probe, &style, black_box(3))))
    });
}

criterion_group!(
    benches,
    bench_single_run,
    bench_cjk_run,
    bench_mixed_nodes,
    bench_whole_fits,
    bench_line_budget
);
criterion_main!(benches);
