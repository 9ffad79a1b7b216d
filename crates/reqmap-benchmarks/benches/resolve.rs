//! Merge and assembly benchmarks
//!
//! Measures the breadth-first merge, shim attachment and configuration
//! assembly over generated indexes of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rayon::prelude::*;
use reqmap_benchmarks::{criterion_config, generate_index};
use reqmap_config::default_shims;
use reqmap_core::types::PrefixContext;
use reqmap_resolver::{assemble, attach_shims, merge, Merger};

const CDN: &str = "http://cdn.jsdelivr.net/webjars/";
const LOCAL: &str = "/webjars/";

fn bench_merge_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_all");
    let context = PrefixContext::with_cdn(CDN, LOCAL);

    for size in [10, 100, 1000] {
        let index = generate_index(size, 4);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("packages", size), &index, |b, index| {
            b.iter(|| black_box(Merger::new(index, &context).merge_all()))
        });
    }

    group.finish();
}

fn bench_single_root_closure(c: &mut Criterion) {
    let mut group = c.benchmark_group("root_closure");
    let context = PrefixContext::local(LOCAL);

    for fanout in [1, 4, 16] {
        let index = generate_index(500, fanout);
        let root = index.packages()[0].clone();

        group.bench_with_input(BenchmarkId::new("fanout", fanout), &index, |b, index| {
            b.iter(|| black_box(merge(std::slice::from_ref(&root), index, &context)))
        });
    }

    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let context = PrefixContext::with_cdn(CDN, LOCAL);
    let shims = default_shims().unwrap_or_default();

    for size in [10, 100, 1000] {
        let index = generate_index(size, 2);
        let config = attach_shims(merge(index.packages(), &index, &context).config, &shims);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("modules", size), &config, |b, config| {
            b.iter(|| black_box(assemble(config, &context)))
        });
    }

    group.finish();
}

/// Independent requests sharing one index
fn bench_concurrent_requests(c: &mut Criterion) {
    let index = generate_index(200, 4);
    let context = PrefixContext::with_cdn(CDN, LOCAL);

    c.bench_function("concurrent_requests_64", |b| {
        b.iter(|| {
            let scripts: Vec<usize> = (0..64)
                .into_par_iter()
                .map(|_| {
                    let outcome = merge(index.packages(), &index, &context);
                    assemble(&outcome.config, &context).script.len()
                })
                .collect();
            black_box(scripts)
        })
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_merge_all, bench_single_root_closure, bench_assemble, bench_concurrent_requests
}
criterion_main!(benches);
