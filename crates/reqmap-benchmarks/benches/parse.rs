//! Index and configuration parsing benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reqmap_benchmarks::{criterion_config, generate_index, index_json};
use reqmap_config::json::parse_json_index;
use reqmap_config::shims::{parse_shims, DEFAULT_SHIMS};
use reqmap_config::toml::parse_reqmap_toml;

const REQMAP_TOML: &str = r#"
[loader]
prefix = "/webjars/"
cdn_prefix = "http://cdn.jsdelivr.net/webjars/"

[index]
path = "index.json"
roots = ["angular-bootstrap", "jquery"]

[output]
format = "script"
strict = true
"#;

fn bench_json_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_index");

    for size in [100, 1000, 10000] {
        let json = index_json(&generate_index(size, 3));
        group.throughput(Throughput::Bytes(json.len() as u64));

        group.bench_with_input(BenchmarkId::new("packages", size), &json, |b, json| {
            b.iter(|| black_box(parse_json_index(json)))
        });
    }

    group.finish();
}

fn bench_config_files(c: &mut Criterion) {
    c.bench_function("reqmap_toml", |b| {
        b.iter(|| black_box(parse_reqmap_toml(REQMAP_TOML, "reqmap.toml")))
    });

    c.bench_function("bundled_shims", |b| {
        b.iter(|| black_box(parse_shims(DEFAULT_SHIMS, "shims.toml")))
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_json_index, bench_config_files
}
criterion_main!(benches);
