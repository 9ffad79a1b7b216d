//! Common utilities for benchmarks

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};
use reqmap_core::types::{PackageDescriptor, PackageIndex, SubPackage};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// Synthetic index of `size` packages
///
/// Every third package is a manifest package, every tenth carries a
/// sub-package, and package `i` depends on up to `fanout` of the packages
/// numbered after it, so the graph is dense but acyclic.
pub fn generate_index(size: usize, fanout: usize) -> PackageIndex {
    (0..size)
        .map(|i| {
            let name = format!("lib{}.js", i);
            let version = format!("{}.{}.{}", i % 7, i % 13, i % 3);
            let mut descriptor = if i % 3 == 0 {
                PackageDescriptor::manifest(name, version).with_main(format!("dist/lib{}", i))
            } else {
                PackageDescriptor::classic(name, version)
            };
            for dep in (i + 1..size).take(fanout) {
                descriptor = descriptor.with_dependency(format!("lib{}.js", dep));
            }
            if i % 10 == 0 {
                descriptor = descriptor.with_sub_package(SubPackage::new(format!("lib{}-sub", i), "sub"));
            }
            descriptor
        })
        .collect()
}

/// JSON index text for `index`, in the `{"packages": [...]}` layout
pub fn index_json(index: &PackageIndex) -> String {
    serde_json::json!({ "packages": index.packages() }).to_string()
}
