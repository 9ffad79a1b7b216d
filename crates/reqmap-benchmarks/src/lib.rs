//! reqmap benchmarking suite
//!
//! Benchmarks for index parsing, dependency merging and configuration
//! assembly over generated package indexes.

pub mod common;

pub use common::*;
