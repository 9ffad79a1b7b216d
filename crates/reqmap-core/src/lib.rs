//! # reqmap-core
//!
//! Core types and utilities shared across all reqmap crates.
//!
//! This crate provides:
//! - PackageDescriptor and PackagingKind as read from a package index
//! - PrefixContext describing where (and how) package files are served
//! - ShimEntry and ShimTable for libraries that predate the module format
//! - ReqmapError enum for unified error handling
//! - The name normalizer that turns raw package names into module identifiers
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (PackageDescriptor, PrefixContext, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Name normalization and URL path helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{ReqmapError, ReqmapResult};
pub use types::{
    PackageDescriptor, PackageIndex, PackageIndexReader, PackagingKind, PrefixContext, ShimEntry,
    ShimTable, SubPackage, UrlPrefix,
};
pub use utils::normalize;
