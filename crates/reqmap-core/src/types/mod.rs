//! Core data types for reqmap.
//!
//! This module provides the fundamental types used throughout the workspace:
//! - Package descriptors as supplied by a package index
//! - Prefix contexts describing the URL roots packages are served from
//! - Shim declarations for non-module libraries

pub mod descriptor;
pub mod index;
pub mod prefix;
pub mod shim;

// Re-export all public types
pub use descriptor::{PackageDescriptor, PackagingKind, SubPackage};
pub use index::{PackageIndex, PackageIndexReader};
pub use prefix::{PrefixContext, UrlPrefix};
pub use shim::{ShimEntry, ShimTable};
