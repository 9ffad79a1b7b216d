//! Resolution and merge engine for reqmap
//!
//! Turns package descriptors into loader configuration: candidate locations
//! per URL prefix, a first-seen-wins merge over the dependency closure, shim
//! attachment, and final assembly into a configuration object and script.

pub mod assemble;
pub mod graph;
pub mod location;
pub mod merge;
pub mod setup;
pub mod shim;

// Re-export main types
pub use assemble::{assemble, SetupOutput};
pub use graph::ModuleGraph;
pub use location::{resolve, resolve_sub_package};
pub use merge::{merge, Diagnostic, MergeOptions, MergeOutcome, Merger};
pub use setup::{ConfiguredModule, ModuleLayout, ResolvedModule, SetupConfig};
pub use shim::{attach_shims, unconfigured_shim_deps};

use reqmap_core::error::ReqmapError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, ReqmapError>;

#[cfg(test)]
pub(crate) mod fixtures;
