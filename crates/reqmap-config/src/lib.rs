//! Configuration parsing for reqmap
//!
//! This crate handles reqmap.toml project files, the package index formats
//! (JSON and TOML index files, or a directory tree of unpacked packages) and
//! shim tables, producing the inputs the resolver works on.

pub mod index;
pub mod json;
pub mod merge;
pub mod scan;
pub mod shims;
pub mod toml;

// Re-export main types
pub use index::{FileIndexReader, IndexEntry, IndexSource};
pub use json::ManifestJson;
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use shims::{default_shims, load_shims};
pub use toml::{IndexSection, LoaderMode, LoaderSection, OutputFormat, OutputSection, ReqmapToml, ShimsSection};

use reqmap_core::error::ReqmapError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ReqmapError>;

/// Project configuration file name
pub const CONFIG_FILE: &str = "reqmap.toml";
