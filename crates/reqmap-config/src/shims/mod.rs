//! Shim tables
//!
//! A default table ships inside the binary; a user file (TOML or JSON, keyed
//! by package name) can add entries or replace bundled ones.

use camino::Utf8Path;
use reqmap_core::error::ReqmapError;
use reqmap_core::types::ShimTable;
use tracing::debug;

use crate::ConfigResult;

/// Bundled shim table
pub const DEFAULT_SHIMS: &str = include_str!("../../data/shims.toml");

/// Parse the bundled shim table
pub fn default_shims() -> ConfigResult<ShimTable> {
    parse_toml_shims(DEFAULT_SHIMS, "bundled shims.toml")
}

/// Parse a shim file, choosing JSON or TOML by the `file` extension
pub fn parse_shims(content: &str, file: &str) -> ConfigResult<ShimTable> {
    if Utf8Path::new(file).extension() == Some("json") {
        serde_json::from_str(content).map_err(|e| ReqmapError::JsonParse {
            message: format!("{}: {}", file, e),
        })
    } else {
        parse_toml_shims(content, file)
    }
}

fn parse_toml_shims(content: &str, file: &str) -> ConfigResult<ShimTable> {
    ::toml::from_str(content).map_err(|e| ReqmapError::TomlParse {
        file: file.to_string(),
        message: e.message().trim().to_string(),
    })
}

/// Shim table for a request
///
/// Starts from the bundled table when `include_defaults` is set, then lets
/// entries from `path` replace or extend it.
pub async fn load_shims(path: Option<&Utf8Path>, include_defaults: bool) -> ConfigResult<ShimTable> {
    let mut table = if include_defaults {
        default_shims()?
    } else {
        ShimTable::new()
    };

    if let Some(path) = path {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReqmapError::io(format!("Failed to read shim file {}", path), e))?;
        let overrides = parse_shims(&content, path.as_str())?;
        debug!("Loaded {} shims from {}", overrides.len(), path);
        table.extend(overrides);
    }

    Ok(table)
}
