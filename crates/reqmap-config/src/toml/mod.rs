//! reqmap.toml configuration parsing

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use camino::Utf8Path;
use reqmap_core::error::ReqmapError;
use reqmap_core::types::PrefixContext;
use reqmap_core::utils::ensure_trailing_slash;
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// Local prefix used when nothing else is configured
pub const DEFAULT_PREFIX: &str = "/webjars/";

/// Complete reqmap.toml configuration
///
/// Every section is optional; an empty file is a valid local-only,
/// versioned configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReqmapToml {
    /// Where package files are served from
    pub loader: LoaderSection,

    /// Package index location and roots
    pub index: IndexSection,

    /// Shim table overrides
    pub shims: ShimsSection,

    /// Output format and merge strictness
    pub output: OutputSection,
}

/// `[loader]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderSection {
    /// Local URL prefix, always the last location tried
    pub prefix: String,

    /// CDN URL prefix tried before the local one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdn_prefix: Option<String>,

    /// Whether locations carry a `<version>/` segment
    pub versioned: bool,
}

/// `[index]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexSection {
    /// Index file (`.json` / `.toml`) or directory of unpacked packages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Packages to configure; empty means every package in the index
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<String>,
}

/// `[shims]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShimsSection {
    /// Shim file whose entries override the bundled table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Start from the bundled shim table
    pub defaults: bool,
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: OutputFormat,

    /// Fail on version conflicts and identifier collisions
    pub strict: bool,
}

/// What `generate` writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Module id -> loader fragment object
    Json,
    /// Standalone initialization script
    #[default]
    Script,
    /// One flattened loader configuration object
    Combined,
}

/// The three ways package locations can be laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderMode {
    /// Local prefix only, versioned
    Local { prefix: String },
    /// CDN first with local fallback, both versioned
    CdnWithFallback { cdn: String, local: String },
    /// Single prefix without version segments
    Unversioned { prefix: String },
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            cdn_prefix: None,
            versioned: true,
        }
    }
}

impl Default for ShimsSection {
    fn default() -> Self {
        Self {
            path: None,
            defaults: true,
        }
    }
}

impl LoaderSection {
    /// Loader mode described by this section
    pub fn mode(&self) -> ConfigResult<LoaderMode> {
        match (&self.cdn_prefix, self.versioned) {
            (Some(_), false) => Err(ReqmapError::validation(
                "loader.cdn_prefix",
                "CDN locations are always versioned; remove cdn_prefix or set versioned = true",
            )),
            (Some(cdn), true) => Ok(LoaderMode::CdnWithFallback {
                cdn: cdn.clone(),
                local: self.prefix.clone(),
            }),
            (None, true) => Ok(LoaderMode::Local {
                prefix: self.prefix.clone(),
            }),
            (None, false) => Ok(LoaderMode::Unversioned {
                prefix: self.prefix.clone(),
            }),
        }
    }
}

impl LoaderMode {
    /// Prefix context for this mode, with every prefix ending in `/`
    pub fn context(&self) -> PrefixContext {
        match self {
            LoaderMode::Local { prefix } => PrefixContext::local(ensure_trailing_slash(prefix)),
            LoaderMode::CdnWithFallback { cdn, local } => {
                PrefixContext::with_cdn(ensure_trailing_slash(cdn), ensure_trailing_slash(local))
            },
            LoaderMode::Unversioned { prefix } => {
                PrefixContext::unversioned(ensure_trailing_slash(prefix))
            },
        }
    }
}

impl ReqmapToml {
    pub fn prefix_context(&self) -> ConfigResult<PrefixContext> {
        Ok(self.loader.mode()?.context())
    }

    /// Make relative index and shim paths relative to `base` instead of the cwd
    pub fn resolve_paths(&mut self, base: &Utf8Path) {
        for path in [&mut self.index.path, &mut self.shims.path].into_iter().flatten() {
            if Utf8Path::new(path.as_str()).is_relative() {
                *path = base.join(path.as_str()).into_string();
            }
        }
    }
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Script => "script",
            OutputFormat::Combined => "combined",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ReqmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "script" | "js" => Ok(OutputFormat::Script),
            "combined" => Ok(OutputFormat::Combined),
            other => Err(ReqmapError::validation(
                "output.format",
                format!("unknown format '{}', expected json, script or combined", other),
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a reqmap.toml document; `file` names it in error messages
pub fn parse_reqmap_toml(content: &str, file: &str) -> ConfigResult<ReqmapToml> {
    // toml_edit first for syntax errors with positions
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| toml_error(file, content, e.span(), e.message()))?;

    let config: ReqmapToml = ::toml::from_str(content)
        .map_err(|e| toml_error(file, content, e.span(), e.message()))?;

    validate_config(&config)?;

    Ok(config)
}

/// Validate field values serde cannot check
pub fn validate_config(config: &ReqmapToml) -> ConfigResult<()> {
    validate_prefix("loader.prefix", &config.loader.prefix)?;
    if let Some(cdn) = &config.loader.cdn_prefix {
        validate_prefix("loader.cdn_prefix", cdn)?;
    }
    config.loader.mode()?;

    if matches!(&config.index.path, Some(path) if path.trim().is_empty()) {
        return Err(ReqmapError::validation("index.path", "must not be empty"));
    }
    if let Some(root) = config.index.roots.iter().find(|root| root.trim().is_empty()) {
        return Err(ReqmapError::validation(
            "index.roots",
            format!("root package names must not be blank (got '{}')", root),
        ));
    }

    if matches!(&config.shims.path, Some(path) if path.trim().is_empty()) {
        return Err(ReqmapError::validation("shims.path", "must not be empty"));
    }

    Ok(())
}

/// Load a reqmap.toml file, resolving its relative paths against its directory
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<ReqmapToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ReqmapError::io(format!("Failed to read {}", path), e))?;

    let mut config = parse_reqmap_toml(&content, path.as_str())?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

fn validate_prefix(field: &str, prefix: &str) -> ConfigResult<()> {
    if prefix.trim().is_empty() {
        return Err(ReqmapError::validation(field, "URL prefix must not be empty"));
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(ReqmapError::validation(
            field,
            format!("URL prefix '{}' must not contain whitespace", prefix),
        ));
    }
    Ok(())
}

fn toml_error(file: &str, content: &str, span: Option<Range<usize>>, message: &str) -> ReqmapError {
    let message = match span {
        Some(span) => {
            let (line, column) = line_column(content, span.start);
            format!("line {}, column {}: {}", line, column, message.trim())
        },
        None => message.trim().to_string(),
    };
    ReqmapError::TomlParse {
        file: file.to_string(),
        message,
    }
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    (line, column)
}
