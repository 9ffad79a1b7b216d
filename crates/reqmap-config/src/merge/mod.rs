//! Configuration discovery, layering and environment overrides

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use reqmap_core::error::ReqmapError;
use tracing::debug;

use crate::toml::{validate_config, ReqmapToml};
use crate::{ConfigResult, CONFIG_FILE};

/// Prefix of environment variables that override configuration
pub const ENV_PREFIX: &str = "REQMAP_";

/// Override keys in the order they are applied within one layer
///
/// When two keys set the same field, the later one here wins.
const OVERRIDE_ORDER: &[&str] = &[
    "prefix",
    "cdn",
    "cdn_prefix",
    "versioned",
    "unversioned",
    "index",
    "roots",
    "shims",
    "default_shims",
    "format",
    "strict",
];

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Directory the search starts from
    cwd: Utf8PathBuf,
}

/// Configuration layering: project file, then environment, then CLI flags
pub struct ConfigLayering;

/// Where the project configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// A reqmap.toml file
    ProjectToml(Utf8PathBuf),
    /// No file found; built-in defaults
    Defaults,
}

impl ConfigLoader {
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Find reqmap.toml in the cwd or the nearest ancestor holding one
    pub fn find_config(&self) -> Option<Utf8PathBuf> {
        let mut current: Option<&Utf8Path> = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }
            current = dir.parent();
        }

        None
    }

    /// Load the project configuration, falling back to defaults
    pub async fn load_project_config(&self) -> ConfigResult<(ReqmapToml, ConfigSource)> {
        match self.find_config() {
            Some(path) => {
                debug!("Loading configuration from {}", path);
                let config = crate::toml::load_from_file(&path).await?;
                Ok((config, ConfigSource::ProjectToml(path)))
            },
            None => {
                debug!("No {} found above {}, using defaults", CONFIG_FILE, self.cwd);
                Ok((ReqmapToml::default(), ConfigSource::Defaults))
            },
        }
    }
}

impl ConfigLayering {
    /// Apply environment overrides, then CLI overrides, and re-validate
    ///
    /// Override keys are field names: `prefix`, `cdn_prefix`, `versioned`,
    /// `unversioned`, `index`, `roots`, `shims`, `default_shims`, `format`
    /// and `strict`. Environment keys carry the `REQMAP_` prefix. Within one
    /// layer `cdn_prefix` beats `cdn` and `unversioned` beats `versioned`.
    pub fn merge_configs(
        project_config: ReqmapToml,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<ReqmapToml> {
        let mut merged = project_config;

        Self::apply_env_overrides(&mut merged, &env_overrides)?;
        Self::apply_cli_overrides(&mut merged, &cli_overrides)?;

        validate_config(&merged)?;
        Ok(merged)
    }

    fn apply_env_overrides(
        config: &mut ReqmapToml,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        let fields = overrides.iter().filter_map(|(key, value)| {
            let field = key.strip_prefix(ENV_PREFIX)?.to_ascii_lowercase();
            Some((field, key.as_str(), value.as_str()))
        });

        for (field, key, value) in in_override_order(fields) {
            if !apply_override(config, &field, value, key)? {
                debug!("Ignoring unknown environment override {}", key);
            }
        }
        Ok(())
    }

    fn apply_cli_overrides(
        config: &mut ReqmapToml,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        let fields = overrides
            .iter()
            .map(|(key, value)| (key.clone(), key.as_str(), value.as_str()));

        for (field, key, value) in in_override_order(fields) {
            if !apply_override(config, &field, value, key)? {
                debug!("Ignoring unknown CLI override {}", key);
            }
        }
        Ok(())
    }

    /// Collect `REQMAP_*` environment variables
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

/// Sort `(field, origin, value)` triples into application order
///
/// Unknown fields go last, ordered by name, so the outcome never depends on
/// map iteration order.
fn in_override_order<'o>(
    fields: impl Iterator<Item = (String, &'o str, &'o str)>,
) -> Vec<(String, &'o str, &'o str)> {
    let mut fields: Vec<_> = fields.collect();
    fields.sort_by(|(a, _, _), (b, _, _)| {
        let rank = |field: &str| {
            OVERRIDE_ORDER
                .iter()
                .position(|known| *known == field)
                .unwrap_or(OVERRIDE_ORDER.len())
        };
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });
    fields
}

/// Set one field; returns false for unknown keys
fn apply_override(config: &mut ReqmapToml, field: &str, value: &str, origin: &str) -> ConfigResult<bool> {
    match field {
        "prefix" => config.loader.prefix = value.to_string(),
        "cdn_prefix" | "cdn" => {
            config.loader.cdn_prefix = Some(value.to_string()).filter(|v| !v.is_empty());
        },
        "versioned" => config.loader.versioned = parse_bool(origin, value)?,
        "unversioned" => config.loader.versioned = !parse_bool(origin, value)?,
        "index" => config.index.path = Some(value.to_string()),
        "roots" => {
            config.index.roots = value
                .split(',')
                .map(str::trim)
                .filter(|root| !root.is_empty())
                .map(str::to_string)
                .collect();
        },
        "shims" => config.shims.path = Some(value.to_string()),
        "default_shims" => config.shims.defaults = parse_bool(origin, value)?,
        "format" => config.output.format = value.parse()?,
        "strict" => config.output.strict = parse_bool(origin, value)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_bool(field: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ReqmapError::validation(
            field,
            format!("expected true or false, got '{}'", other),
        )),
    }
}
