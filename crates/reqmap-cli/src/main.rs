//! # reqmap-cli
//!
//! Command line front end: loads reqmap.toml and the package index, merges
//! the requested packages and writes the loader configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use reqmap_core::error::{ReqmapError, ReqmapResult};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Generate RequireJS configuration for bundled front-end packages
#[derive(Parser)]
#[command(name = "reqmap", version, about = "RequireJS configuration for WebJars")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Flags that override reqmap.toml and REQMAP_* variables
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Package index file (.json/.toml) or directory
    #[arg(long, global = true, value_name = "PATH")]
    pub index: Option<String>,

    /// Local URL prefix
    #[arg(long, global = true, value_name = "URL")]
    pub prefix: Option<String>,

    /// CDN URL prefix tried before the local prefix
    #[arg(long, global = true, value_name = "URL")]
    pub cdn: Option<String>,

    /// Leave the version segment out of locations
    #[arg(long, global = true)]
    pub unversioned: bool,

    /// Shim file overriding the bundled shims
    #[arg(long, global = true, value_name = "PATH")]
    pub shims: Option<String>,

    /// Do not start from the bundled shim table
    #[arg(long, global = true)]
    pub no_default_shims: bool,

    /// Treat version conflicts and identifier collisions as errors
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the loader configuration
    Generate {
        /// Packages to configure (default: [index] roots, else every package)
        roots: Vec<String>,
        /// Output format
        #[arg(long, value_parser = ["json", "script", "combined"])]
        format: Option<String>,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Report conflicts, collisions, missing dependencies and cycles
    Check {
        roots: Vec<String>,
    },
    /// List the packages in the index
    List,
    /// Show version information
    Version,
}

impl Overrides {
    /// Override map in the shape ConfigLayering expects
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        let values = [
            ("index", self.index.clone()),
            ("prefix", self.prefix.clone()),
            ("cdn_prefix", self.cdn.clone()),
            ("shims", self.shims.clone()),
        ];
        for (key, value) in values {
            if let Some(value) = value {
                overrides.insert(key.to_string(), value);
            }
        }
        if self.unversioned {
            overrides.insert("unversioned".to_string(), "true".to_string());
        }
        if self.no_default_shims {
            overrides.insert("default_shims".to_string(), "false".to_string());
        }
        if self.strict {
            overrides.insert("strict".to_string(), "true".to_string());
        }
        overrides
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.log_json);
    setup_panic_handler();

    debug!("Starting reqmap v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> ReqmapResult<ExitCode> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| ReqmapError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.overrides.to_map())?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("REQMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "reqmap_cli={level},reqmap_core={level},reqmap_config={level},reqmap_resolver={level}"
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("reqmap encountered an unexpected error: {}", panic_info);
        eprintln!("reqmap crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
