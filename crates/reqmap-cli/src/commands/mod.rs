//! Command implementations and dispatch logic.
//!
//! Every command loads the layered configuration and reads the package index
//! afresh, so each invocation is one independent configuration request.

use std::collections::HashMap;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use reqmap_config::{ConfigLayering, ConfigLoader, ConfigSource, FileIndexReader, ReqmapToml};
use reqmap_core::error::{ReqmapError, ReqmapResult};
use reqmap_core::types::{PackageIndex, PackageIndexReader, PrefixContext};
use reqmap_resolver::{MergeOptions, MergeOutcome, Merger};
use tracing::{debug, info};

pub mod check;
pub mod generate;
pub mod list;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    /// Overrides from command line flags
    pub overrides: HashMap<String, String>,
}

/// Layered configuration for one request
pub struct Session {
    pub config: ReqmapToml,
    pub source: ConfigSource,
    pub context: PrefixContext,
}

impl CommandContext {
    pub fn new(overrides: HashMap<String, String>) -> ReqmapResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ReqmapError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
            ReqmapError::validation("cwd", format!("current directory is not UTF-8: {}", e))
        })?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            overrides,
        })
    }

    /// Project file, then REQMAP_* variables, then flags
    pub async fn session(&self) -> ReqmapResult<Session> {
        let (project, source) = ConfigLoader::new(self.cwd.clone()).load_project_config().await?;
        let config = ConfigLayering::merge_configs(
            project,
            ConfigLayering::collect_env_overrides(),
            self.overrides.clone(),
        )?;
        let context = config.prefix_context()?;
        debug!("Configuration from {:?}, prefixes {:?}", source, context.prefixes());

        Ok(Session {
            config,
            source,
            context,
        })
    }
}

impl Session {
    /// Read the configured package index
    pub async fn read_index(&self) -> ReqmapResult<PackageIndex> {
        let path = self.config.index.path.as_deref().ok_or_else(|| {
            ReqmapError::validation(
                "index.path",
                "no package index configured; pass --index or set [index] path in reqmap.toml",
            )
        })?;
        FileIndexReader::from_path(path).read_index().await
    }

    /// Merge `roots`, or the configured roots, or the whole index
    pub fn merge(&self, index: &PackageIndex, roots: &[String], strict: bool) -> ReqmapResult<MergeOutcome> {
        let merger = Merger::new(index, &self.context).with_options(MergeOptions { strict });
        let roots = if roots.is_empty() {
            self.config.index.roots.as_slice()
        } else {
            roots
        };

        if roots.is_empty() {
            merger.merge_all()
        } else {
            merger.merge_named(roots)
        }
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> ReqmapResult<ExitCode> {
    match command {
        Commands::Generate {
            roots,
            format,
            output,
        } => {
            info!("Generating configuration (roots: {:?})", roots);
            generate::execute(roots, format, output, ctx).await?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Check { roots } => {
            info!("Checking package index");
            let report = check::execute(roots, ctx).await?;
            Ok(if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        },
        Commands::List => {
            list::execute(ctx).await?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Version => {
            show_version(ctx);
            Ok(ExitCode::SUCCESS)
        },
    }
}

/// Version, build date and compiler
pub fn version_text() -> String {
    format!(
        "reqmap {}\nbuilt {} with {}",
        env!("CARGO_PKG_VERSION"),
        env!("REQMAP_BUILD_DATE"),
        env!("REQMAP_RUSTC_VERSION")
    )
}

fn show_version(ctx: &CommandContext) {
    ctx.output.data(&version_text());
}
