//! `reqmap generate`

use std::path::PathBuf;

use reqmap_config::{load_shims, OutputFormat};
use reqmap_core::error::{ReqmapError, ReqmapResult};
use reqmap_resolver::{assemble, attach_shims, SetupOutput};
use tracing::info;

use super::CommandContext;

/// Merge, attach shims, assemble and write the configuration
pub async fn execute(
    roots: Vec<String>,
    format: Option<String>,
    output: Option<PathBuf>,
    ctx: &CommandContext,
) -> ReqmapResult<()> {
    let session = ctx.session().await?;
    let format = match format {
        Some(format) => format.parse()?,
        None => session.config.output.format,
    };

    let index = session.read_index().await?;
    let outcome = session.merge(&index, &roots, session.config.output.strict)?;

    let shims = load_shims(
        session.config.shims.path.as_deref().map(camino::Utf8Path::new),
        session.config.shims.defaults,
    )
    .await?;
    let config = attach_shims(outcome.config, &shims);

    let text = render(&assemble(&config, &session.context), format);

    match output {
        Some(path) => {
            tokio::fs::write(&path, &text)
                .await
                .map_err(|e| ReqmapError::io(format!("Failed to write {}", path.display()), e))?;
            info!("Wrote {} modules to {}", config.len(), path.display());
            ctx.output.success(&format!(
                "Configured {} modules into {}",
                config.len(),
                path.display()
            ));
        },
        None => ctx.output.data(&text),
    }

    Ok(())
}

/// Text written for `format`
pub fn render(output: &SetupOutput, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => output.json_text(),
        OutputFormat::Script => output.script.clone(),
        OutputFormat::Combined => serde_json::to_string_pretty(&output.combined()).unwrap_or_default(),
    }
}
