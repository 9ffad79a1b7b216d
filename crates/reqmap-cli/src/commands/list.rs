//! `reqmap list`

use reqmap_core::error::ReqmapResult;
use reqmap_core::types::PackageIndex;
use reqmap_core::utils::normalize;

use super::CommandContext;
use crate::output::colors::ColorSupport;

pub async fn execute(ctx: &CommandContext) -> ReqmapResult<()> {
    let session = ctx.session().await?;
    let index = session.read_index().await?;

    ctx.output.data(&format_index(&index, ctx.output.colors()));
    ctx.output.info(&format!("{} packages", index.len()));
    Ok(())
}

/// One line per package: name, version, kind, module id and main
pub fn format_index(index: &PackageIndex, colors: &ColorSupport) -> String {
    let width = index.iter().map(|p| p.name.len()).max().unwrap_or(0);

    index
        .iter()
        .map(|package| {
            let mut line = format!(
                "{:<width$}  {:<10}  {:<8}",
                package.name,
                package.version,
                package.kind.as_str(),
                width = width
            );
            let id = normalize(&package.name);
            if id != package.name {
                line.push_str(&format!("  as {}", colors.bold(&id)));
            }
            if let Some(main) = &package.main {
                line.push_str(&format!("  main {}", colors.dim(main)));
            }
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
