//! `reqmap check`

use reqmap_config::load_shims;
use reqmap_core::error::ReqmapResult;
use reqmap_resolver::{attach_shims, unconfigured_shim_deps, Diagnostic};

use super::CommandContext;
use crate::output::errors::ErrorFormatter;

/// What a check found
#[derive(Debug)]
pub struct CheckReport {
    pub modules: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether diagnostics fail the check
    pub strict: bool,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        !self.strict || self.diagnostics.is_empty()
    }
}

/// Merge without failing and print every diagnostic
pub async fn execute(roots: Vec<String>, ctx: &CommandContext) -> ReqmapResult<CheckReport> {
    let session = ctx.session().await?;
    let index = session.read_index().await?;

    // Strictness decides the exit status; the merge itself must report everything
    let outcome = session.merge(&index, &roots, false)?;
    let shims = load_shims(
        session.config.shims.path.as_deref().map(camino::Utf8Path::new),
        session.config.shims.defaults,
    )
    .await?;
    let config = attach_shims(outcome.config, &shims);

    let mut diagnostics = outcome.diagnostics;
    diagnostics.extend(unconfigured_shim_deps(&config));

    let formatter = ErrorFormatter::with_colors(*ctx.output.colors());
    for diagnostic in &diagnostics {
        eprintln!("{}", formatter.format_diagnostic(diagnostic));
    }

    let report = CheckReport {
        modules: config.len(),
        diagnostics,
        strict: session.config.output.strict,
    };

    if report.diagnostics.is_empty() {
        ctx.output
            .success(&format!("{} modules configured, no problems found", report.modules));
    } else if report.passed() {
        ctx.output.warn(&format!(
            "{} modules configured with {} diagnostics",
            report.modules,
            report.diagnostics.len()
        ));
    } else {
        ctx.output.warn(&format!(
            "{} diagnostics; failing because strict mode is on",
            report.diagnostics.len()
        ));
    }

    Ok(report)
}
