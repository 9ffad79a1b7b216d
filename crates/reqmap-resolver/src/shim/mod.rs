//! Shim attachment
//!
//! Adds shim declarations from a shim table to the modules of a merged
//! configuration. Modules missing from the table are left without one.

use reqmap_core::types::ShimTable;
use tracing::debug;

use crate::merge::Diagnostic;
use crate::setup::SetupConfig;

/// Attach the shim for every configured module present in `table`
pub fn attach_shims(mut config: SetupConfig, table: &ShimTable) -> SetupConfig {
    let mut attached = 0usize;

    for (id, configured) in config.iter_mut() {
        if let Some(entry) = table.get(id) {
            configured.shim = Some(entry.clone());
            attached += 1;
        }
    }

    for diagnostic in unconfigured_shim_deps(&config) {
        debug!("{}", diagnostic);
    }

    debug!("Attached {} shims from a table of {}", attached, table.len());
    config
}

/// Shim dependencies that name no configured module
///
/// The loader would request such a dependency and fail at runtime.
pub fn unconfigured_shim_deps(config: &SetupConfig) -> Vec<Diagnostic> {
    config
        .iter()
        .filter_map(|(id, configured)| configured.shim.as_ref().map(|shim| (id, shim)))
        .flat_map(|(id, shim)| {
            shim.deps
                .iter()
                .filter(move |dep| !config.contains(dep))
                .map(move |dep| Diagnostic::UnconfiguredShimDependency {
                    module: id.clone(),
                    dependency: dep.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{webjars_index, LOCAL};
    use crate::merge::merge;
    use reqmap_core::types::{PackageDescriptor, PackageIndex, PrefixContext, ShimEntry};

    fn shim_table() -> ShimTable {
        [
            ("jquery".to_string(), ShimEntry::new("$")),
            (
                "bootstrap".to_string(),
                ShimEntry::new("$.fn.popover").with_dep("jquery"),
            ),
            ("underscore".to_string(), ShimEntry::new("_")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_shims_attached_sparsely() {
        let index = webjars_index();
        let context = PrefixContext::local(LOCAL);
        let config = attach_shims(merge(index.packages(), &index, &context).config, &shim_table());

        let jquery = config.get("jquery").unwrap();
        assert_eq!(jquery.shim, Some(ShimEntry::new("$")));

        let bootstrap = config.get("bootstrap").unwrap();
        assert_eq!(bootstrap.shim.as_ref().unwrap().deps, vec!["jquery"]);

        assert!(config.get("angular").unwrap().shim.is_none());
        assert!(!config.contains("underscore"));
    }

    #[test]
    fn test_empty_table_changes_nothing() {
        let index = webjars_index();
        let context = PrefixContext::local(LOCAL);
        let merged = merge(index.packages(), &index, &context).config;

        let config = attach_shims(merged.clone(), &ShimTable::new());
        assert_eq!(config, merged);
    }

    #[test]
    fn test_unconfigured_shim_dependency() {
        let index = PackageIndex::new(vec![PackageDescriptor::classic("backbone", "1.1.2")]);
        let context = PrefixContext::local(LOCAL);
        let table: ShimTable = [(
            "backbone".to_string(),
            ShimEntry::new("Backbone").with_dep("underscore").with_dep("jquery"),
        )]
        .into_iter()
        .collect();

        let config = attach_shims(merge(index.packages(), &index, &context).config, &table);

        assert_eq!(
            unconfigured_shim_deps(&config),
            vec![
                Diagnostic::UnconfiguredShimDependency {
                    module: "backbone".to_string(),
                    dependency: "underscore".to_string(),
                },
                Diagnostic::UnconfiguredShimDependency {
                    module: "backbone".to_string(),
                    dependency: "jquery".to_string(),
                },
            ]
        );

        let full = attach_shims(
            merge(webjars_index().packages(), &webjars_index(), &context).config,
            &shim_table(),
        );
        assert!(unconfigured_shim_deps(&full).is_empty());
    }
}
