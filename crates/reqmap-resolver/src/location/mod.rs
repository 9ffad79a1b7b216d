//! Location resolution
//!
//! Builds candidate location URLs for one package from already-loaded
//! metadata. Nothing here touches the network or the filesystem.

use reqmap_core::types::{PackageDescriptor, PackagingKind, PrefixContext, SubPackage, UrlPrefix};
use reqmap_core::utils::{ensure_trailing_slash, normalize};

use crate::setup::{ModuleLayout, ResolvedModule};

/// Resolve `descriptor` against every prefix in `context`
///
/// The location list has one entry per prefix, in prefix order. Manifest
/// packages resolve to directory URLs ending in `/`; classic packages resolve
/// to a file-like URL naming the module file without its extension.
pub fn resolve(descriptor: &PackageDescriptor, context: &PrefixContext) -> ResolvedModule {
    let locations: Vec<String> = context
        .iter()
        .map(|prefix| location(descriptor, prefix))
        .collect();

    let layout = match descriptor.kind {
        PackagingKind::Classic => ModuleLayout::Paths,
        PackagingKind::Manifest => ModuleLayout::Package,
    };

    let mut module = ResolvedModule {
        id: normalize(&descriptor.name),
        name: descriptor.name.clone(),
        package: descriptor.name.clone(),
        version: descriptor.version.clone(),
        locations,
        main: descriptor.main.clone(),
        layout,
        sub_packages: Vec::new(),
    };

    let sub_packages = descriptor
        .sub_packages
        .iter()
        .map(|sub| resolve_sub_package(descriptor, &module, sub, context))
        .collect();
    module.sub_packages = sub_packages;

    module
}

/// Resolve a package nested inside `parent`
///
/// Each location is the parent's directory for the same prefix followed by the
/// sub-package's location fragment, verbatim.
pub fn resolve_sub_package(
    descriptor: &PackageDescriptor,
    parent: &ResolvedModule,
    sub: &SubPackage,
    context: &PrefixContext,
) -> ResolvedModule {
    let fragment = sub.location.trim_start_matches('/');
    let locations = context
        .iter()
        .zip(&parent.locations)
        .map(|(prefix, parent_location)| {
            let directory = match descriptor.kind {
                PackagingKind::Manifest => parent_location.clone(),
                PackagingKind::Classic => package_root(descriptor, prefix),
            };
            format!("{}{}", directory, fragment)
        })
        .collect();

    ResolvedModule {
        id: normalize(&sub.name),
        name: sub.name.clone(),
        package: descriptor.name.clone(),
        version: descriptor.version.clone(),
        locations,
        main: sub.main.clone(),
        layout: ModuleLayout::Package,
        sub_packages: Vec::new(),
    }
}

/// `prefix + name + "/" + [version + "/"]`
fn package_root(descriptor: &PackageDescriptor, prefix: &UrlPrefix) -> String {
    if prefix.include_version {
        format!("{}{}/{}/", prefix.url, descriptor.name, descriptor.version)
    } else {
        format!("{}{}/", prefix.url, descriptor.name)
    }
}

fn location(descriptor: &PackageDescriptor, prefix: &UrlPrefix) -> String {
    let root = package_root(descriptor, prefix);
    let sub_location = descriptor
        .sub_location
        .as_deref()
        .map(|sub| sub.trim_matches('/'))
        .filter(|sub| !sub.is_empty());

    match descriptor.kind {
        PackagingKind::Classic => {
            format!("{}{}", root, sub_location.unwrap_or(&descriptor.name))
        },
        PackagingKind::Manifest => match sub_location {
            Some(sub) => ensure_trailing_slash(&format!("{}{}", root, sub)),
            None => root,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: &str = "/webjars/";
    const CDN: &str = "http://cdn/webjars/";

    #[test]
    fn test_classic_local() {
        let jquery = PackageDescriptor::classic("jquery", "2.1.0");
        let resolved = resolve(&jquery, &PrefixContext::local(LOCAL));

        assert_eq!(resolved.id, "jquery");
        assert_eq!(resolved.layout, ModuleLayout::Paths);
        assert_eq!(resolved.locations, vec!["/webjars/jquery/2.1.0/jquery"]);
    }

    #[test]
    fn test_classic_cdn_then_local() {
        let jquery = PackageDescriptor::classic("jquery", "2.1.0");
        let resolved = resolve(&jquery, &PrefixContext::with_cdn(CDN, LOCAL));

        assert_eq!(
            resolved.locations,
            vec![
                "http://cdn/webjars/jquery/2.1.0/jquery",
                "/webjars/jquery/2.1.0/jquery"
            ]
        );
    }

    #[test]
    fn test_classic_unversioned() {
        let jquery = PackageDescriptor::classic("jquery", "2.1.0");
        let resolved = resolve(&jquery, &PrefixContext::unversioned(LOCAL));

        assert_eq!(resolved.locations, vec!["/webjars/jquery/jquery"]);
    }

    #[test]
    fn test_classic_declared_sub_location() {
        let pkg = PackageDescriptor::classic("requirejs", "2.1.14").with_sub_location("require");
        let resolved = resolve(&pkg, &PrefixContext::local(LOCAL));

        assert_eq!(resolved.locations, vec!["/webjars/requirejs/2.1.14/require"]);
    }

    #[test]
    fn test_manifest_directory_location() {
        let pkg = PackageDescriptor::manifest("angular-bootstrap", "0.13.0")
            .with_main("ui-bootstrap-tpls");
        let resolved = resolve(&pkg, &PrefixContext::local(LOCAL));

        assert_eq!(resolved.layout, ModuleLayout::Package);
        assert_eq!(resolved.locations, vec!["/webjars/angular-bootstrap/0.13.0/"]);
        assert_eq!(resolved.main.as_deref(), Some("ui-bootstrap-tpls"));
    }

    #[test]
    fn test_manifest_sub_location_keeps_trailing_slash() {
        let pkg = PackageDescriptor::manifest("pouchdb", "3.6.0").with_sub_location("dist");
        let resolved = resolve(&pkg, &PrefixContext::with_cdn(CDN, LOCAL));

        assert_eq!(
            resolved.locations,
            vec!["http://cdn/webjars/pouchdb/3.6.0/dist/", "/webjars/pouchdb/3.6.0/dist/"]
        );
    }

    #[test]
    fn test_main_is_verbatim_and_optional() {
        let pkg = PackageDescriptor::manifest("x", "1.0.0").with_main("foo/bar");
        assert_eq!(resolve(&pkg, &PrefixContext::local(LOCAL)).main.as_deref(), Some("foo/bar"));

        let pkg = PackageDescriptor::manifest("babel-runtime", "5.8.19");
        let resolved = resolve(&pkg, &PrefixContext::local(LOCAL));
        assert_eq!(resolved.main, None);
        assert_eq!(resolved.locations, vec!["/webjars/babel-runtime/5.8.19/"]);
    }

    #[test]
    fn test_sub_packages_of_classic_package() {
        let pkg = PackageDescriptor::classic("when-node", "3.5.2")
            .with_sub_package(SubPackage::new("when", "when").with_main("when"));
        let resolved = resolve(&pkg, &PrefixContext::with_cdn(CDN, LOCAL));

        let when = &resolved.sub_packages[0];
        assert_eq!(when.id, "when");
        assert_eq!(when.package, "when-node");
        assert_eq!(when.version, "3.5.2");
        assert_eq!(when.layout, ModuleLayout::Package);
        assert_eq!(
            when.locations,
            vec!["http://cdn/webjars/when-node/3.5.2/when", "/webjars/when-node/3.5.2/when"]
        );
    }

    #[test]
    fn test_sub_packages_of_manifest_package() {
        let pkg = PackageDescriptor::manifest("dojo", "1.10.0")
            .with_sub_location("src")
            .with_sub_package(SubPackage::new("dojo.store", "store"));
        let resolved = resolve(&pkg, &PrefixContext::local(LOCAL));

        let store = &resolved.sub_packages[0];
        assert_eq!(store.id, "dojo-store");
        assert_eq!(store.locations, vec!["/webjars/dojo/1.10.0/src/store"]);
        assert_eq!(store.main, None);
    }
}
