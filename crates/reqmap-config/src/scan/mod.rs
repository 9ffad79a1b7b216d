//! Directory package index
//!
//! Scans a tree of unpacked packages laid out as `<root>/<name>/<version>/`.
//! A version directory holding a bower.json or package.json is a manifest
//! package; any other version directory is a classic package.

use camino::{Utf8Path, Utf8PathBuf};
use reqmap_core::error::ReqmapError;
use reqmap_core::types::{PackageDescriptor, PackageIndex};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::json::parse_manifest;
use crate::ConfigResult;

/// Manifest files in lookup order
pub const MANIFEST_FILES: [&str; 2] = ["bower.json", "package.json"];

/// Scan `root` into a package index, ordered by name then version directory
pub fn scan_directory(root: &Utf8Path) -> ConfigResult<PackageIndex> {
    if !root.is_dir() {
        return Err(ReqmapError::io(
            format!("Package directory {} does not exist", root),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }

    let mut packages = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let message = format!("Failed to scan {}", root);
            match e.into_io_error() {
                Some(source) => ReqmapError::io(message, source),
                None => ReqmapError::io(message, std::io::Error::other("filesystem loop")),
            }
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let Ok(path) = Utf8PathBuf::try_from(entry.into_path()) else {
            warn!("Skipping package directory with a non UTF-8 path");
            continue;
        };
        if is_hidden(root, &path) {
            continue;
        }
        packages.push(read_package(&path)?);
    }

    debug!("Scanned {} packages under {}", packages.len(), root);
    Ok(PackageIndex::new(packages))
}

/// Descriptor for one `<name>/<version>` directory
fn read_package(dir: &Utf8Path) -> ConfigResult<PackageDescriptor> {
    let version = dir.file_name().unwrap_or_default();
    let name = dir
        .parent()
        .and_then(Utf8Path::file_name)
        .unwrap_or_default();

    for manifest in MANIFEST_FILES {
        let path = dir.join(manifest);
        if !path.is_file() {
            continue;
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ReqmapError::io(format!("Failed to read {}", path), e))?;
        let manifest = parse_manifest(&content).map_err(|e| match e {
            ReqmapError::JsonParse { message } => ReqmapError::JsonParse {
                message: format!("{}: {}", path, message),
            },
            other => other,
        })?;
        return Ok(manifest.into_descriptor(name, version));
    }

    Ok(PackageDescriptor::classic(name, version))
}

/// Whether a name or version directory below `root` starts with a dot
fn is_hidden(root: &Utf8Path, path: &Utf8Path) -> bool {
    path.strip_prefix(root)
        .map(|relative| relative.components().any(|c| c.as_str().starts_with('.')))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqmap_core::types::PackagingKind;
    use std::fs;
    use tempfile::TempDir;

    fn package_dir(root: &Utf8Path, name: &str, version: &str) -> Utf8PathBuf {
        let dir = root.join(name).join(version);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_scan_classic_and_manifest_packages() {
        let (_temp_dir, root) = temp_root();

        let jquery = package_dir(&root, "jquery", "2.1.0");
        fs::write(jquery.join("jquery.js"), "").unwrap();

        let angular_bootstrap = package_dir(&root, "angular-bootstrap", "0.13.0");
        fs::write(
            angular_bootstrap.join("bower.json"),
            r#"{"main": "./ui-bootstrap-tpls.js", "dependencies": {"angular": "1.4.x"}}"#,
        )
        .unwrap();

        let validate = package_dir(&root, "validate.js", "0.8.0");
        fs::write(validate.join("package.json"), r#"{"main": "validate.js"}"#).unwrap();

        let index = scan_directory(&root).unwrap();

        assert_eq!(
            index.names().collect::<Vec<_>>(),
            vec!["angular-bootstrap", "jquery", "validate.js"]
        );

        let jquery = index.find("jquery").unwrap();
        assert_eq!(jquery.kind, PackagingKind::Classic);
        assert_eq!(jquery.version, "2.1.0");

        let angular_bootstrap = index.find("angular-bootstrap").unwrap();
        assert_eq!(angular_bootstrap.kind, PackagingKind::Manifest);
        assert_eq!(angular_bootstrap.main.as_deref(), Some("ui-bootstrap-tpls"));
        assert_eq!(angular_bootstrap.dependencies, vec!["angular"]);

        assert_eq!(index.find("validate.js").unwrap().main.as_deref(), Some("validate"));
    }

    #[test]
    fn test_bower_json_preferred_over_package_json() {
        let (_temp_dir, root) = temp_root();
        let dir = package_dir(&root, "angular", "1.4.4");
        fs::write(dir.join("bower.json"), r#"{"main": "./angular.js"}"#).unwrap();
        fs::write(dir.join("package.json"), r#"{"main": "index.js"}"#).unwrap();

        let index = scan_directory(&root).unwrap();
        assert_eq!(index.find("angular").unwrap().main.as_deref(), Some("angular"));
    }

    #[test]
    fn test_several_versions_are_all_indexed() {
        let (_temp_dir, root) = temp_root();
        package_dir(&root, "angular", "1.3.15");
        package_dir(&root, "angular", "1.4.4");

        let index = scan_directory(&root).unwrap();
        let versions: Vec<&str> = index.find_all("angular").map(|p| p.version.as_str()).collect();
        assert_eq!(versions, vec!["1.3.15", "1.4.4"]);
    }

    #[test]
    fn test_files_and_hidden_directories_skipped() {
        let (_temp_dir, root) = temp_root();
        package_dir(&root, "jquery", "2.1.0");
        package_dir(&root, ".cache", "x");
        fs::write(root.join("jquery").join("README.md"), "").unwrap();

        let index = scan_directory(&root).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_broken_manifest_names_file() {
        let (_temp_dir, root) = temp_root();
        let dir = package_dir(&root, "broken", "1.0.0");
        fs::write(dir.join("bower.json"), "{ not json").unwrap();

        match scan_directory(&root).unwrap_err() {
            ReqmapError::JsonParse { message } => assert!(message.contains("bower.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_root() {
        let err = scan_directory(Utf8Path::new("/nonexistent/reqmap/webjars")).unwrap_err();
        assert!(matches!(err, ReqmapError::Io { .. }));
    }
}
