//! JSON index files and package manifests
//!
//! Covers the JSON package index (`index.json`) and the bower.json /
//! package.json manifests found inside unpacked manifest packages.

use indexmap::IndexMap;
use reqmap_core::error::ReqmapError;
use reqmap_core::types::{PackageDescriptor, PackageIndex};
use reqmap_core::utils::module_path;
use serde::{Deserialize, Serialize};

use crate::index::{index_from_entries, IndexEntry};
use crate::ConfigResult;

/// Top level of a JSON index: either a bare array or `{"packages": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonIndex {
    List(Vec<IndexEntry>),
    Wrapped { packages: Vec<IndexEntry> },
}

/// The parts of bower.json / package.json the loader configuration needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Entry point file(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainField>,

    /// Runtime dependencies in declaration order
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
}

/// `main` is a single file in package.json, and may be a list in bower.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MainField {
    Single(String),
    Many(Vec<String>),
}

/// Parse a JSON package index
pub fn parse_json_index(content: &str) -> ConfigResult<PackageIndex> {
    let index: JsonIndex = serde_json::from_str(content).map_err(|e| ReqmapError::JsonParse {
        message: format!("invalid package index: {}", e),
    })?;

    let entries = match index {
        JsonIndex::List(entries) => entries,
        JsonIndex::Wrapped { packages } => packages,
    };
    index_from_entries(entries)
}

/// Parse a bower.json or package.json manifest
pub fn parse_manifest(content: &str) -> ConfigResult<ManifestJson> {
    serde_json::from_str(content).map_err(|e| ReqmapError::JsonParse {
        message: format!("invalid package manifest: {}", e),
    })
}

impl MainField {
    /// Loader module path of the entry point
    ///
    /// From a list, the first `.js` file wins; stylesheets and fonts listed
    /// next to it are ignored.
    pub fn module_path(&self) -> Option<String> {
        match self {
            MainField::Single(file) if !file.trim().is_empty() => Some(module_path(file)),
            MainField::Single(_) => None,
            MainField::Many(files) => files
                .iter()
                .find(|file| file.trim().ends_with(".js"))
                .map(|file| module_path(file)),
        }
    }
}

impl ManifestJson {
    /// Manifest-kind descriptor for a package unpacked as `name`/`version`
    ///
    /// The directory names win over the manifest's own name and version,
    /// since those are what the package is served under.
    pub fn into_descriptor(self, name: &str, version: &str) -> PackageDescriptor {
        let mut descriptor = PackageDescriptor::manifest(name, version);
        descriptor.main = self.main.as_ref().and_then(MainField::module_path);
        descriptor.dependencies = self.dependencies.into_keys().collect();
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqmap_core::types::PackagingKind;

    #[test]
    fn test_parse_json_index_list() {
        let json = r#"[
            {"name": "jquery", "version": "2.1.0", "kind": "classic"},
            {"name": "angular", "version": "1.4.4", "kind": "manifest", "main": "angular"},
            {"name": "angular-schema-form", "version": "0.8.2", "kind": "manifest",
             "main": "dist/schema-form", "dependencies": ["angular", "objectpath"]}
        ]"#;

        let index = parse_json_index(json).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.find("jquery").unwrap().kind, PackagingKind::Classic);
        assert_eq!(
            index.find("angular-schema-form").unwrap().dependencies,
            vec!["angular", "objectpath"]
        );
    }

    #[test]
    fn test_parse_json_index_wrapped() {
        let json = r#"{"packages": [{"name": "validate.js", "version": "0.8.0", "kind": "npm"}]}"#;
        let index = parse_json_index(json).unwrap();
        assert_eq!(index.find("validate.js").unwrap().kind, PackagingKind::Manifest);
    }

    #[test]
    fn test_unknown_kind_in_json_index() {
        let json = r#"[{"name": "jquery", "version": "2.1.0", "kind": "zip"}]"#;
        assert!(matches!(
            parse_json_index(json),
            Err(ReqmapError::UnknownPackagingKind { .. })
        ));
    }

    #[test]
    fn test_invalid_json_index() {
        assert!(matches!(
            parse_json_index("{\"packages\": 3}"),
            Err(ReqmapError::JsonParse { .. })
        ));
    }

    #[test]
    fn test_bower_manifest() {
        let bower = r#"{
            "name": "angular-bootstrap",
            "version": "0.13.0",
            "main": ["./ui-bootstrap-tpls.js"],
            "dependencies": {"angular": ">=1.3.0", "bootstrap": "~3.3"}
        }"#;

        let descriptor = parse_manifest(bower)
            .unwrap()
            .into_descriptor("angular-bootstrap", "0.13.0");
        assert_eq!(descriptor.kind, PackagingKind::Manifest);
        assert_eq!(descriptor.main.as_deref(), Some("ui-bootstrap-tpls"));
        assert_eq!(descriptor.dependencies, vec!["angular", "bootstrap"]);
    }

    #[test]
    fn test_main_list_picks_first_script() {
        let main = MainField::Many(vec![
            "dist/css/bootstrap.css".to_string(),
            "dist/js/bootstrap.js".to_string(),
            "dist/js/npm.js".to_string(),
        ]);
        assert_eq!(main.module_path().as_deref(), Some("dist/js/bootstrap"));
        assert_eq!(MainField::Many(vec!["style.css".to_string()]).module_path(), None);
    }

    #[test]
    fn test_package_json_without_main() {
        let descriptor = parse_manifest(r#"{"name": "babel-runtime", "version": "5.8.19"}"#)
            .unwrap()
            .into_descriptor("babel-runtime", "5.8.19");
        assert_eq!(descriptor.main, None);
        assert!(descriptor.dependencies.is_empty());
    }

    #[test]
    fn test_nested_main_kept() {
        let descriptor = parse_manifest(r#"{"main": "lib/ObjectPath.js"}"#)
            .unwrap()
            .into_descriptor("objectpath", "1.2.1");
        assert_eq!(descriptor.main.as_deref(), Some("lib/ObjectPath"));
    }
}
