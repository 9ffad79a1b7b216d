//! Package index files and readers
//!
//! An index is either a JSON or TOML file listing packages, or a directory of
//! unpacked packages laid out as `<root>/<name>/<version>/`. Readers load the
//! whole index on each call; nothing is cached between requests.

use std::future::Future;

use camino::{Utf8Path, Utf8PathBuf};
use reqmap_core::error::{ReqmapError, ReqmapResult};
use reqmap_core::types::{PackageDescriptor, PackageIndex, PackageIndexReader, PackagingKind, SubPackage};
use reqmap_core::utils::is_safe_fragment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ConfigResult;

/// One package as written in an index file
///
/// `kind` is kept as text so an unknown value can be reported against the
/// package that declares it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexEntry {
    pub name: String,
    pub version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_packages: Vec<SubPackage>,
}

/// `[[package]]` tables of a TOML index
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlIndex {
    #[serde(default)]
    package: Vec<IndexEntry>,
}

/// Where an index is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    JsonFile(Utf8PathBuf),
    TomlFile(Utf8PathBuf),
    Directory(Utf8PathBuf),
}

/// Index reader backed by a file or directory
#[derive(Debug, Clone)]
pub struct FileIndexReader {
    source: IndexSource,
}

fn default_kind() -> String {
    PackagingKind::Classic.as_str().to_string()
}

impl IndexEntry {
    /// Descriptor for this entry
    pub fn into_descriptor(self) -> ConfigResult<PackageDescriptor> {
        let kind = PackagingKind::parse(&self.name, &self.kind)?;

        if self.name.trim().is_empty() {
            return Err(ReqmapError::validation("name", "package name must not be empty"));
        }
        if self.version.trim().is_empty() {
            return Err(ReqmapError::validation(
                "version",
                format!("package '{}' has an empty version", self.name),
            ));
        }
        for fragment in self
            .sub_location
            .iter()
            .chain(self.sub_packages.iter().map(|sub| &sub.location))
        {
            if !is_safe_fragment(fragment) {
                return Err(ReqmapError::validation(
                    "sub_location",
                    format!(
                        "'{}' in package '{}' must stay inside the package directory",
                        fragment, self.name
                    ),
                ));
            }
        }

        Ok(PackageDescriptor {
            name: self.name,
            version: self.version,
            kind,
            main: self.main,
            dependencies: self.dependencies,
            sub_location: self.sub_location,
            sub_packages: self.sub_packages,
        })
    }
}

/// Build an index from entries, stopping at the first invalid one
pub fn index_from_entries(entries: Vec<IndexEntry>) -> ConfigResult<PackageIndex> {
    entries
        .into_iter()
        .map(IndexEntry::into_descriptor)
        .collect::<ConfigResult<Vec<_>>>()
        .map(PackageIndex::new)
}

/// Parse a TOML index made of `[[package]]` tables
pub fn parse_toml_index(content: &str, file: &str) -> ConfigResult<PackageIndex> {
    let index: TomlIndex = ::toml::from_str(content).map_err(|e| ReqmapError::TomlParse {
        file: file.to_string(),
        message: e.message().trim().to_string(),
    })?;
    index_from_entries(index.package)
}

impl IndexSource {
    /// Pick the index format from the path: directories are scanned, `.toml`
    /// files are TOML indexes, anything else is read as JSON
    pub fn detect(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            IndexSource::Directory(path)
        } else if path.extension() == Some("toml") {
            IndexSource::TomlFile(path)
        } else {
            IndexSource::JsonFile(path)
        }
    }

    pub fn path(&self) -> &Utf8Path {
        match self {
            IndexSource::JsonFile(path) | IndexSource::TomlFile(path) | IndexSource::Directory(path) => {
                path
            },
        }
    }
}

impl FileIndexReader {
    pub fn new(source: IndexSource) -> Self {
        Self { source }
    }

    /// Reader for `path`, format detected from the path itself
    pub fn from_path(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(IndexSource::detect(path))
    }

    pub fn source(&self) -> &IndexSource {
        &self.source
    }

    async fn read_file(path: &Utf8Path) -> ConfigResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReqmapError::io(format!("Failed to read package index {}", path), e))
    }
}

impl PackageIndexReader for FileIndexReader {
    fn read_index(&self) -> impl Future<Output = ReqmapResult<PackageIndex>> + Send {
        let source = self.source.clone();
        async move {
            let index = match &source {
                IndexSource::JsonFile(path) => {
                    let content = Self::read_file(path).await?;
                    crate::json::parse_json_index(&content)?
                },
                IndexSource::TomlFile(path) => {
                    let content = Self::read_file(path).await?;
                    parse_toml_index(&content, path.as_str())?
                },
                IndexSource::Directory(path) => {
                    let root = path.clone();
                    tokio::task::spawn_blocking(move || crate::scan::scan_directory(&root))
                        .await
                        .map_err(|e| {
                            ReqmapError::io(
                                format!("Directory scan of {} did not complete", path),
                                std::io::Error::other(e),
                            )
                        })??
                },
            };
            debug!("Read {} packages from {}", index.len(), source.path());
            Ok(index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_INDEX: &str = r#"
[[package]]
name = "jquery"
version = "2.1.0"

[[package]]
name = "angular-bootstrap"
version = "0.13.0"
kind = "bower"
main = "ui-bootstrap-tpls"
dependencies = ["angular"]

[[package]]
name = "when-node"
version = "3.5.2"
sub_packages = [{ name = "when", location = "when", main = "when" }]
"#;

    #[test]
    fn test_parse_toml_index() {
        let index = parse_toml_index(TOML_INDEX, "index.toml").unwrap();

        assert_eq!(index.names().collect::<Vec<_>>(), vec!["jquery", "angular-bootstrap", "when-node"]);
        assert_eq!(index.find("jquery").unwrap().kind, PackagingKind::Classic);

        let angular_bootstrap = index.find("angular-bootstrap").unwrap();
        assert_eq!(angular_bootstrap.kind, PackagingKind::Manifest);
        assert_eq!(angular_bootstrap.main.as_deref(), Some("ui-bootstrap-tpls"));
        assert_eq!(angular_bootstrap.dependencies, vec!["angular"]);

        let when_node = index.find("when-node").unwrap();
        assert_eq!(when_node.sub_packages, vec![SubPackage::new("when", "when").with_main("when")]);
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let toml = "[[package]]\nname = \"dojo\"\nversion = \"1.0.0\"\nkind = \"rpm\"\n";
        let err = parse_toml_index(toml, "index.toml").unwrap_err();
        assert!(matches!(
            err,
            ReqmapError::UnknownPackagingKind { ref package, ref kind } if package == "dojo" && kind == "rpm"
        ));
    }

    #[test]
    fn test_escaping_sub_location_rejected() {
        let toml = "[[package]]\nname = \"x\"\nversion = \"1.0.0\"\nsub_location = \"../../etc\"\n";
        assert!(matches!(
            parse_toml_index(toml, "index.toml"),
            Err(ReqmapError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_empty_version_rejected() {
        let toml = "[[package]]\nname = \"x\"\nversion = \"\"\n";
        assert!(parse_toml_index(toml, "index.toml").is_err());
    }

    #[test]
    fn test_detect_source() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(IndexSource::detect(dir.clone()), IndexSource::Directory(dir.clone()));
        assert_eq!(
            IndexSource::detect(dir.join("index.toml")),
            IndexSource::TomlFile(dir.join("index.toml"))
        );
        assert_eq!(
            IndexSource::detect(dir.join("index.json")),
            IndexSource::JsonFile(dir.join("index.json"))
        );
    }

    #[tokio::test]
    async fn test_read_toml_index_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let path = dir.join("index.toml");
        tokio::fs::write(&path, TOML_INDEX).await.unwrap();

        let index = FileIndexReader::from_path(path).read_index().await.unwrap();
        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_index_file_is_io_error() {
        let reader = FileIndexReader::new(IndexSource::JsonFile(Utf8PathBuf::from(
            "/nonexistent/reqmap/index.json",
        )));
        let err = reader.read_index().await.unwrap_err();
        assert!(matches!(err, ReqmapError::Io { .. }));
    }
}
