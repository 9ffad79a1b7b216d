//! Package descriptor types.
//!
//! Defines the metadata a package index supplies for each bundled library.

use crate::error::{ReqmapError, ReqmapResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Packaging convention of a bundled library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingKind {
    /// Flat files in a version-named folder, no manifest
    Classic,
    /// Package carrying a manifest (bower.json / package.json)
    Manifest,
}

/// Package metadata as read from the package index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Raw package name, as declared
    pub name: String,
    /// Version string, embedded verbatim in versioned locations
    pub version: String,
    pub kind: PackagingKind,
    /// Main entry point relative to the package location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    /// Dependency names in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Path fragment inside the package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_location: Option<String>,
    /// Nested packages sharing this package's version and root
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_packages: Vec<SubPackage>,
}

/// A package nested inside another package's directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubPackage {
    pub name: String,
    /// Location relative to the parent package directory
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
}

impl PackagingKind {
    /// Parse a packaging kind declared by `package`
    ///
    /// `bower` and `npm` are accepted as manifest flavours.
    pub fn parse(package: &str, kind: &str) -> ReqmapResult<Self> {
        kind.parse().map_err(|_| ReqmapError::UnknownPackagingKind {
            package: package.to_string(),
            kind: kind.to_string(),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PackagingKind::Classic => "classic",
            PackagingKind::Manifest => "manifest",
        }
    }
}

impl FromStr for PackagingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(PackagingKind::Classic),
            "manifest" | "bower" | "npm" => Ok(PackagingKind::Manifest),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for PackagingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PackageDescriptor {
    /// Create a descriptor with required fields
    pub fn new(name: impl Into<String>, version: impl Into<String>, kind: PackagingKind) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind,
            main: None,
            dependencies: Vec::new(),
            sub_location: None,
            sub_packages: Vec::new(),
        }
    }

    /// Create a classic package descriptor
    pub fn classic(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, version, PackagingKind::Classic)
    }

    /// Create a manifest package descriptor
    pub fn manifest(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, version, PackagingKind::Manifest)
    }

    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    pub fn with_sub_location(mut self, sub_location: impl Into<String>) -> Self {
        self.sub_location = Some(sub_location.into());
        self
    }

    pub fn with_sub_package(mut self, sub_package: SubPackage) -> Self {
        self.sub_packages.push(sub_package);
        self
    }

    pub fn is_manifest(&self) -> bool {
        self.kind == PackagingKind::Manifest
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

impl SubPackage {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            main: None,
        }
    }

    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_creation() {
        let pkg = PackageDescriptor::classic("jquery", "2.1.0");

        assert_eq!(pkg.name, "jquery");
        assert_eq!(pkg.version, "2.1.0");
        assert_eq!(pkg.kind, PackagingKind::Classic);
        assert_eq!(pkg.main, None);
        assert!(pkg.dependencies.is_empty());
        assert_eq!(pkg.to_string(), "jquery@2.1.0");
    }

    #[test]
    fn test_builder_keeps_dependency_order() {
        let pkg = PackageDescriptor::manifest("angular-bootstrap", "0.13.0")
            .with_main("ui-bootstrap-tpls")
            .with_dependency("angular")
            .with_dependency("bootstrap");

        assert!(pkg.is_manifest());
        assert_eq!(pkg.main.as_deref(), Some("ui-bootstrap-tpls"));
        assert_eq!(pkg.dependencies, vec!["angular", "bootstrap"]);
    }

    #[test]
    fn test_packaging_kind_parse() {
        assert_eq!(PackagingKind::parse("a", "classic").unwrap(), PackagingKind::Classic);
        assert_eq!(PackagingKind::parse("a", "Manifest").unwrap(), PackagingKind::Manifest);
        assert_eq!(PackagingKind::parse("a", "bower").unwrap(), PackagingKind::Manifest);
        assert_eq!(PackagingKind::parse("a", "npm").unwrap(), PackagingKind::Manifest);

        let err = PackagingKind::parse("jquery", "rpm").unwrap_err();
        assert!(matches!(
            err,
            ReqmapError::UnknownPackagingKind { ref package, ref kind } if package == "jquery" && kind == "rpm"
        ));
    }
}
