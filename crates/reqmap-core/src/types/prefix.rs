//! URL prefix contexts.
//!
//! A prefix context lists the URL roots a package may be fetched from, in
//! priority order. The last entry is the local fallback.

use crate::error::{ReqmapError, ReqmapResult};
use serde::{Deserialize, Serialize};

/// One URL root and whether the package version is part of the path below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPrefix {
    pub url: String,
    #[serde(default = "default_true")]
    pub include_version: bool,
}

/// Ordered, non-empty list of URL prefixes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixContext {
    prefixes: Vec<UrlPrefix>,
}

fn default_true() -> bool {
    true
}

impl UrlPrefix {
    pub fn new(url: impl Into<String>, include_version: bool) -> Self {
        Self {
            url: url.into(),
            include_version,
        }
    }

    pub fn versioned(url: impl Into<String>) -> Self {
        Self::new(url, true)
    }

    pub fn unversioned(url: impl Into<String>) -> Self {
        Self::new(url, false)
    }
}

impl PrefixContext {
    /// Build a context from prefixes in priority order
    pub fn new(prefixes: Vec<UrlPrefix>) -> ReqmapResult<Self> {
        if prefixes.is_empty() {
            return Err(ReqmapError::validation(
                "prefixes",
                "at least one URL prefix (the local fallback) is required",
            ));
        }
        Ok(Self { prefixes })
    }

    /// Single versioned prefix (local-only mode)
    pub fn local(url: impl Into<String>) -> Self {
        Self {
            prefixes: vec![UrlPrefix::versioned(url)],
        }
    }

    /// CDN first, local fallback second, both versioned
    pub fn with_cdn(cdn: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefixes: vec![UrlPrefix::versioned(cdn), UrlPrefix::versioned(local)],
        }
    }

    /// Single prefix without version segments
    pub fn unversioned(url: impl Into<String>) -> Self {
        Self {
            prefixes: vec![UrlPrefix::unversioned(url)],
        }
    }

    pub fn prefixes(&self) -> &[UrlPrefix] {
        &self.prefixes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UrlPrefix> {
        self.prefixes.iter()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Highest-priority prefix
    pub fn preferred(&self) -> &UrlPrefix {
        &self.prefixes[0]
    }

    /// Local fallback prefix
    pub fn fallback(&self) -> &UrlPrefix {
        &self.prefixes[self.prefixes.len() - 1]
    }
}

impl<'a> IntoIterator for &'a PrefixContext {
    type Item = &'a UrlPrefix;
    type IntoIter = std::slice::Iter<'a, UrlPrefix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
