//! Package index types.
//!
//! The package index is an external collaborator: something else discovers
//! which packages are present. This module only defines the materialized
//! index and the reader seam used to obtain one per request.

use super::PackageDescriptor;
use crate::error::ReqmapResult;
use indexmap::IndexMap;
use std::future::Future;

/// Read-only, ordered collection of discovered packages
///
/// Duplicate names are allowed; lookups by name return the first entry in
/// index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageIndex {
    packages: Vec<PackageDescriptor>,
    first_by_name: IndexMap<String, usize>,
}

/// Source of a package index
///
/// Implementations are called once per configuration request and must return
/// a complete, already-materialized index.
pub trait PackageIndexReader {
    fn read_index(&self) -> impl Future<Output = ReqmapResult<PackageIndex>> + Send;
}

impl PackageIndex {
    pub fn new(packages: Vec<PackageDescriptor>) -> Self {
        let mut first_by_name = IndexMap::new();
        for (position, package) in packages.iter().enumerate() {
            first_by_name.entry(package.name.clone()).or_insert(position);
        }
        Self {
            packages,
            first_by_name,
        }
    }

    /// First package declared under `name`
    pub fn find(&self, name: &str) -> Option<&PackageDescriptor> {
        self.first_by_name
            .get(name)
            .map(|&position| &self.packages[position])
    }

    /// Every package declared under `name`, in index order
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PackageDescriptor> {
        self.packages.iter().filter(move |package| package.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.first_by_name.contains_key(name)
    }

    /// Distinct package names in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.first_by_name.keys().map(String::as_str)
    }

    pub fn packages(&self) -> &[PackageDescriptor] {
        &self.packages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageDescriptor> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl From<Vec<PackageDescriptor>> for PackageIndex {
    fn from(packages: Vec<PackageDescriptor>) -> Self {
        Self::new(packages)
    }
}

impl FromIterator<PackageDescriptor> for PackageIndex {
    fn from_iter<I: IntoIterator<Item = PackageDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// An in-memory index is its own reader
impl PackageIndexReader for PackageIndex {
    fn read_index(&self) -> impl Future<Output = ReqmapResult<PackageIndex>> + Send {
        let index = self.clone();
        async move { Ok(index) }
    }
}
