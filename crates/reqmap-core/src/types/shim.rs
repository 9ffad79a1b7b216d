//! Shim declarations.
//!
//! Libraries that predate the module format are exposed to the loader through
//! a shim naming the global variable that becomes the module's value.

use crate::utils::normalize;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Shim for one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShimEntry {
    /// Global variable exported by the library
    pub exports: String,
    /// Module identifiers that must load first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,
}

/// Module identifier -> shim, in declaration order
///
/// Keys and dependency names are normalized on the way in, so a table may be
/// written with raw package names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, ShimEntry>", into = "IndexMap<String, ShimEntry>")]
pub struct ShimTable {
    entries: IndexMap<String, ShimEntry>,
}

impl ShimEntry {
    pub fn new(exports: impl Into<String>) -> Self {
        Self {
            exports: exports.into(),
            deps: Vec::new(),
        }
    }

    pub fn with_dep(mut self, dep: impl Into<String>) -> Self {
        self.deps.push(dep.into());
        self
    }
}

impl ShimTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the shim for `name`
    pub fn insert(&mut self, name: &str, mut entry: ShimEntry) -> Option<ShimEntry> {
        entry.deps = entry.deps.iter().map(|dep| normalize(dep)).collect();
        self.entries.insert(normalize(name), entry)
    }

    pub fn get(&self, id: &str) -> Option<&ShimEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Layer `other` on top of this table; its entries win
    pub fn extend(&mut self, other: ShimTable) {
        for (id, entry) in other.entries {
            self.entries.insert(id, entry);
        }
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ShimEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<IndexMap<String, ShimEntry>> for ShimTable {
    fn from(raw: IndexMap<String, ShimEntry>) -> Self {
        let mut table = ShimTable::new();
        for (name, entry) in raw {
            table.insert(&name, entry);
        }
        table
    }
}

impl From<ShimTable> for IndexMap<String, ShimEntry> {
    fn from(table: ShimTable) -> Self {
        table.entries
    }
}

impl FromIterator<(String, ShimEntry)> for ShimTable {
    fn from_iter<I: IntoIterator<Item = (String, ShimEntry)>>(iter: I) -> Self {
        let mut table = ShimTable::new();
        for (name, entry) in iter {
            table.insert(&name, entry);
        }
        table
    }
}
