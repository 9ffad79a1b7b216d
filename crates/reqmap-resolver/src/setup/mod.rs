//! Resolved module and merged configuration types

use indexmap::IndexMap;
use reqmap_core::types::ShimEntry;

/// How a module is presented to the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleLayout {
    /// File-like locations listed under `paths`
    Paths,
    /// Directory locations listed under `packages`
    Package,
}

/// One package (or sub-package) with its candidate locations computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Normalized module identifier
    pub id: String,
    /// Raw declared name
    pub name: String,
    /// Raw name of the package whose files hold this module
    pub package: String,
    pub version: String,
    /// One location per prefix, in prefix order
    pub locations: Vec<String>,
    pub main: Option<String>,
    pub layout: ModuleLayout,
    /// Nested packages, resolved against this module's directory
    pub sub_packages: Vec<ResolvedModule>,
}

/// A merged module plus its shim, if it needs one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredModule {
    pub module: ResolvedModule,
    pub shim: Option<ShimEntry>,
}

/// Module identifier -> configured module, in traversal order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupConfig {
    modules: IndexMap<String, ConfiguredModule>,
}

impl From<ResolvedModule> for ConfiguredModule {
    fn from(module: ResolvedModule) -> Self {
        Self { module, shim: None }
    }
}

impl SetupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `module` unless its identifier is already configured
    ///
    /// Returns false, leaving the existing entry untouched, when the
    /// identifier is taken. This is the first-seen-wins rule of a merge.
    pub fn insert_if_absent(&mut self, module: ResolvedModule) -> bool {
        match self.modules.entry(module.id.clone()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(module.into());
                true
            },
        }
    }

    /// Insert or replace the entry for `module.id`
    pub fn insert(&mut self, module: ConfiguredModule) -> Option<ConfiguredModule> {
        self.modules.insert(module.module.id.clone(), module)
    }

    /// Layer `other` on top of this config; its entries overwrite ours
    pub fn extend(&mut self, other: SetupConfig) {
        for (_, module) in other.modules {
            self.insert(module);
        }
    }

    pub fn get(&self, id: &str) -> Option<&ConfiguredModule> {
        self.modules.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ConfiguredModule> {
        self.modules.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfiguredModule> {
        self.modules.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, ConfiguredModule> {
        self.modules.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
