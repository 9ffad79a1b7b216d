//! Dependency graph merging
//!
//! Walks the dependency closure of a set of root packages breadth-first and
//! merges every resolved module into one SetupConfig.
//!
//! Conflict policy is first-seen-wins: the first descriptor encountered for a
//! module identifier is the one configured, even when a different version is
//! declared deeper in the graph. Losing descriptors are reported as
//! diagnostics rather than silently dropped.

use std::collections::VecDeque;
use std::fmt;

use reqmap_core::error::ReqmapError;
use reqmap_core::types::{PackageDescriptor, PackageIndex, PrefixContext};
use reqmap_core::utils::normalize;
use tracing::{debug, info, warn};

use crate::graph::ModuleGraph;
use crate::location::resolve;
use crate::setup::{ResolvedModule, SetupConfig};
use crate::ResolverResult;


/// Merge behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Fail on version conflicts and identifier collisions instead of reporting them
    pub strict: bool,
}

/// Something the merge resolved on its own but the caller may care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Same package name reachable at two versions; `kept` is configured
    VersionConflict {
        name: String,
        kept: String,
        ignored: String,
    },
    /// Two different package names normalize to one module identifier
    IdentifierCollision {
        id: String,
        kept: String,
        ignored: String,
    },
    /// A declared dependency is not in the package index
    MissingDependency { package: String, dependency: String },
    /// Module ids that depend on each other
    DependencyCycle { cycle: Vec<String> },
    /// A shim lists a dependency that is not part of the configuration
    UnconfiguredShimDependency { module: String, dependency: String },
}

/// Result of a merge
#[derive(Debug)]
pub struct MergeOutcome {
    pub config: SetupConfig,
    pub diagnostics: Vec<Diagnostic>,
    /// Edges walked during the merge
    pub graph: ModuleGraph,
}

/// Breadth-first merger over one package index
#[derive(Debug, Clone, Copy)]
pub struct Merger<'a> {
    index: &'a PackageIndex,
    context: &'a PrefixContext,
    options: MergeOptions,
}

/// Merge the closure of `roots` with default options
///
/// Never fails: conflicts are reported in `MergeOutcome::diagnostics`.
pub fn merge(
    roots: &[PackageDescriptor],
    index: &PackageIndex,
    context: &PrefixContext,
) -> MergeOutcome {
    Merger::new(index, context).walk(roots.iter())
}

impl<'a> Merger<'a> {
    pub fn new(index: &'a PackageIndex, context: &'a PrefixContext) -> Self {
        Self {
            index,
            context,
            options: MergeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Merge the closure of explicit root descriptors
    pub fn merge(&self, roots: &[PackageDescriptor]) -> ResolverResult<MergeOutcome> {
        self.finish(self.walk(roots.iter()))
    }

    /// Merge every package in the index, in index order
    pub fn merge_all(&self) -> ResolverResult<MergeOutcome> {
        self.finish(self.walk(self.index.iter()))
    }

    /// Merge the closure of packages named in the index
    pub fn merge_named<S: AsRef<str>>(&self, names: &[S]) -> ResolverResult<MergeOutcome> {
        let mut roots = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let descriptor = self
                .index
                .find(name)
                .ok_or_else(|| ReqmapError::PackageNotFound {
                    name: name.to_string(),
                    suggestion: suggest_similar_name(name, self.index.names()),
                })?;
            roots.push(descriptor);
        }
        self.finish(self.walk(roots.into_iter()))
    }

    fn walk<'d, I>(&self, roots: I) -> MergeOutcome
    where
        I: Iterator<Item = &'d PackageDescriptor>,
    {
        let mut config = SetupConfig::new();
        let mut diagnostics = Vec::new();
        let mut graph = ModuleGraph::new();
        let mut queue: VecDeque<&PackageDescriptor> = roots.collect();

        while let Some(descriptor) = queue.pop_front() {
            let id = normalize(&descriptor.name);
            graph.add_module(&id);

            if let Some(existing) = config.get(&id) {
                let candidate = Candidate::package(descriptor);
                if let Some(diagnostic) = compare(&existing.module, &candidate) {
                    push_unique(&mut diagnostics, diagnostic);
                }
                continue;
            }

            let mut module = resolve(descriptor, self.context);
            debug!(
                "Resolved {} as '{}' -> {:?}",
                descriptor, module.id, module.locations
            );

            // The package's own entry comes before its sub-packages
            let sub_packages = std::mem::take(&mut module.sub_packages);
            config.insert_if_absent(module);

            for sub in sub_packages {
                if sub.id != id {
                    graph.add_dependency(&id, &sub.id);
                }
                if let Some(existing) = config.get(&sub.id) {
                    if let Some(diagnostic) = compare(&existing.module, &Candidate::sub_package(&sub)) {
                        push_unique(&mut diagnostics, diagnostic);
                    }
                    continue;
                }
                config.insert_if_absent(sub);
            }

            for dependency in &descriptor.dependencies {
                match self.index.find(dependency) {
                    Some(found) => {
                        graph.add_dependency(&id, &normalize(dependency));
                        queue.push_back(found);
                    },
                    None => push_unique(
                        &mut diagnostics,
                        Diagnostic::MissingDependency {
                            package: descriptor.name.clone(),
                            dependency: dependency.clone(),
                        },
                    ),
                }
            }
        }

        for cycle in graph.cycles() {
            diagnostics.push(Diagnostic::DependencyCycle { cycle });
        }

        for diagnostic in &diagnostics {
            match diagnostic {
                Diagnostic::DependencyCycle { .. } => debug!("{}", diagnostic),
                _ => warn!("{}", diagnostic),
            }
        }

        info!(
            "Merged {} modules ({} dependency edges, {} diagnostics)",
            config.len(),
            graph.dependency_count(),
            diagnostics.len()
        );

        MergeOutcome {
            config,
            diagnostics,
            graph,
        }
    }

    fn finish(&self, outcome: MergeOutcome) -> ResolverResult<MergeOutcome> {
        if self.options.strict {
            if let Some(error) = outcome.diagnostics.iter().find_map(Diagnostic::to_error) {
                return Err(error);
            }
        }
        Ok(outcome)
    }
}

/// A package or sub-package about to be compared with a configured entry
struct Candidate<'c> {
    label: String,
    version: &'c str,
}

impl<'c> Candidate<'c> {
    fn package(descriptor: &'c PackageDescriptor) -> Self {
        Self {
            label: descriptor.name.clone(),
            version: &descriptor.version,
        }
    }

    fn sub_package(sub: &'c ResolvedModule) -> Self {
        Self {
            label: format!("{}/{}", sub.package, sub.name),
            version: &sub.version,
        }
    }
}

/// `package/name` for sub-packages, the bare name otherwise
fn origin(module: &ResolvedModule) -> String {
    if module.name == module.package {
        module.name.clone()
    } else {
        format!("{}/{}", module.package, module.name)
    }
}

/// Diagnostic for a candidate that lost to an already configured module
fn compare(existing: &ResolvedModule, candidate: &Candidate<'_>) -> Option<Diagnostic> {
    let kept = origin(existing);

    // A sub-package and a package with the same name are different modules
    if kept != candidate.label {
        return Some(Diagnostic::IdentifierCollision {
            id: existing.id.clone(),
            kept,
            ignored: candidate.label.clone(),
        });
    }

    if existing.version != candidate.version {
        return Some(Diagnostic::VersionConflict {
            name: kept,
            kept: existing.version.clone(),
            ignored: candidate.version.to_string(),
        });
    }

    None
}

fn push_unique(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    if !diagnostics.contains(&diagnostic) {
        diagnostics.push(diagnostic);
    }
}

/// Closest index name within edit distance 2
pub fn suggest_similar_name<'n>(input: &str, names: impl Iterator<Item = &'n str>) -> Option<String> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for name in names {
        let distance = edit_distance(input, name);
        if distance < best_distance && distance <= 2 {
            best_distance = distance;
            best_match = Some(name);
        }
    }

    best_match.map(|s| s.to_string())
}

/// Calculate edit distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[b_chars.len()]
}

impl Diagnostic {
    /// Whether strict mode treats this diagnostic as fatal
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Diagnostic::VersionConflict { .. } | Diagnostic::IdentifierCollision { .. }
        )
    }

    fn to_error(&self) -> Option<ReqmapError> {
        match self {
            Diagnostic::VersionConflict { name, kept, ignored } => {
                Some(ReqmapError::VersionConflict {
                    name: name.clone(),
                    kept: kept.clone(),
                    ignored: ignored.clone(),
                })
            },
            Diagnostic::IdentifierCollision { id, kept, ignored } => {
                Some(ReqmapError::IdentifierCollision {
                    id: id.clone(),
                    kept: kept.clone(),
                    ignored: ignored.clone(),
                })
            },
            Diagnostic::MissingDependency { .. }
            | Diagnostic::DependencyCycle { .. }
            | Diagnostic::UnconfiguredShimDependency { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::VersionConflict { name, kept, ignored } => write!(
                f,
                "{} {} is configured; {} {} is also reachable and was ignored",
                name, kept, name, ignored
            ),
            Diagnostic::IdentifierCollision { id, kept, ignored } => write!(
                f,
                "'{}' and '{}' both map to module '{}'; '{}' was ignored",
                kept, ignored, id, ignored
            ),
            Diagnostic::MissingDependency {
                package,
                dependency,
            } => write!(
                f,
                "{} depends on '{}', which is not in the package index",
                package, dependency
            ),
            Diagnostic::DependencyCycle { cycle } => {
                write!(f, "Dependency cycle: {}", ModuleGraph::format_cycle(cycle))
            },
            Diagnostic::UnconfiguredShimDependency { module, dependency } => write!(
                f,
                "shim for '{}' depends on '{}', which is not configured",
                module, dependency
            ),
        }
    }
}
