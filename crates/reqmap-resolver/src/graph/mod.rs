//! Module dependency graph using petgraph
//!
//! Records the edges walked during a merge so cycles in the package index can
//! be reported. The merge itself never needs the graph to terminate.

use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

/// Directed graph of module identifiers
#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// Underlying directed graph
    graph: DiGraph<String, ()>,
    /// Map from module id to NodeIndex for fast lookups
    node_map: IndexMap<String, NodeIndex>,
}

impl ModuleGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module node, returning the existing index if already present
    pub fn add_module(&mut self, id: &str) -> NodeIndex {
        if let Some(existing) = self.node_map.get(id) {
            return *existing;
        }

        let index = self.graph.add_node(id.to_string());
        self.node_map.insert(id.to_string(), index);
        index
    }

    /// Record that `from` depends on `to`, adding missing nodes
    pub fn add_dependency(&mut self, from: &str, to: &str) {
        let from_index = self.add_module(from);
        let to_index = self.add_module(to);

        if !self.graph.contains_edge(from_index, to_index) {
            self.graph.add_edge(from_index, to_index, ());
        }
    }

    /// Direct dependencies of `id`
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        let Some(index) = self.node_map.get(id) else {
            return Vec::new();
        };

        self.successors(*index)
            .into_iter()
            .filter_map(|n| self.graph.node_weight(n))
            .map(String::as_str)
            .collect()
    }

    /// Every dependency cycle, each as the path of module ids walked
    ///
    /// Each strongly connected component with more than one member, or with a
    /// self-dependency, yields one cycle. The path starts at the member added
    /// first and follows dependency edges in declaration order.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || self.graph.contains_edge(component[0], component[0])
            })
            .filter_map(|component| {
                let start = component.iter().min().copied()?;
                let mut path = vec![start];
                self.close_cycle(start, &component, &mut path).then(|| {
                    path.into_iter()
                        .filter_map(|index| self.graph.node_weight(index).cloned())
                        .collect()
                })
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Extend `path` until its last node leads back to its first
    fn close_cycle(&self, start: NodeIndex, component: &[NodeIndex], path: &mut Vec<NodeIndex>) -> bool {
        let Some(&current) = path.last() else {
            return false;
        };

        for next in self.successors(current) {
            if next == start {
                return true;
            }
            if component.contains(&next) && !path.contains(&next) {
                path.push(next);
                if self.close_cycle(start, component, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    /// Successors in the order their edges were added
    fn successors(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut successors: Vec<NodeIndex> = self.graph.neighbors(index).collect();
        // petgraph yields neighbors newest-first
        successors.reverse();
        successors
    }

    /// Format cycle as "a -> b -> c -> a"
    pub fn format_cycle(cycle: &[String]) -> String {
        match cycle.first() {
            None => "No cycle".to_string(),
            Some(first) => {
                let mut closed = cycle.to_vec();
                closed.push(first.clone());
                closed.join(" -> ")
            },
        }
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }
}
