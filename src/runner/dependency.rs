//! Dependency graph for task execution ordering.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{DiagError, Result};
use crate::tasks::Identifier;

/// Represents the dependency relationships between tasks.
///
/// Edges to identifiers that are not nodes of the graph are kept aside as
/// unresolved instead of being rejected; a task with such an edge is still
/// schedulable.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Map of task to its direct, resolved dependencies.
    dependencies: BTreeMap<Identifier, BTreeSet<Identifier>>,
    /// Map of task to tasks that depend on it.
    dependents: BTreeMap<Identifier, BTreeSet<Identifier>>,
    /// Dependencies naming identifiers that are not in the graph.
    unresolved: BTreeMap<Identifier, BTreeSet<Identifier>>,
}

impl DependencyGraph {
    /// Create a new dependency graph builder.
    pub fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new()
    }

    /// Get the direct dependencies of a task.
    pub fn dependencies_of(&self, task: &Identifier) -> Option<&BTreeSet<Identifier>> {
        self.dependencies.get(task)
    }

    /// Get tasks that depend on the given task.
    pub fn dependents_of(&self, task: &Identifier) -> Option<&BTreeSet<Identifier>> {
        self.dependents.get(task)
    }

    /// Dependencies of `task` that name no node in the graph.
    pub fn unresolved_of(&self, task: &Identifier) -> Option<&BTreeSet<Identifier>> {
        self.unresolved.get(task)
    }

    /// Check if a task exists in the graph.
    pub fn contains(&self, task: &Identifier) -> bool {
        self.dependencies.contains_key(task)
    }

    /// Get the number of tasks in the graph.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Returns tasks in topological order (dependencies before dependents).
    ///
    /// Ties are broken by identifier order. Returns an error if a cycle is
    /// detected.
    pub fn topological_order(&self) -> Result<Vec<Identifier>> {
        let mut in_degree: BTreeMap<&Identifier, usize> = self
            .dependencies
            .iter()
            .map(|(task, deps)| (task, deps.len()))
            .collect();

        let mut ready: BTreeSet<&Identifier> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(task, _)| *task)
            .collect();

        let mut result = Vec::with_capacity(self.len());

        while let Some(task) = ready.pop_first() {
            result.push(task.clone());

            if let Some(dependents) = self.dependents.get(task) {
                for dependent in dependents {
                    if let Some(degree) = in_degree.get_mut(dependent) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.insert(dependent);
                        }
                    }
                }
            }
        }

        if result.len() != self.len() {
            let cycle = self.find_cycle().unwrap_or_else(|| {
                in_degree
                    .iter()
                    .filter(|(_, &d)| d > 0)
                    .map(|(task, _)| (*task).clone())
                    .collect()
            });
            return Err(cycle_error(&cycle));
        }

        Ok(result)
    }

    /// Find a cycle in the graph, returning the path if one exists.
    pub fn find_cycle(&self) -> Option<Vec<Identifier>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        let mut state: BTreeMap<&Identifier, State> = self
            .dependencies
            .keys()
            .map(|task| (task, State::Unvisited))
            .collect();

        let mut path: Vec<Identifier> = Vec::new();

        fn dfs<'a>(
            node: &'a Identifier,
            graph: &'a DependencyGraph,
            state: &mut BTreeMap<&'a Identifier, State>,
            path: &mut Vec<Identifier>,
        ) -> Option<Vec<Identifier>> {
            state.insert(node, State::Visiting);
            path.push(node.clone());

            if let Some(deps) = graph.dependencies.get(node) {
                for dep in deps {
                    match state.get(dep) {
                        Some(State::Visiting) => {
                            let start = path.iter().position(|t| t == dep).unwrap_or(0);
                            let mut cycle: Vec<Identifier> = path[start..].to_vec();
                            cycle.push(dep.clone());
                            return Some(cycle);
                        }
                        Some(State::Unvisited) => {
                            if let Some(cycle) = dfs(dep, graph, state, path) {
                                return Some(cycle);
                            }
                        }
                        Some(State::Visited) | None => {}
                    }
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        for task in self.dependencies.keys() {
            if state.get(task) == Some(&State::Unvisited) {
                if let Some(cycle) = dfs(task, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    /// The given tasks plus everything they transitively depend on.
    ///
    /// Identifiers that are not nodes of the graph are ignored.
    pub fn closure<'a>(&self, selected: impl IntoIterator<Item = &'a Identifier>) -> BTreeSet<Identifier> {
        let mut result = BTreeSet::new();
        let mut to_visit: Vec<Identifier> = selected
            .into_iter()
            .filter(|task| self.contains(task))
            .cloned()
            .collect();

        while let Some(current) = to_visit.pop() {
            if !result.insert(current.clone()) {
                continue;
            }
            if let Some(deps) = self.dependencies.get(&current) {
                to_visit.extend(deps.iter().filter(|d| !result.contains(*d)).cloned());
            }
        }

        result
    }

    /// The subgraph induced by `nodes`.
    ///
    /// Edges leaving the node set are dropped rather than reported as
    /// unresolved, since the caller chose the set.
    pub fn restrict(&self, nodes: &BTreeSet<Identifier>) -> DependencyGraph {
        let mut builder = DependencyGraph::builder();
        for task in nodes.iter().filter(|t| self.contains(t)) {
            let deps = self
                .dependencies
                .get(task)
                .map(|deps| deps.iter().filter(|d| nodes.contains(*d)).cloned().collect())
                .unwrap_or_default();
            builder = builder.add_task(task.clone(), deps);
        }
        let mut graph = builder.build();
        for task in nodes {
            if let Some(unresolved) = self.unresolved.get(task) {
                graph.unresolved.insert(task.clone(), unresolved.clone());
            }
        }
        graph
    }

    /// Get all transitive dependents of a task.
    ///
    /// Returns tasks that depend on the given task, directly or indirectly.
    pub fn transitive_dependents(&self, task: &Identifier) -> BTreeSet<Identifier> {
        let mut result = BTreeSet::new();
        let mut to_visit = vec![task.clone()];

        while let Some(current) = to_visit.pop() {
            if let Some(dependents) = self.dependents.get(&current) {
                for dep in dependents {
                    if result.insert(dep.clone()) {
                        to_visit.push(dep.clone());
                    }
                }
            }
        }

        result
    }
}

fn cycle_error(cycle: &[Identifier]) -> DiagError {
    DiagError::CircularDependency {
        cycle: cycle
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> "),
    }
}

/// Builder for constructing a DependencyGraph.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    dependencies: BTreeMap<Identifier, BTreeSet<Identifier>>,
}

impl DependencyGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task with its dependencies.
    pub fn add_task(mut self, task: Identifier, depends_on: Vec<Identifier>) -> Self {
        self.dependencies.entry(task).or_default().extend(depends_on);
        self
    }

    /// Build the dependency graph.
    ///
    /// Dependencies on identifiers that were never added become unresolved
    /// edges rather than errors.
    pub fn build(self) -> DependencyGraph {
        let mut dependencies: BTreeMap<Identifier, BTreeSet<Identifier>> = BTreeMap::new();
        let mut unresolved: BTreeMap<Identifier, BTreeSet<Identifier>> = BTreeMap::new();
        let mut dependents: BTreeMap<Identifier, BTreeSet<Identifier>> = self
            .dependencies
            .keys()
            .map(|task| (task.clone(), BTreeSet::new()))
            .collect();

        for (task, deps) in &self.dependencies {
            let (known, unknown): (BTreeSet<Identifier>, BTreeSet<Identifier>) = deps
                .iter()
                .cloned()
                .partition(|dep| self.dependencies.contains_key(dep));

            for dep in &known {
                if let Some(set) = dependents.get_mut(dep) {
                    set.insert(task.clone());
                }
            }
            if !unknown.is_empty() {
                unresolved.insert(task.clone(), unknown);
            }
            dependencies.insert(task.clone(), known);
        }

        DependencyGraph {
            dependencies,
            dependents,
            unresolved,
        }
    }
}
