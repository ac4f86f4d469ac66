//! Task registry.
//!
//! Tasks are registered into a [`RegistryBuilder`] at startup. Building the
//! registry resolves every declared dependency string against the registered
//! identifiers, constructs the dependency graph once and rejects cycles, so
//! structural defects surface before any task runs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::RegexBuilder;

use crate::error::{DiagError, Result};
use crate::runner::DependencyGraph;

use super::{Identifier, Task};

/// A declared dependency and the registered task it resolved to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The string exactly as the task declared it.
    pub declared: String,
    pub resolved: Option<Identifier>,
}

/// A task plus its registration metadata.
pub struct RegisteredTask {
    identifier: Identifier,
    enabled_by_default: bool,
    dependencies: Vec<Dependency>,
    task: Box<dyn Task>,
}

impl RegisteredTask {
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn enabled_by_default(&self) -> bool {
        self.enabled_by_default
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn explain(&self) -> String {
        self.task.explain()
    }

    pub fn task(&self) -> &dyn Task {
        self.task.as_ref()
    }
}

impl std::fmt::Debug for RegisteredTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTask")
            .field("identifier", &self.identifier)
            .field("enabled_by_default", &self.enabled_by_default)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Collects tasks before the registry is validated.
#[derive(Default)]
pub struct RegistryBuilder {
    tasks: Vec<(Box<dyn Task>, bool)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Duplicates are reported by [`build`](Self::build).
    pub fn register(&mut self, task: impl Task + 'static, enabled_by_default: bool) -> &mut Self {
        self.register_boxed(Box::new(task), enabled_by_default)
    }

    pub fn register_boxed(&mut self, task: Box<dyn Task>, enabled_by_default: bool) -> &mut Self {
        self.tasks.push((task, enabled_by_default));
        self
    }

    /// Let a category module register its tasks.
    pub fn register_with(&mut self, register: impl FnOnce(&mut RegistryBuilder)) -> &mut Self {
        register(self);
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate and freeze the registry.
    ///
    /// Fails on a duplicate identifier (compared case-insensitively) or a
    /// dependency cycle. Dependencies naming unregistered tasks are kept as
    /// unresolved and logged.
    pub fn build(self) -> Result<TaskRegistry> {
        let mut by_key: HashMap<String, Identifier> = HashMap::new();
        let mut pending = Vec::with_capacity(self.tasks.len());

        for (task, enabled_by_default) in self.tasks {
            let identifier = task.identifier();
            if by_key.insert(identifier.key(), identifier.clone()).is_some() {
                return Err(DiagError::DuplicateTask {
                    identifier: identifier.to_string(),
                });
            }
            pending.push((identifier, task, enabled_by_default));
        }

        let mut tasks = BTreeMap::new();
        let mut builder = DependencyGraph::builder();

        for (identifier, task, enabled_by_default) in pending {
            let dependencies: Vec<Dependency> = task
                .dependencies()
                .into_iter()
                .map(|declared| {
                    let resolved = by_key.get(&declared.to_lowercase()).cloned();
                    if resolved.is_none() {
                        tracing::warn!(
                            "{} depends on '{}', which is not registered; it will see an empty result",
                            identifier,
                            declared
                        );
                    }
                    Dependency { declared, resolved }
                })
                .collect();

            let edges = dependencies
                .iter()
                .filter_map(|d| d.resolved.clone())
                .collect();
            builder = builder.add_task(identifier.clone(), edges);

            tasks.insert(
                identifier.clone(),
                RegisteredTask {
                    identifier,
                    enabled_by_default,
                    dependencies,
                    task,
                },
            );
        }

        let graph = builder.build();
        graph.topological_order()?;

        tracing::debug!("Registry built with {} tasks", tasks.len());

        Ok(TaskRegistry {
            tasks,
            by_key,
            graph,
        })
    }
}

/// The validated, immutable set of tasks.
#[derive(Debug)]
pub struct TaskRegistry {
    tasks: BTreeMap<Identifier, RegisteredTask>,
    by_key: HashMap<String, Identifier>,
    graph: DependencyGraph,
}

impl TaskRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, identifier: &Identifier) -> Option<&RegisteredTask> {
        self.tasks.get(identifier)
    }

    /// Case-insensitive lookup by identifier string.
    pub fn lookup(&self, identifier: &str) -> Option<&RegisteredTask> {
        self.by_key
            .get(&identifier.trim().to_lowercase())
            .and_then(|id| self.tasks.get(id))
    }

    /// All tasks in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTask> {
        self.tasks.values()
    }

    /// Identifiers of tasks enabled by default.
    pub fn defaults(&self) -> Vec<Identifier> {
        self.tasks
            .values()
            .filter(|t| t.enabled_by_default)
            .map(|t| t.identifier.clone())
            .collect()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Every `(task, declared dependency)` pair that resolved to nothing.
    pub fn unresolved(&self) -> Vec<(&Identifier, &str)> {
        self.tasks
            .values()
            .flat_map(|t| {
                t.dependencies
                    .iter()
                    .filter(|d| d.resolved.is_none())
                    .map(move |d| (&t.identifier, d.declared.as_str()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks matching one selector.
    ///
    /// A selector containing `*` is a case-insensitive wildcard; anything
    /// else is an exact (case-insensitive) identifier. Wildcards only match
    /// default tasks unless `include_disabled` is set; exact identifiers
    /// always match.
    pub fn matching(&self, selector: &str, include_disabled: bool) -> Vec<&RegisteredTask> {
        let selector = selector.trim();
        if !selector.contains('*') {
            return self.lookup(selector).into_iter().collect();
        }

        let pattern = format!(
            "^{}$",
            selector
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*")
        );
        let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(e) => {
                tracing::debug!("Selector '{}' is not a usable pattern: {}", selector, e);
                return Vec::new();
            }
        };

        self.tasks
            .values()
            .filter(|t| include_disabled || t.enabled_by_default)
            .filter(|t| regex.is_match(&t.identifier.to_string()))
            .collect()
    }

    /// Resolve CLI selectors to identifiers.
    ///
    /// An empty list, or the selector `all`, selects every default task.
    pub fn select<S: AsRef<str>>(&self, selectors: &[S]) -> Result<Vec<Identifier>> {
        let selectors: Vec<&str> = selectors
            .iter()
            .flat_map(|s| s.as_ref().split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if selectors.is_empty() || selectors.iter().any(|s| s.eq_ignore_ascii_case("all")) {
            return Ok(self.defaults());
        }

        let mut selected = BTreeSet::new();
        for selector in selectors {
            let matches = self.matching(selector, false);
            if matches.is_empty() {
                return Err(DiagError::UnknownTask {
                    selector: selector.to_string(),
                });
            }
            selected.extend(matches.into_iter().map(|t| t.identifier.clone()));
        }
        Ok(selected.into_iter().collect())
    }
}
