//! Task options and the upstream snapshot a task receives.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::result::TaskResult;

static ZERO_RESULT: TaskResult = TaskResult {
    status: super::Status::None,
    summary: String::new(),
    url: String::new(),
    payload: super::Payload::None,
    files_to_copy: Vec::new(),
    error: String::new(),
};

/// String options passed to every task execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOptions {
    values: BTreeMap<String, String>,
}

impl TaskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// A copy of these options with `overlay` applied on top.
    pub fn merged(&self, overlay: &TaskOptions) -> TaskOptions {
        let mut values = self.values.clone();
        values.extend(overlay.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        TaskOptions { values }
    }
}

/// Read-only results of a task's dependencies, keyed by the dependency
/// string the task declared.
#[derive(Debug, Clone, Default)]
pub struct Upstream {
    results: BTreeMap<String, Arc<TaskResult>>,
}

impl Upstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dependency: impl Into<String>, result: Arc<TaskResult>) {
        self.results.insert(dependency.into(), result);
    }

    /// Builder-style insert, convenient in tests.
    pub fn with(mut self, dependency: impl Into<String>, result: TaskResult) -> Self {
        self.insert(dependency, Arc::new(result));
        self
    }

    /// The result for `dependency`, or the zero value when there is none.
    pub fn get(&self, dependency: &str) -> &TaskResult {
        self.results
            .get(dependency)
            .map(Arc::as_ref)
            .unwrap_or(&ZERO_RESULT)
    }

    pub fn contains(&self, dependency: &str) -> bool {
        self.results.contains_key(dependency)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
