//! The canonical config tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::Scalar;

/// One node of a normalized config file.
///
/// A node is either a leaf carrying `raw_value` or an interior node with
/// `children`. `path` is the slash-joined chain of ancestor keys, so the
/// top-level keys of a file have path `""` and `logging.level` in YAML sits
/// at path `/logging`, key `level`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidateBlob {
    pub key: String,
    pub path: String,
    pub raw_value: Scalar,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ValidateBlob>,
}

impl ValidateBlob {
    /// A leaf node.
    pub fn leaf(path: impl Into<String>, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            raw_value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The leaf value as a string; interior nodes have none.
    pub fn value(&self) -> String {
        if self.is_leaf() {
            self.raw_value.to_string()
        } else {
            String::new()
        }
    }

    pub fn path_and_key(&self) -> String {
        format!("{}/{}", self.path, self.key)
    }

    pub fn path_and_key_contains(&self, needle: &str) -> bool {
        self.path_and_key().contains(needle)
    }

    /// Order children by `path/key`, recursively.
    pub fn sort(&mut self) {
        self.children.sort_by_cached_key(ValidateBlob::path_and_key);
        for child in &mut self.children {
            child.sort();
        }
    }

    /// Every node named `key`, at any depth, in tree order.
    ///
    /// A match does not stop the descent, so a key nested under a node of
    /// the same name is found too.
    pub fn find_key(&self, key: &str) -> Vec<&ValidateBlob> {
        let mut found = Vec::new();
        if self.key == key {
            found.push(self);
        }
        self.search_children(key, &mut found);
        found
    }

    fn search_children<'a>(&'a self, key: &str, found: &mut Vec<&'a ValidateBlob>) {
        for child in &self.children {
            if child.key == key {
                found.push(child);
            }
            child.search_children(key, found);
        }
    }

    /// Look a node up by its full `path/key`, such as `/logging/level`.
    ///
    /// An exact match wins. For a multi-segment argument with no exact match,
    /// the first node named after the last segment whose `path/key` contains
    /// the argument is returned.
    pub fn find_key_by_path(&self, path_and_key: &str) -> Option<&ValidateBlob> {
        if self.path_and_key() == path_and_key {
            return Some(self);
        }

        let last = path_and_key.rsplit('/').next().unwrap_or(path_and_key);
        let mut candidates = Vec::new();
        self.search_children(last, &mut candidates);

        if let Some(exact) = candidates
            .iter()
            .find(|blob| blob.path_and_key() == path_and_key)
        {
            return Some(exact);
        }
        if path_and_key.contains('/') {
            return candidates
                .into_iter()
                .find(|blob| blob.path_and_key_contains(path_and_key));
        }
        None
    }

    /// `path/key` to raw value for every leaf.
    pub fn as_map(&self) -> BTreeMap<String, Scalar> {
        let mut map = BTreeMap::new();
        self.collect_leaves(&mut map);
        map
    }

    fn collect_leaves(&self, map: &mut BTreeMap<String, Scalar>) {
        if self.is_leaf() {
            if !(self.key.is_empty() && self.path.is_empty()) {
                map.insert(self.path_and_key(), self.raw_value.clone());
            }
            return;
        }
        for child in &self.children {
            child.collect_leaves(map);
        }
    }

    /// Total number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

impl fmt::Display for ValidateBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            // An empty document is an empty root.
            if self.key.is_empty() && self.path.is_empty() {
                return Ok(());
            }
            return writeln!(f, "{}: {}", self.path_and_key(), self.value());
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        Ok(())
    }
}
