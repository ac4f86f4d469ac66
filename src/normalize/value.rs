//! The format-neutral intermediate value and the shared tree-builder.
//!
//! Every parser decodes into a [`GenericValue`] first and then calls
//! [`build_tree`], so all five formats produce the same tree shape.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::ValidateBlob;

/// A leaf value in a config tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

/// A mapping key as the source decoder produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum MapKey {
    Text(String),
    /// A key that is not a string (a YAML integer or sequence key, say).
    /// The original is kept only for logging.
    Other(String),
}

/// Nested maps, lists and scalars, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericValue {
    Scalar(Scalar),
    Map(Vec<(MapKey, GenericValue)>),
    List(Vec<GenericValue>),
}

impl GenericValue {
    pub fn string(value: impl Into<String>) -> Self {
        GenericValue::Scalar(Scalar::String(value.into()))
    }

    /// A map with string keys.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, GenericValue)>) -> Self {
        GenericValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (MapKey::Text(k.into()), v))
                .collect(),
        )
    }
}

/// Convert a decoded document into a sorted [`ValidateBlob`].
///
/// The root has an empty key and path. Its children carry path `""`;
/// anything below a key `k` carries the parent's path plus `/k`.
pub fn build_tree(value: GenericValue) -> ValidateBlob {
    let mut root = ValidateBlob {
        children: children_of("", value),
        ..ValidateBlob::default()
    };
    root.sort();
    root
}

fn children_of(path: &str, value: GenericValue) -> Vec<ValidateBlob> {
    // Keyed by the final key so a repeated key keeps its last value.
    let mut entries: BTreeMap<String, GenericValue> = BTreeMap::new();

    match value {
        GenericValue::Map(pairs) => {
            for (key, value) in pairs {
                match key {
                    MapKey::Text(key) => {
                        entries.insert(key, value);
                    }
                    MapKey::Other(key) => {
                        debug!("Dropping non-string mapping key {:?} under '{}'", key, path);
                    }
                }
            }
        }
        GenericValue::List(items) => {
            for (index, item) in items.into_iter().enumerate() {
                entries.insert(index.to_string(), item);
            }
        }
        GenericValue::Scalar(scalar) => {
            debug!("Scalar document ({}) produces an empty tree", scalar);
        }
    }

    entries
        .into_iter()
        .map(|(key, value)| node(path, key, value))
        .collect()
}

fn node(path: &str, key: String, value: GenericValue) -> ValidateBlob {
    match value {
        GenericValue::Scalar(raw_value) => ValidateBlob {
            key,
            path: path.to_string(),
            raw_value,
            children: Vec::new(),
        },
        container => {
            let child_path = format!("{}/{}", path, key);
            ValidateBlob {
                children: children_of(&child_path, container),
                key,
                path: path.to_string(),
                raw_value: Scalar::Null,
            }
        }
    }
}
