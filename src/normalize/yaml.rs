//! YAML (`newrelic.yml`, `newrelic-infra.yml`).

use serde::Deserialize;
use serde_yaml::Value;

use super::{build_tree, GenericValue, MapKey, Scalar, ValidateBlob};
use crate::error::ParseError;

/// Parse the first YAML document in `text`.
///
/// Merge keys (`<<: *defaults`) are expanded before the tree is built.
pub fn parse(text: &str) -> Result<ValidateBlob, ParseError> {
    let first = match serde_yaml::Deserializer::from_str(text).next() {
        Some(document) => document,
        None => return Ok(ValidateBlob::default()),
    };
    let mut value = Value::deserialize(first).map_err(yaml_error)?;
    value.apply_merge().map_err(yaml_error)?;
    Ok(build_tree(to_generic(value)))
}

fn yaml_error(e: serde_yaml::Error) -> ParseError {
    ParseError::Yaml {
        message: e.to_string(),
    }
}

fn to_generic(value: Value) -> GenericValue {
    match value {
        Value::Null => GenericValue::Scalar(Scalar::Null),
        Value::Bool(b) => GenericValue::Scalar(Scalar::Bool(b)),
        Value::Number(n) => GenericValue::Scalar(match n.as_i64() {
            Some(i) => Scalar::Int(i),
            None => Scalar::Float(n.as_f64().unwrap_or_default()),
        }),
        Value::String(s) => GenericValue::Scalar(Scalar::String(s)),
        Value::Sequence(items) => GenericValue::List(items.into_iter().map(to_generic).collect()),
        Value::Mapping(mapping) => GenericValue::Map(
            mapping
                .into_iter()
                .map(|(key, value)| (map_key(key), to_generic(value)))
                .collect(),
        ),
        Value::Tagged(tagged) => to_generic(tagged.value),
    }
}

fn map_key(key: Value) -> MapKey {
    match key {
        Value::String(s) => MapKey::Text(s),
        Value::Tagged(tagged) => map_key(tagged.value),
        other => MapKey::Other(format!("{:?}", other)),
    }
}
