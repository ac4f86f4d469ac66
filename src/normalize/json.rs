//! JSON (`newrelic.json`).

use serde_json::Value;

use super::{build_tree, GenericValue, Scalar, ValidateBlob};
use crate::error::ParseError;

/// Parse a JSON document whose top level is an object or an array.
pub fn parse(text: &str) -> Result<ValidateBlob, ParseError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ParseError::Json {
        message: e.to_string(),
    })?;
    if !(value.is_object() || value.is_array()) {
        return Err(ParseError::Json {
            message: "expected a JSON object or array at the top level".to_string(),
        });
    }
    Ok(build_tree(to_generic(value)))
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
        Value::Array(items) => GenericValue::List(items.into_iter().map(to_generic).collect()),
        Value::Object(map) => GenericValue::map(map.into_iter().map(|(k, v)| (k, to_generic(v)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_document() {
        let tree = parse(r#"{"log_level": "info", "agent": {"enabled": false}}"#).unwrap();
        assert_eq!(tree.to_string(), "/agent/enabled: false\n/log_level: info\n");
    }

    #[test]
    fn array_document() {
        let tree = parse(r#"[{"name": "a"}, {"name": "b"}]"#).unwrap();
        assert_eq!(tree.to_string(), "/0/name: a\n/1/name: b\n");
        assert_eq!(tree.find_key("name").len(), 2);
    }

    #[test]
    fn numbers() {
        let tree = parse(r#"{"port": 443, "sample": 1.5}"#).unwrap();
        let map = tree.as_map();
        assert_eq!(map["/port"], Scalar::Int(443));
        assert_eq!(map["/sample"], Scalar::Float(1.5));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse("[invalid: {json::here}]").unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(parse("\"just a string\"").is_err());
    }
}
