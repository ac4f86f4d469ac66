//! JS config modules (`newrelic.js`).
//!
//! These are CommonJS modules that assign an object literal to
//! `exports.config`. Only that literal is read. Nested objects are flattened
//! into dotted keys (`logging.level`) next to a `logging: "{"` marker, arrays
//! become lists, and every other value is kept as its source text.

mod lexer;
mod parser;

use super::{build_tree, GenericValue, ValidateBlob};
use crate::error::ParseError;

pub fn parse(text: &str) -> Result<ValidateBlob, ParseError> {
    let lexed = lexer::tokenize(text)?;
    let entries = parser::parse_config(&lexed)?;
    Ok(build_tree(GenericValue::map(entries)))
}
