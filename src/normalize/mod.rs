//! Config file normalization.
//!
//! Five loosely related formats are decoded into a [`GenericValue`] and then
//! run through one tree-builder, so every check can ask "does key K exist
//! and what is its value" without caring where the file came from.
//!
//! - [`blob`] - the canonical [`ValidateBlob`] tree and its searches
//! - [`value`] - the intermediate value and [`build_tree`]
//! - [`format`] - extension dispatch
//! - [`yaml`], [`json`], [`xml`], [`ini`], [`js`] - the parsers

pub mod blob;
pub mod format;
pub mod ini;
pub mod js;
pub mod json;
pub mod value;
pub mod xml;
pub mod yaml;

pub use blob::ValidateBlob;
pub use format::{parse, parse_file, ConfigFormat};
pub use value::{build_tree, GenericValue, MapKey, Scalar};

/// Trim whitespace and one matching pair of surrounding quotes.
pub fn trim_quotes(raw: &str) -> String {
    let trimmed = raw.trim();
    for quote in ['\'', '"', '`'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}
