//! INI, `.properties` and `.cfg` files.
//!
//! Anything that looks like `key = value` or `key value` on a line that does
//! not start with `;` or `#` is taken; sections and everything else are
//! ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::{build_tree, trim_quotes, GenericValue, ValidateBlob};

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^;#][a-zA-Z_.]*)([ ]*)[= ][ ]*(.*)").expect("KEY_VALUE must compile"));

/// Parse key/value lines. Never fails.
pub fn parse(text: &str) -> ValidateBlob {
    let entries = text.lines().filter_map(|line| {
        KEY_VALUE
            .captures(line)
            .map(|caps| (caps[1].to_string(), GenericValue::string(trim_quotes(&caps[3]))))
    });
    build_tree(GenericValue::map(entries))
}
