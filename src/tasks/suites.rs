//! Named task suites.
//!
//! A suite is a named list of task selectors (`Base/*`, `Base/Config/Validate`)
//! so users can ask for "everything about config" without knowing identifiers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{DiagError, Result};

/// A named collection of task selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suite {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub selectors: Vec<String>,
}

impl Suite {
    pub fn new(name: &str, display_name: &str, description: &str, selectors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// All known suites, built-in and user-defined.
#[derive(Debug, Clone)]
pub struct SuiteCatalog {
    suites: Vec<Suite>,
}

impl Default for SuiteCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SuiteCatalog {
    /// The suites shipped with diagrun.
    pub fn builtin() -> Self {
        Self {
            suites: vec![
                Suite::new("base", "Base", "Environment and config checks", &["Base/*"]),
                Suite::new(
                    "config",
                    "Agent configuration",
                    "Locate, parse and inspect agent config files",
                    &["Base/Config/*"],
                ),
                Suite::new("env", "Environment", "Environment variable collection", &["Base/Env/*"]),
            ],
        }
    }

    /// Add or replace suites from configuration.
    pub fn with_custom(mut self, custom: &BTreeMap<String, Vec<String>>) -> Self {
        for (name, selectors) in custom {
            let suite = Suite {
                name: name.clone(),
                display_name: name.clone(),
                description: String::new(),
                selectors: selectors.clone(),
            };
            match self
                .suites
                .iter_mut()
                .find(|s| s.name.eq_ignore_ascii_case(name))
            {
                Some(existing) => *existing = suite,
                None => self.suites.push(suite),
            }
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suite> {
        self.suites.iter()
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<&Suite> {
        let name = name.trim();
        self.suites.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Resolve suite names (comma-separated allowed) to their selectors.
    ///
    /// Every unknown name is collected and reported in one error.
    pub fn selectors_for<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        let mut selectors = Vec::new();
        let mut unknown = Vec::new();

        for name in names
            .iter()
            .flat_map(|n| n.as_ref().split(','))
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            match self.find(name) {
                Some(suite) => selectors.extend(suite.selectors.iter().cloned()),
                None => unknown.push(name.to_string()),
            }
        }

        if !unknown.is_empty() {
            return Err(DiagError::UnknownSuite { names: unknown });
        }
        Ok(selectors)
    }
}
