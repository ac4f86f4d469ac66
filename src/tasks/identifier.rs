//! Task identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DiagError;

/// The `Category/Subcategory/Name` triple naming a task.
///
/// The string form is the only handle used to declare dependencies and
/// select tasks, so parsing and display round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    pub category: String,
    pub subcategory: String,
    pub name: String,
}

impl Identifier {
    /// Build an identifier from its three parts.
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            name: name.into(),
        }
    }

    /// Lower-cased form used for case-insensitive lookup.
    pub fn key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.subcategory, self.name)
    }
}

impl FromStr for Identifier {
    type Err = DiagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [category, subcategory, name]
                if !category.is_empty() && !subcategory.is_empty() && !name.is_empty() =>
            {
                Ok(Self::new(*category, *subcategory, *name))
            }
            _ => Err(DiagError::InvalidIdentifier {
                input: s.to_string(),
            }),
        }
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_segments() {
        let id: Identifier = "Base/Config/Collect".parse().unwrap();
        assert_eq!(id.category, "Base");
        assert_eq!(id.subcategory, "Config");
        assert_eq!(id.name, "Collect");
    }

    #[test]
    fn display_round_trips() {
        let raw = "Java/Env/Version";
        let id: Identifier = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!("Base".parse::<Identifier>().is_err());
        assert!("Base/Config".parse::<Identifier>().is_err());
        assert!("Base/Config/Collect/Extra".parse::<Identifier>().is_err());
    }

    #[test]
    fn rejects_empty_segment() {
        assert!("Base//Collect".parse::<Identifier>().is_err());
        assert!("/Config/Collect".parse::<Identifier>().is_err());
    }

    #[test]
    fn orders_by_category_then_subcategory_then_name() {
        let mut ids: Vec<Identifier> = ["Node/Config/A", "Base/Env/Z", "Base/Config/B"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let names: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["Base/Config/B", "Base/Env/Z", "Node/Config/A"]);
    }

    #[test]
    fn key_is_lowercase() {
        let id = Identifier::new("Base", "Env", "CollectEnvVars");
        assert_eq!(id.key(), "base/env/collectenvvars");
    }

    #[test]
    fn serializes_as_string() {
        let id = Identifier::new("Base", "Config", "Validate");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"Base/Config/Validate\""
        );
    }
}
