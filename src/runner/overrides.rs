//! Task options, task-scoped options and result overrides.
//!
//! Options are written `key=value` (every task) or
//! `Category/Subcategory/Name.key=value` (one task). A task whose effective
//! options contain `Status` or `Payload` is not executed; its result is
//! synthesized from those values instead.

use std::collections::BTreeMap;

use crate::error::{DiagError, Result};
use crate::tasks::{Identifier, Payload, Status, TaskOptions, TaskResult};

/// Option key that forces a task's status.
pub const STATUS_KEY: &str = "Status";
/// Option key that forces a task's payload.
pub const PAYLOAD_KEY: &str = "Payload";

/// A single parsed `[Identifier.]key=value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub scope: Option<Identifier>,
    pub key: String,
    pub value: String,
}

impl OptionSpec {
    /// Parse `key=value` or `Category/Subcategory/Name.key=value`.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |message: &str| DiagError::InvalidOption {
            input: input.to_string(),
            message: message.to_string(),
        };

        let (lhs, value) = input
            .split_once('=')
            .ok_or_else(|| invalid("expected key=value"))?;
        let lhs = lhs.trim();
        let value = value.trim().to_string();

        let (scope, key) = match lhs.rfind('/') {
            None => (None, lhs),
            Some(slash) => {
                let dot = lhs[slash..]
                    .find('.')
                    .map(|offset| slash + offset)
                    .ok_or_else(|| invalid("expected Category/Subcategory/Name.key"))?;
                let id: Identifier = lhs[..dot].parse()?;
                (Some(id), &lhs[dot + 1..])
            }
        };

        if key.is_empty() {
            return Err(invalid("option key is empty"));
        }

        Ok(Self {
            scope,
            key: key.to_string(),
            value,
        })
    }
}

/// Global options plus per-task layers.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    global: TaskOptions,
    per_task: BTreeMap<String, TaskOptions>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options every task receives.
    pub fn with_global(mut self, options: TaskOptions) -> Self {
        self.global = self.global.merged(&options);
        self
    }

    pub fn add(&mut self, spec: OptionSpec) {
        match spec.scope {
            None => self.global.insert(spec.key, spec.value),
            Some(id) => self
                .per_task
                .entry(id.key())
                .or_default()
                .insert(spec.key, spec.value),
        }
    }

    /// Parse and add each entry.
    pub fn extend_from_strs<'a>(&mut self, entries: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for entry in entries {
            self.add(OptionSpec::parse(entry)?);
        }
        Ok(())
    }

    /// Effective options for one task, matched case-insensitively.
    pub fn for_task(&self, identifier: &Identifier) -> TaskOptions {
        match self.per_task.get(&identifier.key()) {
            Some(scoped) => self.global.merged(scoped),
            None => self.global.clone(),
        }
    }
}

/// Build the overridden result if `options` request one.
pub fn override_result(options: &TaskOptions) -> Option<TaskResult> {
    let status = options.get(STATUS_KEY);
    let payload = options.get(PAYLOAD_KEY);
    if status.is_none() && payload.is_none() {
        return None;
    }

    let mut result = TaskResult::default();
    if let Some(raw) = status {
        match raw.parse::<Status>() {
            Ok(parsed) => {
                result.status = parsed;
                result.summary.push_str(&format!("Status set by override to {}\n", raw));
            }
            Err(_) => {
                return Some(TaskResult::error(format!(
                    "Invalid status override '{}': expected one of none, success, info, warning, failure, error",
                    raw
                )));
            }
        }
    }
    if let Some(raw) = payload {
        result.payload = Payload::Text(raw.to_string());
        result.summary.push_str("Payload set by override\n");
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_option() {
        let spec = OptionSpec::parse("config_file=/app/newrelic.yml").unwrap();
        assert_eq!(spec.scope, None);
        assert_eq!(spec.key, "config_file");
        assert_eq!(spec.value, "/app/newrelic.yml");
    }

    #[test]
    fn parses_scoped_option_with_dots_in_value() {
        let spec = OptionSpec::parse("Base/Config/Collect.config_file=/a/b.yml").unwrap();
        assert_eq!(spec.scope.unwrap().to_string(), "Base/Config/Collect");
        assert_eq!(spec.key, "config_file");
        assert_eq!(spec.value, "/a/b.yml");
    }

    #[test]
    fn identifier_ends_at_first_dot_after_last_slash() {
        let spec = OptionSpec::parse("Base/Config/Validate.log.level=debug").unwrap();
        assert_eq!(spec.scope.unwrap().to_string(), "Base/Config/Validate");
        assert_eq!(spec.key, "log.level");
        assert_eq!(spec.value, "debug");
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(OptionSpec::parse("no_equals").is_err());
        assert!(OptionSpec::parse("Base/Config/Collect=1").is_err());
        assert!(OptionSpec::parse("=1").is_err());
        assert!(OptionSpec::parse("Base/Collect.key=1").is_err());
    }

    #[test]
    fn scoped_options_layer_over_global() {
        let mut set = OptionSet::new().with_global(TaskOptions::new().with("mode", "a"));
        set.extend_from_strs(["base/config/validate.mode=b"]).unwrap();

        let validate = Identifier::new("Base", "Config", "Validate");
        let collect = Identifier::new("Base", "Config", "Collect");
        assert_eq!(set.for_task(&validate).get("mode"), Some("b"));
        assert_eq!(set.for_task(&collect).get("mode"), Some("a"));
    }

    #[test]
    fn no_override_without_keys() {
        assert!(override_result(&TaskOptions::new().with("x", "1")).is_none());
    }

    #[test]
    fn status_override_sets_status_and_summary() {
        let result = override_result(&TaskOptions::new().with(STATUS_KEY, "failure")).unwrap();
        assert_eq!(result.status, Status::Failure);
        assert_eq!(result.summary, "Status set by override to failure\n");
    }

    #[test]
    fn payload_override_sets_text_payload() {
        let opts = TaskOptions::new()
            .with(STATUS_KEY, "success")
            .with(PAYLOAD_KEY, "forced");
        let result = override_result(&opts).unwrap();
        assert_eq!(result.payload.as_text(), Some("forced"));
        assert!(result.summary.ends_with("Payload set by override\n"));
    }

    #[test]
    fn invalid_status_override_is_error() {
        let result = override_result(&TaskOptions::new().with(STATUS_KEY, "great")).unwrap();
        assert_eq!(result.status, Status::Error);
        assert!(result.summary.contains("great"));
    }
}
