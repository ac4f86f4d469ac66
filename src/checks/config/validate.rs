//! Parse every collected config file into a [`ValidateBlob`] tree.

use tracing::{debug, warn};

use super::collect::COLLECT;
use crate::error::ParseError;
use crate::normalize::{self, ValidateBlob};
use crate::tasks::{
    Identifier, Payload, Status, Task, TaskOptions, TaskResult, Upstream, ValidatedConfig,
};

pub const VALIDATE: &str = "Base/Config/Validate";

pub struct Validate;

impl Task for Validate {
    fn identifier(&self) -> Identifier {
        Identifier::new("Base", "Config", "Validate")
    }

    fn explain(&self) -> String {
        "Parse New Relic configuration files".to_string()
    }

    fn dependencies(&self) -> Vec<String> {
        vec![COLLECT.to_string()]
    }

    fn execute(&self, _options: &TaskOptions, upstream: &Upstream) -> TaskResult {
        let collected = upstream.get(COLLECT);
        if collected.status != Status::Success {
            return TaskResult::new(
                Status::None,
                "Config file collection was not successful, skipping validation step.",
            );
        }
        let Some(files) = collected.payload.as_config_files() else {
            return TaskResult::type_mismatch();
        };

        let mut validated = Vec::new();
        for file in files {
            let path = file.full_path();
            let (status, parsed, error) = match normalize::parse_file(&path) {
                Ok(tree) => (Status::Success, tree, String::new()),
                Err(ParseError::UnsupportedFormat { extension }) => {
                    debug!(
                        "Skipping {}: no parser for extension '{}'",
                        path.display(),
                        extension
                    );
                    continue;
                }
                Err(e) => {
                    warn!("Could not parse {}: {}", path.display(), e);
                    (Status::Failure, ValidateBlob::default(), e.to_string())
                }
            };
            validated.push(ValidatedConfig {
                config: file.clone(),
                status,
                parsed,
                error,
            });
        }

        if validated.is_empty() {
            return TaskResult::new(
                Status::None,
                "Task did not meet requirements necessary to run: no configs",
            );
        }

        let failed: Vec<&ValidatedConfig> = validated
            .iter()
            .filter(|v| v.status != Status::Success)
            .collect();
        let errors: String = failed
            .iter()
            .map(|v| format!("\n{}\n\tError: {}", v.config.full_path().display(), v.error))
            .collect();

        let total = validated.len();
        let result = if failed.is_empty() {
            TaskResult::new(
                Status::Success,
                "Successfully parsed config file(s) - See json for full detail",
            )
        } else if failed.len() == total {
            TaskResult::new(
                Status::Failure,
                format!(
                    "Errors parsing the following {} configuration file(s):{}",
                    total, errors
                ),
            )
        } else {
            TaskResult::new(
                Status::Warning,
                format!(
                    "We were able to parse {} of {} configuration file(s).\nErrors parsing the following configuration file(s):{}",
                    total - failed.len(),
                    total,
                    errors
                ),
            )
        };
        result.with_payload(Payload::ValidatedConfigs(validated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::ConfigFile;
    use std::fs;
    use std::path::Path;

    fn collected(paths: &[&Path]) -> Upstream {
        let files = paths.iter().map(|p| ConfigFile::from_path(p)).collect();
        Upstream::new().with(
            COLLECT,
            TaskResult::new(Status::Success, "").with_payload(Payload::ConfigFiles(files)),
        )
    }

    #[test]
    fn skipped_when_collect_did_not_succeed() {
        let upstream = Upstream::new().with(COLLECT, TaskResult::new(Status::Failure, "none"));
        let result = Validate.execute(&TaskOptions::new(), &upstream);
        assert_eq!(result.status, Status::None);
        assert_eq!(
            result.summary,
            "Config file collection was not successful, skipping validation step."
        );
    }

    #[test]
    fn wrong_payload_is_type_mismatch() {
        let upstream = Upstream::new().with(
            COLLECT,
            TaskResult::new(Status::Success, "").with_payload(Payload::Text("?".into())),
        );
        let result = Validate.execute(&TaskOptions::new(), &upstream);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.summary, crate::tasks::TYPE_MISMATCH_SUMMARY);
    }

    #[test]
    fn empty_list_has_nothing_to_do() {
        let result = Validate.execute(&TaskOptions::new(), &collected(&[]));
        assert_eq!(result.status, Status::None);
        assert_eq!(
            result.summary,
            "Task did not meet requirements necessary to run: no configs"
        );
    }

    #[test]
    fn all_files_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let yml = dir.path().join("newrelic.yml");
        let js = dir.path().join("newrelic.js");
        fs::write(&yml, "common:\n  license_key: abc\n").unwrap();
        fs::write(&js, "exports.config = { app_name: ['x'] }").unwrap();

        let result = Validate.execute(&TaskOptions::new(), &collected(&[&yml, &js]));

        assert_eq!(result.status, Status::Success);
        assert_eq!(
            result.summary,
            "Successfully parsed config file(s) - See json for full detail"
        );
        let configs = result.payload.as_validated_configs().unwrap();
        assert_eq!(configs.len(), 2);
        assert!(configs.iter().all(|c| c.status == Status::Success));
        assert_eq!(configs[0].parsed.find_key("license_key")[0].value(), "abc");
    }

    #[test]
    fn some_files_failed() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("newrelic.yml");
        let bad = dir.path().join("newrelic.json");
        fs::write(&good, "log_level: info\n").unwrap();
        fs::write(&bad, "[invalid: {json::here}]").unwrap();

        let result = Validate.execute(&TaskOptions::new(), &collected(&[&good, &bad]));

        assert_eq!(result.status, Status::Warning);
        assert!(result
            .summary
            .starts_with("We were able to parse 1 of 2 configuration file(s).\nErrors parsing the following configuration file(s):\n"));
        assert!(result.summary.contains(&format!("{}\n\tError: ", bad.display())));
    }

    #[test]
    fn every_file_failed() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("newrelic.yml");
        fs::write(&bad, "invalidyaml:\n  [not valid").unwrap();

        let result = Validate.execute(&TaskOptions::new(), &collected(&[&bad]));

        assert_eq!(result.status, Status::Failure);
        assert!(result
            .summary
            .starts_with("Errors parsing the following 1 configuration file(s):\n"));
        let configs = result.payload.as_validated_configs().unwrap();
        assert_eq!(configs[0].status, Status::Failure);
        assert!(!configs[0].error.is_empty());
    }

    #[test]
    fn unsupported_extensions_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("newrelic.toml");
        fs::write(&odd, "x = 1").unwrap();
        let result = Validate.execute(&TaskOptions::new(), &collected(&[&odd]));
        assert_eq!(result.status, Status::None);
    }
}
