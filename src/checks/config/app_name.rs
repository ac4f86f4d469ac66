//! Report application names and flag agent defaults.

use super::validate::VALIDATE;
use crate::checks::env::COLLECT_ENV_VARS;
use crate::normalize::ValidateBlob;
use crate::tasks::{
    AppName, Identifier, Payload, Status, Task, TaskOptions, TaskResult, Upstream,
};

pub const APP_NAME: &str = "Base/Config/AppName";

const APP_NAME_ENV_VAR: &str = "NEW_RELIC_APP_NAME";

const NAMING_URL: &str =
    "https://docs.newrelic.com/docs/agents/manage-apm-agents/app-naming/name-your-application";

/// Keys tried in order; the first one present in a file is used.
const CONFIG_KEYS: &[&str] = &[
    "app_name",
    "newrelic.appname",
    "AppName",
    "NewRelic.AppName",
    "name",
];

/// Names the agents ship with in their sample configs.
const DEFAULT_NAMES: &[&str] = &[
    "PHP Application",
    "Python Application",
    "Python Application (Development)",
    "Python Application (Staging)",
    "My Application",
    "My Application (Development)",
    "My Application (Test)",
    "My Application (Staging)",
];

pub struct AppNameCheck {
    config_keys: Vec<String>,
    default_names: Vec<String>,
}

impl Default for AppNameCheck {
    fn default() -> Self {
        Self {
            config_keys: CONFIG_KEYS.iter().map(|k| k.to_string()).collect(),
            default_names: DEFAULT_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl AppNameCheck {
    fn first_match<'a>(&self, tree: &'a ValidateBlob) -> Option<&'a ValidateBlob> {
        self.config_keys
            .iter()
            .find_map(|key| tree.find_key(key).into_iter().next())
    }

    fn is_default(&self, name: &str) -> bool {
        self.default_names.iter().any(|d| d == name)
    }
}

impl Task for AppNameCheck {
    fn identifier(&self) -> Identifier {
        Identifier::new("Base", "Config", "AppName")
    }

    fn explain(&self) -> String {
        "Check for default application names in New Relic agent configuration".to_string()
    }

    fn dependencies(&self) -> Vec<String> {
        vec![VALIDATE.to_string(), COLLECT_ENV_VARS.to_string()]
    }

    fn execute(&self, _options: &TaskOptions, upstream: &Upstream) -> TaskResult {
        let from_env = upstream
            .get(COLLECT_ENV_VARS)
            .payload
            .as_env_vars()
            .and_then(|vars| vars.get(APP_NAME_ENV_VAR))
            .filter(|name| !name.is_empty());
        if let Some(name) = from_env {
            return TaskResult::new(
                Status::Success,
                format!(
                    "A unique application name was found through the New Relic App name environment variable: {}",
                    name
                ),
            )
            .with_payload(Payload::AppNames(vec![AppName {
                name: name.clone(),
                file_path: APP_NAME_ENV_VAR.to_string(),
            }]));
        }

        let validated = upstream.get(VALIDATE);
        if !matches!(validated.status, Status::Success | Status::Warning) {
            return TaskResult::new(
                Status::None,
                "Task did not meet requirements necessary to run: no validated config files to check",
            );
        }
        let Some(configs) = validated.payload.as_validated_configs() else {
            return TaskResult::type_mismatch();
        };

        let mut names = Vec::new();
        for config in configs {
            let Some(node) = self.first_match(&config.parsed) else {
                continue;
            };
            let file_path = config.config.full_path().display().to_string();
            if node.is_leaf() {
                let name = node.value();
                if !name.is_empty() {
                    names.push(AppName { name, file_path });
                }
            } else {
                names.extend(node.children.iter().map(|child| AppName {
                    name: child.value(),
                    file_path: file_path.clone(),
                }));
            }
        }

        if names.is_empty() {
            return TaskResult::new(
                Status::Warning,
                "No New Relic app names were found. Please ensure an app name is set in your New Relic agent configuration file or as a New Relic environment variable (NEW_RELIC_APP_NAME).",
            )
            .with_url(NAMING_URL);
        }

        let defaults: String = names
            .iter()
            .filter(|n| self.is_default(&n.name))
            .map(|n| format!("\n\t\"{}\" as specified in {}", n.name, n.file_path))
            .collect();
        if !defaults.is_empty() {
            return TaskResult::new(
                Status::Warning,
                format!(
                    "One or more of your applications is using a default appname: {}\nMultiple applications with the same default appname will all report to the same source. Consider changing to a unique appname and review the recommended documentation",
                    defaults
                ),
            )
            .with_url(NAMING_URL)
            .with_payload(Payload::AppNames(names));
        }

        TaskResult::new(
            Status::Success,
            format!("{} unique application name(s) found.", names.len()),
        )
        .with_payload(Payload::AppNames(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{self, ConfigFormat};
    use crate::tasks::{ConfigFile, ValidatedConfig};
    use std::collections::BTreeMap;
    use std::path::Path;

    fn validated(path: &str, content: &str) -> ValidatedConfig {
        let format = ConfigFormat::from_path(Path::new(path)).unwrap();
        ValidatedConfig {
            config: ConfigFile::from_path(Path::new(path)),
            status: Status::Success,
            parsed: normalize::parse(format, content.as_bytes()).unwrap(),
            error: String::new(),
        }
    }

    fn upstream(status: Status, configs: Vec<ValidatedConfig>, env: &[(&str, &str)]) -> Upstream {
        let vars: BTreeMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Upstream::new()
            .with(
                VALIDATE,
                TaskResult::new(status, "").with_payload(Payload::ValidatedConfigs(configs)),
            )
            .with(
                COLLECT_ENV_VARS,
                TaskResult::new(Status::Info, "").with_payload(Payload::EnvVars(vars)),
            )
    }

    fn run(upstream: &Upstream) -> TaskResult {
        AppNameCheck::default().execute(&TaskOptions::new(), upstream)
    }

    #[test]
    fn env_var_wins() {
        let result = run(&upstream(
            Status::Success,
            vec![validated("/app/newrelic.yml", "app_name: My Application\n")],
            &[("NEW_RELIC_APP_NAME", "checkout")],
        ));
        assert_eq!(result.status, Status::Success);
        assert!(result.summary.ends_with("environment variable: checkout"));
    }

    #[test]
    fn unique_names_succeed() {
        let result = run(&upstream(
            Status::Success,
            vec![
                validated("/app/newrelic.yml", "common:\n  app_name: checkout\n"),
                validated("/php/newrelic.ini", "newrelic.appname = \"billing\"\n"),
            ],
            &[],
        ));
        assert_eq!(result.status, Status::Success);
        assert_eq!(result.summary, "2 unique application name(s) found.");
    }

    #[test]
    fn default_name_warns() {
        let result = run(&upstream(
            Status::Warning,
            vec![validated(
                "/app/newrelic.yml",
                "common:\n  app_name: My Application\n",
            )],
            &[],
        ));
        assert_eq!(result.status, Status::Warning);
        assert!(result
            .summary
            .starts_with("One or more of your applications is using a default appname: "));
        assert!(result.summary.contains("\"My Application\" as specified in /app/newrelic.yml"));
    }

    #[test]
    fn array_names_contribute_each_element() {
        let result = run(&upstream(
            Status::Success,
            vec![validated(
                "/node/newrelic.js",
                "exports.config = { app_name: ['web', 'worker'] }",
            )],
            &[],
        ));
        assert_eq!(result.summary, "2 unique application name(s) found.");
        let names: Vec<_> = result
            .payload
            .as_app_names()
            .unwrap()
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["web", "worker"]);
    }

    #[test]
    fn no_names_warns() {
        let result = run(&upstream(
            Status::Success,
            vec![validated("/app/newrelic.yml", "log_level: info\n")],
            &[],
        ));
        assert_eq!(result.status, Status::Warning);
        assert!(result.summary.starts_with("No New Relic app names were found."));
    }

    #[test]
    fn failed_validation_does_not_run() {
        let result = run(&upstream(Status::Failure, vec![], &[]));
        assert_eq!(result.status, Status::None);
        assert_eq!(
            result.summary,
            "Task did not meet requirements necessary to run: no validated config files to check"
        );
    }
}
