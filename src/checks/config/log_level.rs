//! Agent log level.

use super::validate::VALIDATE;
use crate::tasks::{Identifier, Status, Task, TaskOptions, TaskResult, Upstream};

pub const LOG_LEVEL: &str = "Base/Config/LogLevel";

const CONFIGURE_URL: &str =
    "https://docs.newrelic.com/docs/agents/manage-apm-agents/configuration/configure-agent";

const LEVEL_KEYS: &[&str] = &["log_level", "logging.level"];

pub struct LogLevel;

fn judge(level: &str) -> (Status, String) {
    match level.to_ascii_lowercase().as_str() {
        "finest" | "debug" => (Status::Success, format!("Log level is {}", level)),
        "info" => (
            Status::Warning,
            "Log level is info, you may want to consider updating the log level to finest before uploading logs to support".to_string(),
        ),
        _ => (Status::Info, format!("Log level is {}", level)),
    }
}

impl Task for LogLevel {
    fn identifier(&self) -> Identifier {
        Identifier::new("Base", "Config", "LogLevel")
    }

    fn explain(&self) -> String {
        "Determine New Relic agent logging level".to_string()
    }

    fn dependencies(&self) -> Vec<String> {
        vec![VALIDATE.to_string()]
    }

    fn execute(&self, _options: &TaskOptions, upstream: &Upstream) -> TaskResult {
        let configs: Vec<_> = upstream
            .get(VALIDATE)
            .payload
            .as_validated_configs()
            .unwrap_or_default()
            .iter()
            .filter(|c| c.status == Status::Success)
            .collect();
        if configs.is_empty() {
            return TaskResult::new(
                Status::None,
                "There were no config files to pull the log level from.",
            );
        }

        let mut status = Status::None;
        let mut lines = Vec::new();
        for config in configs {
            let path = config.config.full_path().display().to_string();
            let levels: Vec<_> = LEVEL_KEYS
                .iter()
                .flat_map(|key| config.parsed.find_key(key))
                .filter(|node| node.is_leaf())
                .collect();

            if levels.is_empty() {
                status = status.max(Status::Failure);
                lines.push(format!("Config file {} doesn't contain log_level", path));
                continue;
            }
            for node in levels {
                let (level_status, summary) = judge(&node.value());
                status = status.max(level_status);
                lines.push(format!("{}: {}", path, summary));
            }
        }

        let result = TaskResult::new(status, lines.join("\n"));
        if matches!(status, Status::Warning | Status::Failure) {
            result.with_url(CONFIGURE_URL)
        } else {
            result
        }
    }
}
