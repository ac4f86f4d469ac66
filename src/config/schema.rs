//! Tool configuration schema.
//!
//! Maps `.diagrun/config.yml` (and its layers) onto typed structs. Every
//! field has a default, so an empty or missing file is a valid config.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::report::DEFAULT_REPORT_PATH;
use crate::runner::DEFAULT_WORKERS;
use crate::ui::OutputMode;

/// Root of the tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagConfig {
    pub settings: Settings,

    /// Default task selection for `run` without `--tasks`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<String>,

    /// Extra suites, by name. A name matching a built-in suite replaces it.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub suites: BTreeMap<String, Vec<String>>,

    /// Options every task receives.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,

    /// Task-scoped options, including `Status`/`Payload` overrides.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideConfig>,

    /// Agent config file handed to `Base/Config/Collect`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,

    /// Extra directories `Base/Config/Collect` walks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Worker pool size.
    pub workers: usize,

    pub default_output: OutputMode,

    /// Where `run` writes its JSON report.
    pub report: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            default_output: OutputMode::Normal,
            report: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

/// One `{ task, key, value }` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideConfig {
    pub task: String,
    pub key: String,
    pub value: String,
}

impl OverrideConfig {
    /// The `Identifier.key=value` form accepted on the command line.
    pub fn to_option_string(&self) -> String {
        format!("{}.{}={}", self.task.trim(), self.key.trim(), self.value)
    }
}

impl DiagConfig {
    /// Worker count, never below one.
    pub fn workers(&self) -> usize {
        self.settings.workers.max(1)
    }
}
