//! Locate agent config files on disk.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::checks::env::COLLECT_ENV_VARS;
use crate::tasks::{
    ConfigFile, FileRef, Identifier, Payload, Status, Task, TaskOptions, TaskResult, Upstream,
};

pub const COLLECT: &str = "Base/Config/Collect";

/// Option naming one config file to use instead of searching.
pub const CONFIG_FILE_OPTION: &str = "config_file";
/// Option with extra comma-separated directories to search.
pub const SEARCH_PATHS_OPTION: &str = "search_paths";

const MAX_DEPTH: usize = 12;

static FILE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^newrelic\.yml$",
        r"^newrelic\.xml$",
        r"^(?i)newrelic\.config$",
        r"^newrelic\.js$",
        r"^newrelic\.cfg$",
        r"^newrelic\.ini$",
        r"^newrelic\.properties$",
        r"^newrelic\.json$",
        r"^newrelic-infra\.yml$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("FILE_PATTERNS must compile"))
    .collect()
});

/// Environment variables agents read their config location from.
const CONFIG_ENV_VARS: &[&str] = &[
    "NEW_RELIC_HOME",
    "NEW_RELIC_CONFIG_FILE",
    "NEW_RELIC_CONFIG_PATH",
    "NRIA_CONFIG_FILE",
    "NEWRELIC_INSTALL_PATH",
    "CORECLR_NEWRELIC_HOME",
];

const SKIPPED_DIRS: &[&str] = &["node_modules"];

pub struct Collect {
    root: PathBuf,
    patterns: Vec<Regex>,
}

impl Collect {
    /// Search `root` (the project directory) by default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            patterns: FILE_PATTERNS.clone(),
        }
    }

    fn is_config_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn walk(&self, dir: &Path, depth: usize, found: &mut BTreeSet<PathBuf>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read {}: {}", dir.display(), e);
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_str()) {
                    continue;
                }
                if depth < MAX_DEPTH {
                    self.walk(&entry.path(), depth + 1, found);
                }
            } else if self.is_config_name(&name) {
                found.insert(entry.path());
            }
        }
    }

    fn explicit_file(&self, raw: &str) -> TaskResult {
        let path = self.resolve(raw);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => found_result(BTreeSet::from([path]), Vec::new()),
            Ok(_) => TaskResult::error(format!(
                "The path provided to the config file is not valid: {} is not a file",
                path.display()
            )),
            Err(e) => TaskResult::error(format!(
                "The path provided to the config file is not valid: {}: {}",
                path.display(),
                e
            )),
        }
    }
}

impl Task for Collect {
    fn identifier(&self) -> Identifier {
        Identifier::new("Base", "Config", "Collect")
    }

    fn explain(&self) -> String {
        "Collect New Relic configuration files".to_string()
    }

    fn dependencies(&self) -> Vec<String> {
        vec![COLLECT_ENV_VARS.to_string()]
    }

    fn execute(&self, options: &TaskOptions, upstream: &Upstream) -> TaskResult {
        if let Some(raw) = options.get(CONFIG_FILE_OPTION).filter(|v| !v.trim().is_empty()) {
            debug!("Config file given explicitly: {}", raw);
            return self.explicit_file(raw);
        }

        let mut search: Vec<PathBuf> = options
            .get(SEARCH_PATHS_OPTION)
            .map(|paths| {
                paths
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(|p| self.resolve(p))
                    .collect()
            })
            .unwrap_or_default();
        search.push(self.root.clone());

        let mut found = BTreeSet::new();
        let mut invalid = Vec::new();

        if let Some(vars) = upstream.get(COLLECT_ENV_VARS).payload.as_env_vars() {
            for name in CONFIG_ENV_VARS {
                let Some(value) = vars.get(*name) else {
                    continue;
                };
                let path = self.resolve(value);
                if path.is_dir() {
                    search.push(path);
                } else if path.is_file() {
                    found.insert(path);
                } else {
                    invalid.push(format!("{} ({})", path.display(), name));
                }
            }
        }

        for dir in &search {
            debug!("Searching {} for config files", dir.display());
            self.walk(dir, 0, &mut found);
        }

        if found.is_empty() {
            if !invalid.is_empty() {
                return TaskResult::new(
                    Status::Warning,
                    format!(
                        "Could not collect New Relic config files from the following paths:\n{}",
                        invalid.join("\n")
                    ),
                );
            }
            return TaskResult::new(Status::Failure, "New Relic configuration files were not found");
        }
        found_result(found, invalid)
    }
}

fn found_result(found: BTreeSet<PathBuf>, invalid: Vec<String>) -> TaskResult {
    let files: Vec<ConfigFile> = found.iter().map(|p| ConfigFile::from_path(p)).collect();
    let copies = found.into_iter().map(FileRef::new).collect();

    let mut summary = format!("There were {} file(s) found", files.len());
    if !invalid.is_empty() {
        summary.push_str("\nThe following paths could not be collected:\n");
        summary.push_str(&invalid.join("\n"));
    }

    TaskResult::new(Status::Success, summary)
        .with_payload(Payload::ConfigFiles(files))
        .with_files(copies)
}
