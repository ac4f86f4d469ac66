//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::merger::merge_configs;
use crate::config::schema::DiagConfig;
use crate::error::{DiagError, Result};

const CONFIG_DIR: &str = ".diagrun";

/// Config files in merge order (later overrides earlier).
///
/// 1. User global config (`~/.diagrun/config.yml`)
/// 2. Project config (`.diagrun/config.yml`)
/// 3. Local overrides (`.diagrun/config.local.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub user_global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: dirs::home_dir()
                .and_then(|home| existing(home.join(CONFIG_DIR).join("config.yml"))),
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Existing paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.all_existing().is_empty()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DiagError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DiagError::Io(e)
        }
    })
}

/// Parse YAML content; `source_path` is only used in errors.
pub fn parse_config(content: &str, source_path: &Path) -> Result<DiagConfig> {
    if content.trim().is_empty() {
        return Ok(DiagConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| DiagError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load exactly one file.
pub fn load_config_file(path: &Path) -> Result<DiagConfig> {
    parse_config(&read(path)?, path)
}

/// Load a file as a raw value for merging. An empty file is an empty mapping.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = read(path)?;
    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }
    serde_yaml::from_str(&content).map_err(|e| DiagError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Discover and merge every layer. No layers at all yields the defaults.
pub fn load_merged_config(project_root: &Path) -> Result<DiagConfig> {
    let paths = ConfigPaths::discover(project_root);
    load_layers(&paths, project_root)
}

fn load_layers(paths: &ConfigPaths, project_root: &Path) -> Result<DiagConfig> {
    let existing = paths.all_existing();
    if existing.is_empty() {
        tracing::debug!("No configuration found; using defaults");
        return Ok(DiagConfig::default());
    }

    let layers = existing
        .iter()
        .map(|path| {
            tracing::debug!("Loading config layer {}", path.display());
            load_config_value(path)
        })
        .collect::<Result<Vec<_>>>()?;

    serde_yaml::from_value(merge_configs(&layers)).map_err(|e| DiagError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join("config.yml"),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load `config_override` alone when given, otherwise merge the layers.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<DiagConfig> {
    match config_override {
        Some(path) => load_config_file(path),
        None => load_merged_config(project_root),
    }
}
