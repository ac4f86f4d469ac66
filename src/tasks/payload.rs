//! Typed payloads exchanged between tasks.
//!
//! A dependent pattern-matches on [`Payload`] through the typed accessors
//! instead of downcasting; `None` from an accessor means the upstream task
//! produced something else.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::normalize::ValidateBlob;
use crate::tasks::Status;

/// Data attached to a [`TaskResult`](crate::tasks::TaskResult).
///
/// Serialized untagged, so the report shows the inner data directly.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Payload {
    #[default]
    None,
    /// Free text, e.g. a payload set by override.
    Text(String),
    /// Filtered environment variables. License keys are masked on export.
    EnvVars(#[serde(serialize_with = "serialize_env_vars")] BTreeMap<String, String>),
    /// Config files found on disk, not yet parsed.
    ConfigFiles(Vec<ConfigFile>),
    /// Config files after normalization.
    ValidatedConfigs(Vec<ValidatedConfig>),
    LicenseKeys(Vec<LicenseKey>),
    AppNames(Vec<AppName>),
}

impl Payload {
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_env_vars(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Payload::EnvVars(vars) => Some(vars),
            _ => None,
        }
    }

    pub fn as_config_files(&self) -> Option<&[ConfigFile]> {
        match self {
            Payload::ConfigFiles(files) => Some(files),
            _ => None,
        }
    }

    pub fn as_validated_configs(&self) -> Option<&[ValidatedConfig]> {
        match self {
            Payload::ValidatedConfigs(configs) => Some(configs),
            _ => None,
        }
    }

    pub fn as_license_keys(&self) -> Option<&[LicenseKey]> {
        match self {
            Payload::LicenseKeys(keys) => Some(keys),
            _ => None,
        }
    }

    pub fn as_app_names(&self) -> Option<&[AppName]> {
        match self {
            Payload::AppNames(names) => Some(names),
            _ => None,
        }
    }
}

fn serialize_env_vars<S: Serializer>(
    vars: &BTreeMap<String, String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(vars.len()))?;
    for (name, value) in vars {
        if name.contains("LICENSE_KEY") {
            map.serialize_entry(name, &LicenseKey::new(value.as_str(), name.as_str()).masked())?;
        } else {
            map.serialize_entry(name, value)?;
        }
    }
    map.end()
}

/// A config file located on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigFile {
    pub file_name: String,
    /// Directory containing the file.
    pub file_path: PathBuf,
}

impl ConfigFile {
    /// Split a full path into directory and file name.
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_path = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            file_name,
            file_path,
        }
    }

    pub fn full_path(&self) -> PathBuf {
        self.file_path.join(&self.file_name)
    }
}

/// One config file after a parse attempt.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub config: ConfigFile,
    pub status: Status,
    /// The canonical tree; empty when parsing failed.
    pub parsed: ValidateBlob,
    /// Parser error text, empty on success.
    pub error: String,
}

// The parsed tree holds raw config contents, so it stays out of exports.
impl Serialize for ValidatedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidatedConfig", 3)?;
        state.serialize_field("Config", &self.config)?;
        state.serialize_field("Status", &self.status)?;
        state.serialize_field("Error", &self.error)?;
        state.end()
    }
}

/// A license key and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseKey {
    pub value: String,
    /// File path or environment variable name.
    pub source: String,
}

impl LicenseKey {
    pub fn new(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: source.into(),
        }
    }

    /// The key with everything after the first four characters masked.
    pub fn masked(&self) -> String {
        let visible: String = self.value.chars().take(4).collect();
        let hidden = self.value.chars().count().saturating_sub(4);
        format!("{}{}", visible, "*".repeat(hidden))
    }
}

impl Serialize for LicenseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LicenseKey", 2)?;
        state.serialize_field("Value", &self.masked())?;
        state.serialize_field("Source", &self.source)?;
        state.end()
    }
}

/// An application name and where it was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppName {
    pub name: String,
    pub file_path: String,
}

/// A file the run wants included alongside its report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileRef {
    pub path: PathBuf,
}

impl FileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
