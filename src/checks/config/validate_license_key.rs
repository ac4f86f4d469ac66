//! Check license key format and, through a [`LicenseKeyValidator`], the account.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::bail;

use super::license_key::{is_env_source, LICENSE_KEY};
use crate::tasks::{
    Identifier, LicenseKey, Payload, Status, Task, TaskOptions, TaskResult, Upstream,
};

pub const VALIDATE_LICENSE_KEY: &str = "Base/Config/ValidateLicenseKey";

const KEY_LENGTH: usize = 40;

/// Confirms keys against the owning account.
///
/// Returns whether each submitted key is valid. Keys missing from the map
/// were not checked.
pub trait LicenseKeyValidator: Send + Sync {
    fn validate(&self, keys: &[String]) -> anyhow::Result<BTreeMap<String, bool>>;
}

/// A validator for runs without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineValidator;

impl LicenseKeyValidator for OfflineValidator {
    fn validate(&self, _keys: &[String]) -> anyhow::Result<BTreeMap<String, bool>> {
        bail!("account validation is not available in offline mode")
    }
}

pub struct ValidateLicenseKey {
    validator: Arc<dyn LicenseKeyValidator>,
}

impl ValidateLicenseKey {
    pub fn new(validator: Arc<dyn LicenseKeyValidator>) -> Self {
        Self { validator }
    }
}

fn has_quotes_or_spaces(key: &str) -> bool {
    key.contains(['\'', '"', ' '])
}

fn sanitize(key: &str) -> String {
    key.trim().replace(['\'', '"', ' '], "")
}

fn is_well_formed(key: &str) -> bool {
    key.len() == KEY_LENGTH && key.chars().all(|c| c.is_ascii_alphanumeric())
}

fn masked(key: &str) -> String {
    LicenseKey::new(key, "").masked()
}

/// Distinct values with every source they came from. When any key came from
/// the environment only those are checked, since the environment overrides
/// config files.
fn group_by_value(keys: &[LicenseKey]) -> BTreeMap<String, Vec<String>> {
    let from_env = keys.iter().any(|k| is_env_source(&k.source));
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for key in keys.iter().filter(|k| !from_env || is_env_source(&k.source)) {
        grouped
            .entry(key.value.clone())
            .or_default()
            .push(key.source.clone());
    }
    grouped
}

#[derive(Default)]
struct Findings {
    success: String,
    warning: String,
    failure: String,
}

impl Findings {
    fn status(&self) -> Status {
        if !self.failure.is_empty() {
            Status::Failure
        } else if !self.warning.is_empty() {
            Status::Warning
        } else {
            Status::Success
        }
    }
}

impl Task for ValidateLicenseKey {
    fn identifier(&self) -> Identifier {
        Identifier::new("Base", "Config", "ValidateLicenseKey")
    }

    fn explain(&self) -> String {
        "Determine New Relic license key(s) have a proper format and are valid for an account"
            .to_string()
    }

    fn dependencies(&self) -> Vec<String> {
        vec![LICENSE_KEY.to_string()]
    }

    fn execute(&self, _options: &TaskOptions, upstream: &Upstream) -> TaskResult {
        let keys = upstream
            .get(LICENSE_KEY)
            .payload
            .as_license_keys()
            .unwrap_or_default();
        if keys.is_empty() {
            return TaskResult::new(
                Status::None,
                "No New Relic licenses keys were found. Task to validate license key did not run",
            );
        }

        let grouped = group_by_value(keys);
        let mut findings = Findings::default();
        let mut well_formed: BTreeMap<String, String> = BTreeMap::new();

        for (raw, sources) in &grouped {
            let sources = sources.join(",\n ");
            if has_quotes_or_spaces(raw) {
                findings.warning.push_str(&format!(
                    "Using quotes or spaces around the license key in {} may cause inconsistent behavior. We highly recommend removing them.\n\n",
                    sources
                ));
            }
            let key = sanitize(raw);
            if is_well_formed(&key) {
                well_formed.insert(key, sources);
            } else {
                findings.failure.push_str(&format!(
                    "The license key found in {} does not have a valid format: {}. \nThe NR license key is 40 alphanumeric characters.\n\n",
                    sources,
                    masked(&key)
                ));
            }
        }

        let mut validated = Vec::new();
        if !well_formed.is_empty() {
            let submitted: Vec<String> = well_formed.keys().cloned().collect();
            match self.validator.validate(&submitted) {
                Ok(verdicts) => {
                    for (key, sources) in &well_formed {
                        match verdicts.get(key) {
                            Some(true) => {
                                findings.success.push_str(&format!(
                                    "The license key found in {} passed our validation check when verifying against your account:\n {}\n",
                                    sources,
                                    masked(key)
                                ));
                                validated.push(LicenseKey::new(key.clone(), sources.clone()));
                            }
                            Some(false) => findings.failure.push_str(&format!(
                                "The license key found in {} did not pass our validation check when verifying against your account:\n{}\nIf your agent is reporting an 'Invalid license key' log entry, please reach out to New Relic Support.\n\n",
                                sources,
                                masked(key)
                            )),
                            None => findings.warning.push_str(&format!(
                                "The license key found in {} has a valid New Relic format: {}. \nIt was not included in the account validation response.\n\n",
                                sources,
                                masked(key)
                            )),
                        }
                    }
                }
                Err(e) => {
                    for (key, sources) in &well_formed {
                        findings.warning.push_str(&format!(
                            "The license key found in {} has a valid New Relic format: {}. \nThough we ran into an error ({}) while trying to validate against your account. Only if your agent is reporting an 'Invalid license key' log entry, reach out to New Relic Support.\n\n",
                            sources,
                            masked(key),
                            e
                        ));
                        validated.push(LicenseKey::new(key.clone(), sources.clone()));
                    }
                }
            }
        }

        let mut result = TaskResult::new(
            findings.status(),
            format!(
                "We validated {} license key(s):\n{}{}{}",
                grouped.len(),
                findings.success,
                findings.failure,
                findings.warning
            ),
        );
        if !validated.is_empty() {
            result = result.with_payload(Payload::LicenseKeys(validated));
        }
        result
    }
}
