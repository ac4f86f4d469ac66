//! Find the license keys an agent would use.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use super::validate::VALIDATE;
use crate::checks::env::{EnvSource, COLLECT_ENV_VARS};
use crate::tasks::{
    Identifier, LicenseKey, Payload, Status, Task, TaskOptions, TaskResult, Upstream,
};

pub const LICENSE_KEY: &str = "Base/Config/LicenseKey";

const CONFIG_KEYS: &[&str] = &["license_key", "licenseKey", "-licenseKey", "newrelic.license"];

/// Environment variables that carry a license key.
pub const LICENSE_KEY_ENV_VARS: &[&str] = &["NRIA_LICENSE_KEY", "NEW_RELIC_LICENSE_KEY"];

const CONFIGURE_URL: &str =
    "https://docs.newrelic.com/docs/using-new-relic/cross-product-functions/install-configure/configure-agent";

static RUBY_ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ENV\[["']([^'"]+)["']\]"#).expect("RUBY_ENV_REF must compile"));
static NODE_ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"process\.env\.([A-Za-z0-9_]+)").expect("NODE_ENV_REF must compile"));

pub struct LicenseKeyCheck {
    env: Arc<dyn EnvSource>,
    config_keys: Vec<String>,
}

impl LicenseKeyCheck {
    /// `env` resolves config values such as `process.env.NEW_RELIC_LICENSE_KEY`.
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self {
            env,
            config_keys: CONFIG_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn from_configs(&self, upstream: &Upstream) -> Vec<LicenseKey> {
        let Some(configs) = upstream.get(VALIDATE).payload.as_validated_configs() else {
            return Vec::new();
        };

        let mut keys = Vec::new();
        for name in &self.config_keys {
            for config in configs {
                let source = config.config.full_path().display().to_string();
                let mut seen = Vec::new();
                for node in config.parsed.find_key(name) {
                    let mut value = node.value();
                    if name == "-licenseKey" {
                        if let Some(sibling) = config
                            .parsed
                            .find_key_by_path(&format!("{}/-value", node.path))
                        {
                            value = sibling.value();
                        }
                    }
                    if value.is_empty() || seen.contains(&value) {
                        continue;
                    }
                    seen.push(value.clone());

                    match self.resolve_reference(&value) {
                        Reference::Literal => keys.push(LicenseKey::new(value, source.clone())),
                        Reference::Resolved(resolved) => {
                            keys.push(LicenseKey::new(resolved, source.clone()))
                        }
                        Reference::Unresolved(var) => {
                            debug!("License key in {} refers to unset variable {}", source, var)
                        }
                    }
                }
            }
        }
        keys
    }

    fn resolve_reference(&self, value: &str) -> Reference {
        let captured = RUBY_ENV_REF
            .captures(value)
            .or_else(|| NODE_ENV_REF.captures(value))
            .map(|caps| caps[1].to_string());
        match captured {
            None => Reference::Literal,
            Some(var) => match self.env.var(&var).filter(|v| !v.is_empty()) {
                Some(resolved) => Reference::Resolved(resolved),
                None => Reference::Unresolved(var),
            },
        }
    }
}

enum Reference {
    Literal,
    Resolved(String),
    Unresolved(String),
}

fn from_env(upstream: &Upstream) -> Vec<LicenseKey> {
    let Some(vars) = upstream.get(COLLECT_ENV_VARS).payload.as_env_vars() else {
        return Vec::new();
    };
    LICENSE_KEY_ENV_VARS
        .iter()
        .filter_map(|name| vars.get(*name).map(|value| LicenseKey::new(value.clone(), *name)))
        .collect()
}

pub(crate) fn is_env_source(source: &str) -> bool {
    LICENSE_KEY_ENV_VARS.contains(&source)
}

/// One entry per distinct value; an environment source wins over a file.
fn dedupe(keys: &[LicenseKey]) -> Vec<LicenseKey> {
    let mut unique: BTreeMap<&str, &LicenseKey> = BTreeMap::new();
    for key in keys {
        match unique.get(key.value.as_str()) {
            Some(_) if !is_env_source(&key.source) => {}
            _ => {
                unique.insert(key.value.as_str(), key);
            }
        }
    }
    unique.into_values().cloned().collect()
}

fn env_override_message(keys: &[LicenseKey]) -> String {
    keys.iter()
        .filter_map(|key| {
            let agent = match key.source.as_str() {
                "NRIA_LICENSE_KEY" => "New Relic Infrastructure Agent",
                "NEW_RELIC_LICENSE_KEY" => "New Relic APM Agents",
                _ => return None,
            };
            Some(format!(
                "\n     '{}' from '{}' will be used by {}",
                key.masked(),
                key.source,
                agent
            ))
        })
        .collect()
}

impl Task for LicenseKeyCheck {
    fn identifier(&self) -> Identifier {
        Identifier::new("Base", "Config", "LicenseKey")
    }

    fn explain(&self) -> String {
        "Determine New Relic license key(s)".to_string()
    }

    fn dependencies(&self) -> Vec<String> {
        vec![VALIDATE.to_string(), COLLECT_ENV_VARS.to_string()]
    }

    fn execute(&self, _options: &TaskOptions, upstream: &Upstream) -> TaskResult {
        let mut keys = self.from_configs(upstream);
        keys.extend(from_env(upstream));

        if keys.is_empty() {
            return TaskResult::new(
                Status::Warning,
                "No New Relic licenses keys were found. Please ensure a license key is set in your New Relic agent configuration or environment.",
            )
            .with_url(CONFIGURE_URL);
        }

        let unique = dedupe(&keys);
        if unique.len() > 1 {
            let sources: String = unique
                .iter()
                .map(|key| format!("     '{}' from '{}'\n", key.masked(), key.source))
                .collect();
            return TaskResult::new(
                Status::Warning,
                format!(
                    "Multiple license keys detected:\n{}{}",
                    sources,
                    env_override_message(&unique)
                ),
            )
            .with_url(CONFIGURE_URL)
            .with_payload(Payload::LicenseKeys(keys));
        }

        TaskResult::new(
            Status::Success,
            format!(
                "{} unique New Relic license key(s) found.{}",
                unique.len(),
                env_override_message(&keys)
            ),
        )
        .with_payload(Payload::LicenseKeys(keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use crate::tasks::{ConfigFile, ValidatedConfig};
    use std::path::Path;

    const KEY_A: &str = "0123456789abcdef0123456789abcdef01234567";
    const KEY_B: &str = "fedcba9876543210fedcba9876543210fedcba98";

    fn validated(path: &str, format: &str, content: &str) -> ValidatedConfig {
        let format = normalize::ConfigFormat::from_extension(format).unwrap();
        ValidatedConfig {
            config: ConfigFile::from_path(Path::new(path)),
            status: Status::Success,
            parsed: normalize::parse(format, content.as_bytes()).unwrap(),
            error: String::new(),
        }
    }

    fn upstream(configs: Vec<ValidatedConfig>, env: &[(&str, &str)]) -> Upstream {
        let vars = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Upstream::new()
            .with(
                VALIDATE,
                TaskResult::new(Status::Success, "").with_payload(Payload::ValidatedConfigs(configs)),
            )
            .with(
                COLLECT_ENV_VARS,
                TaskResult::new(Status::Info, "").with_payload(Payload::EnvVars(vars)),
            )
    }

    fn check(env: &[(&str, &str)]) -> LicenseKeyCheck {
        let vars: BTreeMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LicenseKeyCheck::new(Arc::new(vars))
    }

    #[test]
    fn no_keys_is_a_warning() {
        let result = check(&[]).execute(&TaskOptions::new(), &upstream(vec![], &[]));
        assert_eq!(result.status, Status::Warning);
        assert!(result.summary.starts_with("No New Relic licenses keys were found."));
    }

    #[test]
    fn same_key_across_environments_counts_once() {
        let yml = format!(
            "common:\n  license_key: {KEY_A}\nproduction:\n  license_key: {KEY_A}\n"
        );
        let configs = vec![validated("/app/newrelic.yml", "yml", &yml)];
        let result = check(&[]).execute(&TaskOptions::new(), &upstream(configs, &[]));

        assert_eq!(result.status, Status::Success);
        assert_eq!(result.summary, "1 unique New Relic license key(s) found.");
        let keys = result.payload.as_license_keys().unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].source, "/app/newrelic.yml");
    }

    #[test]
    fn env_key_matching_file_key_mentions_override() {
        let js = format!("exports.config = {{ license_key: '{KEY_A}' }}");
        let configs = vec![validated("/app/newrelic.js", "js", &js)];
        let env = [("NEW_RELIC_LICENSE_KEY", KEY_A)];
        let result = check(&[]).execute(&TaskOptions::new(), &upstream(configs, &env));

        assert_eq!(result.status, Status::Success);
        assert!(result
            .summary
            .starts_with("1 unique New Relic license key(s) found.\n     '0123"));
        assert!(result.summary.contains("will be used by New Relic APM Agents"));
        assert!(!result.summary.contains(KEY_A));
    }

    #[test]
    fn distinct_keys_are_a_warning() {
        let ini = format!("newrelic.license = \"{KEY_B}\"\n");
        let configs = vec![
            validated("/etc/php/newrelic.ini", "ini", &ini),
            validated("/app/newrelic.yml", "yml", &format!("license_key: {KEY_A}\n")),
        ];
        let result = check(&[]).execute(&TaskOptions::new(), &upstream(configs, &[]));

        assert_eq!(result.status, Status::Warning);
        assert!(result.summary.starts_with("Multiple license keys detected:\n"));
        assert!(result.summary.contains("/etc/php/newrelic.ini"));
        assert_eq!(result.payload.as_license_keys().unwrap().len(), 2);
    }

    #[test]
    fn dash_license_key_prefers_value_sibling() {
        let json = format!(r#"{{"settings": {{"-licenseKey": "", "-value": "{KEY_A}"}}}}"#);
        let configs = vec![validated("/app/newrelic.json", "json", &json)];
        let result = check(&[]).execute(&TaskOptions::new(), &upstream(configs, &[]));

        let keys = result.payload.as_license_keys().unwrap();
        assert_eq!(keys[0].value, KEY_A);
    }

    #[test]
    fn env_references_are_resolved() {
        let js = "exports.config = { license_key: process.env.MY_KEY }";
        let configs = vec![validated("/app/newrelic.js", "js", js)];
        let result =
            check(&[("MY_KEY", KEY_B)]).execute(&TaskOptions::new(), &upstream(configs, &[]));

        let keys = result.payload.as_license_keys().unwrap();
        assert_eq!(keys[0].value, KEY_B);
    }

    #[test]
    fn unresolved_env_references_are_dropped() {
        let yml = "license_key: <%= ENV['MISSING_KEY'] %>\n";
        let configs = vec![validated("/app/newrelic.yml", "yml", yml)];
        let result = check(&[]).execute(&TaskOptions::new(), &upstream(configs, &[]));
        assert_eq!(result.status, Status::Warning);
        assert!(result.payload.is_none());
    }
}
