//! Environment checks.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::tasks::{Identifier, Payload, RegistryBuilder, Status, Task, TaskOptions, TaskResult, Upstream};

pub const COLLECT_ENV_VARS: &str = "Base/Env/CollectEnvVars";

/// Names of variables worth reporting. Matched case-insensitively.
const DEFAULT_ENV_FILTER: &[&str] = &[
    "NEWRELIC",
    "NEW_RELIC",
    "^NRIA",
    "^PATH$",
    "^HOME$",
    "^RUBY_ENV$",
    "^RAILS_ENV$",
    "^APP_ENV$",
    "^RACK_ENV$",
    "^LOCALAPPDATA$",
    "^DOTNET_SDK_VERSION$",
    "^DOTNET_INSTALL_PATH$",
    "^COR_PROFILER$",
    "^COR_PROFILER_PATH$",
    "^COR_ENABLE_PROFILER$",
    "^CORECLR_ENABLE_PROFILING$",
    "^CORECLR_PROFILER$",
    "^CORECLR_PROFILER_PATH$",
    "^ProgramFiles$",
    "^ProgramData$",
    "^APPDATA$",
    "^JBOSS_HOME$",
    // Azure App Service
    "^WEBSITE_SITE_NAME$",
];

static ENV_FILTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_ENV_FILTER
        .iter()
        .map(|pattern| Regex::new(&format!("(?i){}", pattern)).expect("ENV_FILTERS must compile"))
        .collect()
});

/// Where environment variables come from.
pub trait EnvSource: Send + Sync {
    fn vars(&self) -> Vec<(String, String)>;

    fn var(&self, name: &str) -> Option<String> {
        self.vars()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars().collect()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables.
impl EnvSource for BTreeMap<String, String> {
    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Collects the agent-related subset of the shell environment.
pub struct CollectEnvVars {
    source: Arc<dyn EnvSource>,
    filters: Vec<Regex>,
}

impl CollectEnvVars {
    pub fn new(source: Arc<dyn EnvSource>) -> Self {
        Self {
            source,
            filters: ENV_FILTERS.clone(),
        }
    }

    fn wanted(&self, name: &str) -> bool {
        self.filters.iter().any(|filter| filter.is_match(name))
    }
}

impl Task for CollectEnvVars {
    fn identifier(&self) -> Identifier {
        Identifier::new("Base", "Env", "CollectEnvVars")
    }

    fn explain(&self) -> String {
        "Collect environment variables relevant to New Relic agents".to_string()
    }

    fn execute(&self, _options: &TaskOptions, _upstream: &Upstream) -> TaskResult {
        let vars: BTreeMap<String, String> = self
            .source
            .vars()
            .into_iter()
            .filter(|(name, _)| self.wanted(name))
            .collect();

        TaskResult::new(Status::Info, "Gathered Environment variables of current shell.")
            .with_payload(Payload::EnvVars(vars))
    }
}

pub fn register(builder: &mut RegistryBuilder, source: Arc<dyn EnvSource>) {
    builder.register(CollectEnvVars::new(source), true);
}
