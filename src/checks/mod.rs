//! Built-in diagnostic checks.

pub mod config;
pub mod env;

use std::path::PathBuf;
use std::sync::Arc;

use crate::tasks::RegistryBuilder;

pub use config::{LicenseKeyValidator, OfflineValidator};
pub use env::{EnvSource, ProcessEnv};

/// What the checks need from the outside world.
#[derive(Clone)]
pub struct CheckContext {
    /// Directory searched for config files.
    pub project_root: PathBuf,
    pub env: Arc<dyn EnvSource>,
    pub validator: Arc<dyn LicenseKeyValidator>,
}

impl CheckContext {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            env: Arc::new(ProcessEnv),
            validator: Arc::new(OfflineValidator),
        }
    }

    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn LicenseKeyValidator>) -> Self {
        self.validator = validator;
        self
    }
}

impl Default for CheckContext {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Register every built-in check against the current directory and process
/// environment.
pub fn register_all(builder: &mut RegistryBuilder) {
    register_all_with(builder, &CheckContext::default());
}

pub fn register_all_with(builder: &mut RegistryBuilder, ctx: &CheckContext) {
    env::register(builder, ctx.env.clone());
    config::register(builder, ctx);
}
