//! Agent configuration checks.
//!
//! `Collect` finds config files, `Validate` normalizes each one into a
//! [`ValidateBlob`](crate::normalize::ValidateBlob) tree, and the remaining
//! checks query those trees.

pub mod app_name;
pub mod collect;
pub mod license_key;
pub mod log_level;
pub mod validate;
pub mod validate_license_key;

pub use app_name::{AppNameCheck, APP_NAME};
pub use collect::{Collect, COLLECT, CONFIG_FILE_OPTION, SEARCH_PATHS_OPTION};
pub use license_key::{LicenseKeyCheck, LICENSE_KEY, LICENSE_KEY_ENV_VARS};
pub use log_level::{LogLevel, LOG_LEVEL};
pub use validate::{Validate, VALIDATE};
pub use validate_license_key::{
    LicenseKeyValidator, OfflineValidator, ValidateLicenseKey, VALIDATE_LICENSE_KEY,
};

use super::CheckContext;
use crate::tasks::RegistryBuilder;

/// Register the config checks. Account validation needs a live validator,
/// so it only runs when selected.
pub fn register(builder: &mut RegistryBuilder, ctx: &CheckContext) {
    builder
        .register(Collect::new(ctx.project_root.clone()), true)
        .register(Validate, true)
        .register(LicenseKeyCheck::new(ctx.env.clone()), true)
        .register(ValidateLicenseKey::new(ctx.validator.clone()), false)
        .register(AppNameCheck::default(), true)
        .register(LogLevel, true);
}
