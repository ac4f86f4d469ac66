//! Tool configuration: discovery, layering and schema.
//!
//! Layers are merged in this order, later overriding earlier:
//! 1. User global config (`~/.diagrun/config.yml`)
//! 2. Project config (`.diagrun/config.yml`)
//! 3. Local overrides (`.diagrun/config.local.yml`)
//!
//! # Example
//!
//! ```
//! use diagrun::config::load_merged_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".diagrun");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "settings:\n  workers: 2\n").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! assert_eq!(config.workers(), 2);
//! ```

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{
    load_config, load_config_file, load_config_value, load_merged_config, parse_config,
    ConfigPaths,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{DiagConfig, OverrideConfig, Settings};
