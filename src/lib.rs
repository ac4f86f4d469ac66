//! diagrun - dependency-ordered diagnostics for agent configuration.
//!
//! Diagnostic tasks declare the tasks they depend on; the scheduler runs
//! them in dependency order on a small worker pool, hands each task the
//! results of its upstream tasks, and collects everything into a JSON
//! report. Config files in YAML, XML, JSON, JavaScript and INI are all
//! normalized into one canonical tree so checks can search them uniformly.
//!
//! # Modules
//!
//! - [`checks`] - The built-in `Base/...` diagnostic tasks
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Tool configuration loading and merging
//! - [`error`] - Error types and result aliases
//! - [`normalize`] - Config file parsers and the canonical tree
//! - [`report`] - The JSON run report
//! - [`runner`] - Dependency graph, scheduler and result store
//! - [`tasks`] - Task contract, identifiers, results and the registry
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use diagrun::normalize::{parse, ConfigFormat};
//!
//! let tree = parse(ConfigFormat::Yaml, "common:\n  app_name: shop\n".as_bytes()).unwrap();
//! let found = tree.find_key("app_name");
//! assert_eq!(found[0].value(), "shop");
//! assert_eq!(found[0].path, "/common");
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod normalize;
pub mod report;
pub mod runner;
pub mod tasks;
pub mod ui;

pub use error::{DiagError, Result};
