//! The task contract shared by the scheduler and every check.
//!
//! A [`Task`] names itself with an [`Identifier`], declares the identifiers it
//! depends on, and turns options plus its dependencies' results into a
//! [`TaskResult`]. Tasks are registered once at startup into a
//! [`TaskRegistry`] and never mutated afterwards.

pub mod identifier;
pub mod options;
pub mod payload;
pub mod registry;
pub mod result;
pub mod status;
pub mod suites;

pub use identifier::Identifier;
pub use options::{TaskOptions, Upstream};
pub use payload::{AppName, ConfigFile, FileRef, LicenseKey, Payload, ValidatedConfig};
pub use registry::{Dependency, RegisteredTask, RegistryBuilder, TaskRegistry};
pub use result::{TaskResult, TYPE_MISMATCH_SUMMARY};
pub use status::Status;
pub use suites::SuiteCatalog;

/// A unit of diagnostic work.
///
/// `execute` runs to completion synchronously; the scheduler may call
/// different tasks from different threads, hence `Send + Sync`.
pub trait Task: Send + Sync {
    /// The task's `Category/Subcategory/Name`.
    fn identifier(&self) -> Identifier;

    /// One-line help text.
    fn explain(&self) -> String;

    /// Identifier strings of the tasks whose results this task reads.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Run the check.
    fn execute(&self, options: &TaskOptions, upstream: &Upstream) -> TaskResult;
}
