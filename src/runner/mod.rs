//! Task execution orchestration.
//!
//! - [`dependency`] - the typed dependency graph
//! - [`scheduler`] - dependency-ordered, bounded-concurrency execution
//! - [`store`] - the write-once result store
//! - [`overrides`] - task options and result overrides

pub mod dependency;
pub mod overrides;
pub mod scheduler;
pub mod store;

pub use dependency::{DependencyGraph, DependencyGraphBuilder};
pub use overrides::{override_result, OptionSet, OptionSpec, PAYLOAD_KEY, STATUS_KEY};
pub use scheduler::{RunPlan, RunProgress, Scheduler, DEFAULT_WORKERS};
pub use store::{ResultStore, TaskRecord};
