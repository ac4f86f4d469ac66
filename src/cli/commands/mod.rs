//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed to by
//! [`CommandDispatcher`], which loads the tool configuration once for all of
//! them.

pub mod dispatcher;
pub mod explain;
pub mod list;
pub mod parse;
pub mod run;
pub mod suites;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, EXIT_DEFECT, EXIT_PROBLEMS};

use crate::checks::{self, CheckContext};
use crate::error::Result;
use crate::tasks::TaskRegistry;

/// Build the registry of built-in checks.
pub fn build_registry(ctx: &CheckContext) -> Result<TaskRegistry> {
    let mut builder = TaskRegistry::builder();
    checks::register_all_with(&mut builder, ctx);
    builder.build()
}
