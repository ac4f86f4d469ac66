//! Command-line interface for diagrun.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ExplainArgs, ListArgs, ParseArgs, RunArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
