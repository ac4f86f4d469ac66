//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::checks::CheckContext;
use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{load_config, DiagConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Exit code when a task ended in `Failure` or `Error`.
pub const EXIT_PROBLEMS: i32 = 1;
/// Exit code for a dependency cycle, bad selector or bad configuration.
pub const EXIT_DEFECT: i32 = 2;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    /// Set when `--verbose` or `--quiet` was given, so the configured
    /// default output does not apply.
    explicit_output: bool,
}

impl CommandDispatcher {
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_override: None,
            explicit_output: false,
        }
    }

    /// Load exactly this config file instead of discovering layers.
    pub fn with_config(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    pub fn with_explicit_output(mut self, explicit: bool) -> Self {
        self.explicit_output = explicit;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load configuration and execute the requested command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match load_config(&self.project_root, self.config_override.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_DEFECT));
            }
        };
        if !self.explicit_output {
            ui.set_output_mode(config.settings.default_output);
        }
        self.dispatch_with(cli, config, ui)
    }

    fn dispatch_with(
        &self,
        cli: &Cli,
        config: DiagConfig,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let ctx = CheckContext::new(&self.project_root);
        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(ctx, config, args.clone()).execute(ui)
            }
            Some(Commands::List(args)) => {
                super::list::ListCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Explain(args)) => {
                super::explain::ExplainCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Suites) => super::suites::SuitesCommand::new(config).execute(ui),
            Some(Commands::Parse(args)) => super::parse::ParseCommand::new(args.clone()).execute(ui),
            None => super::run::RunCommand::new(ctx, config, RunArgs::default()).execute(ui),
        }
    }
}
