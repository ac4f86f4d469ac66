//! Run command implementation.
//!
//! The `diagrun run` command resolves the task selection, runs it through the
//! scheduler and writes the JSON report.

use std::path::PathBuf;
use std::time::Instant;

use crate::checks::config::{COLLECT, CONFIG_FILE_OPTION, SEARCH_PATHS_OPTION};
use crate::checks::CheckContext;
use crate::cli::args::RunArgs;
use crate::config::DiagConfig;
use crate::error::{DiagError, Result};
use crate::report::RunReport;
use crate::runner::{OptionSet, OptionSpec, RunProgress, Scheduler};
use crate::tasks::{Identifier, Status, SuiteCatalog, TaskOptions, TaskRegistry};
use crate::ui::UserInterface;

use super::build_registry;
use super::dispatcher::{Command, CommandResult, EXIT_DEFECT, EXIT_PROBLEMS};

/// The run command implementation.
pub struct RunCommand {
    ctx: CheckContext,
    config: DiagConfig,
    args: RunArgs,
}

impl RunCommand {
    pub fn new(ctx: CheckContext, config: DiagConfig, args: RunArgs) -> Self {
        Self { ctx, config, args }
    }

    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Selectors from `--tasks` and `--suites`, falling back to the
    /// configured default selection.
    fn selectors(&self) -> Result<Vec<String>> {
        let mut selectors = self.args.tasks.clone();
        if !self.args.suites.is_empty() {
            let catalog = SuiteCatalog::builtin().with_custom(&self.config.suites);
            selectors.extend(catalog.selectors_for(&self.args.suites)?);
        }
        if selectors.is_empty() {
            selectors = self.config.tasks.clone();
        }
        Ok(selectors)
    }

    /// Layer options: config file, then `--option`, then `--override`.
    fn options(&self) -> Result<OptionSet> {
        let global = TaskOptions::from_map(self.config.options.clone().into_iter().collect());
        let mut options = OptionSet::new().with_global(global);

        let collect: Identifier = COLLECT.parse()?;
        if let Some(file) = &self.config.config_file {
            options.add(OptionSpec {
                scope: Some(collect.clone()),
                key: CONFIG_FILE_OPTION.to_string(),
                value: file.display().to_string(),
            });
        }
        if !self.config.search_paths.is_empty() {
            let paths: Vec<String> = self
                .config
                .search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            options.add(OptionSpec {
                scope: Some(collect),
                key: SEARCH_PATHS_OPTION.to_string(),
                value: paths.join(","),
            });
        }

        let from_config: Vec<String> = self
            .config
            .overrides
            .iter()
            .map(|o| o.to_option_string())
            .collect();
        options.extend_from_strs(from_config.iter().map(String::as_str))?;
        options.extend_from_strs(self.args.options.iter().map(String::as_str))?;
        options.extend_from_strs(self.args.overrides.iter().map(String::as_str))?;
        Ok(options)
    }

    fn report_path(&self) -> Option<PathBuf> {
        if self.args.no_report {
            return None;
        }
        Some(
            self.args
                .report
                .clone()
                .unwrap_or_else(|| self.config.settings.report.clone()),
        )
    }

    fn prepare(&self) -> Result<(TaskRegistry, Vec<Identifier>, OptionSet)> {
        let registry = build_registry(&self.ctx)?;
        let selected = registry.select(&self.selectors()?)?;
        let options = self.options()?;
        Ok((registry, selected, options))
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (registry, selected, options) = match self.prepare() {
            Ok(prepared) => prepared,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_DEFECT));
            }
        };

        let workers = self.args.workers.unwrap_or_else(|| self.config.workers());
        let scheduler = Scheduler::new(&registry).workers(workers).options(options);

        ui.show_header(&format!("diagrun {}", env!("CARGO_PKG_VERSION")));
        let started = Instant::now();
        let outcome = scheduler.run_with_progress(&selected, |event| {
            if let RunProgress::Finished {
                identifier, result, ..
            } = event
            {
                ui.task_status(&identifier.to_string(), result.status, &result.summary);
            }
        });
        let store = match outcome {
            Ok(store) => store,
            Err(e @ DiagError::CircularDependency { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_DEFECT));
            }
            Err(e) => return Err(e),
        };
        ui.show_run_summary(&store.counts(), started.elapsed());

        if let Some(path) = self.report_path() {
            RunReport::new(&store).write_file(&path)?;
            ui.message(&format!("Report written to {}", path.display()));
        }

        if store.worst_status() >= Status::Failure {
            Ok(CommandResult::failure(EXIT_PROBLEMS))
        } else {
            Ok(CommandResult::success())
        }
    }
}
