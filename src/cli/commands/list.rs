//! List command implementation.
//!
//! The `diagrun list` command lists registered tasks.

use serde::Serialize;

use crate::checks::CheckContext;
use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::tasks::RegisteredTask;
use crate::ui::{should_use_colors, DiagTheme, UserInterface};

use super::build_registry;
use super::dispatcher::{Command, CommandResult, EXIT_DEFECT};

#[derive(Serialize)]
struct TaskEntry {
    identifier: String,
    explain: String,
    enabled_by_default: bool,
    dependencies: Vec<String>,
}

impl From<&RegisteredTask> for TaskEntry {
    fn from(task: &RegisteredTask) -> Self {
        Self {
            identifier: task.identifier().to_string(),
            explain: task.explain(),
            enabled_by_default: task.enabled_by_default(),
            dependencies: task
                .dependencies()
                .iter()
                .map(|d| d.declared.clone())
                .collect(),
        }
    }
}

/// The list command implementation.
pub struct ListCommand {
    ctx: CheckContext,
    args: ListArgs,
}

impl ListCommand {
    pub fn new(ctx: CheckContext, args: ListArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = match build_registry(&self.ctx) {
            Ok(registry) => registry,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_DEFECT));
            }
        };

        let entries: Vec<TaskEntry> = registry
            .iter()
            .filter(|t| self.args.all || t.enabled_by_default())
            .map(TaskEntry::from)
            .collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| anyhow::anyhow!("Failed to serialize task list: {}", e))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let theme = if should_use_colors() {
            DiagTheme::new()
        } else {
            DiagTheme::plain()
        };
        for entry in &entries {
            let marker = if entry.enabled_by_default {
                String::new()
            } else {
                format!(" {}", theme.dim.apply_to("(run only when selected)"))
            };
            ui.message(&format!(
                "  {}{}",
                theme.highlight.apply_to(&entry.identifier),
                marker
            ));
            ui.message(&format!("      {}", theme.dim.apply_to(&entry.explain)));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    fn run(all: bool) -> MockUI {
        let mut ui = MockUI::new();
        let cmd = ListCommand::new(
            CheckContext::new("/nonexistent"),
            ListArgs { all, json: false },
        );
        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);
        ui
    }

    #[test]
    fn lists_default_tasks() {
        let ui = run(false);
        assert!(ui.has_output("Base/Config/Collect"));
        assert!(ui.has_output("Collect New Relic configuration files"));
        assert!(!ui.has_output("Base/Config/ValidateLicenseKey"));
    }

    #[test]
    fn all_includes_opt_in_tasks() {
        let ui = run(true);
        assert!(ui.has_output("Base/Config/ValidateLicenseKey"));
        assert!(ui.has_output("run only when selected"));
    }
}
