//! Explain command implementation.

use crate::checks::CheckContext;
use crate::cli::args::ExplainArgs;
use crate::error::{DiagError, Result};
use crate::ui::UserInterface;

use super::build_registry;
use super::dispatcher::{Command, CommandResult, EXIT_DEFECT};

/// Prints what each matching task does and what it needs.
pub struct ExplainCommand {
    ctx: CheckContext,
    args: ExplainArgs,
}

impl ExplainCommand {
    pub fn new(ctx: CheckContext, args: ExplainArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for ExplainCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = match build_registry(&self.ctx) {
            Ok(registry) => registry,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_DEFECT));
            }
        };

        let matches = registry.matching(&self.args.selector, true);
        if matches.is_empty() {
            let err = DiagError::UnknownTask {
                selector: self.args.selector.clone(),
            };
            ui.error(&err.to_string());
            return Ok(CommandResult::failure(EXIT_DEFECT));
        }

        for (i, task) in matches.iter().enumerate() {
            if i > 0 {
                ui.message("");
            }
            ui.message(&task.identifier().to_string());
            ui.message(&format!("  {}", task.explain()));
            let deps: Vec<String> = task
                .dependencies()
                .iter()
                .map(|d| match d.resolved {
                    Some(_) => d.declared.clone(),
                    None => format!("{} (not registered)", d.declared),
                })
                .collect();
            if deps.is_empty() {
                ui.message("  Depends on: nothing");
            } else {
                ui.message(&format!("  Depends on: {}", deps.join(", ")));
            }
            ui.message(&format!(
                "  Runs by default: {}",
                if task.enabled_by_default() { "yes" } else { "no" }
            ));
        }
        Ok(CommandResult::success())
    }
}
