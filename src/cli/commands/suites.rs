//! Suites command implementation.

use crate::config::DiagConfig;
use crate::error::Result;
use crate::tasks::SuiteCatalog;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Lists built-in and configured suites.
pub struct SuitesCommand {
    config: DiagConfig,
}

impl SuitesCommand {
    pub fn new(config: DiagConfig) -> Self {
        Self { config }
    }
}

impl Command for SuitesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalog = SuiteCatalog::builtin().with_custom(&self.config.suites);
        for suite in catalog.iter() {
            if suite.description.is_empty() {
                ui.message(&format!("{} ({})", suite.name, suite.display_name));
            } else {
                ui.message(&format!(
                    "{} ({}): {}",
                    suite.name, suite.display_name, suite.description
                ));
            }
            ui.message(&format!("  {}", suite.selectors.join(", ")));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::collections::BTreeMap;

    #[test]
    fn lists_builtin_and_custom_suites() {
        let config = DiagConfig {
            suites: BTreeMap::from([(
                "keys".to_string(),
                vec!["Base/Config/LicenseKey".to_string()],
            )]),
            ..Default::default()
        };
        let mut ui = MockUI::new();
        SuitesCommand::new(config).execute(&mut ui).unwrap();

        assert!(ui.has_output("base (Base): Environment and config checks"));
        assert!(ui.has_output("keys (keys)"));
        assert!(ui.has_output("  Base/Config/LicenseKey"));
    }
}
