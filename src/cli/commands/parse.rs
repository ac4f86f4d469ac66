//! Parse command implementation.
//!
//! Runs one file through the normalization engine, outside the scheduler.

use serde::Serialize;

use crate::cli::args::ParseArgs;
use crate::error::{ParseError, Result};
use crate::normalize::{self, ConfigFormat, ValidateBlob};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_PROBLEMS};

pub struct ParseCommand {
    args: ParseArgs,
}

impl ParseCommand {
    pub fn new(args: ParseArgs) -> Self {
        Self { args }
    }

    fn parse(&self) -> std::result::Result<ValidateBlob, ParseError> {
        let format = match &self.args.format {
            Some(ext) => ConfigFormat::from_extension(ext)?,
            None => ConfigFormat::from_path(&self.args.file)?,
        };
        tracing::debug!(
            "Parsing {} as {}",
            self.args.file.display(),
            format.as_str()
        );
        let file = std::fs::File::open(&self.args.file)?;
        normalize::parse(format, file)
    }

    fn render(&self, tree: &ValidateBlob) -> Result<String> {
        match &self.args.key {
            Some(key) => {
                let matches = tree.find_key(key);
                if self.args.json {
                    to_json(&matches)
                } else {
                    Ok(matches.iter().map(|m| m.to_string()).collect())
                }
            }
            None if self.args.json => to_json(tree),
            None => Ok(tree.to_string()),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow::anyhow!("Failed to serialize parsed tree: {}", e))?;
    Ok(format!("{}\n", json))
}

impl Command for ParseCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let tree = match self.parse() {
            Ok(tree) => tree,
            Err(e) => {
                ui.error(&format!("{}: {}", self.args.file.display(), e));
                return Ok(CommandResult::failure(EXIT_PROBLEMS));
            }
        };

        let rendered = self.render(&tree)?;
        if self.args.key.is_some() && rendered.is_empty() && !self.args.json {
            ui.warning(&format!(
                "No key named '{}' in {}",
                self.args.key.as_deref().unwrap_or_default(),
                self.args.file.display()
            ));
            return Ok(CommandResult::success());
        }
        print!("{}", rendered);
        Ok(CommandResult::success())
    }
}
