//! Mock UI implementation for testing.
//!
//! `MockUI` implements [`UserInterface`] and captures every interaction for
//! later assertion.
//!
//! # Example
//!
//! ```
//! use diagrun::tasks::Status;
//! use diagrun::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.task_status("Base/Config/Collect", Status::Success, "There were 1 file(s) found");
//!
//! assert_eq!(ui.task_lines()[0].0, "Base/Config/Collect");
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use crate::tasks::Status;

use super::{OutputMode, UserInterface};

/// Captures UI calls instead of printing them.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    task_lines: Vec<(String, Status, String)>,
    summaries: Vec<BTreeMap<Status, usize>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// `(identifier, status, summary)` for every task reported.
    pub fn task_lines(&self) -> &[(String, Status, String)] {
        &self.task_lines
    }

    pub fn summaries(&self) -> &[BTreeMap<Status, usize>] {
        &self.summaries
    }

    /// Whether any message, success, warning or error contains `needle`.
    pub fn has_output(&self, needle: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.successes)
            .chain(&self.warnings)
            .chain(&self.errors)
            .any(|line| line.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn task_status(&mut self, identifier: &str, status: Status, summary: &str) {
        self.task_lines
            .push((identifier.to_string(), status, summary.to_string()));
    }

    fn show_run_summary(&mut self, counts: &BTreeMap<Status, usize>, _elapsed: Duration) {
        self.summaries.push(counts.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
