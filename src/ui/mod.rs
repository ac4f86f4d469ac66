//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for styled terminal output
//! - [`NonInteractiveUI`] for pipes, CI and files
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use diagrun::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("diagrun");
//! ui.success("All checks passed");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod terminal;
pub mod theme;

use std::collections::BTreeMap;
use std::time::Duration;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{format_duration, should_use_colors, status_icon, DiagTheme};

use crate::tasks::Status;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode, e.g. to apply `settings.default_output`.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every mode.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// One finished task: status icon, identifier, and in verbose mode the
    /// summary.
    fn task_status(&mut self, identifier: &str, status: Status, summary: &str);

    /// Totals per status after a run.
    fn show_run_summary(&mut self, counts: &BTreeMap<Status, usize>, elapsed: Duration);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// The one-line form of a run summary, e.g. `5 tasks: 3 Success, 2 Warning (12ms)`.
pub fn run_summary_line(counts: &BTreeMap<Status, usize>, elapsed: Duration) -> String {
    let total: usize = counts.values().sum();
    let parts: Vec<String> = counts
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(status, n)| format!("{} {}", n, status))
        .collect();
    let label = if total == 1 { "task" } else { "tasks" };
    if parts.is_empty() {
        format!("{} {} ({})", total, label, format_duration(elapsed))
    } else {
        format!(
            "{} {}: {} ({})",
            total,
            label,
            parts.join(", "),
            format_duration(elapsed)
        )
    }
}
