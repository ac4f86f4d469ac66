//! Plain output for pipes, files and CI logs.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::tasks::Status;

use super::{run_summary_line, status_icon, OutputMode, UserInterface};

/// Unstyled UI; problems go to stderr, everything else to stdout.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn task_status(&mut self, identifier: &str, status: Status, summary: &str) {
        if !self.mode.shows_task(status.is_failure()) {
            return;
        }
        println!("{} {}", status_icon(status), identifier);
        if self.mode.shows_summaries() {
            for line in summary.lines() {
                println!("    {}", line);
            }
        }
    }

    fn show_run_summary(&mut self, counts: &BTreeMap<Status, usize>, elapsed: Duration) {
        if self.mode.shows_status() {
            println!("\n{}", run_summary_line(counts, elapsed));
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
