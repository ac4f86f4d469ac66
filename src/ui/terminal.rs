//! Styled terminal UI.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use console::Term;

use crate::tasks::Status;

use super::{
    run_summary_line, should_use_colors, DiagTheme, NonInteractiveUI, OutputMode, UserInterface,
};

/// Terminal UI writing styled lines to stdout.
pub struct TerminalUI {
    term: Term,
    theme: DiagTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            DiagTheme::new()
        } else {
            DiagTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        let mut stderr = Term::stderr();
        writeln!(stderr, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn task_status(&mut self, identifier: &str, status: Status, summary: &str) {
        if !self.mode.shows_task(status.is_failure()) {
            return;
        }
        writeln!(self.term, "{}", self.theme.format_task(identifier, status)).ok();
        if self.mode.shows_summaries() && !summary.is_empty() {
            for line in summary.lines() {
                writeln!(self.term, "    {}", self.theme.dim.apply_to(line)).ok();
            }
        }
    }

    fn show_run_summary(&mut self, counts: &BTreeMap<Status, usize>, elapsed: Duration) {
        if self.mode.shows_status() {
            let line = run_summary_line(counts, elapsed);
            writeln!(self.term, "\n{}", self.theme.highlight.apply_to(line)).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Pick the terminal UI when stdout is a terminal, plain output otherwise.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
