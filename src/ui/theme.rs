//! Visual theme and styling.

use std::time::Duration;

use console::Style;

use crate::tasks::Status;

/// diagrun's visual theme.
#[derive(Debug, Clone)]
pub struct DiagTheme {
    /// Success results (green).
    pub success: Style,
    /// Warnings (orange).
    pub warning: Style,
    /// Failures and errors (red bold).
    pub error: Style,
    /// Informational results (cyan).
    pub info: Style,
    /// Secondary text.
    pub dim: Style,
    pub highlight: Style,
    pub header: Style,
}

impl Default for DiagTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
        }
    }

    pub fn status_style(&self, status: Status) -> &Style {
        match status {
            Status::Success => &self.success,
            Status::Info => &self.info,
            Status::Warning => &self.warning,
            Status::Failure | Status::Error => &self.error,
            Status::None => &self.dim,
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// `✓ Base/Config/Collect` styled by status.
    pub fn format_task(&self, identifier: &str, status: Status) -> String {
        format!(
            "{} {}",
            self.status_style(status).apply_to(status_icon(status)),
            identifier
        )
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }
}

pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Warning => "⚠",
        Status::Failure | Status::Error => "✗",
        Status::Info => "ℹ",
        Status::None => "○",
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}

/// Human-readable duration: `12ms`, `3.4s`, `1.5m`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_per_status() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Warning), "⚠");
        assert_eq!(status_icon(Status::Failure), "✗");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Info), "ℹ");
        assert_eq!(status_icon(Status::None), "○");
    }

    #[test]
    fn plain_theme_formats_without_escapes() {
        let theme = DiagTheme::plain();
        assert_eq!(
            theme.format_task("Base/Config/Collect", Status::Failure),
            "✗ Base/Config/Collect"
        );
        assert_eq!(theme.format_success("done"), "✓ done");
        assert_eq!(theme.format_error("bad"), "✗ bad");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(3400)), "3.4s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }
}
