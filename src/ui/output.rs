//! Output verbosity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Status lines plus every task summary.
    Verbose,
    /// One status line per task.
    #[default]
    Normal,
    /// Only problems and the final totals.
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Verbose => "verbose",
            Self::Normal => "normal",
            Self::Quiet => "quiet",
            Self::Silent => "silent",
        })
    }
}

impl OutputMode {
    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Whether a finished task with this outcome gets its own line.
    pub fn shows_task(&self, problem: bool) -> bool {
        match self {
            Self::Verbose | Self::Normal => true,
            Self::Quiet => problem,
            Self::Silent => false,
        }
    }

    /// Check if this mode prints task summaries under each status line.
    pub fn shows_summaries(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}
