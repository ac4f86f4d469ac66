//! Result status and its severity order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a task.
///
/// Variants are declared in severity order, so `Ord` compares severity:
/// `None < Success < Info < Warning < Failure < Error`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Status {
    /// The task had nothing to judge.
    #[default]
    None,
    Success,
    /// Informational only; usually a collector.
    Info,
    Warning,
    Failure,
    /// The task itself could not run correctly.
    Error,
}

impl Status {
    /// All statuses in severity order.
    pub const ALL: [Status; 6] = [
        Status::None,
        Status::Success,
        Status::Info,
        Status::Warning,
        Status::Failure,
        Status::Error,
    ];

    /// Canonical name, as shown in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::None => "None",
            Status::Success => "Success",
            Status::Info => "Info",
            Status::Warning => "Warning",
            Status::Failure => "Failure",
            Status::Error => "Error",
        }
    }

    /// Whether the status signals a problem the user should look at.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Status::None | Status::Success | Status::Info)
    }

    /// Whether a result with this status is expected to carry a payload.
    pub fn has_payload(&self) -> bool {
        !matches!(self, Status::None | Status::Failure | Status::Error)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Status::None),
            "success" => Ok(Status::Success),
            "info" => Ok(Status::Info),
            "warning" => Ok(Status::Warning),
            "failure" => Ok(Status::Failure),
            "error" => Ok(Status::Error),
            _ => Err(format!("unknown status: {}", s)),
        }
    }
}
