//! JSON run report.
//!
//! Results go out in identifier order. Sensitive values are redacted by the
//! payload types' own `Serialize` impls, not here.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DiagError, Result};
use crate::runner::{ResultStore, TaskRecord};

/// Default report file name, relative to the working directory.
pub const DEFAULT_REPORT_PATH: &str = "diagrun-output.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunReport<'a> {
    pub run_date: DateTime<Utc>,
    pub version: &'static str,
    pub results: Vec<&'a TaskRecord>,
}

impl<'a> RunReport<'a> {
    pub fn new(store: &'a ResultStore) -> Self {
        Self {
            run_date: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            results: store.sorted(),
        }
    }

    pub fn write_to<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    /// Write the report to `path`, replacing any existing file.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let report_error = |message: String| DiagError::Report {
            path: path.to_path_buf(),
            message,
        };
        let file = File::create(path).map_err(|e| report_error(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .map_err(|e| report_error(e.to_string()))?;
        writer.flush().map_err(|e| report_error(e.to_string()))?;
        tracing::info!("Wrote run report to {}", path.display());
        Ok(())
    }
}
