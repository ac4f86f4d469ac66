//! Task results.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::payload::{FileRef, Payload};
use super::status::Status;

/// Summary used when an upstream payload is not the variant a task needs.
pub const TYPE_MISMATCH_SUMMARY: &str =
    "Task did not meet requirements necessary to run: type assertion failure";

/// The output of one task execution.
///
/// `TaskResult::default()` is the zero value handed to tasks for
/// dependencies that were never registered.
#[derive(Debug, Clone, Default)]
pub struct TaskResult {
    pub status: Status,
    pub summary: String,
    /// Documentation link for the user.
    pub url: String,
    pub payload: Payload,
    pub files_to_copy: Vec<FileRef>,
    /// Internal error detail, set when the task itself broke.
    pub error: String,
}

impl TaskResult {
    pub fn new(status: Status, summary: impl Into<String>) -> Self {
        Self {
            status,
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// An `Error` result with the error detail mirrored from the summary.
    pub fn error(summary: impl Into<String>) -> Self {
        let summary = summary.into();
        Self {
            status: Status::Error,
            error: summary.clone(),
            summary,
            ..Self::default()
        }
    }

    /// The standard result for an upstream payload of the wrong kind.
    pub fn type_mismatch() -> Self {
        Self::new(Status::Error, TYPE_MISMATCH_SUMMARY)
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_files(mut self, files: Vec<FileRef>) -> Self {
        self.files_to_copy = files;
        self
    }
}

impl Serialize for TaskResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TaskResult", 6)?;
        state.serialize_field("Status", &self.status)?;
        state.serialize_field("Summary", &self.summary)?;
        state.serialize_field("URL", &self.url)?;
        state.serialize_field("FilesToCopy", &self.files_to_copy)?;
        state.serialize_field("Payload", &self.payload)?;
        if self.error.is_empty() {
            state.skip_field("Error")?;
        } else {
            state.serialize_field("Error", &self.error)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_value() {
        let result = TaskResult::default();
        assert_eq!(result.status, Status::None);
        assert!(result.summary.is_empty());
        assert!(result.payload.is_none());
        assert!(result.files_to_copy.is_empty());
    }

    #[test]
    fn error_mirrors_summary() {
        let result = TaskResult::error("boom");
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.error, "boom");
        assert_eq!(result.summary, "boom");
    }

    #[test]
    fn builders_set_fields() {
        let result = TaskResult::new(Status::Warning, "careful")
            .with_url("https://docs.example.com")
            .with_payload(Payload::Text("x".into()))
            .with_files(vec![FileRef::new("/tmp/a.yml")]);
        assert_eq!(result.url, "https://docs.example.com");
        assert_eq!(result.payload.as_text(), Some("x"));
        assert_eq!(result.files_to_copy.len(), 1);
    }

    #[test]
    fn json_shape_uses_report_field_names() {
        let json = serde_json::to_value(TaskResult::new(Status::Success, "ok")).unwrap();
        assert_eq!(json["Status"], "Success");
        assert_eq!(json["Summary"], "ok");
        assert!(json["Payload"].is_null());
        assert!(json.get("Error").is_none());
    }

    #[test]
    fn json_includes_error_when_set() {
        let json = serde_json::to_value(TaskResult::error("panic")).unwrap();
        assert_eq!(json["Error"], "panic");
    }
}
