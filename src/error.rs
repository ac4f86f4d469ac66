//! Error types for diagrun operations.
//!
//! This module defines [`DiagError`], the primary error type used throughout
//! the application, [`ParseError`] for the config normalization engine, and a
//! [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `DiagError` for defects that stop a command (graph defects, bad selectors)
//! - Use `ParseError` for a single config file that could not be normalized;
//!   the calling task folds it into its own result instead of aborting
//! - Use `anyhow::Error` (via `DiagError::Other`) for collaborator failures

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for diagrun operations.
#[derive(Debug, Error)]
pub enum DiagError {
    /// The task dependency graph contains a cycle.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// Two tasks registered the same identifier.
    #[error("Task registered more than once: {identifier}")]
    DuplicateTask { identifier: String },

    /// A string that is not `Category/Subcategory/Name`.
    #[error("Invalid task identifier '{input}': expected Category/Subcategory/Name")]
    InvalidIdentifier { input: String },

    /// A task selector matched nothing in the registry.
    #[error("No registered task matches '{selector}'")]
    UnknownTask { selector: String },

    /// One or more requested suites do not exist.
    #[error("Could not find the following task suites: {}", names.join(", "))]
    UnknownSuite { names: Vec<String> },

    /// A task option or override could not be parsed.
    #[error("Invalid option '{input}': {message}")]
    InvalidOption { input: String, message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A config file could not be normalized.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The run report could not be written.
    #[error("Failed to write report to {path}: {message}")]
    Report { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Hint appended to YAML failures, which are almost always indentation.
pub const YAML_HINT: &str = "This can mean that you either have incorrect spacing/indentation around this line or that you have a syntax error, such as a missing/invalid character";

/// Failure to turn one config file into a canonical tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("We ran into an error when trying to read your config file : {0}")]
    Read(#[from] std::io::Error),

    /// No parser handles this extension.
    #[error("Unsupported config file format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("{message}.\n{}", YAML_HINT)]
    Yaml { message: String },

    #[error("{message}")]
    Json { message: String },

    #[error("{message}")]
    Xml { message: String },

    /// JS-config syntax the parser cannot follow.
    #[error("line {line}: {message}")]
    Js { line: usize, message: String },
}

/// Result type alias for diagrun operations.
pub type Result<T> = std::result::Result<T, DiagError>;
