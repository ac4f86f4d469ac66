//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// diagrun - dependency-ordered diagnostics for agent configuration.
#[derive(Debug, Parser)]
#[command(name = "diagrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides .diagrun/config.yml discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Project root to search (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show task summaries
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show problems
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run diagnostic tasks (default if no command specified)
    Run(RunArgs),

    /// List registered tasks
    List(ListArgs),

    /// Describe the tasks matching a selector
    Explain(ExplainArgs),

    /// List task suites
    Suites,

    /// Normalize a config file and print its canonical form
    Parse(ParseArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Tasks to run: identifiers or wildcards (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tasks: Vec<String>,

    /// Suites to run (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub suites: Vec<String>,

    /// Task option, key=value or Category/Subcategory/Name.key=value
    #[arg(short, long = "option", value_name = "OPTION")]
    pub options: Vec<String>,

    /// Result override, Category/Subcategory/Name.Status=value or .Payload=value
    #[arg(long = "override", value_name = "OVERRIDE")]
    pub overrides: Vec<String>,

    /// Where to write the JSON report
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Do not write a JSON report
    #[arg(long, conflicts_with = "report")]
    pub no_report: bool,

    /// Maximum tasks running at once
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Include tasks that only run when selected explicitly
    #[arg(short, long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `explain` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ExplainArgs {
    /// Identifier or wildcard, e.g. Base/Config/*
    pub selector: String,
}

/// Arguments for the `parse` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ParseArgs {
    /// Config file to normalize
    pub file: PathBuf,

    /// Format to parse as, by extension (yml, xml, json, js, ini, ...)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,

    /// Print only the nodes with this key
    #[arg(short, long)]
    pub key: Option<String>,
}
