//! CLI argument definitions.
//!
//! All Clap derive structs for `testable-report` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{RESOURCE_PATH_VAR, ReporterConfig, non_blank, split_resource_path};
use crate::events::{LogLevel, MetricKind};
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Report metrics, logs and data-file rows from shell-driven tests.
#[derive(Parser, Debug)]
#[command(name = "testable-report", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Result stream and naming context.
    #[command(flatten)]
    pub reporter: ReporterArgs,

    /// Increase diagnostic verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all diagnostics.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Diagnostic output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

/// Options mirroring the platform's process configuration.
#[derive(Args, Debug, Default)]
pub struct ReporterArgs {
    /// Append records to this file instead of printing them.
    #[arg(long, global = true, env = "TESTABLE_RESULT_FILE")]
    pub result_file: Option<PathBuf>,

    /// Region of the distributed worker.
    #[arg(long, global = true, env = "TESTABLE_REGION_NAME")]
    pub region_name: Option<String>,

    /// Worker index across all regions.
    #[arg(long, global = true, env = "TESTABLE_GLOBAL_CLIENT_INDEX")]
    pub global_client_index: Option<String>,

    /// Iteration of the scenario on this worker.
    #[arg(long, global = true, env = "TESTABLE_ITERATION")]
    pub iteration: Option<String>,

    /// Proxy autoconfiguration URL.
    #[arg(long, global = true, env = "PROXY_AUTOCONFIG_URL")]
    pub proxy_autoconfig_url: Option<String>,

    /// Directory for test artifacts.
    #[arg(long, global = true, env = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extra directory to search for data files (repeatable). Defaults to
    /// the entries of `TESTABLE_RESOURCE_PATH`.
    #[arg(long = "resource-dir", global = true)]
    pub resource_dirs: Vec<PathBuf>,
}

impl ReporterArgs {
    /// Converts the parsed flags into a reporter configuration.
    ///
    /// Blank flags and variables count as unset, as in
    /// [`ReporterConfig::from_env`].
    #[must_use]
    pub fn into_config(self) -> ReporterConfig {
        let resource_dirs: Vec<PathBuf> = self
            .resource_dirs
            .into_iter()
            .filter_map(|dir| non_blank(Some(dir)))
            .collect();
        let resource_dirs = if resource_dirs.is_empty() {
            split_resource_path(non_blank(std::env::var_os(RESOURCE_PATH_VAR)))
        } else {
            resource_dirs
        };

        ReporterConfig {
            result_file: non_blank(self.result_file),
            region_name: non_blank(self.region_name),
            global_client_index: non_blank(self.global_client_index),
            iteration: non_blank(self.iteration),
            proxy_autoconfig_url: non_blank(self.proxy_autoconfig_url),
            output_dir: non_blank(self.output_dir),
            resource_dirs,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a log record.
    Log(LogArgs),

    /// Report a custom metric.
    Metric(MetricArgs),

    /// Print a name prefixed with the worker's region, index and iteration.
    Name(NameArgs),

    /// Print a row of a CSV data file as JSON.
    Csv(CsvArgs),
}

/// Arguments for `log`.
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Severity (trace, debug, info, warn, error, fatal).
    pub level: LogLevel,

    /// Message words, joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

/// Arguments for `metric`.
#[derive(Args, Debug)]
pub struct MetricArgs {
    /// Metric kind (counter, timing, histogram).
    pub kind: MetricKind,

    /// Metric name.
    pub name: String,

    /// Value to report.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub val: i64,

    /// Units of the value.
    #[arg(long)]
    pub units: Option<String>,

    /// Histogram bucket.
    #[arg(long)]
    pub key: Option<String>,
}

/// Arguments for `name`.
#[derive(Args, Debug)]
pub struct NameArgs {
    /// Base name to prefix.
    pub base: String,
}

/// Arguments for `csv`.
#[derive(Args, Debug)]
pub struct CsvArgs {
    /// Path to the CSV file.
    pub path: PathBuf,

    /// Row to print. Defaults to the row at the worker's client index.
    #[arg(long, conflicts_with = "random")]
    pub row: Option<usize>,

    /// Print a random row.
    #[arg(long)]
    pub random: bool,
}
