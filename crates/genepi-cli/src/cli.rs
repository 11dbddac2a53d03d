//! Command line arguments for `genepi-import`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use genepi_model::{MetadataField, Workflow};
use genepi_validate::DEFAULT_MAX_SAMPLES;

#[derive(Parser)]
#[command(
    name = "genepi-import",
    version,
    about = "Check sample metadata import files",
    long_about = "Parse a sample metadata TSV or CSV the way the upload and edit\n\
                  screens do, then report errors, auto-corrections and rows that\n\
                  still need attention."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow sample identifiers to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a metadata file and report what the form would show.
    Check(CheckArgs),

    /// Print the header line of the import template.
    Template(TemplateArgs),

    /// Resolve free-text locations against a vocabulary.
    Locations(LocationsArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Metadata file (.tsv, .csv or .txt).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long, value_enum, default_value = "upload")]
    pub workflow: WorkflowArg,

    /// File listing expected sample identifiers, one per line.
    #[arg(long = "known", value_name = "FILE")]
    pub known_file: Option<PathBuf>,

    /// Expected sample identifier (repeatable).
    #[arg(long = "known-id", value_name = "ID")]
    pub known_ids: Vec<String>,

    /// JSON array of locations used to resolve collection locations.
    #[arg(long, value_name = "JSON")]
    pub locations: Option<PathBuf>,

    /// Column that keys each row (e.g. publicId in the edit workflow).
    #[arg(long, value_name = "FIELD")]
    pub identifier: Option<MetadataField>,

    #[arg(long = "max-samples", value_name = "N", default_value_t = DEFAULT_MAX_SAMPLES)]
    pub max_samples: usize,

    #[arg(long, value_enum, default_value = "table")]
    pub format: ReportFormatArg,
}

#[derive(Args)]
pub struct TemplateArgs {
    #[arg(long, value_enum, default_value = "upload")]
    pub workflow: WorkflowArg,

    #[arg(long, value_name = "FIELD")]
    pub identifier: Option<MetadataField>,
}

#[derive(Args)]
pub struct LocationsArgs {
    #[arg(long, value_name = "JSON")]
    pub locations: PathBuf,

    #[arg(value_name = "QUERY", required = true)]
    pub queries: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WorkflowArg {
    Upload,
    Edit,
}

impl From<WorkflowArg> for Workflow {
    fn from(arg: WorkflowArg) -> Self {
        match arg {
            WorkflowArg::Upload => Workflow::Upload,
            WorkflowArg::Edit => Workflow::Edit,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
