//! CLI argument definitions for the survey tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "survey",
    version,
    about = "Encode questionnaire exports and explore answers against a target",
    long_about = "Encode raw questionnaire exports with a declarative YAML schema.\n\n\
                  Binary, ordinal and categorical answers are replaced by codes,\n\
                  multiselect answers become 0/1 indicator columns, and answers\n\
                  missing from the schema are collected in an audit report."
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

    /// Log output format (pretty for human, json for machine parsing).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply an encoding schema to a raw survey export.
    Encode(EncodeArgs),

    /// Compare encoded questions against a binary target column.
    Compare(CompareArgs),

    /// Show the answer distribution of one column.
    Distribution(DistributionArgs),

    /// Test whether missing answers are Missing Completely At Random.
    Mcar(McarArgs),
}

#[derive(Args)]
pub struct EncodeArgs {
    /// Raw survey CSV.
    #[arg(value_name = "RAW_CSV")]
    pub raw: PathBuf,

    /// Encoding schema (YAML).
    #[arg(long = "schema", short = 's', value_name = "YAML")]
    pub schema: PathBuf,

    /// Encoded CSV output (default: <RAW_STEM>_encoded.csv next to the input).
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Unmapped-answer report (default: unmapped_values.json next to the output).
    #[arg(long = "unmapped-report", value_name = "JSON")]
    pub unmapped_report: Option<PathBuf>,

    /// Do not log unmapped answers or write the unmapped-answer report.
    #[arg(long = "no-log-unmapped")]
    pub no_log_unmapped: bool,

    /// Column holding dd/mm/yyyy birth dates to derive ages from.
    #[arg(long = "birth-date-column", value_name = "COLUMN", requires = "age_column")]
    pub birth_date_column: Option<String>,

    /// Column to write derived ages to.
    #[arg(long = "age-column", value_name = "COLUMN", requires = "birth_date_column")]
    pub age_column: Option<String>,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Encoded survey CSV.
    #[arg(value_name = "PROCESSED_CSV")]
    pub processed: PathBuf,

    /// Binary (0/1) target column.
    #[arg(long = "target", short = 't', value_name = "COLUMN")]
    pub target: String,

    /// Questions to compare: column names or multiselect prefixes
    /// (default: every column except the target).
    #[arg(value_name = "QUESTION")]
    pub questions: Vec<String>,
}

#[derive(Args)]
pub struct DistributionArgs {
    /// Survey CSV (raw or encoded).
    #[arg(value_name = "CSV")]
    pub data: PathBuf,

    /// Column to summarize.
    #[arg(value_name = "COLUMN")]
    pub column: String,

    /// Descriptive question text used in the title.
    #[arg(long = "question-text", value_name = "TEXT")]
    pub question_text: Option<String>,

    /// List values in ascending order.
    #[arg(long = "ascending")]
    pub ascending: bool,
}

#[derive(Args)]
pub struct McarArgs {
    /// Survey CSV.
    #[arg(value_name = "CSV")]
    pub data: PathBuf,

    /// Significance level.
    #[arg(long = "alpha", default_value_t = 0.01)]
    pub alpha: f64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
