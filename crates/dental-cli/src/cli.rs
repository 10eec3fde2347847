//! CLI argument definitions for the `dental-rules` binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dental-rules",
    version,
    about = "Dental coding and billing rule engine",
    long_about = "Check treatment-code combinations, point surcharges, follow-on\n\
                  suggestions, diagnosis fit and questionnaire classification\n\
                  against a versioned rule catalog."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Rule catalog directory (default: $DENTAL_RULES_DIR, then the bundled standards/).
    #[arg(long = "catalog", value_name = "DIR", global = true)]
    pub catalog: Option<PathBuf>,

    /// Only consider treatment codes billable on this date (YYYY-MM-DD).
    #[arg(long = "as-of", value_name = "DATE", global = true)]
    pub as_of: Option<NaiveDate>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,

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
    /// Verify the rule catalog and print its report.
    Catalog,

    /// Check whether a code may be added to the current selection.
    ///
    /// Exits with status 2 when an exclusion rule blocks the code.
    Validate(RequestArgs),

    /// List the point surcharges that apply to one code.
    Additions(RequestArgs),

    /// Rank follow-on codes for the last selected code.
    Suggest(RequestArgs),

    /// Cross-check diagnoses against the planned treatments.
    DiseaseCheck(RequestArgs),

    /// Derive the C-classification from questionnaire answers.
    Classify(ClassifyArgs),

    /// Find treatment codes by name or code fragment.
    Search(SearchArgs),
}

#[derive(Parser)]
pub struct RequestArgs {
    /// JSON request file.
    #[arg(value_name = "REQUEST")]
    pub request: PathBuf,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// JSON object of answers keyed by question id.
    #[arg(value_name = "RESPONSES")]
    pub responses: PathBuf,

    /// JSON array of question definitions.
    #[arg(value_name = "QUESTIONS")]
    pub questions: PathBuf,

    /// Mapping CSV to use instead of the catalog's classification mappings.
    #[arg(long = "mappings", value_name = "CSV")]
    pub mappings: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SearchArgs {
    /// Name or code fragment (case-insensitive).
    #[arg(value_name = "KEYWORD")]
    pub keyword: String,

    /// Restrict to a 3-character treatment category, e.g. 309.
    #[arg(long = "category", value_name = "XXX")]
    pub category: Option<String>,
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
