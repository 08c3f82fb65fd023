//! Command-line arguments for the tracker.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use pump_model::FieldAssignment;

#[derive(Parser)]
#[command(
    name = "pump-tracker",
    version,
    about = "Track solar pump beneficiaries through the installation pipeline",
    long_about = "Track solar pump beneficiaries through the installation pipeline.\n\n\
                  Each stage lists the rows whose planned date is set but whose actual\n\
                  date is blank. Submitting a stage writes the form values and stamps\n\
                  the actual date, which moves the row to the stage history."
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

    /// Include beneficiary names and phone numbers in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Config file (default: the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Sheet service URL (overrides config and PUMP_ENDPOINT).
    #[arg(long = "endpoint", value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Spreadsheet id (overrides config and PUMP_SHEET_ID).
    #[arg(long = "sheet-id", value_name = "ID", global = true)]
    pub sheet_id: Option<String>,

    /// Sheet tab holding the beneficiary table.
    #[arg(long = "sheet-name", value_name = "NAME", global = true)]
    pub sheet_name: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the pipeline stages.
    Stages,

    /// Show how a stage's fields map onto sheet columns.
    Columns(StageArgs),

    /// List records waiting on a stage.
    Pending(ListArgs),

    /// List records that have completed a stage.
    History(ListArgs),

    /// Complete a stage for one or more pending records.
    Submit(SubmitArgs),
}

#[derive(Args)]
pub struct StageArgs {
    /// Stage key, number or name (see `stages`).
    #[arg(long = "stage", short = 's', value_name = "STAGE")]
    pub stage: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub stage: StageArgs,

    /// Only show records whose id, name, village or mobile contains this text.
    #[arg(long = "search", value_name = "TEXT")]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub stage: StageArgs,

    /// Registration id of a pending record (repeat for bulk submission).
    #[arg(long = "reg-id", value_name = "ID", required = true)]
    pub reg_ids: Vec<String>,

    /// Form value as FIELD=VALUE (repeatable). Blank values leave cells alone.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub values: Vec<FieldAssignment>,

    /// Document to upload into the stage's document field.
    #[arg(long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// MIME type of the document (default: guessed from the extension).
    #[arg(long = "mime", value_name = "TYPE", requires = "file")]
    pub mime: Option<String>,
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
