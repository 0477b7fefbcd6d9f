//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rank_validate::ValidationContext;

#[derive(Parser)]
#[command(
    name = "rank-studio",
    version,
    about = "Validate and normalize rank progressions stored in Ranks.xml"
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

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a ranks file and report issues.
    Validate(ValidateArgs),

    /// Print the XP and salary range of every rank.
    Summary(SummaryArgs),

    /// Regroup and renumber pay bands, then write the file back out.
    Normalize(NormalizeArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to Ranks.xml.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Game-data catalog (JSON) used for reference checks.
    #[arg(long = "catalog", value_name = "JSON")]
    pub catalog: Option<PathBuf>,

    /// Progression policy (JSON) overriding the default severities.
    #[arg(long = "policy", value_name = "JSON")]
    pub policy: Option<PathBuf>,

    /// Which rule set to run.
    #[arg(long = "context", value_enum, default_value = "full")]
    pub context: ContextArg,

    /// Print issues as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// Path to Ranks.xml.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Path to Ranks.xml.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Where to write the result (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ContextArg {
    Full,
    RealTime,
    PreGenerate,
    Startup,
    AdvisoryOnly,
}

impl From<ContextArg> for ValidationContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Full => Self::Full,
            ContextArg::RealTime => Self::RealTime,
            ContextArg::PreGenerate => Self::PreGenerate,
            ContextArg::Startup => Self::Startup,
            ContextArg::AdvisoryOnly => Self::AdvisoryOnly,
        }
    }
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
