//! CLI argument definitions for `xpt-dump`.

use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "xpt-dump",
    version,
    about = "Inspect SAS Transport (XPT) files",
    long_about = "Decode SAS Transport V5 files and print their variables or rows.\n\n\
                  Numeric values are converted from IBM floating point; SAS missing\n\
                  values are shown as `.`, `._` or `.A`-`.Z` (null in JSON output)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v info, -vv debug, -vvv trace, -q errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

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
    /// List the variables of a transport file in column order.
    Schema(SchemaArgs),

    /// Print the decoded rows of a transport file.
    Rows(RowsArgs),
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Path to the XPT file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct RowsArgs {
    /// Path to the XPT file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print at most this many rows.
    #[arg(long = "limit", short = 'n', value_name = "N")]
    pub limit: Option<usize>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl Cli {
    /// Logging setup for these flags.
    ///
    /// `RUST_LOG` is honoured only when no `-v`/`-q` flag was given. Colors
    /// follow `--color`, and under `auto` are used only for a terminal.
    #[must_use]
    pub fn log_config(&self, stderr_is_terminal: bool) -> LogConfig {
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && stderr_is_terminal,
        };
        LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            use_env_filter: !self.verbosity.is_present(),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}
