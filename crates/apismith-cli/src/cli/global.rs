//! Flags accepted by every subcommand, flattened into [`super::Cli`].

use std::path::PathBuf;

use clap::{Args, builder::FalseyValueParser};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// More log output: `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More log output (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Only print errors and command results.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print errors and results"
    )]
    pub quiet: bool,

    /// Plain output. Set implicitly by `NO_COLOR` (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Read tool configuration from this file instead of the default
    /// locations.
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write JSON log records to this file.
    #[arg(
        long = "log-file",
        global = true,
        value_name = "PATH",
        env = "APISMITH_LOG_FILE"
    )]
    pub log_file: Option<PathBuf>,
}
