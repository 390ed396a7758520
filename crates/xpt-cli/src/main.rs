//! `xpt-dump`: inspect SAS Transport files.

use clap::Parser;
use std::io::{self, IsTerminal};
use xpt_cli::cli::{Cli, Command};
use xpt_cli::commands::{run_rows, run_schema};
use xpt_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Schema(args) => run_schema(args),
        Command::Rows(args) => run_rows(args),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
