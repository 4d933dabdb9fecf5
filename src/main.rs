mod app;
mod cli_args;
mod config;
mod console;
mod error;
mod git;
mod llm;
mod logging;
mod setup;

use clap::Parser;
use std::process::ExitCode;

use crate::cli_args::Cli;
use crate::console::TerminalConsole;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let console = TerminalConsole::new(cli.verbose < 2);
    app::run(&cli, &console)
}
