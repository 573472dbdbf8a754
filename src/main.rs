//! Main entry point for dkit CLI

use clap::Parser;
use dkit::cli::Cli;
use dkit::commands::execute_command;
use std::io::Write;

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; -v raises the level to debug
    let level = if cli.global.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{:<5}] {}", record.level(), record.args()))
        .init();

    // Execute the command
    match execute_command(cli.command, &cli.global) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
