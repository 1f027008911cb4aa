mod cli;
mod config;
mod error;
mod repl;
mod run;

use clap::Parser;
use cli::Cli;
use config::Config;
use run::{execute, Output, Request};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Installs the log subscriber. The filter is read from `RUST_LOG`, and only warnings are shown
/// by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match Config::resolve(&cli.options) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        },
    };
    let output = Output {
        steps: cli.options.steps,
        latex: cli.options.latex,
    };

    match Request::from_command(cli.command) {
        Some(request) => match execute(&request, &config, output) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            },
            Err(err) => {
                err.report_to_stderr(&request.input());
                ExitCode::FAILURE
            },
        },
        None => match repl::run(&config, output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            },
        },
    }
}
