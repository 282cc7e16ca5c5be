// src/bin/tric.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use tric::{
    cli::{self, Cli, dispatcher},
    core::{forwarder::ForwardError, target::TargetError},
    state::AppState,
};

/// The main entry point of `tric`.
/// It loads the configuration, sets up logging, dispatches to the handler for the
/// command and turns its outcome into the process exit code.
fn main() {
    let cli = Cli::parse();

    // Help never needs a tool root.
    if dispatcher::wants_help(&cli.args) {
        print!("{}", cli::help_text());
        std::process::exit(0);
    }

    let code = match run_cli(cli) {
        Ok(code) => code,
        Err(e) => {
            report(&e);
            1
        }
    };
    std::process::exit(code);
}

fn run_cli(cli: Cli) -> Result<i32> {
    let mut state = AppState::bootstrap()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(state.config().log_filter()),
    )
    .init();
    log::debug!("CLI args parsed: {:?}", cli);

    dispatcher::dispatch(cli.args, &mut state)
}

/// Usage errors are shown as plain guidance; everything else as an error.
fn report(e: &anyhow::Error) {
    let usage = e.downcast_ref::<TargetError>().or_else(|| match e.downcast_ref::<ForwardError>() {
        Some(ForwardError::Target(target_error)) => Some(target_error),
        _ => None,
    });

    match usage {
        Some(target_error) => eprintln!("{}", target_error.to_string().magenta()),
        None => eprintln!("\n{}: {}", "Error".red().bold(), e),
    }
}
