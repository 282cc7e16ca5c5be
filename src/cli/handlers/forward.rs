// src/cli/handlers/forward.rs

use anyhow::Result;
use clap::Parser;

use crate::{core::forwarder::CommandForwarder, state::AppState};

/// Everything after the command name goes to the service untouched, `--help` included.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct ForwardArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn forward(service: &str, args: Vec<String>, state: &mut AppState) -> Result<i32> {
    let forward_args = ForwardArgs::try_parse_from(&args)?;
    let status = CommandForwarder::new(&mut state.target, state.backend.as_ref(), state.prompter.as_ref())
        .forward(service, &forward_args.args)?;
    Ok(status)
}

/// `npm [...]`, run in the `npm` service.
pub fn npm(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    forward("npm", args, state)
}

/// `composer [...]`, run in the `composer` service.
pub fn composer(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    forward("composer", args, state)
}
