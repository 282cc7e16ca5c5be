// src/cli/handlers/stack.rs

// Whole-stack commands: thin wrappers over `StackLifecycle`.

use anyhow::Result;
use clap::Parser;

use crate::{constants::DEFAULT_UP_SERVICE, core::lifecycle::StackLifecycle, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Starts a stack service, detached.")]
struct UpArgs {
    /// The service to start.
    #[arg(default_value = DEFAULT_UP_SERVICE)]
    service: String,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Restarts a running service, or all the PHP services.")]
struct RestartArgs {
    /// The service to restart; all the PHP services when omitted.
    service: Option<String>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
struct NoArgs {}

fn lifecycle(state: &AppState) -> StackLifecycle<'_> {
    StackLifecycle::new(state.backend.as_ref(), state.target.config())
}

pub fn up(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    let up_args = UpArgs::try_parse_from(&args)?;
    Ok(lifecycle(state).up(&up_args.service)?)
}

pub fn down(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    NoArgs::try_parse_from(&args)?;
    Ok(lifecycle(state).teardown()?)
}

pub fn restart(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    let restart_args = RestartArgs::try_parse_from(&args)?;
    let lifecycle = lifecycle(state);
    let status = match restart_args.service.as_deref() {
        Some(service) => lifecycle.restart_service(service, None)?,
        None => lifecycle.restart_all_php_services()?,
    };
    Ok(status)
}

pub fn rebuild(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    NoArgs::try_parse_from(&args)?;
    Ok(lifecycle(state).rebuild()?)
}

pub fn update(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    NoArgs::try_parse_from(&args)?;
    Ok(lifecycle(state).update_images()?)
}
