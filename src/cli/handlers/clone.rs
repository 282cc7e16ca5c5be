// src/cli/handlers/clone.rs

use anyhow::Result;
use clap::Parser;

use crate::{core::lifecycle, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Clones a plugin from the company GitHub account into the plugins directory."
)]
struct CloneArgs {
    /// The plugin repository name, e.g. `the-events-calendar`.
    plugin: String,
}

pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    let clone_args = CloneArgs::try_parse_from(&args)?;
    let status = lifecycle::clone_plugin(state.target.config(), state.git.as_ref(), clone_args.plugin.trim())?;
    Ok(status)
}
