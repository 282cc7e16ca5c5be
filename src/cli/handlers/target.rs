// src/cli/handlers/target.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::state::AppState;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Sets the plugin the stack commands run against.")]
struct UseArgs {
    /// The plugin directory name, as found in the plugins directory.
    target: Option<String>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows the current target.")]
struct UsingArgs {}

/// `use <target>`: validates the target and makes it the current one.
pub fn use_target(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    let use_args = UseArgs::try_parse_from(&args)?;
    let target = use_args.target.as_deref().map(str::trim);

    state.target.ensure_valid(target)?;
    let target = target.unwrap_or_default();
    state.target.switch_target(target)?;

    println!("{}", format!(t!("use.success.using"), target = target).bright_cyan());
    Ok(0)
}

/// `using`: prints the current target, if any.
pub fn using(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    let _using_args = UsingArgs::try_parse_from(&args)?;

    match state.target.current_target() {
        Some(target) => println!("{}", format!(t!("using.info.current"), target = target).bright_cyan()),
        None => println!("{}", t!("using.info.none").yellow()),
    }
    Ok(0)
}
