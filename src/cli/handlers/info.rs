// src/cli/handlers/info.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    constants::{INFO_KEYS, KEY_PLUGINS_DIR},
    core::{config::Config, paths},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Displays the configuration files read and the current configuration."
)]
struct InfoArgs {}

/// The main handler for the `info` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    let _info_args = InfoArgs::try_parse_from(&args)?;
    let config = state.target.config();

    print_sources(config);
    print_values(config);
    Ok(0)
}

fn print_sources(config: &Config) {
    println!("{}", t!("info.header.files").yellow());
    for source in config.sources() {
        println!("  - {}", source.display());
    }
    println!();
}

fn print_values(config: &Config) {
    println!("{}", t!("info.header.values").yellow());
    for line in value_lines(config) {
        println!("{}", line);
    }
}

/// `  - KEY: value`, one per displayed key. A plugins directory given as a relative
/// path also shows where it resolves to.
fn value_lines(config: &Config) -> Vec<String> {
    INFO_KEYS
        .iter()
        .map(|&key| {
            let mut value = config.get(key).unwrap_or_default().to_string();
            if key == KEY_PLUGINS_DIR {
                let resolved = paths::plugins_dir(config, None).display().to_string();
                if value != resolved {
                    value = format!("{} => {}", value, resolved);
                }
            }
            format!("  - {}: {}", key.bright_cyan(), value)
        })
        .collect()
}
