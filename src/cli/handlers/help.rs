// src/cli/handlers/help.rs

use anyhow::Result;

use crate::{cli, state::AppState};

pub fn handle(_args: Vec<String>, _state: &mut AppState) -> Result<i32> {
    print!("{}", cli::help_text());
    Ok(0)
}
