// src/system/prompt.rs

use dialoguer::{Confirm, theme::ColorfulTheme};
use std::io::IsTerminal;

/// Asks the user yes/no questions.
pub trait Prompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, dialoguer::Error>;
}

/// Interactive confirmation on the terminal.
///
/// When stdin is not a terminal (scripts, CI) the default answer is taken without asking.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, dialoguer::Error> {
        if !std::io::stdin().is_terminal() {
            log::info!("Not a terminal, answering '{}' with the default ({}).", prompt.trim(), default);
            return Ok(default);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.trim())
            .default(default)
            .interact()
    }
}
