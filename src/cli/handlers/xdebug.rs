// src/cli/handlers/xdebug.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

use crate::{
    constants::KEY_XDEBUG_ENABLED,
    core::{
        lifecycle::StackLifecycle,
        xdebug::{self, XdebugStatus, XdebugToggle},
    },
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows or changes the XDebug settings of the stack.")]
struct XdebugArgs {
    /// One of on, off, status, host, key, port.
    #[arg(default_value = "on")]
    toggle: String,
    /// The new value for host, key or port.
    value: Option<String>,
}

pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<i32> {
    let xdebug_args = XdebugArgs::try_parse_from(&args)?;
    let toggle: XdebugToggle = xdebug_args.toggle.parse()?;

    if toggle == XdebugToggle::Status {
        print_status(&XdebugStatus::from_config(state.target.config()));
        return Ok(0);
    }

    if let Some(key) = toggle.setting_key() {
        let value = xdebug_args
            .value
            .ok_or_else(|| anyhow!(t!("xdebug.error.value_required"), toggle = xdebug_args.toggle))?;
        println!(
            "{}\n",
            format!(t!("xdebug.info.setting"), key = key, value = value).bright_cyan()
        );
        state.target.config_mut().persist(&[(key, value.as_str())], false)?;
        println!("{}", t!("xdebug.hint.teardown"));
        return Ok(0);
    }

    let Some(enabled) = toggle.enabled_value() else {
        return Ok(0);
    };
    println!("{}", format!(t!("xdebug.info.status"), status = on_off(enabled != 0)));

    if enabled == xdebug::enabled_value(state.target.config()) {
        log::debug!("XDebug is already {}, nothing to do.", on_off(enabled != 0));
        return Ok(0);
    }

    let enabled_str = enabled.to_string();
    state
        .target
        .config_mut()
        .persist(&[(KEY_XDEBUG_ENABLED, enabled_str.as_str())], false)?;
    println!();

    if state.prompter.confirm(t!("xdebug.prompt.restart"), true)? {
        let status = StackLifecycle::new(state.backend.as_ref(), state.target.config()).restart_all_php_services()?;
        return Ok(status);
    }

    println!("\n{}", t!("xdebug.hint.teardown"));
    Ok(0)
}

fn on_off(enabled: bool) -> ColoredString {
    if enabled { "on".bright_cyan() } else { "off".magenta() }
}

fn print_status(status: &XdebugStatus) {
    println!("{}", format!(t!("xdebug.info.status"), status = on_off(status.enabled)));
    println!("{}", format!(t!("xdebug.label.host"), host = status.host.bright_cyan()));
    println!("{}", format!(t!("xdebug.label.port"), port = status.port.bright_cyan()));
    println!("{}", format!(t!("xdebug.label.ide_key"), key = status.ide_key.bright_cyan()));
    println!(
        "{}",
        format!(t!("xdebug.label.codeception_ide_key"), key = status.codeception_ide_key().bright_cyan())
    );
    println!("\n{}", t!("xdebug.hint.override"));
    println!("\n{}\n", t!("xdebug.info.path_mappings"));
    println!("  - {} => {}", status.plugins_dir.bright_cyan(), "/plugins".bright_cyan());
    println!("  - {} => {}", status.wp_dir.bright_cyan(), "/var/www/html".bright_cyan());

    if let Some(note) = xdebug::mask_note(status.default_mask) {
        println!("\n{}", note.yellow());
    }
}
