use anyhow::{Result, anyhow};

use crate::{cli::handlers, state::AppState};

/// A command, its aliases and its handler. Handlers return the process exit code.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut AppState) -> Result<i32>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "use",
        aliases: &[],
        handler: handlers::target::use_target,
    },
    CommandDefinition {
        name: "using",
        aliases: &["target"],
        handler: handlers::target::using,
    },
    CommandDefinition {
        name: "npm",
        aliases: &[],
        handler: handlers::forward::npm,
    },
    CommandDefinition {
        name: "composer",
        aliases: &[],
        handler: handlers::forward::composer,
    },
    CommandDefinition {
        name: "up",
        aliases: &["start"],
        handler: handlers::stack::up,
    },
    CommandDefinition {
        name: "down",
        aliases: &["stop"],
        handler: handlers::stack::down,
    },
    CommandDefinition {
        name: "restart",
        aliases: &[],
        handler: handlers::stack::restart,
    },
    CommandDefinition {
        name: "rebuild",
        aliases: &["build"],
        handler: handlers::stack::rebuild,
    },
    CommandDefinition {
        name: "update",
        aliases: &["pull"],
        handler: handlers::stack::update,
    },
    CommandDefinition {
        name: "info",
        aliases: &["config"],
        handler: handlers::info::handle,
    },
    CommandDefinition {
        name: "xdebug",
        aliases: &["xd"],
        handler: handlers::xdebug::handle,
    },
    CommandDefinition {
        name: "clone",
        aliases: &[],
        handler: handlers::clone::handle,
    },
    CommandDefinition {
        name: "help",
        aliases: &["--help", "-h"],
        handler: handlers::help::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// True when the invocation only asks for help, which works without a tool root.
pub fn wants_help(all_args: &[String]) -> bool {
    all_args
        .first()
        .is_none_or(|first| find_command(first).is_some_and(|cmd| cmd.name == "help"))
}

/// Routes `tric <command> [args...]` to its handler and returns the exit code.
pub fn dispatch(all_args: Vec<String>, state: &mut AppState) -> Result<i32> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        return handlers::help::handle(Vec::new(), state);
    };

    let command = find_command(&name)
        .ok_or_else(|| anyhow!(t!("dispatch.error.unknown_command"), command = name))?;
    (command.handler)(args.collect(), state)
}
