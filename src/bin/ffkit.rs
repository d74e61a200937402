// src/bin/ffkit.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use ffkit::{
    cli::{Cli, handlers},
    core::settings,
    models::Settings,
    t,
};

// --- Command Definition and Registry ---

/// Defines a command, its aliases, and its synchronous handler function.
/// The handler signature is kept consistent across all commands for
/// simplicity in the registry.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut Settings) -> Result<()>,
}

/// The single source of truth for all commands. To add a new command, add a
/// new entry to this static array.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "config",
        aliases: &["cfg"],
        handler: handlers::config::handle,
    },
    CommandDefinition {
        name: "convert",
        aliases: &["conv"],
        handler: handlers::convert::handle,
    },
    CommandDefinition {
        name: "extract",
        aliases: &["audio"],
        handler: handlers::extract::handle,
    },
    CommandDefinition {
        name: "merge",
        aliases: &["concat"],
        handler: handlers::merge::handle,
    },
    CommandDefinition {
        name: "version",
        aliases: &["ver"],
        handler: handlers::version::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// The main entry point of the `ffkit` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// The main application dispatcher: first argument selects the command, the
/// rest is handed to its handler untouched. No arguments opens the menu.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut settings = settings::load()?;
    log::debug!("Settings loaded: {:?}", settings);

    let mut args = cli.args.into_iter();
    match args.next() {
        None => handlers::menu::handle(&mut settings),
        Some(action) => match find_command(&action) {
            Some(command) => (command.handler)(args.collect(), &mut settings),
            None => Err(anyhow!(t!("error.unknown_command"), command = action)),
        },
    }
}
