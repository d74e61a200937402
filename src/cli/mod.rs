use clap::Parser;

pub mod handlers;

/// ffkit: a convenient command-line toolkit for everyday ffmpeg workflows.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// The action to run, followed by its arguments. Each action documents
    /// its own flags (`ffkit convert --help`). With no action at all, ffkit
    /// opens the interactive menu.
    #[arg()]
    pub args: Vec<String>,
}
