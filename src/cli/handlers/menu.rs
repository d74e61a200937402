// src/cli/handlers/menu.rs

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Select, theme::ColorfulTheme};

use crate::cli::handlers;
use crate::models::Settings;

/// The interactive main menu, shown when ffkit is started without arguments.
/// Each selection runs the matching handler in interactive mode; errors are
/// printed and the menu comes back, so one failed conversion doesn't end the
/// session.
pub fn handle(settings: &mut Settings) -> Result<()> {
    println!("{}", t!("menu.header").bold());

    let items = [
        t!("menu.item.convert"),
        t!("menu.item.extract"),
        t!("menu.item.merge"),
        t!("menu.item.version"),
        t!("menu.item.config"),
        t!("menu.item.quit"),
    ];

    loop {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("menu.prompt"))
            .items(&items)
            .default(0)
            .interact_opt()?;

        let outcome = match selection {
            Some(0) => handlers::convert::handle(Vec::new(), settings),
            Some(1) => handlers::extract::handle(Vec::new(), settings),
            Some(2) => handlers::merge::handle(Vec::new(), settings),
            Some(3) => handlers::version::handle(Vec::new(), settings),
            Some(4) => handlers::config::handle(Vec::new(), settings),
            // "Quit", or Esc.
            _ => {
                println!("{}", t!("menu.info.goodbye"));
                return Ok(());
            }
        };

        if let Err(e) = outcome {
            eprintln!("\n{}: {}", "Error".red().bold(), e);
        }
        println!();
    }
}
