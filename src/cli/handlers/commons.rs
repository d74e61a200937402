// src/cli/handlers/commons.rs

// This module contains shared functions used by multiple handlers.

use crate::core::media::{self, MediaKind};
use crate::models::Settings;
use crate::system::executor::{ExecutionRequest, ExecutionResult, FfmpegExecutor};
use anyhow::{Result, anyhow};
use colored::Colorize;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Maximum number of empty answers tolerated before a path prompt gives up.
const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Asks the user for a single path, expanding `~` and environment variables.
/// Empty answers are retried a few times before aborting.
pub fn prompt_for_path(prompt: &str) -> Result<PathBuf> {
    for _ in 0..MAX_PROMPT_ATTEMPTS {
        let raw: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            println!("{}", t!("common.warn.empty_path").yellow());
            continue;
        }
        return Ok(expand_path(trimmed));
    }
    Err(anyhow!(t!("common.error.max_attempts")))
}

/// Asks the user for an ordered list of paths, one per line; an empty line
/// finishes the list.
pub fn prompt_for_paths(prompt: &str) -> Result<Vec<PathBuf>> {
    println!("{}", prompt);
    println!("{}", t!("common.info.multi_path_hint").dimmed());

    let mut paths = Vec::new();
    loop {
        let label = format!(t!("common.prompt.file_numbered"), index = paths.len() + 1);
        let raw: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            break;
        }
        paths.push(expand_path(trimmed));
    }
    Ok(paths)
}

/// Expands `~` and environment variables, then strips Windows verbatim
/// prefixes so paths display and compare cleanly.
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded: Cow<'_, str> = shellexpand::full(raw).unwrap_or(Cow::Borrowed(raw));
    dunce::simplified(Path::new(expanded.as_ref())).to_path_buf()
}

/// Validates that `path` exists and is of the expected kind.
pub fn require_existing(path: &Path, kind: MediaKind) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!(t!("common.error.path_missing"), path = path.display()));
    }
    require_kind(path, kind)
}

/// Validates the extension of `path` against the expected kind. The file
/// itself need not exist, so output paths can be checked too.
pub fn require_kind(path: &Path, kind: MediaKind) -> Result<()> {
    if media::classify(path) != kind {
        return Err(anyhow!(
            t!("common.error.wrong_kind"),
            path = path.display(),
            expected = kind_label(kind)
        ));
    }
    Ok(())
}

fn kind_label(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Video => t!("media.kind.video"),
        MediaKind::Audio => t!("media.kind.audio"),
        MediaKind::Directory => t!("media.kind.directory"),
        MediaKind::Other => t!("media.kind.other"),
    }
}

/// Pre-flight check for an output path. With auto-overwrite enabled the
/// engine answers ffmpeg's own prompt, so nothing is asked here. Returns
/// false when the user declined.
pub fn confirm_overwrite(path: &Path, settings: &Settings) -> Result<bool> {
    if !path.exists() || settings.auto_overwrite {
        return Ok(true);
    }
    let proceed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(t!("common.prompt.overwrite"), path = path.display()))
        .default(false)
        .interact()?;
    if !proceed {
        println!("{}", t!("common.info.operation_cancelled"));
    }
    Ok(proceed)
}

/// Prints the command, runs it through the engine, and reports the outcome.
pub fn run_and_report(command: &str, settings: &Settings) -> ExecutionResult {
    println!("{} {}", "→".blue(), command.green());

    let executor = FfmpegExecutor::new();
    let result = executor.execute(ExecutionRequest::new(command, settings.auto_overwrite));
    log::debug!(
        "Command finished: exit_code={}, success={}, {} output bytes",
        result.exit_code,
        result.success,
        result.output.len()
    );

    if settings.full_output && !result.output.is_empty() {
        print_divider();
        println!("{}", result.output);
        print_divider();
    }
    if result.overwrite_confirmed {
        println!("{}", t!("common.info.overwrite_confirmed").dimmed());
    }
    if result.success {
        println!("{} {}", "✔".green(), t!("common.success").green());
    } else {
        println!(
            "{} {}",
            "✖".red(),
            format_args!(t!("common.failure"), code = result.exit_code)
        );
        if !result.error.is_empty() {
            println!("  {}", result.error.red());
        }
    }
    result
}

/// Prints a horizontal divider around verbose output blocks.
pub fn print_divider() {
    println!("{}", "-".repeat(66).dimmed());
}
