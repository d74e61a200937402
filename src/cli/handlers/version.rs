// src/cli/handlers/version.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;

use crate::cli::handlers::commons;
use crate::core::command;
use crate::models::Settings;
use crate::system::executor::{ExecutionRequest, FfmpegExecutor};

lazy_static! {
    static ref VERSION_RE: Regex = Regex::new(r"ffmpeg version (\S+)").unwrap();
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows the installed ffmpeg version.")]
struct VersionArgs {
    /// Print the complete version banner regardless of the `full_output` setting.
    #[arg(long)]
    full: bool,
}

pub fn handle(args: Vec<String>, settings: &mut Settings) -> Result<()> {
    let version_args = VersionArgs::try_parse_from(&args)?;

    println!("{}", t!("version.info.checking").dimmed());
    let cmd = command::version(&settings.ffmpeg_path);
    let executor = FfmpegExecutor::new();
    // The banner probe never asks questions, so the auto-respond policy is off.
    let result = executor.execute(ExecutionRequest::new(&cmd, false));

    if !result.success {
        log::debug!("Version probe failed: {}", result.error);
        return Err(anyhow!(
            t!("version.error.not_available"),
            program = settings.ffmpeg_path
        ));
    }

    match VERSION_RE.captures(&result.output).and_then(|c| c.get(1)) {
        Some(version) => println!(
            "{} {}",
            t!("version.info.found").green(),
            version.as_str().bold()
        ),
        None => println!("{}", t!("version.info.unrecognized_banner").yellow()),
    }

    if version_args.full || settings.full_output {
        commons::print_divider();
        println!("{}", result.output);
        commons::print_divider();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_regex_extracts_version_number() {
        let banner = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023 the FFmpeg developers";
        let captured = VERSION_RE
            .captures(banner)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        assert_eq!(captured, Some("6.1.1-3ubuntu5"));
    }

    #[test]
    fn banner_regex_rejects_unrelated_output() {
        assert!(VERSION_RE.captures("command not found").is_none());
    }
}
