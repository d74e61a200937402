// src/cli/handlers/convert.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::handlers::commons;
use crate::core::command;
use crate::core::media::{self, MediaKind};
use crate::models::Settings;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Converts a video file (or every video under a directory) to another container format."
)]
struct ConvertArgs {
    /// Input video file. Prompted for when omitted.
    input: Option<String>,

    /// Output video file. Prompted for when omitted.
    output: Option<String>,

    /// Convert every video file under this directory instead of a single file.
    #[arg(long, conflicts_with_all = ["input", "output"])]
    dir: Option<String>,

    /// Target container extension for --dir mode.
    #[arg(long, default_value = "mp4")]
    to: String,
}

pub fn handle(args: Vec<String>, settings: &mut Settings) -> Result<()> {
    let convert_args = ConvertArgs::try_parse_from(&args)?;

    if let Some(dir) = &convert_args.dir {
        let dir = commons::expand_path(dir);
        return convert_directory(&dir, &convert_args.to, settings);
    }

    let input = match &convert_args.input {
        Some(raw) => commons::expand_path(raw),
        None => commons::prompt_for_path(t!("convert.prompt.input"))?,
    };
    commons::require_existing(&input, MediaKind::Video)?;

    let output = match &convert_args.output {
        Some(raw) => commons::expand_path(raw),
        None => commons::prompt_for_path(t!("convert.prompt.output"))?,
    };
    commons::require_kind(&output, MediaKind::Video)?;
    if input == output {
        return Err(anyhow!(t!("convert.error.same_path")));
    }

    if !commons::confirm_overwrite(&output, settings)? {
        return Ok(());
    }

    let cmd = command::convert(&settings.ffmpeg_path, &input, &output);
    let result = commons::run_and_report(&cmd, settings);
    if result.success {
        Ok(())
    } else {
        Err(anyhow!(t!("common.error.command_failed")))
    }
}

/// Converts every video under `dir` to the `target_ext` container, writing
/// each output next to its input. Files already in the target container are
/// skipped, as are files whose output exists when auto-overwrite is off.
fn convert_directory(dir: &Path, target_ext: &str, settings: &Settings) -> Result<()> {
    if media::classify(dir) != MediaKind::Directory {
        return Err(anyhow!(t!("convert.error.not_a_directory"), path = dir.display()));
    }
    let probe = PathBuf::from(format!("probe.{target_ext}"));
    if media::classify(&probe) != MediaKind::Video {
        return Err(anyhow!(t!("convert.error.bad_target_ext"), ext = target_ext));
    }

    let target_ext_lower = target_ext.to_lowercase();
    let mut converted = 0u32;
    let mut failed = 0u32;
    let mut skipped = 0u32;

    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !entry.file_type().is_file() || media::classify(path) != MediaKind::Video {
            continue;
        }
        let current_ext = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase);
        if current_ext.as_deref() == Some(target_ext_lower.as_str()) {
            continue;
        }

        let output = path.with_extension(target_ext);
        if output.exists() && !settings.auto_overwrite {
            println!(
                "{}",
                format!(t!("convert.info.batch_skip_existing"), path = path.display()).yellow()
            );
            skipped += 1;
            continue;
        }

        let cmd = command::convert(&settings.ffmpeg_path, path, &output);
        if commons::run_and_report(&cmd, settings).success {
            converted += 1;
        } else {
            failed += 1;
        }
    }

    println!(
        "{}",
        format_args!(
            t!("convert.info.batch_summary"),
            converted = converted,
            failed = failed,
            skipped = skipped
        )
    );
    if failed > 0 {
        Err(anyhow!(t!("convert.error.batch_failures"), count = failed))
    } else {
        Ok(())
    }
}
