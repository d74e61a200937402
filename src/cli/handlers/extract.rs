// src/cli/handlers/extract.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::cli::handlers::commons;
use crate::core::command;
use crate::core::media::MediaKind;
use crate::models::Settings;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Extracts the audio track from a video without re-encoding it."
)]
struct ExtractArgs {
    /// Input video file. Prompted for when omitted.
    input: Option<String>,

    /// Output audio file. Defaults to the input name with an `.m4a` extension.
    output: Option<String>,
}

pub fn handle(args: Vec<String>, settings: &mut Settings) -> Result<()> {
    let extract_args = ExtractArgs::try_parse_from(&args)?;

    let input = match &extract_args.input {
        Some(raw) => commons::expand_path(raw),
        None => commons::prompt_for_path(t!("extract.prompt.input"))?,
    };
    commons::require_existing(&input, MediaKind::Video)?;

    let output = match &extract_args.output {
        Some(raw) => commons::expand_path(raw),
        None => {
            // The stream is copied, not transcoded; m4a holds the common AAC
            // case. Callers with other codecs pass an explicit output.
            let derived = input.with_extension("m4a");
            println!(
                "{}",
                format!(t!("extract.info.default_output"), path = derived.display()).dimmed()
            );
            derived
        }
    };
    commons::require_kind(&output, MediaKind::Audio)?;

    if !commons::confirm_overwrite(&output, settings)? {
        return Ok(());
    }

    let cmd = command::extract_audio(&settings.ffmpeg_path, &input, &output);
    let result = commons::run_and_report(&cmd, settings);
    if result.success {
        Ok(())
    } else {
        Err(anyhow!(t!("common.error.command_failed")))
    }
}
