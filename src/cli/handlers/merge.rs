// src/cli/handlers/merge.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::io::Write;

use crate::cli::handlers::commons;
use crate::core::command;
use crate::core::media::MediaKind;
use crate::models::Settings;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Concatenates several videos into one file without re-encoding."
)]
struct MergeArgs {
    /// Video files to concatenate, in playback order. Prompted for when omitted.
    inputs: Vec<String>,

    /// Output video file. Prompted for when omitted.
    #[arg(long, short)]
    output: Option<String>,
}

pub fn handle(args: Vec<String>, settings: &mut Settings) -> Result<()> {
    let merge_args = MergeArgs::try_parse_from(&args)?;

    let inputs = if merge_args.inputs.is_empty() {
        commons::prompt_for_paths(t!("merge.prompt.inputs"))?
    } else {
        merge_args
            .inputs
            .iter()
            .map(|raw| commons::expand_path(raw))
            .collect()
    };
    if inputs.len() < 2 {
        return Err(anyhow!(t!("merge.error.need_two")));
    }
    for input in &inputs {
        commons::require_existing(input, MediaKind::Video)?;
    }

    let output = match &merge_args.output {
        Some(raw) => commons::expand_path(raw),
        None => commons::prompt_for_path(t!("merge.prompt.output"))?,
    };
    commons::require_kind(&output, MediaKind::Video)?;

    if !commons::confirm_overwrite(&output, settings)? {
        return Ok(());
    }

    // The concat demuxer resolves relative entries against the list file's
    // directory, so every entry is written as an absolute path.
    let mut list = tempfile::Builder::new()
        .prefix("ffkit-concat-")
        .suffix(".txt")
        .tempfile()
        .context(t!("merge.error.list_file"))?;
    for input in &inputs {
        let absolute = dunce::canonicalize(input).unwrap_or_else(|_| input.clone());
        list.write_all(command::concat_list_entry(&absolute).as_bytes())
            .context(t!("merge.error.list_file"))?;
    }
    list.flush().context(t!("merge.error.list_file"))?;
    log::debug!("Concat list written to: {}", list.path().display());

    let cmd = command::merge(&settings.ffmpeg_path, list.path(), &output);
    let result = commons::run_and_report(&cmd, settings);
    if result.success {
        Ok(())
    } else {
        Err(anyhow!(t!("common.error.command_failed")))
    }
}
