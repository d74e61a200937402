// src/cli/handlers/config.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::core::{paths, settings};
use crate::models::Settings;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows the persisted settings, or updates one of them."
)]
struct ConfigArgs {
    /// Setting to change: `auto_overwrite`, `full_output`, or `ffmpeg_path`.
    key: Option<String>,

    /// New value for the setting.
    value: Option<String>,
}

pub fn handle(args: Vec<String>, settings: &mut Settings) -> Result<()> {
    let config_args = ConfigArgs::try_parse_from(&args)?;

    match (config_args.key, config_args.value) {
        (None, _) => show(settings),
        (Some(key), None) => Err(anyhow!(t!("config.error.missing_value"), key = key)),
        (Some(key), Some(value)) => {
            apply(settings, &key, &value)?;
            settings::save(settings).context(t!("config.error.save_failed"))?;
            println!(
                "{}",
                format!(t!("config.success.updated"), key = key).green()
            );
            Ok(())
        }
    }
}

fn show(settings: &Settings) -> Result<()> {
    println!("{}", t!("config.info.header").bold());
    println!("  auto_overwrite = {}", settings.auto_overwrite);
    println!("  full_output    = {}", settings.full_output);
    println!("  ffmpeg_path    = {}", settings.ffmpeg_path);
    if let Ok(path) = paths::get_settings_path() {
        println!(
            "\n{}",
            format!(t!("config.info.file_location"), path = path.display()).dimmed()
        );
    }
    Ok(())
}

fn apply(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "auto_overwrite" => settings.auto_overwrite = parse_bool(value)?,
        "full_output" => settings.full_output = parse_bool(value)?,
        "ffmpeg_path" => settings.ffmpeg_path = value.to_string(),
        _ => return Err(anyhow!(t!("config.error.unknown_key"), key = key)),
    }
    Ok(())
}

/// Accepts the truthy/falsy spellings common in hand-edited config files.
fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(anyhow!(t!("config.error.bad_bool"), value = other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for value in ["true", "1", "yes", "on", "YES", " On "] {
            assert!(parse_bool(value).unwrap(), "{value} should be true");
        }
        for value in ["false", "0", "no", "off", "OFF"] {
            assert!(!parse_bool(value).unwrap(), "{value} should be false");
        }
    }

    #[test]
    fn parse_bool_rejects_garbage() {
        assert!(parse_bool("definitely").is_err());
    }

    #[test]
    fn apply_updates_known_keys() {
        let mut settings = Settings::default();
        apply(&mut settings, "auto_overwrite", "false").unwrap();
        assert!(!settings.auto_overwrite);
        apply(&mut settings, "ffmpeg_path", "/usr/local/bin/ffmpeg").unwrap();
        assert_eq!(settings.ffmpeg_path, "/usr/local/bin/ffmpeg");
    }

    #[test]
    fn apply_rejects_unknown_keys() {
        let mut settings = Settings::default();
        assert!(apply(&mut settings, "volume", "11").is_err());
    }
}
