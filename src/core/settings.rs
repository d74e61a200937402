// src/core/settings.rs

use crate::core::paths::{self, PathError};
use crate::models::Settings;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not locate the settings file: {0}")]
    Path(#[from] PathError),
    #[error("Failed to parse settings file: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize settings to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Loads the user settings from the config directory.
///
/// If no settings file exists yet, a file with the default values is written
/// and those defaults are returned, so the user always has a file to edit.
pub fn load() -> Result<Settings, SettingsError> {
    let path = paths::get_settings_path()?;
    load_from(&path)
}

/// Persists the given settings to the config directory.
pub fn save(settings: &Settings) -> Result<(), SettingsError> {
    let path = paths::get_settings_path()?;
    save_to(settings, &path)
}

fn load_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        let defaults = Settings::default();
        save_to(&defaults, path)?;
        log::debug!("Created default settings file at: {}", path.display());
        return Ok(defaults);
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn save_to(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
    let toml_string = toml::to_string_pretty(settings)?;
    fs::write(path, toml_string)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_creates_default_file_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ffkit.toml");

        let settings = load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ffkit.toml");

        let mut settings = Settings::default();
        settings.auto_overwrite = false;
        settings.ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg".to_string();
        save_to(&settings, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ffkit.toml");
        fs::write(&path, "auto_overwrite = \"definitely\"").unwrap();

        assert!(matches!(
            load_from(&path),
            Err(SettingsError::TomlParse(_))
        ));
    }
}
