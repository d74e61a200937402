// src/core/paths.rs

use crate::constants::SETTINGS_FILENAME;
use lazy_static::lazy_static;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref FFKIT_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path to the ffkit configuration directory (`~/.config/ffkit`).
/// Creates it if it doesn't exist.
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value instantly.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = FFKIT_CONFIG_DIR.lock().unwrap();

    // If the path is already cached, clone it and return immediately.
    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    // 1. Find the system's generic config directory.
    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join("ffkit");

    // 2. Ensure the directory exists on the filesystem.
    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    // 3. Store the computed path in the cache for future calls.
    *cached_path_guard = Some(config_path.clone());

    Ok(config_path)
}

/// Returns the path to the `ffkit.toml` settings file.
pub fn get_settings_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}
