// src/models.rs

use serde::{Deserialize, Serialize};

/// User-facing settings, persisted as `ffkit.toml` in the config directory.
///
/// Missing keys take their default value, so config files written by older
/// versions keep loading after new keys are added.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Automatically answer "yes" when ffmpeg asks whether to overwrite an
    /// existing output file.
    pub auto_overwrite: bool,
    /// Print the child's complete output after a run instead of a summary.
    pub full_output: bool,
    /// The program invoked by assembled commands. May be a bare name resolved
    /// through PATH or an absolute path.
    pub ffmpeg_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_overwrite: true,
            full_output: false,
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert!(settings.auto_overwrite);
        assert!(!settings.full_output);
        assert_eq!(settings.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("full_output = true").unwrap();
        assert!(settings.full_output);
        assert!(settings.auto_overwrite);
        assert_eq!(settings.ffmpeg_path, "ffmpeg");
    }
}
