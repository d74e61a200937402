// src/core/media.rs

use lazy_static::lazy_static;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

/// The broad classification of a filesystem path, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Directory,
    Other,
}

lazy_static! {
    static ref VIDEO_EXTENSIONS: HashSet<&'static str> = [
        "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp", "mts",
        "m2ts", "vob", "ogv", "qt", "rm", "rmvb", "asf", "swf", "f4v", "m4s",
    ]
    .into_iter()
    .collect();
    static ref AUDIO_EXTENSIONS: HashSet<&'static str> = [
        "mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "opus", "aiff", "alac", "amr", "ape",
        "au", "mid", "midi", "ra", "ram", "voc", "weba",
    ]
    .into_iter()
    .collect();
}

/// Classifies a path by its extension (case-insensitive).
///
/// An existing directory classifies as `Directory`; everything else is judged
/// purely by extension, so output paths that don't exist yet still classify.
pub fn classify(path: &Path) -> MediaKind {
    if path.is_dir() {
        return MediaKind::Directory;
    }
    match path.extension().and_then(OsStr::to_str) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            if VIDEO_EXTENSIONS.contains(ext.as_str()) {
                MediaKind::Video
            } else if AUDIO_EXTENSIONS.contains(ext.as_str()) {
                MediaKind::Audio
            } else {
                MediaKind::Other
            }
        }
        None => MediaKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn classifies_video_extensions() {
        assert_eq!(classify(Path::new("movie.mp4")), MediaKind::Video);
        assert_eq!(classify(Path::new("clips/holiday.mkv")), MediaKind::Video);
    }

    #[test]
    fn classifies_audio_extensions() {
        assert_eq!(classify(Path::new("song.mp3")), MediaKind::Audio);
        assert_eq!(classify(Path::new("album/track.flac")), MediaKind::Audio);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(classify(Path::new("video.MKV")), MediaKind::Video);
        assert_eq!(classify(Path::new("audio.WAV")), MediaKind::Audio);
    }

    #[test]
    fn unknown_or_missing_extension_is_other() {
        assert_eq!(classify(Path::new("slides.pptx")), MediaKind::Other);
        assert_eq!(classify(Path::new("LICENSE")), MediaKind::Other);
        assert_eq!(classify(Path::new("")), MediaKind::Other);
    }

    #[test]
    fn existing_directory_classifies_as_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path: PathBuf = dir.path().to_path_buf();
        assert_eq!(classify(&path), MediaKind::Directory);
    }

    #[test]
    fn nonexistent_path_with_video_extension_is_video() {
        assert_eq!(
            classify(Path::new("/definitely/not/there/out.webm")),
            MediaKind::Video
        );
    }
}
