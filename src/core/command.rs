// src/core/command.rs
//
// Assembles the ffmpeg command lines offered by the CLI. Every path is quoted
// so the assembled string survives the engine's tokenizer round-trip even when
// paths contain spaces.

use std::borrow::Cow;
use std::path::Path;

/// Quotes a single command-line word if it needs quoting.
fn quote(word: &str) -> String {
    match shlex::try_quote(word) {
        Ok(quoted) => quoted.into_owned(),
        // A word containing a NUL byte cannot be quoted; pass it through and
        // let the spawn fail with a descriptive error instead.
        Err(_) => word.to_string(),
    }
}

fn quote_path(path: &Path) -> String {
    let word: Cow<'_, str> = path.to_string_lossy();
    quote(&word)
}

/// `<ffmpeg> -i <input> <output>` — container conversion.
pub fn convert(ffmpeg: &str, input: &Path, output: &Path) -> String {
    format!(
        "{} -i {} {}",
        quote(ffmpeg),
        quote_path(input),
        quote_path(output)
    )
}

/// `<ffmpeg> -i <input> -vn -acodec copy <output>` — audio extraction.
pub fn extract_audio(ffmpeg: &str, input: &Path, output: &Path) -> String {
    format!(
        "{} -i {} -vn -acodec copy {}",
        quote(ffmpeg),
        quote_path(input),
        quote_path(output)
    )
}

/// `<ffmpeg> -f concat -safe 0 -i <list> -c copy <output>` — lossless merge
/// via the concat demuxer. `list` is a file of `file '<path>'` entries.
pub fn merge(ffmpeg: &str, list: &Path, output: &Path) -> String {
    format!(
        "{} -f concat -safe 0 -i {} -c copy {}",
        quote(ffmpeg),
        quote_path(list),
        quote_path(output)
    )
}

/// `<ffmpeg> -version` — the banner probe.
pub fn version(ffmpeg: &str) -> String {
    format!("{} -version", quote(ffmpeg))
}

/// Renders one entry of a concat demuxer list file. Single quotes inside the
/// path use the demuxer's `'\''` escape.
pub fn concat_list_entry(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', "'\\''");
    format!("file '{}'\n", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_assembles_in_order() {
        let cmd = convert("ffmpeg", Path::new("in.avi"), Path::new("out.mp4"));
        assert_eq!(cmd, "ffmpeg -i in.avi out.mp4");
    }

    #[test]
    fn paths_with_spaces_are_quoted() {
        let cmd = convert(
            "ffmpeg",
            Path::new("my movie.avi"),
            Path::new("out dir/result.mp4"),
        );
        let words = shlex::split(&cmd).unwrap();
        assert_eq!(
            words,
            vec!["ffmpeg", "-i", "my movie.avi", "out dir/result.mp4"]
        );
    }

    #[test]
    fn extract_audio_uses_copy_codec() {
        let cmd = extract_audio("ffmpeg", Path::new("talk.mp4"), Path::new("talk.m4a"));
        assert_eq!(cmd, "ffmpeg -i talk.mp4 -vn -acodec copy talk.m4a");
    }

    #[test]
    fn merge_uses_concat_demuxer() {
        let cmd = merge("ffmpeg", Path::new("/tmp/list.txt"), Path::new("all.mp4"));
        assert_eq!(cmd, "ffmpeg -f concat -safe 0 -i /tmp/list.txt -c copy all.mp4");
    }

    #[test]
    fn custom_ffmpeg_path_is_quoted() {
        let cmd = version("/opt/ff tools/ffmpeg");
        let words = shlex::split(&cmd).unwrap();
        assert_eq!(words, vec!["/opt/ff tools/ffmpeg", "-version"]);
    }

    #[test]
    fn concat_entry_escapes_single_quotes() {
        let entry = concat_list_entry(Path::new("it's.mp4"));
        assert_eq!(entry, "file 'it'\\''s.mp4'\n");
    }
}
