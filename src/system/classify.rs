// src/system/classify.rs
//
// Text-pattern heuristics over single completed lines of ffmpeg output. All
// three predicates are pure functions of the line, evaluated independently:
// a line may satisfy more than one of them.

/// Keywords that mark a line as an error report.
const ERROR_KEYWORDS: &[&str] = &[
    "error",
    "failed",
    "invalid",
    "unable",
    "cannot",
    "unknown",
    "not found",
    "permission denied",
    "access denied",
];

/// "Non-monotonous DTS" warnings trip the keyword net but are routine during
/// remuxing, so they are explicitly excluded.
const BENIGN_DTS_TOKEN: &str = "non-monotonous";

/// True if the line is an interactive overwrite question.
///
/// Matches the stock ffmpeg phrasing ("File 'x' already exists. Overwrite?
/// [y/N]"), bare "overwrite?" / "overwrite (y/n)" tokens, and the CJK
/// existence+overwrite phrase pair emitted by localized builds. The paired
/// checks accept the two indicators in either order.
pub fn is_overwrite_prompt(line: &str) -> bool {
    let lower = line.to_lowercase();

    if lower.contains("already exists") && lower.contains("overwrite") {
        return true;
    }
    if lower.contains("overwrite?") || lower.contains("overwrite (y/n)") {
        return true;
    }
    // Localized prompt: matched verbatim, not lowercased.
    line.contains("已存在") && line.contains("覆盖")
}

/// True if the line reports an error.
///
/// The denylist override runs after a keyword hit: a line that also carries
/// the benign DTS warning token is not an error, no matter which keyword
/// matched.
pub fn is_error_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    let keyword_hit = ERROR_KEYWORDS.iter().any(|keyword| lower.contains(keyword));
    if !keyword_hit {
        return false;
    }
    !lower.contains(BENIGN_DTS_TOKEN)
}

/// True if the line is a completion marker.
///
/// ffmpeg prints a final stream summary (`video: ... audio: ... subtitle: ...`)
/// followed by a "muxing overhead" figure; either is sufficient on its own.
pub fn is_success_marker(line: &str) -> bool {
    let lower = line.to_lowercase();

    if lower.contains("video:") && lower.contains("audio:") && lower.contains("subtitle:") {
        return true;
    }
    lower.contains("muxing overhead")
}
