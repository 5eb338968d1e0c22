//! Utterance stitching
//!
//! The CWPC export stores one row per verb with a window of surrounding text.
//! Utterance boundaries inside the windows are marked with `#`. The utterance
//! containing the verb is the tail of the preceding window after its last
//! marker, the verb itself, and the head of the following window up to its
//! first marker.

/// Utterance boundary marker in context windows
pub const BOUNDARY_MARKER: char = '#';

/// Start of the utterance inside the preceding window
///
/// One past the last marker, or 0 when the window has none (corpus-initial
/// text).
fn span_start(preceding: &str) -> usize {
    preceding
        .rfind(BOUNDARY_MARKER)
        .map(|pos| pos + BOUNDARY_MARKER.len_utf8())
        .unwrap_or(0)
}

/// End of the utterance inside the following window
fn span_end(following: &str) -> usize {
    following.find(BOUNDARY_MARKER).unwrap_or(following.len())
}

/// Build the utterance text around `verb`
///
/// Missing windows are treated as empty.
pub fn stitch(preceding: Option<&str>, verb: &str, following: Option<&str>) -> String {
    let preceding = preceding.unwrap_or("");
    let following = following.unwrap_or("");

    let head = &preceding[span_start(preceding)..];
    let tail = &following[..span_end(following)];

    let mut utterance = String::with_capacity(head.len() + verb.len() + tail.len());
    utterance.push_str(head);
    utterance.push_str(verb);
    utterance.push_str(tail);
    utterance
}

/// Translate the export's sex glyphs to single-letter codes
///
/// Values other than `男`/`女` pass through unchanged.
pub fn translate_sex(sex: Option<String>) -> Option<String> {
    match sex.as_deref() {
        Some("男") => Some("M".to_string()),
        Some("女") => Some("F".to_string()),
        _ => sex,
    }
}
