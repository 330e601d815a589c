//! Line-ending normalization for the output boundary.

/// Normalizes all line endings in `content` to LF.
///
/// CRLF becomes LF first, then any remaining lone CR becomes LF. Parsing
/// and matching always operate on the raw input; normalization is applied
/// only when producing final output, so diffs stay stable across platforms.
#[must_use]
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
