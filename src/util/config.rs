//! Configuration file parsing utilities.
//!
//! This module provides helpers for parsing `key = value` configuration files
//! with comment skipping and inline comment removal.

/// What: Check if a line should be skipped (empty or comment).
///
/// Inputs:
/// - `line`: Line to check
///
/// Output:
/// - `true` if the line should be skipped, `false` otherwise
///
/// Details:
/// - Skips empty lines and lines starting with `#`, `//`, or `;`
#[must_use]
pub fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Parse a key-value pair from a line.
///
/// Inputs:
/// - `line`: Line containing key=value format
///
/// Output:
/// - `Some((key, value))` if parsing succeeds, `None` otherwise
///
/// Details:
/// - Splits on the first `=` character
/// - Trims whitespace from both key and value and drops an inline comment from the value
#[must_use]
pub fn parse_key_value(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), strip_inline_comment(value).to_string()))
}

/// What: Remove an inline ` # comment` from a configuration value.
///
/// Inputs:
/// - `s`: Raw value text.
///
/// Output:
/// - Comment-free and trimmed substring of the input.
///
/// Details:
/// - Only a `#` preceded by whitespace starts a comment, so URLs and label
///   text such as `P1: This Release/Iteration` survive intact.
#[must_use]
pub fn strip_inline_comment(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return s[..i].trim();
        }
    }
    s.trim()
}
