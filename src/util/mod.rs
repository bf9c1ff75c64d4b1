//! Small utility helpers for configuration parsing, text fitting and time formatting.

pub mod config;

use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// What: Format a Bugzilla ISO-8601 timestamp as `YYYY-MM-DD HH:MM`.
///
/// Inputs:
/// - `raw`: Timestamp such as `2020-04-07T09:13:25Z`.
///
/// Output:
/// - Formatted UTC minute-resolution string, or the raw input when it does not parse.
#[must_use]
pub fn format_bug_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// What: Truncate text to a display width, appending an ellipsis when cut.
///
/// Inputs:
/// - `s`: Text to fit.
/// - `max`: Maximum display width in terminal cells.
///
/// Output:
/// - The original text when it fits; otherwise a prefix ending in `…`.
///
/// Details:
/// - Uses `unicode-width` so CJK and emoji count as their real cell width.
#[must_use]
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Bugzilla timestamps render at minute resolution in UTC.
    ///
    /// Inputs:
    /// - A `Z` timestamp, an offset timestamp and garbage.
    ///
    /// Output:
    /// - Normalized strings; garbage is returned untouched.
    fn util_format_bug_time() {
        assert_eq!(format_bug_time("2020-04-07T09:13:25Z"), "2020-04-07 09:13");
        assert_eq!(
            format_bug_time("2020-04-07T09:13:25+02:00"),
            "2020-04-07 07:13"
        );
        assert_eq!(format_bug_time("yesterday"), "yesterday");
    }

    #[test]
    /// What: Width truncation keeps short text and ellipsizes long text.
    fn util_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_to_width("abc", 0), "");
        // Wide characters take two cells each
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }
}
