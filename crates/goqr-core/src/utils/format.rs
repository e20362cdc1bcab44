use std::fmt;

use chrono::{TimeZone, Utc};

/// Format an epoch timestamp as `H:MM:SS` wall-clock time in `tz`.
/// Hours are unpadded; minutes and seconds always take two digits.
pub fn format_clock_time<Tz: TimeZone>(epoch_seconds: i64, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match Utc.timestamp_opt(epoch_seconds, 0).single() {
        Some(dt) => dt.with_timezone(tz).format("%-H:%M:%S").to_string(),
        None => format!("@{}", epoch_seconds),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Make a slug safe to embed in a file name.
/// Anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_file_component(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // No hidden files or parent-directory tricks
    let rest = cleaned.trim_start_matches('.');
    if rest.is_empty() {
        "_".to_string()
    } else if rest.len() != cleaned.len() {
        format!("_{}", rest)
    } else {
        cleaned
    }
}
