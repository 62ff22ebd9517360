//! Formatting helpers for race timestamps and finishing positions.

use crate::types::Seconds;

/// Format seconds as `m:ss.s`, e.g. `83.25` → `"1:23.3"`.
pub fn format_timestamp(secs: Seconds) -> String {
    let minutes = (secs / 60.0).floor();
    let rem = secs - minutes * 60.0;
    format!("{minutes}:{rem:04.1}")
}

/// English ordinal for a position, `"?"` when unknown.
pub fn ordinal(n: Option<i64>) -> String {
    let Some(n) = n else {
        return "?".to_string();
    };
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
