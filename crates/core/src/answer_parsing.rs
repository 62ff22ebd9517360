//! Vision-model answer parsing.
//!
//! The labeling model is asked free-text questions about each frame. These
//! helpers turn its answers into label values, rejecting anything outside
//! the HUD's valid ranges.

use std::sync::LazyLock;

use regex::Regex;

use crate::labels::{Scene, MAX_COINS, MAX_POSITION, MIN_POSITION};

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Asked of the full frame.
pub const SCENE_QUESTION: &str = "Is this an active mario kart race? Response yes no or unsure";

/// Asked of the bottom-right crop, where the position is drawn.
pub const POSITION_QUESTION: &str =
    "What position number (1-24) is shown? Respond with just the number or n/a if nothing is shown.";

/// Asked of the bottom-left crop, where the coin counter is drawn.
pub const COINS_QUESTION: &str =
    "How many coins are shown? Respond with just the number or n/a if nothing is shown.";

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// Interpret an answer to [`SCENE_QUESTION`].
///
/// Anything that is not a clear "yes" counts as not in race.
pub fn parse_scene(answer: &str) -> Scene {
    let normalized: String = answer
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!'))
        .collect();
    let normalized = normalized.trim();

    match normalized {
        "yes" => Scene::InRace,
        "no" | "unsure" => Scene::NotInRace,
        s if s.contains("yes") && !s.contains("no") && !s.contains("unsure") => Scene::InRace,
        _ => Scene::NotInRace,
    }
}

/// Interpret an answer to [`POSITION_QUESTION`].
pub fn parse_position(answer: &str) -> Option<i32> {
    first_number(answer).filter(|v| (MIN_POSITION..=MAX_POSITION).contains(v))
}

/// Interpret an answer to [`COINS_QUESTION`].
pub fn parse_coins(answer: &str) -> Option<i32> {
    let normalized = answer.trim().to_lowercase();
    if normalized.is_empty() || normalized.contains("n/a") || normalized.contains("nothing") {
        return None;
    }
    first_number(answer).filter(|v| (0..=MAX_COINS).contains(v))
}

/// First run of ASCII digits, if it fits in an `i32`.
fn first_number(answer: &str) -> Option<i32> {
    DIGITS_RE
        .find(answer.trim())
        .and_then(|m| m.as_str().parse().ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- parse_scene -------------------------------------------------------------

    #[test]
    fn scene_exact_answers() {
        assert_eq!(parse_scene("Yes."), Scene::InRace);
        assert_eq!(parse_scene("  no! "), Scene::NotInRace);
        assert_eq!(parse_scene("Unsure"), Scene::NotInRace);
    }

    #[test]
    fn scene_yes_inside_sentence() {
        assert_eq!(parse_scene("yes, this is a race"), Scene::InRace);
    }

    #[test]
    fn scene_ambiguous_sentence_is_not_in_race() {
        assert_eq!(parse_scene("yes or no, hard to say"), Scene::NotInRace);
        assert_eq!(parse_scene(""), Scene::NotInRace);
        assert_eq!(parse_scene("maybe"), Scene::NotInRace);
    }

    // -- parse_position ----------------------------------------------------------

    #[test]
    fn position_reads_first_number() {
        assert_eq!(parse_position("7"), Some(7));
        assert_eq!(parse_position("Position 12 of 24"), Some(12));
    }

    #[test]
    fn position_skips_non_ascii_digits() {
        assert_eq!(parse_position("\u{0663} then 5"), Some(5));
    }

    #[test]
    fn position_rejects_out_of_range() {
        assert_eq!(parse_position("0"), None);
        assert_eq!(parse_position("25"), None);
        assert_eq!(parse_position("n/a"), None);
    }

    #[test]
    fn position_rejects_overflowing_digits() {
        assert_eq!(parse_position("99999999999999"), None);
    }

    // -- parse_coins -------------------------------------------------------------

    #[test]
    fn coins_reads_zero_and_max() {
        assert_eq!(parse_coins("0"), Some(0));
        assert_eq!(parse_coins("20 coins"), Some(20));
    }

    #[test]
    fn coins_none_markers() {
        assert_eq!(parse_coins("N/A"), None);
        assert_eq!(parse_coins("nothing is shown"), None);
        assert_eq!(parse_coins("   "), None);
    }

    #[test]
    fn coins_rejects_out_of_range() {
        assert_eq!(parse_coins("21"), None);
    }
}
