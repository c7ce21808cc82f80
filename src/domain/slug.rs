//! URL slugs for product names

use regex::Regex;
use std::sync::OnceLock;

/// Characters turned into hyphens before filtering
const SEPARATORS: &[char] = &[
    ' ', '/', '\\', '_', ',', '.', '(', ')', '[', ']', '{', '}', '+', '&', ':', ';', '!', '?', '@',
    '#', '$', '%', '^', '*', '=', '|', '<', '>', '~', '`', '\'',
];

fn hyphen_run_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"-{2,}").unwrap())
}

/// Anything outside letters, numbers and `-`. Combining marks are dropped too.
fn disallowed_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^\p{L}\p{N}-]+").unwrap())
}

/// Build a slug from a display name.
///
/// Lowercases, maps separators to `-`, drops anything that is not a letter,
/// number or `-`, collapses hyphen runs and trims hyphens at both ends.
pub fn make_slug(name: &str) -> String {
    let mapped: String = name
        .to_lowercase()
        .chars()
        .map(|c| if SEPARATORS.contains(&c) { '-' } else { c })
        .collect();
    let filtered = disallowed_regex().replace_all(&mapped, "");

    hyphen_run_regex()
        .replace_all(&filtered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_with_punctuation() {
        assert_eq!(make_slug("Kursi Makan (Set)/2"), "kursi-makan-set-2");
    }

    #[test]
    fn test_slug_collapses_and_trims() {
        assert_eq!(make_slug("  --Meja__Tamu--  "), "meja-tamu");
        assert_eq!(make_slug("Sofa, 3 Seater & Pillow!"), "sofa-3-seater-pillow");
    }

    #[test]
    fn test_slug_drops_unmapped_symbols() {
        // '"' and '-' handling: quotes vanish, hyphens survive
        assert_eq!(make_slug("Lampu \"Gantung\" - Rotan"), "lampu-gantung-rotan");
    }

    #[test]
    fn test_slug_keeps_unicode_letters() {
        assert_eq!(make_slug("Café Chair"), "café-chair");
    }

    #[test]
    fn test_slug_drops_combining_marks() {
        assert_eq!(make_slug("हिंदी मेज"), "हद-मज");
        assert_eq!(make_slug("ไม้สัก"), "ไมสก");
        // decomposed e + U+0301 loses the accent, precomposed é keeps it
        assert_eq!(make_slug("Cafe\u{301} Chair"), "cafe-chair");
    }

    #[test]
    fn test_slug_empty() {
        assert_eq!(make_slug(""), "");
        assert_eq!(make_slug("()/[]"), "");
    }
}
