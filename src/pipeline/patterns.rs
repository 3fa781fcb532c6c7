//! Line-level text predicates shared by the classifiers.
//!
//! Each predicate is a small named function over a pre-compiled pattern so
//! the classifiers read as a sequence of rules.

use regex::Regex;
use std::sync::LazyLock;

/// One or more dot-separated integers followed by whitespace: `3 `, `2.1 `.
static RE_OUTLINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*\s").expect("valid outline prefix regex"));
/// Exactly `integer.integer` at the start of the line, nothing required after.
static RE_TWO_LEVEL_OUTLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+").expect("valid two-level outline regex"));
static RE_NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid numeric token regex"));
static RE_TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*$").expect("valid trailing number regex"));
static RE_COLUMN_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid column gap regex"));

/// True when the line has at least one cased character and none in lower
/// or title case.
///
/// `"OVERVIEW"` and `"2.1 RISK"` qualify; `"2024"` and `"ǅA"` do not.
pub fn is_all_upper(line: &str) -> bool {
    let mut has_upper = false;
    for c in line.chars() {
        if c.is_lowercase() || is_titlecase(c) {
            return false;
        }
        has_upper |= c.is_uppercase();
    }
    has_upper
}

/// Title-case letters (`ǅ`, `ǈ`, `ǋ`, ...) are cased but neither upper nor
/// lower, and change under upper-casing.
fn is_titlecase(c: char) -> bool {
    c.is_alphabetic()
        && !c.is_uppercase()
        && !c.is_lowercase()
        && !c.to_uppercase().eq(std::iter::once(c))
}

/// True when the line opens with a numeric outline marker followed by whitespace.
pub fn has_outline_prefix(line: &str) -> bool {
    RE_OUTLINE_PREFIX.is_match(line)
}

/// True when the line opens with a two-level outline number such as `2.1`.
pub fn has_two_level_outline(line: &str) -> bool {
    RE_TWO_LEVEL_OUTLINE.is_match(line)
}

/// Number of integer or decimal tokens anywhere in the line.
///
/// Tokens are matched inside words too, so `12%` and `FY2024` each count once.
pub fn count_numeric_tokens(line: &str) -> usize {
    RE_NUMERIC_TOKEN.find_iter(line).count()
}

/// True when the line ends in a numeric value (`45.2`, `30`, `7.`).
pub fn ends_with_number(line: &str) -> bool {
    RE_TRAILING_NUMBER.is_match(line)
}

/// Split a row on runs of two or more whitespace characters.
pub fn split_columns(line: &str) -> Vec<String> {
    RE_COLUMN_GAP.split(line).map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_all_upper() {
        assert!(is_all_upper("OVERVIEW"));
        assert!(is_all_upper("FUND FACTS"));
        assert!(is_all_upper("3 PORTFOLIO HOLDINGS"));
        assert!(is_all_upper("ÉTATS FINANCIERS"));
        assert!(!is_all_upper("Overview"));
        assert!(!is_all_upper("2024 12.5"));
        assert!(!is_all_upper(""));
        assert!(!is_all_upper("ǅA"));
        assert!(!is_all_upper("ǈUBLJANA FUND"));
        assert!(is_all_upper("ǄA"));
        assert!(is_all_upper("基金 OVERVIEW"));
    }

    #[test]
    fn test_outline_prefix() {
        assert!(has_outline_prefix("3 Introduction"));
        assert!(has_outline_prefix("2.1 Overview"));
        assert!(has_outline_prefix("1.2.3 Detail"));
        assert!(!has_outline_prefix("2.1"));
        assert!(!has_outline_prefix("2.1Overview"));
        assert!(!has_outline_prefix("Section 3 intro"));
    }

    #[test]
    fn test_two_level_outline() {
        assert!(has_two_level_outline("2.1"));
        assert!(has_two_level_outline("2.1Overview"));
        assert!(has_two_level_outline("10.25 x"));
        assert!(!has_two_level_outline("2 Overview"));
        assert!(!has_two_level_outline("v2.1"));
    }

    #[test]
    fn test_count_numeric_tokens() {
        assert_eq!(count_numeric_tokens("1.5 2.0 3.5 text"), 3);
        assert_eq!(count_numeric_tokens("Revenue grew by 12% this quarter"), 1);
        assert_eq!(count_numeric_tokens("no digits here"), 0);
        assert_eq!(count_numeric_tokens("2024-05-31"), 3);
    }

    #[test]
    fn test_ends_with_number() {
        assert!(ends_with_number("Equity    45.2"));
        assert!(ends_with_number("8.3"));
        assert!(ends_with_number("Item 7."));
        assert!(!ends_with_number("Growth"));
        assert!(!ends_with_number("12%"));
    }

    #[test]
    fn test_split_columns() {
        assert_eq!(split_columns("Revenue   12.5"), vec!["Revenue", "12.5"]);
        assert_eq!(split_columns("Net assets  Cr  1,204.5"), vec!["Net assets", "Cr", "1,204.5"]);
        assert_eq!(split_columns("Growth 8.3"), vec!["Growth 8.3"]);
        assert_eq!(split_columns("a\t\tb"), vec!["a", "b"]);
    }
}
