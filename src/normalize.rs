//! Lookup-word normalization.
//!
//! Remote dictionary slugs and cache keys must agree on one canonical form of
//! a word, or the same word would be fetched and cached under several keys.
//! We decompose to NFD, drop combining marks, fold the stragglers NFD can't
//! reduce, lowercase, and keep only `[a-z0-9'-]`.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical cache-key form of a word.
pub fn normalize_word(word: &str) -> String {
    word.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(fold_special)
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '\'' || *c == '-')
        .collect()
}

/// URL slug: the normalized word with internal spaces as hyphens.
///
/// Multi-word phrases reach this through the lookup API as a single string;
/// the remote dictionary addresses them hyphen-joined.
pub fn slug(word: &str) -> String {
    word.trim()
        .split_whitespace()
        .map(normalize_word)
        .collect::<Vec<_>>()
        .join("-")
}

/// Matching form used when comparing a displayed headword against a request:
/// the normalized word with apostrophes and hyphens dropped as well, so
/// "dont" matches the headword "don't" and "giveup" matches "give-up".
pub fn match_key(word: &str) -> String {
    word.split_whitespace()
        .map(normalize_word)
        .collect::<String>()
        .replace(['\'', '-'], "")
}

/// Accented consonants with no NFD decomposition.
fn fold_special(c: char) -> char {
    match c {
        'ł' | 'Ł' => 'l',
        'đ' | 'Đ' => 'd',
        other => other,
    }
}
