//! Word-level resolution: dictionary hit, hyphen split, prefix rules, and
//! two-way compound decomposition, falling back to the literal token.
//!
//! `resolve` is a total function; it never fails. An unresolvable token is
//! returned verbatim, which callers can read as a visible "miss" signal. The
//! dictionary is an explicit parameter so resolution stays a pure function of
//! index + input (and tests can inject tiny fake dictionaries).

use crate::dictionary::DictionaryIndex;
use crate::transcribe::transcribe;

/// A morphological prefix with a fixed IPA rendering, applied when the
/// remainder of the token resolves on its own.
struct PrefixRule {
    prefix: &'static str,
    ipa: &'static str,
}

// Kept deliberately small. A rule only fires when the stripped remainder
// resolves to a real transcription, so these never touch dictionary words.
const PREFIX_RULES: &[PrefixRule] = &[PrefixRule {
    prefix: "un",
    ipa: "ʌn",
}];

/// Shortest left half considered during compound decomposition.
const MIN_COMPOUND_HEAD: usize = 3;

/// Shortest right half considered during compound decomposition.
const MIN_COMPOUND_TAIL: usize = 2;

/// Resolve one token to IPA.
///
/// Attempt order: direct dictionary hit, hyphen split, prefix rule, two-way
/// compound decomposition, literal passthrough.
pub fn resolve(dict: &DictionaryIndex, token: &str) -> String {
    let normalized = token.trim().to_lowercase();
    if normalized.is_empty() {
        return token.to_owned();
    }

    if let Some(phones) = dict.get(&normalized) {
        return transcribe(phones);
    }

    if normalized.contains('-') {
        return normalized
            .split('-')
            .map(|segment| resolve(dict, segment))
            .collect::<Vec<_>>()
            .join("-");
    }

    if let Some(ipa) = resolve_prefixed(dict, &normalized) {
        return ipa;
    }

    if let Some(ipa) = resolve_compound(dict, &normalized) {
        return ipa;
    }

    token.to_owned()
}

/// Apply the prefix-rule table: `un` + resolvable remainder, etc.
fn resolve_prefixed(dict: &DictionaryIndex, word: &str) -> Option<String> {
    for rule in PREFIX_RULES {
        let Some(rest) = word.strip_prefix(rule.prefix) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        let resolved = resolve(dict, rest);
        if resolved != rest {
            return Some(format!("{}{}", rule.ipa, resolved));
        }
    }

    None
}

/// Two-way compound decomposition.
///
/// Scan split points left to right; the first point where both halves are
/// dictionary words wins. There is no scoring beyond position; resolution
/// stays positional so the output is deterministic.
fn resolve_compound(dict: &DictionaryIndex, word: &str) -> Option<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < MIN_COMPOUND_HEAD + MIN_COMPOUND_TAIL {
        return None;
    }

    for split in MIN_COMPOUND_HEAD..=(chars.len() - MIN_COMPOUND_TAIL) {
        let head: String = chars[..split].iter().collect();
        let tail: String = chars[split..].iter().collect();

        if dict.contains(&head) && dict.contains(&tail) {
            return Some(format!("{} {}", resolve(dict, &head), resolve(dict, &tail)));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> DictionaryIndex {
        DictionaryIndex::from_entries([
            ("cat", "K AE1 T"),
            ("hello", "HH AH0 L OW1"),
            ("fish", "F IH1 SH"),
            ("happy", "HH AE1 P IY0"),
        ])
    }

    #[test]
    fn direct_hit_transcribes() {
        assert_eq!(resolve(&dict(), "cat"), "kæt");
        assert_eq!(resolve(&dict(), "Hello"), "həˈloʊ");
    }

    #[test]
    fn hyphenated_token_resolves_per_segment() {
        assert_eq!(resolve(&dict(), "cat-fish"), "kæt-fɪʃ");
    }

    #[test]
    fn hyphen_segments_miss_individually() {
        assert_eq!(resolve(&dict(), "cat-zzz"), "kæt-zzz");
    }

    #[test]
    fn compound_splits_on_first_valid_point() {
        // "catfish" is not an entry; "cat" + "fish" both are.
        assert_eq!(resolve(&dict(), "catfish"), "kæt fɪʃ");
    }

    #[test]
    fn compound_requires_both_halves() {
        assert_eq!(resolve(&dict(), "catzzz"), "catzzz");
    }

    #[test]
    fn prefix_rule_applies_when_remainder_resolves() {
        assert_eq!(resolve(&dict(), "unhappy"), "ʌnˈhæpi");
    }

    #[test]
    fn prefix_rule_skipped_when_remainder_misses() {
        assert_eq!(resolve(&dict(), "unzzz"), "unzzz");
    }

    #[test]
    fn empty_and_unknown_tokens_pass_through() {
        assert_eq!(resolve(&dict(), ""), "");
        assert_eq!(resolve(&dict(), "  "), "  ");
        assert_eq!(resolve(&DictionaryIndex::empty(), "xyzzyplugh"), "xyzzyplugh");
    }
}
