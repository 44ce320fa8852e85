//! ARPABET phoneme symbols and their IPA mappings.
//!
//! The CMU pronouncing dictionary encodes pronunciations as ARPABET codes:
//! each phone is one or two ASCII letters, and vowel phones carry a trailing
//! stress digit (0 = unstressed, 1 = primary, 2 = secondary). This module
//! parses those tokens and maps each code to its IPA grapheme(s).

use std::collections::HashMap;
use std::sync::OnceLock;

/// One parsed ARPABET token, e.g. `AH0` or `K`.
///
/// Stress digits appear only on vowel phones in the source dictionary; we
/// treat "carries a stress digit" as the definition of a syllable nucleus
/// during transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonemeSymbol {
    /// ARPABET code with the stress digit stripped (e.g. `AH`, `K`).
    pub code: String,

    /// Stress digit, when present: 0, 1, or 2.
    pub stress: Option<u8>,
}

impl PhonemeSymbol {
    /// Parse a raw dictionary token like `OW1` into code + stress digit.
    ///
    /// Tokens never carry more than one trailing digit in the source format,
    /// so we only split off the final character when it is `0`..`2`.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.as_bytes().last() {
            Some(d @ b'0'..=b'2') => Self {
                code: token[..token.len() - 1].to_owned(),
                stress: Some(d - b'0'),
            },
            _ => Self {
                code: token.to_owned(),
                stress: None,
            },
        }
    }

    /// Whether this token marks a syllable nucleus (it carries a stress digit).
    pub fn is_nucleus(&self) -> bool {
        self.stress.is_some()
    }

    /// The IPA rendering of this phone.
    ///
    /// Special case: `AH` with stress digit 0 (or no digit at all) is the
    /// reduced vowel (schwa `ə`) rather than the full vowel `ʌ`.
    /// Unknown codes fall back to the raw code so a bad dictionary line is
    /// visible in output instead of silently dropped.
    pub fn ipa(&self) -> &str {
        if self.code == "AH" && self.stress.unwrap_or(0) == 0 {
            return "ə";
        }

        ipa_for(&self.code).unwrap_or(&self.code)
    }
}

/// Look up the IPA grapheme(s) for an ARPABET code (stress digit stripped).
pub fn ipa_for(code: &str) -> Option<&'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    let table = TABLE.get_or_init(|| {
        HashMap::from([
            // Vowels
            ("AA", "ɑ"),
            ("AE", "æ"),
            ("AH", "ʌ"),
            ("AO", "ɔ"),
            ("AW", "aʊ"),
            ("AY", "aɪ"),
            ("EH", "ɛ"),
            ("ER", "ɝ"),
            ("EY", "eɪ"),
            ("IH", "ɪ"),
            ("IY", "i"),
            ("OW", "oʊ"),
            ("OY", "ɔɪ"),
            ("UH", "ʊ"),
            ("UW", "u"),
            // Consonants
            ("B", "b"),
            ("CH", "tʃ"),
            ("D", "d"),
            ("DH", "ð"),
            ("F", "f"),
            ("G", "ɡ"),
            ("HH", "h"),
            ("JH", "dʒ"),
            ("K", "k"),
            ("L", "l"),
            ("M", "m"),
            ("N", "n"),
            ("NG", "ŋ"),
            ("P", "p"),
            ("R", "ɹ"),
            ("S", "s"),
            ("SH", "ʃ"),
            ("T", "t"),
            ("TH", "θ"),
            ("V", "v"),
            ("W", "w"),
            ("Y", "j"),
            ("Z", "z"),
            ("ZH", "ʒ"),
        ])
    });

    table.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_stress_digit_from_vowels() {
        let p = PhonemeSymbol::parse("OW1");
        assert_eq!(p.code, "OW");
        assert_eq!(p.stress, Some(1));
        assert!(p.is_nucleus());
    }

    #[test]
    fn parse_leaves_consonants_unstressed() {
        let p = PhonemeSymbol::parse("K");
        assert_eq!(p.code, "K");
        assert_eq!(p.stress, None);
        assert!(!p.is_nucleus());
    }

    #[test]
    fn unstressed_ah_reduces_to_schwa() {
        assert_eq!(PhonemeSymbol::parse("AH0").ipa(), "ə");
        assert_eq!(PhonemeSymbol::parse("AH").ipa(), "ə");
        // Stressed AH keeps its full vowel.
        assert_eq!(PhonemeSymbol::parse("AH1").ipa(), "ʌ");
    }

    #[test]
    fn unknown_code_falls_back_to_itself() {
        assert_eq!(PhonemeSymbol::parse("QX").ipa(), "QX");
    }
}
