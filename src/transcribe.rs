//! Phone-sequence to IPA transcription with stress marks.
//!
//! We syllabify by treating every stress-carrying phone as a nucleus:
//! consonants scanned before a nucleus become that syllable's onset, and
//! consonants left over after the last nucleus attach to it as a coda. Stress
//! marks (`ˈ` primary, `ˌ` secondary) are emitted only for words with more
//! than one nucleus; single-syllable words never carry a mark, regardless of
//! what digit the dictionary put on them.

use crate::phoneme::PhonemeSymbol;

/// One transcription unit: the stress digit of its nucleus plus the IPA text
/// (onset + nucleus, and coda for the final syllable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    /// Stress digit of the nucleus; `None` for a consonant-only remainder
    /// (an entry with no vowel phones at all).
    pub stress: Option<u8>,
    pub text: String,
}

/// Transcribe one dictionary phone sequence into an IPA string.
pub fn transcribe(phones: &[PhonemeSymbol]) -> String {
    let syllables = syllabify(phones);
    let nuclei = phones.iter().filter(|p| p.is_nucleus()).count();

    let mut out = String::new();
    for syllable in &syllables {
        if nuclei > 1 {
            match syllable.stress {
                Some(1) => out.push('ˈ'),
                Some(2) => out.push('ˌ'),
                _ => {}
            }
        }
        out.push_str(&syllable.text);
    }

    out
}

/// Group phones into syllables around their nuclei.
fn syllabify(phones: &[PhonemeSymbol]) -> Vec<Syllable> {
    let mut syllables: Vec<Syllable> = Vec::new();

    // Consonants not yet attached to a syllable; they become the onset of the
    // next nucleus we see.
    let mut pending = String::new();

    for phone in phones {
        match phone.stress {
            Some(digit) => {
                let mut text = std::mem::take(&mut pending);
                text.push_str(phone.ipa());
                syllables.push(Syllable {
                    stress: Some(digit),
                    text,
                });
            }
            None => pending.push_str(phone.ipa()),
        }
    }

    // Whatever is left is the coda of the final syllable.
    if !pending.is_empty() {
        match syllables.last_mut() {
            Some(last) => last.text.push_str(&pending),
            None => syllables.push(Syllable {
                stress: None,
                text: pending,
            }),
        }
    }

    syllables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phones(raw: &str) -> Vec<PhonemeSymbol> {
        raw.split_whitespace().map(PhonemeSymbol::parse).collect()
    }

    #[test]
    fn single_syllable_word_has_no_stress_mark() {
        // cat → K AE1 T
        assert_eq!(transcribe(&phones("K AE1 T")), "kæt");
    }

    #[test]
    fn second_syllable_primary_stress() {
        // hello → HH AH0 L OW1
        assert_eq!(transcribe(&phones("HH AH0 L OW1")), "həˈloʊ");
    }

    #[test]
    fn secondary_stress_gets_low_mark() {
        // understand → AH2 N D ER0 S T AE1 N D
        let ipa = transcribe(&phones("AH2 N D ER0 S T AE1 N D"));
        assert!(ipa.starts_with('ˌ'));
        assert!(ipa.contains('ˈ'));
    }

    #[test]
    fn at_most_one_primary_stress_mark() {
        let ipa = transcribe(&phones("AH2 N D ER0 S T AE1 N D"));
        assert_eq!(ipa.matches('ˈ').count(), 1);
    }

    #[test]
    fn trailing_consonants_attach_as_coda() {
        // world → W ER1 L D: coda "ld" folds into the only syllable.
        assert_eq!(transcribe(&phones("W ER1 L D")), "wɝld");
    }

    #[test]
    fn consonant_only_sequence_still_renders() {
        // Degenerate entries (abbreviations with no vowel phones) must not
        // be dropped.
        assert_eq!(transcribe(&phones("S T")), "st");
    }

    #[test]
    fn empty_sequence_is_empty() {
        assert_eq!(transcribe(&[]), "");
    }
}
