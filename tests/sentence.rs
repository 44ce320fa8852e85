use phonoscribe::dictionary::DictionaryIndex;
use phonoscribe::sentence::{ipa_words, transcribe_sentence};

fn dict() -> DictionaryIndex {
    DictionaryIndex::from_entries([
        ("apple", "AE1 P AH0 L"),
        ("cat", "K AE1 T"),
        ("sat", "S AE1 T"),
        ("is", "IH1 Z"),
        ("red", "R EH1 D"),
        ("on", "AA1 N"),
        ("mat", "M AE1 T"),
    ])
}

#[test]
fn the_coarticulates_before_vowels() {
    let ipa = transcribe_sentence(&dict(), "The apple is red.");
    assert!(ipa.contains("ði"), "got: {ipa}");
}

#[test]
fn the_stays_schwa_before_consonants() {
    let ipa = transcribe_sentence(&dict(), "The cat sat.");
    assert!(ipa.contains("ðə"), "got: {ipa}");
}

#[test]
fn transcription_never_contains_punctuation() {
    let ipa = transcribe_sentence(&dict(), "The cat sat on the mat! Is the apple red?");
    for forbidden in ['.', '!', '?', ','] {
        assert!(!ipa.contains(forbidden), "got: {ipa}");
    }
}

#[test]
fn each_sentence_is_slash_delimited() {
    let ipa = transcribe_sentence(&dict(), "The cat sat. The apple is red.");
    let sentences: Vec<&str> = ipa.split(' ').collect();
    assert!(sentences.first().unwrap().starts_with('/'));
    assert!(ipa.matches('/').count() == 4, "got: {ipa}");
}

#[test]
fn unknown_words_appear_literally_in_output() {
    let ipa = transcribe_sentence(&dict(), "The cat blorped.");
    assert!(ipa.contains("blorped"), "got: {ipa}");
}

#[test]
fn ipa_words_align_with_input_words() {
    let ipa = transcribe_sentence(&dict(), "The cat sat on the mat.");
    let words = ipa_words(&ipa);
    // "The cat sat on the mat" → six word transcriptions.
    assert_eq!(words.len(), 6, "got: {words:?}");
    assert_eq!(words[0], "ðə");
}

#[test]
fn empty_input_produces_empty_output() {
    assert_eq!(transcribe_sentence(&dict(), ""), "");
    assert_eq!(transcribe_sentence(&dict(), "   "), "");
    assert_eq!(transcribe_sentence(&dict(), "?!."), "");
}
