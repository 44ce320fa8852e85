use phonoscribe::dictionary::DictionaryIndex;
use phonoscribe::resolver::resolve;

fn dict() -> DictionaryIndex {
    DictionaryIndex::from_entries([
        ("cat", "K AE1 T"),
        ("hello", "HH AH0 L OW1"),
        ("fish", "F IH1 SH"),
        ("dog", "D AO1 G"),
        ("house", "HH AW1 S"),
        ("boat", "B OW1 T"),
    ])
}

#[test]
fn known_words_transcribe_deterministically() {
    let dict = dict();
    let first = resolve(&dict, "hello");
    for _ in 0..10 {
        assert_eq!(resolve(&dict, "hello"), first);
    }
    assert_eq!(first, "həˈloʊ");
}

#[test]
fn single_syllable_words_never_carry_stress_marks() {
    let dict = dict();
    for word in ["cat", "fish", "dog", "house", "boat"] {
        let ipa = resolve(&dict, word);
        assert!(!ipa.contains('ˈ'), "{word} → {ipa}");
        assert!(!ipa.contains('ˌ'), "{word} → {ipa}");
    }
}

#[test]
fn at_most_one_primary_stress_per_word() {
    let dict = DictionaryIndex::from_entries([
        ("pronunciation", "P R OW0 N AH2 N S IY0 EY1 SH AH0 N"),
        ("hello", "HH AH0 L OW1"),
    ]);

    for word in ["pronunciation", "hello"] {
        let ipa = resolve(&dict, word);
        assert!(ipa.matches('ˈ').count() <= 1, "{word} → {ipa}");
    }
}

#[test]
fn compound_law_holds_for_unlisted_concatenations() {
    let dict = dict();

    // "houseboat" is absent; "house" (len ≥ 3) and "boat" are present, and no
    // earlier split point yields two dictionary words.
    let expected = format!("{} {}", resolve(&dict, "house"), resolve(&dict, "boat"));
    assert_eq!(resolve(&dict, "houseboat"), expected);
}

#[test]
fn unresolvable_token_passes_through_unchanged() {
    assert_eq!(
        resolve(&DictionaryIndex::empty(), "xyzzyplugh"),
        "xyzzyplugh"
    );
}

#[test]
fn every_strategy_misses_on_empty_dictionary() {
    let empty = DictionaryIndex::empty();
    for token in ["cat", "cat-fish", "catfish", "unhappy"] {
        assert_eq!(resolve(&empty, token), token);
    }
}

#[test]
fn concrete_examples_from_the_cmu_format() {
    let dict = dict();
    assert_eq!(resolve(&dict, "cat"), "kæt");
    assert_eq!(resolve(&dict, "hello"), "həˈloʊ");
}
