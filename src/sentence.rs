//! Paragraph-level transcription: sentence segmentation, token cleaning, and
//! the "the" coarticulation rule.
//!
//! Output format: each non-empty sentence's word transcriptions are joined
//! with spaces and wrapped in `/.../` delimiters; sentences are joined with
//! spaces. Punctuation never appears inside the transcription itself.

use crate::dictionary::DictionaryIndex;
use crate::resolver::resolve;

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?'];
const VOWEL_LETTERS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Transcribe free text sentence by sentence.
pub fn transcribe_sentence(dict: &DictionaryIndex, text: &str) -> String {
    split_sentences(text)
        .iter()
        .filter_map(|sentence| {
            let ipa = transcribe_one(dict, sentence);
            if ipa.is_empty() {
                None
            } else {
                Some(format!("/{ipa}/"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip the sentence delimiters back off and re-split on whitespace, for
/// callers that need word-level alignment against the input.
pub fn ipa_words(ipa: &str) -> Vec<String> {
    ipa.replace('/', " ")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Split text into sentence-like chunks on `.`, `!`, `?`.
///
/// Each chunk keeps its trailing punctuation; an unterminated tail is still a
/// chunk. The punctuation is dropped later during token cleaning, so keeping
/// it here is harmless and preserves the original chunk boundaries.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if SENTENCE_TERMINATORS.contains(&ch) {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current);
    }

    sentences
}

fn transcribe_one(dict: &DictionaryIndex, sentence: &str) -> String {
    // Clean first so the coarticulation rule can peek at the *next* word.
    let words: Vec<String> = sentence
        .split_whitespace()
        .map(clean_word)
        .filter(|w| !w.is_empty())
        .collect();

    let mut out: Vec<String> = Vec::with_capacity(words.len());
    for (idx, word) in words.iter().enumerate() {
        if word == "the" {
            out.push(the_pronunciation(words.get(idx + 1)).to_owned());
            continue;
        }
        out.push(resolve(dict, word));
    }

    out.join(" ")
}

/// Lowercase letters and hyphens only; everything else is dropped.
fn clean_word(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == '-')
        .collect()
}

/// Coarticulation: "the" is `ði` before a vowel-initial word, `ðə` otherwise.
///
/// This bypasses the resolver entirely: the dictionary's citation form for
/// "the" doesn't capture the context-dependent reading.
fn the_pronunciation(next: Option<&String>) -> &'static str {
    match next.and_then(|w| w.chars().next()) {
        Some(first) if VOWEL_LETTERS.contains(&first) => "ði",
        _ => "ðə",
    }
}
