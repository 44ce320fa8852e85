//! CMU pronouncing dictionary loading.
//!
//! The dictionary is a flat text file: one entry per line, `WORD PHONE PHONE ...`,
//! with `;;;` comment lines. We parse it once at startup into an in-memory
//! index and treat it as immutable from then on (a manual reload swaps the
//! whole index).
//!
//! A missing file is not fatal: we try a single download from the published
//! source, and if that fails too the engine runs with an empty index, where
//! every resolution falls through to literal passthrough.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::phoneme::PhonemeSymbol;
use crate::remote::Fetcher;

/// Published source for the dictionary file, used when the local copy is missing.
pub const CMUDICT_URL: &str = "https://raw.githubusercontent.com/Alexir/CMUdict/master/cmudict-0.7b";

const COMMENT_MARKER: &str = ";;;";

/// In-memory pronunciation index: normalized (lowercased) word → phone sequence.
///
/// Read-only after construction; no interior mutability, no locking needed.
#[derive(Debug, Default)]
pub struct DictionaryIndex {
    entries: HashMap<String, Vec<PhonemeSymbol>>,
}

impl DictionaryIndex {
    /// An index with no entries. Every resolution against it is a miss.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index directly from `(word, phones)` pairs.
    ///
    /// Primarily a test seam: lets callers construct small, fully-known
    /// dictionaries without touching the filesystem.
    pub fn from_entries<I, W, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, P)>,
        W: Into<String>,
        P: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(word, phones)| {
                let phones = phones
                    .as_ref()
                    .split_whitespace()
                    .map(PhonemeSymbol::parse)
                    .collect();
                (word.into().to_lowercase(), phones)
            })
            .collect();

        Self { entries }
    }

    /// Parse the dictionary's line-oriented text format.
    ///
    /// Skipped lines: `;;;` comments and malformed lines with fewer than two
    /// fields. Alternate pronunciations (`WORD(2)`, `WORD(3)`, ...) are kept
    /// only when the base word is absent, so the first listed pronunciation
    /// wins.
    pub fn parse(text: &str) -> Self {
        let mut entries: HashMap<String, Vec<PhonemeSymbol>> = HashMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else { continue };
            let phones: Vec<PhonemeSymbol> = fields.map(PhonemeSymbol::parse).collect();
            if phones.is_empty() {
                continue;
            }

            let word = strip_variant_suffix(word).to_lowercase();
            entries.entry(word).or_insert(phones);
        }

        Self { entries }
    }

    /// Load and parse the dictionary file at `path`.
    ///
    /// The published file is not clean UTF-8 (a few comment lines carry
    /// Latin-1 bytes), so we decode lossily.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let index = Self::parse(&text);
        info!(path = %path.display(), entries = index.len(), "dictionary loaded");
        Ok(index)
    }

    /// Load the dictionary at `path`, downloading it first if it is missing.
    ///
    /// Degrades to an empty index on any failure: a vocabulary service with
    /// no dictionary is still useful for its remote-lookup path, so this is
    /// logged rather than surfaced as an error.
    pub async fn load_or_fetch<F: Fetcher>(path: &Path, fetcher: &F) -> Self {
        if !path.exists() {
            if let Err(err) = download_dictionary(fetcher, path).await {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "dictionary missing and download failed; running with an empty index"
                );
                return Self::empty();
            }
        }

        match Self::load(path) {
            Ok(index) => index,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "dictionary unreadable; running with an empty index"
                );
                Self::empty()
            }
        }
    }

    /// Phone sequence for a normalized (lowercased) word, if present.
    pub fn get(&self, word: &str) -> Option<&[PhonemeSymbol]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `WORD(2)` → `WORD`; anything without the parenthesized suffix is unchanged.
fn strip_variant_suffix(word: &str) -> &str {
    match word.find('(') {
        Some(idx) if word.ends_with(')') => &word[..idx],
        _ => word,
    }
}

/// One-shot dictionary download, written to a temp file and renamed into place.
async fn download_dictionary<F: Fetcher>(fetcher: &F, path: &Path) -> Result<()> {
    info!(url = CMUDICT_URL, "downloading pronunciation dictionary");

    let body = fetcher.fetch_bytes(CMUDICT_URL).await?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(&body)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|err| crate::error::Error::msg(format!("persist dictionary: {err}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_malformed_lines() {
        let index = DictionaryIndex::parse(
            ";;; cmudict header\n\
             CAT K AE1 T\n\
             BROKEN\n\
             \n\
             HELLO HH AH0 L OW1\n",
        );

        assert_eq!(index.len(), 2);
        assert!(index.contains("cat"));
        assert!(index.contains("hello"));
        assert!(!index.contains("broken"));
    }

    #[test]
    fn first_pronunciation_wins_over_variants() {
        let index = DictionaryIndex::parse(
            "READ R IY1 D\n\
             READ(2) R EH1 D\n",
        );

        assert_eq!(index.len(), 1);
        let phones = index.get("read").expect("read entry");
        assert_eq!(phones[1].code, "IY");
    }

    #[test]
    fn variant_without_base_takes_the_key() {
        let index = DictionaryIndex::parse("ODD(2) AA1 D\n");
        assert!(index.contains("odd"));
    }

    #[test]
    fn from_entries_lowercases_words() {
        let index = DictionaryIndex::from_entries([("Cat", "K AE1 T")]);
        assert!(index.contains("cat"));
        assert!(!index.is_empty());
    }
}
