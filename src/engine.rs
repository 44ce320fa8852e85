//! High-level API for pronunciation resolution.
//!
//! We expose a single, ergonomic entry point (`Engine`) that wires together
//! the dictionary transcription pipeline, the remote lookup client, and the
//! two file-backed caches.
//!
//! The intent is:
//! - We load the pronunciation dictionary once (downloading it on first run).
//! - We reuse one engine to serve many resolutions.
//! - CPU-bound transcription never suspends; network and cache file I/O are
//!   the only await points.
//!
//! Dispatch rule: `online-dictionary` mode with a single whitespace-free
//! token goes to the remote lookup path (cache → network → negative-cache);
//! any other input shape runs the dictionary sentence pipeline. There is no
//! automatic fallback from a remote miss to dictionary transcription; a
//! caller wanting both issues a second call explicitly.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::audio_cache::AudioCache;
use crate::cache::{CacheStore, LookupRecord};
use crate::dictionary::DictionaryIndex;
use crate::error::Result;
use crate::markup::{self, PronunciationEntry};
use crate::mode::Mode;
use crate::normalize::slug;
use crate::remote::{Fetcher, HttpFetcher, PageOutcome, lookup_url};
use crate::sentence;

/// Filesystem layout for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Pronunciation dictionary file; downloaded here on first run if absent.
    pub dict_path: PathBuf,

    /// Directory of per-word lookup records.
    pub cache_dir: PathBuf,

    /// Directory of materialized audio assets.
    pub audio_dir: PathBuf,
}

/// Result shape of the remote lookup operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub exists: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciations: Option<Vec<PronunciationEntry>>,
}

impl LookupResult {
    /// A miss. Used both for transient failures (which are never cached)
    /// and for cache-only misses.
    fn not_found(url: impl Into<String>) -> Self {
        Self {
            exists: false,
            url: url.into(),
            headword: None,
            pronunciations: None,
        }
    }
}

impl From<LookupRecord> for LookupResult {
    fn from(record: LookupRecord) -> Self {
        let headword = record
            .pronunciations
            .as_ref()
            .and_then(|rows| rows.first())
            .map(|row| row.headword.clone());

        Self {
            exists: record.exists,
            url: record.url,
            headword,
            pronunciations: record.pronunciations,
        }
    }
}

/// Transcription result for paragraph-level input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedText {
    /// The input text, echoed back for caller-side alignment.
    pub text: String,

    /// Sentence transcriptions wrapped in `/.../` delimiters.
    pub ipa: String,

    /// `ipa` with the delimiters stripped and re-split on whitespace.
    pub ipa_words: Vec<String>,
}

/// What [`Engine::resolve`] produced, depending on mode and input shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolution {
    Transcription(ResolvedText),
    Lookup(LookupResult),
}

/// The main high-level resolution entry point.
///
/// `Engine` owns the long-lived resources:
/// - the in-memory dictionary index (reloadable, read-only between reloads)
/// - the lookup cache store and audio asset cache
/// - one shared fetcher for all outbound requests
///
/// Typical usage: construct once (dictionary loading happens here), then call
/// `resolve`/`lookup_word` many times. All methods take `&self`; the engine
/// is designed to sit behind an `Arc` in a server.
pub struct Engine<F: Fetcher = HttpFetcher> {
    config: EngineConfig,
    dict: RwLock<DictionaryIndex>,
    cache: CacheStore,
    audio: AudioCache,
    fetcher: F,

    // Single-flight map: one gate per normalized word currently being looked
    // up, so concurrent first-time lookups of the same word share one network
    // request. The loser of the race re-reads the cache after acquiring.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Engine<HttpFetcher> {
    /// Create an engine with the production HTTP fetcher.
    pub async fn new(config: EngineConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new()?;
        Self::with_fetcher(config, fetcher).await
    }
}

impl<F: Fetcher> Engine<F> {
    /// Create an engine with a custom fetcher (the test seam).
    ///
    /// A missing dictionary file triggers one download attempt; if that fails
    /// the engine still comes up, with an empty index.
    pub async fn with_fetcher(config: EngineConfig, fetcher: F) -> Result<Self> {
        let cache = CacheStore::new(&config.cache_dir)?;
        let audio = AudioCache::new(&config.audio_dir)?;
        let dict = DictionaryIndex::load_or_fetch(&config.dict_path, &fetcher).await;

        Ok(Self {
            config,
            dict: RwLock::new(dict),
            cache,
            audio,
            fetcher,
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Dispatch a request to the remote-first or dictionary pipeline.
    pub async fn resolve(&self, text: &str, mode: Mode) -> Result<Resolution> {
        let trimmed = text.trim();
        let single_token = !trimmed.is_empty() && !trimmed.contains(char::is_whitespace);

        if mode == Mode::OnlineDictionary && single_token {
            return Ok(Resolution::Lookup(self.lookup_word(trimmed).await?));
        }

        let ipa = self.transcribe_sentence(text);
        Ok(Resolution::Transcription(ResolvedText {
            text: text.to_owned(),
            ipa_words: sentence::ipa_words(&ipa),
            ipa,
        }))
    }

    /// Dictionary-only transcription of free text. Pure CPU; never suspends.
    pub fn transcribe_sentence(&self, text: &str) -> String {
        let dict = self.dict.read().expect("dictionary lock poisoned");
        sentence::transcribe_sentence(&dict, text)
    }

    /// Look a word up, consulting the cache first and hitting the network on
    /// a miss. Definitive outcomes (found, or confirmed absent) are cached;
    /// transient failures are returned as not-found without caching.
    pub async fn lookup_word(&self, word: &str) -> Result<LookupResult> {
        let key = slug(word);
        if key.is_empty() {
            return Ok(LookupResult::not_found(String::new()));
        }
        let url = lookup_url(&key);

        if let Some(record) = self.cache.read(&key).await {
            return Ok(record.into());
        }

        // First-time lookup: serialize concurrent callers per word.
        let gate = {
            let mut map = self.in_flight.lock().await;
            Arc::clone(map.entry(key.clone()).or_default())
        };

        let result = {
            let _guard = gate.lock().await;

            // The winner of the race populated the cache while we waited.
            match self.cache.read(&key).await {
                Some(record) => Ok(record.into()),
                None => self.fetch_and_cache(word, &key, &url).await,
            }
        };

        let mut map = self.in_flight.lock().await;
        map.remove(&key);

        result
    }

    /// Cache-only lookup; never performs network I/O.
    pub async fn lookup_word_cache_only(&self, word: &str) -> LookupResult {
        let key = slug(word);
        let url = lookup_url(&key);

        match self.cache.read(&key).await {
            Some(record) => record.into(),
            None => LookupResult::not_found(url),
        }
    }

    /// Manual invalidation for the no-expiry negative cache. Returns whether
    /// a record existed.
    pub async fn invalidate_lookup(&self, word: &str) -> Result<bool> {
        self.cache.remove(&slug(word)).await
    }

    /// Replace the dictionary index wholesale from the configured path.
    /// Returns the new entry count.
    pub fn reload_dictionary(&self) -> Result<usize> {
        let index = DictionaryIndex::load(&self.config.dict_path)?;
        let len = index.len();
        *self.dict.write().expect("dictionary lock poisoned") = index;
        info!(entries = len, "dictionary reloaded");
        Ok(len)
    }

    /// Number of entries in the current dictionary index.
    pub fn dictionary_size(&self) -> usize {
        self.dict.read().expect("dictionary lock poisoned").len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// One network round trip plus cache writes for a definitive outcome.
    async fn fetch_and_cache(&self, word: &str, key: &str, url: &str) -> Result<LookupResult> {
        match self.fetcher.fetch_page(url).await {
            PageOutcome::NotFound => self.cache_negative(key, url).await,

            PageOutcome::Transient(reason) => {
                debug!(word = key, reason, "transient lookup failure; not caching");
                Ok(LookupResult::not_found(url))
            }

            PageOutcome::Found(html) => {
                let Some(page) = markup::extract_entries(&html, word) else {
                    // The page exists but has no entry for this word.
                    return self.cache_negative(key, url).await;
                };

                if !page.has_pronunciation_data() {
                    // Cross-reference-only pages ("past tense of ...") carry
                    // nothing a learner can listen to or read.
                    return self.cache_negative(key, url).await;
                }

                let mut entries = page.entries;
                self.audio.materialize(&self.fetcher, &mut entries).await;

                let record = LookupRecord::positive(key, url, entries);
                self.cache.write(key, &record).await?;

                // Also persist under the resolved headword, so a future
                // lookup of the citation form hits the cache directly.
                let headword_key = slug(&page.headword);
                if !headword_key.is_empty() && headword_key != key {
                    let mut alias = record.clone();
                    alias.word = headword_key.clone();
                    self.cache.write(&headword_key, &alias).await?;
                }

                Ok(record.into())
            }
        }
    }

    async fn cache_negative(&self, key: &str, url: &str) -> Result<LookupResult> {
        let record = LookupRecord::negative(key, url);
        self.cache.write(key, &record).await?;
        Ok(record.into())
    }
}
