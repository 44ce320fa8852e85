//! Lookup cache store: one JSON record per normalized word.
//!
//! A record is only ever written for a *definitive* outcome: a successful
//! extraction or a confirmed not-found. Transient failures never reach this
//! store. Records have no expiry; the only invalidation paths are the
//! read-side schema check and the explicit [`CacheStore::remove`] operation.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::markup::PronunciationEntry;

/// Persisted outcome of one word lookup.
///
/// Invariant: `exists == false` never coexists with a non-empty
/// `pronunciations` list. Use the constructors; the read path discards
/// records that violate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRecord {
    pub exists: bool,
    pub word: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciations: Option<Vec<PronunciationEntry>>,
    pub cached_at: DateTime<Utc>,
}

impl LookupRecord {
    /// A successful lookup with extracted pronunciation rows.
    pub fn positive(word: impl Into<String>, url: impl Into<String>, entries: Vec<PronunciationEntry>) -> Self {
        Self {
            exists: true,
            word: word.into(),
            url: url.into(),
            pronunciations: Some(entries),
            cached_at: Utc::now(),
        }
    }

    /// A confirmed "this word does not exist at the source".
    pub fn negative(word: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            exists: false,
            word: word.into(),
            url: url.into(),
            pronunciations: None,
            cached_at: Utc::now(),
        }
    }

    fn invariant_holds(&self) -> bool {
        self.exists || self.pronunciations.as_ref().is_none_or(Vec::is_empty)
    }
}

/// File-backed store of [`LookupRecord`]s, one file per normalized word.
///
/// Shared mutable state with no locking: concurrent writers race with
/// last-writer-wins semantics, which is acceptable because both writers hold
/// equally fresh definitive outcomes. (First-time lookups are additionally
/// de-duplicated upstream by the engine's single-flight map.)
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read the record for a normalized word.
    ///
    /// Returns `None` for missing files *and* for records that fail the
    /// schema check. Older records stored pronunciation rows without a
    /// `headword` field, and those must force a fresh network lookup rather
    /// than surface incomplete data.
    pub async fn read(&self, word: &str) -> Option<LookupRecord> {
        let path = self.path_for(word);
        let bytes = tokio::fs::read(&path).await.ok()?;

        match serde_json::from_slice::<LookupRecord>(&bytes) {
            Ok(record) if record.invariant_holds() => Some(record),
            Ok(_) => {
                debug!(word, "cache record violates negative-record invariant; discarding");
                None
            }
            Err(err) => {
                debug!(word, error = %err, "cache record failed schema check; discarding");
                None
            }
        }
    }

    /// Persist a record under its normalized word, atomically.
    ///
    /// Write-to-temp-then-rename keeps concurrent readers from ever seeing a
    /// partially written file.
    pub async fn write(&self, word: &str, record: &LookupRecord) -> Result<()> {
        if !record.invariant_holds() {
            return Err(Error::msg(format!(
                "refusing to cache negative record with pronunciations for '{word}'"
            )));
        }

        let path = self.path_for(word);
        let json = serde_json::to_vec_pretty(record)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|err| Error::CacheStore {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        Ok(())
    }

    /// Manual invalidation: delete the record for a word, if present.
    pub async fn remove(&self, word: &str) -> Result<bool> {
        match tokio::fs::remove_file(self.path_for(word)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn path_for(&self, word: &str) -> PathBuf {
        // Words reaching this point are already normalized to [a-z0-9'-];
        // apostrophes are legal in filenames on every supported platform.
        self.dir.join(format!("{word}.json"))
    }
}
