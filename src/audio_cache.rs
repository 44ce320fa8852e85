//! Audio asset materialization.
//!
//! Remote pronunciation audio is copied down into a local cache directory
//! with deterministic names (`{headword}-{pos}-{region}.mp3`), and the
//! entry's audio field is rewritten in place to a local streaming path.
//! Everything here is best-effort: a failed download is logged and the field
//! keeps its remote URL, so the lookup as a whole still succeeds.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::markup::PronunciationEntry;
use crate::normalize::slug;
use crate::remote::Fetcher;

/// Route prefix under which the server streams cached audio files.
pub const STREAM_PREFIX: &str = "/v1/audio";

/// File-backed audio cache.
///
/// Like the lookup store, this is shared mutable state with no locking;
/// the temp-write-then-rename protocol keeps concurrent readers safe, and a
/// duplicated download is only wasted bandwidth.
#[derive(Debug, Clone)]
pub struct AudioCache {
    dir: PathBuf,
}

impl AudioCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Materialize every remote audio URL in `entries`, rewriting fields that
    /// were successfully cached (or already cached) to streaming paths.
    ///
    /// The first US audio cached for each headword is additionally copied to
    /// a bare `{headword}.mp3`, the default pronunciation asset.
    pub async fn materialize<F: Fetcher>(&self, fetcher: &F, entries: &mut [PronunciationEntry]) {
        for entry in entries.iter_mut() {
            let headword = slug(&entry.headword);
            if headword.is_empty() {
                continue;
            }
            let pos = pos_shorthand(&entry.part_of_speech);

            for (region, field) in [
                ("us", &mut entry.audio_us),
                ("uk", &mut entry.audio_uk),
            ] {
                let Some(url) = field.as_deref() else { continue };
                if !url.starts_with("http") {
                    // Already rewritten to a local path by an earlier pass.
                    continue;
                }

                let filename = format!("{headword}-{pos}-{region}.mp3");
                match self.fetch_one(fetcher, url, &filename).await {
                    Ok(path) => {
                        if region == "us" {
                            self.copy_default(&headword, &path);
                        }
                        *field = Some(format!("{STREAM_PREFIX}/{filename}"));
                    }
                    Err(err) => {
                        warn!(url, error = %err, "audio materialization failed; keeping remote URL");
                    }
                }
            }
        }
    }

    /// Download one asset unless it is already cached. Returns the local path.
    async fn fetch_one<F: Fetcher>(&self, fetcher: &F, url: &str, filename: &str) -> Result<PathBuf> {
        let path = self.dir.join(filename);
        if path.exists() {
            debug!(filename, "audio already cached");
            return Ok(path);
        }

        let bytes = fetcher.fetch_bytes(url).await?;

        // Temp-then-rename so a concurrent reader never sees a partial file.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(&path)
            .map_err(|err| crate::error::Error::CacheStore {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        Ok(path)
    }

    /// Copy the first cached US asset to the suffix-free default filename.
    fn copy_default(&self, headword: &str, source: &Path) {
        let default_path = self.dir.join(format!("{headword}.mp3"));
        if default_path.exists() {
            return;
        }
        if let Err(err) = std::fs::copy(source, &default_path) {
            warn!(headword, error = %err, "failed to write default audio asset");
        }
    }
}

/// Short part-of-speech tag used in cache filenames.
fn pos_shorthand(pos: &str) -> String {
    match pos.to_lowercase().as_str() {
        "noun" => "n".to_owned(),
        "verb" => "v".to_owned(),
        "adjective" => "adj".to_owned(),
        "adverb" => "adv".to_owned(),
        "" => "x".to_owned(),
        other => slug(other),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::remote::PageOutcome;

    struct FakeFetcher {
        fetches: AtomicUsize,
        fail: bool,
    }

    impl FakeFetcher {
        fn new(fail: bool) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl Fetcher for FakeFetcher {
        async fn fetch_page(&self, _url: &str) -> PageOutcome {
            unreachable!("audio cache never fetches pages")
        }

        async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(crate::error::Error::msg("simulated download failure"));
            }
            Ok(b"mp3-bytes".to_vec())
        }
    }

    fn entry(headword: &str, pos: &str, us: Option<&str>, uk: Option<&str>) -> PronunciationEntry {
        let mut row: PronunciationEntry = serde_json::from_value(serde_json::json!({
            "headword": headword,
            "partOfSpeech": pos,
        }))
        .expect("entry");
        row.audio_us = us.map(str::to_owned);
        row.audio_uk = uk.map(str::to_owned);
        row
    }

    #[tokio::test]
    async fn materializes_and_rewrites_fields() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = AudioCache::new(dir.path())?;
        let fetcher = FakeFetcher::new(false);

        let mut entries = vec![entry(
            "cat",
            "noun",
            Some("https://media.example.org/cat-us.mp3"),
            Some("https://media.example.org/cat-uk.mp3"),
        )];
        cache.materialize(&fetcher, &mut entries).await;

        assert_eq!(entries[0].audio_us.as_deref(), Some("/v1/audio/cat-n-us.mp3"));
        assert_eq!(entries[0].audio_uk.as_deref(), Some("/v1/audio/cat-n-uk.mp3"));
        assert!(dir.path().join("cat-n-us.mp3").exists());
        assert!(dir.path().join("cat-n-uk.mp3").exists());
        // First US asset doubles as the bare default.
        assert!(dir.path().join("cat.mp3").exists());
        Ok(())
    }

    #[tokio::test]
    async fn second_run_downloads_nothing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = AudioCache::new(dir.path())?;
        let fetcher = FakeFetcher::new(false);

        let make = || vec![entry("cat", "noun", Some("https://media.example.org/c.mp3"), None)];

        let mut first = make();
        cache.materialize(&fetcher, &mut first).await;
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 1);

        let mut second = make();
        cache.materialize(&fetcher, &mut second).await;
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(second[0].audio_us.as_deref(), Some("/v1/audio/cat-n-us.mp3"));
        Ok(())
    }

    #[tokio::test]
    async fn failure_keeps_the_remote_url() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = AudioCache::new(dir.path())?;
        let fetcher = FakeFetcher::new(true);

        let url = "https://media.example.org/cat-us.mp3";
        let mut entries = vec![entry("cat", "noun", Some(url), None)];
        cache.materialize(&fetcher, &mut entries).await;

        assert_eq!(entries[0].audio_us.as_deref(), Some(url));
        assert!(!dir.path().join("cat-n-us.mp3").exists());
        Ok(())
    }

    #[tokio::test]
    async fn local_paths_are_left_alone() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = AudioCache::new(dir.path())?;
        let fetcher = FakeFetcher::new(false);

        let mut entries = vec![entry("cat", "noun", Some("/v1/audio/cat-n-us.mp3"), None)];
        cache.materialize(&fetcher, &mut entries).await;

        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn pos_shorthand_covers_common_tags() {
        assert_eq!(pos_shorthand("noun"), "n");
        assert_eq!(pos_shorthand("Verb"), "v");
        assert_eq!(pos_shorthand("adjective"), "adj");
        assert_eq!(pos_shorthand(""), "x");
        assert_eq!(pos_shorthand("phrasal verb"), "phrasal-verb");
    }
}
