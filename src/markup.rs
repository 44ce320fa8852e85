//! Dictionary-page markup extraction.
//!
//! The remote dictionary returns an HTML page per word. We pull out one
//! pronunciation row per distinct `(headword, part of speech)` pair: US/UK
//! IPA text and US/UK audio source URLs, from the main entry blocks and from
//! any nested word-family ("runon") sub-entries.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::normalize::match_key;

/// Host prepended to relative audio URLs found in the markup.
pub const DICTIONARY_ORIGIN: &str = "https://dictionary.cambridge.org";

/// One pronunciation row extracted from the page (and later cached).
///
/// Audio fields start as remote URLs; the audio cache rewrites them in place
/// to local streaming paths once the files are materialized. They are never
/// both null for a populated region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationEntry {
    pub headword: String,
    pub part_of_speech: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa_us: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa_uk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_us: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_uk: Option<String>,
}

impl PronunciationEntry {
    fn new(headword: String, part_of_speech: String) -> Self {
        Self {
            headword,
            part_of_speech,
            ipa_us: None,
            ipa_uk: None,
            audio_us: None,
            audio_uk: None,
        }
    }

    /// Whether this row carries any usable pronunciation data.
    pub fn has_data(&self) -> bool {
        self.ipa_us.is_some()
            || self.ipa_uk.is_some()
            || self.audio_us.is_some()
            || self.audio_uk.is_some()
    }

    /// Fill this row's null fields from `other`. Populated fields are never
    /// overwritten; the first non-null value per field wins.
    fn absorb(&mut self, other: Self) {
        fill(&mut self.ipa_us, other.ipa_us);
        fill(&mut self.ipa_uk, other.ipa_uk);
        fill(&mut self.audio_us, other.audio_us);
        fill(&mut self.audio_uk, other.audio_uk);
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Extraction result for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Displayed headword of the matched entry.
    pub headword: String,
    pub entries: Vec<PronunciationEntry>,
}

impl ExtractedPage {
    /// A page with rows but no IPA and no audio anywhere is a bare
    /// cross-reference ("past tense of ...") and counts as not-found.
    pub fn has_pronunciation_data(&self) -> bool {
        self.entries.iter().any(PronunciationEntry::has_data)
    }
}

struct Selectors {
    entry: Selector,
    headword: Selector,
    pos: Selector,
    pron_block: Selector,
    region: Selector,
    ipa: Selector,
    audio_source: Selector,
    runon: Selector,
    runon_headword: Selector,
}

impl Selectors {
    fn new() -> Self {
        // All selectors are static strings; a parse failure is a programmer
        // error, caught by the tests below.
        let sel = |s: &str| Selector::parse(s).expect("static selector must parse");
        Self {
            entry: sel("div.entry-body__el"),
            headword: sel(".hw.dhw"),
            pos: sel(".pos.dpos"),
            pron_block: sel("span.dpron-i"),
            region: sel(".region.dreg"),
            ipa: sel("span.ipa"),
            audio_source: sel(r#"source[type="audio/mpeg"]"#),
            runon: sel("div.runon"),
            runon_headword: sel(".w.dw"),
        }
    }
}

/// Parse a dictionary page and extract pronunciation rows for `requested`.
///
///// Entry matching: keep entry blocks whose displayed headword, after
/// normalization, equals the normalized request (so a "cats" page never
/// answers a "cat" request by accident, while "don't" still answers "dont").
/// Returns `None` when nothing matches.
pub fn extract_entries(html: &str, requested: &str) -> Option<ExtractedPage> {
    let selectors = Selectors::new();
    let document = Html::parse_document(html);
    let requested_key = match_key(requested);

    let blocks: Vec<ElementRef> = document.select(&selectors.entry).collect();
    if blocks.is_empty() {
        return None;
    }

    let matched: Vec<ElementRef> = blocks
        .iter()
        .copied()
        .filter(|block| {
            headword_of(block, &selectors).is_some_and(|hw| match_key(&hw) == requested_key)
        })
        .collect();

    if matched.is_empty() {
        return None;
    }

    let mut headword = String::new();
    let mut entries: Vec<PronunciationEntry> = Vec::new();

    for block in matched {
        let Some(hw) = headword_of(&block, &selectors) else {
            continue;
        };
        if headword.is_empty() {
            headword = hw.clone();
        }

        let pos = first_text(&block, &selectors.pos).unwrap_or_default();
        merge_row(&mut entries, extract_row(&block, hw, pos, &selectors));

        // Word-family sub-entries (derived forms listed under the main entry).
        for runon in block.select(&selectors.runon) {
            let Some(run_hw) = first_text(&runon, &selectors.runon_headword) else {
                continue;
            };
            let run_pos = first_text(&runon, &selectors.pos).unwrap_or_default();
            merge_row(&mut entries, extract_row(&runon, run_hw, run_pos, &selectors));
        }
    }

    if headword.is_empty() {
        return None;
    }

    Some(ExtractedPage { headword, entries })
}

fn headword_of(block: &ElementRef, selectors: &Selectors) -> Option<String> {
    first_text(block, &selectors.headword)
}

fn first_text(scope: &ElementRef, selector: &Selector) -> Option<String> {
    let el = scope.select(selector).next()?;
    let text: String = el.text().collect::<String>().trim().to_owned();
    if text.is_empty() { None } else { Some(text) }
}

/// Pull the US/UK IPA and audio sources from one entry or runon block.
fn extract_row(
    scope: &ElementRef,
    headword: String,
    part_of_speech: String,
    selectors: &Selectors,
) -> PronunciationEntry {
    let mut row = PronunciationEntry::new(headword, part_of_speech);

    for pron in scope.select(&selectors.pron_block) {
        let Some(region) = first_text(&pron, &selectors.region) else {
            continue;
        };

        let ipa = first_text(&pron, &selectors.ipa);
        let audio = pron
            .select(&selectors.audio_source)
            .next()
            .and_then(|source| source.value().attr("src"))
            .map(absolutize);

        match region.to_lowercase().as_str() {
            "us" => {
                fill(&mut row.ipa_us, ipa);
                fill(&mut row.audio_us, audio);
            }
            "uk" => {
                fill(&mut row.ipa_uk, ipa);
                fill(&mut row.audio_uk, audio);
            }
            _ => {}
        }
    }

    row
}

/// Merge a freshly extracted row into the result set keyed by
/// `(headword, part of speech)`, filling only missing fields on duplicates.
fn merge_row(entries: &mut Vec<PronunciationEntry>, row: PronunciationEntry) {
    if let Some(existing) = entries
        .iter_mut()
        .find(|e| e.headword == row.headword && e.part_of_speech == row.part_of_speech)
    {
        existing.absorb(row);
        return;
    }

    entries.push(row);
}

fn absolutize(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else if url.starts_with('/') {
        format!("{DICTIONARY_ORIGIN}{url}")
    } else {
        url.to_owned()
    }
}
