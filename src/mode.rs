use serde::{Deserialize, Serialize};

/// The supported resolution modes.
///
/// Why this exists:
/// - We want a single, strongly-typed representation of the mode flag across
///   the CLI, the server API, and library code.
/// - Using an enum avoids stringly-typed conditionals and keeps the dispatch
///   in the engine explicit and discoverable.
///
/// Integration notes:
/// - `ValueEnum` (under the `cli` feature) allows this enum to be used
///   directly as a CLI flag with `clap`.
/// - Serde uses the kebab-case names `cmu` / `online-dictionary`, matching
///   the wire format of the server's resolve endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Mode {
    /// Dictionary-driven transcription of words and sentences.
    #[default]
    Cmu,

    /// Remote-first single-word lookup against the online dictionary.
    OnlineDictionary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kebab_case() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&Mode::Cmu)?, "\"cmu\"");
        assert_eq!(
            serde_json::to_string(&Mode::OnlineDictionary)?,
            "\"online-dictionary\""
        );
        Ok(())
    }
}
