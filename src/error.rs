use std::error::Error as StdError;

use thiserror::Error;

/// Phonoscribe's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Phonoscribe's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
///
/// Note that most "pronunciation not found" conditions in this crate are *values*, not
/// errors: the resolver returns the literal token, and remote lookups return a
/// not-found `LookupResult`. These variants cover genuine failures (I/O, malformed
/// requests, cache store problems).
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error("remote lookup failed for '{word}': {reason}")]
    RemoteLookup { word: String, reason: String },

    #[error("cache store failure at '{path}': {reason}")]
    CacheStore { path: String, reason: String },

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
