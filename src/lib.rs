//! `phonoscribe`: a pronunciation resolution engine for vocabulary learning.
//!
//! This crate provides:
//! - CMU-dictionary phoneme-to-IPA transcription with syllabification and
//!   stress marks
//! - Word resolution via direct lookup, hyphen splitting, prefix rules, and
//!   compound decomposition
//! - Sentence-level transcription with the "the" coarticulation rule
//! - Remote online-dictionary lookup with per-word result caching and audio
//!   asset materialization
//!
//! The library is designed to be used by both CLI tools and long-running
//! services, with an emphasis on deterministic transcription, graceful
//! degradation, and minimal surprises.

// High-level API (most consumers should start here).
pub mod engine;
pub mod mode;

// Dictionary-driven transcription core. Pure CPU, no I/O.
pub mod phoneme;
pub mod resolver;
pub mod sentence;
pub mod transcribe;

// Dictionary loading and first-run download.
pub mod dictionary;

// Remote lookup: normalization, fetching, markup extraction, caching.
pub mod audio_cache;
pub mod cache;
pub mod markup;
pub mod normalize;
pub mod remote;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use engine::{Engine, EngineConfig, LookupResult, Resolution, ResolvedText};
pub use error::{Error, Result};
pub use mode::Mode;

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
