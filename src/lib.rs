//! wavnote - Batch transcription of WAV recordings into titled notes.
//!
//! Offline-first: speech recognition runs through a local engine binary
//! and titles come from a locally hosted language model. No audio or text
//! leaves the machine.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod cli;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod discover;
pub mod engine;
pub mod error;
pub mod filename;
pub mod pipeline;
pub mod summarize;
pub mod transcript;
pub mod wav;

// Core seams (acquire transcript → derive title)
pub use engine::{EngineCommand, MockTranscriptSource, TranscriptSource};
pub use summarize::{MockSummarizer, OllamaSummarizer, Summarizer};

// Pipeline
pub use pipeline::{Pipeline, PipelineConfig, RunSummary};

// Pure helpers
pub use filename::sanitize_title;
pub use transcript::strip_timestamps;

// Error handling
pub use error::{Result, WavnoteError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
