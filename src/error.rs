//! Error types for wavnote.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WavnoteError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Discovery errors
    #[error("Failed to read directory {}: {message}", .path.display())]
    Discovery { path: PathBuf, message: String },

    // Transcription engine errors
    #[error("Transcription engine not found: {binary}")]
    EngineNotFound { binary: String },

    #[error("Transcription engine failed: {message}")]
    EngineFailed { message: String },

    // Summarization errors
    #[error("Cannot reach summarization service at {url}: {message}")]
    SummarizerUnreachable { url: String, message: String },

    #[error("Summarization failed: {message}")]
    SummarizeFailed { message: String },

    // Cancellation (Ctrl-C / SIGTERM mid-run)
    #[error("Operation cancelled")]
    Cancelled,

    // Per-file wrap: carries the input path alongside the underlying cause
    #[error("Failed to process {}", .path.display())]
    FileFailed {
        path: PathBuf,
        #[source]
        source: Box<WavnoteError>,
    },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, WavnoteError>;
