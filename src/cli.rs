//! Command-line interface for wavnote
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Transcribe WAV recordings into titled Markdown notes
#[derive(Parser, Debug)]
#[command(
    name = "wavnote",
    version = &*crate::version_string().leak(),
    about = "Transcribe WAV recordings into titled Markdown notes. \
             Transcription and titling both run locally; nothing leaves the machine."
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Source directory containing WAV recordings
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Destination directory for generated notes (created if absent)
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-file detail, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Transcription engine binary override
    #[arg(long, value_name = "PATH")]
    pub engine: Option<String>,

    /// Engine time limit, 0 disables (default: 10m). Examples: 90s, 5m, 1h30m
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout_secs)]
    pub engine_timeout: Option<u64>,

    /// Summarization service URL override
    #[arg(long, value_name = "URL")]
    pub ollama_url: Option<String>,

    /// Summarization model override (e.g. llama3.1)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Output file extension override (default: md)
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,
}

/// Parse a timeout string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`, `2h`), and compound (`1h30m`).
fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check external dependencies (engine binary, summarization service)
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
