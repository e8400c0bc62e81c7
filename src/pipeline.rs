//! Per-file processing pipeline and batch orchestration.
//!
//! Each discovered file flows through transcribe → strip → summarize →
//! sanitize → write. Files are processed strictly one at a time in
//! discovery order; the first failure aborts the whole run with the
//! failing file's path attached. Artifacts written before the failure
//! stay in place.

use crate::discover::find_wav_files;
use crate::engine::TranscriptSource;
use crate::error::{Result, WavnoteError};
use crate::filename::sanitize_title;
use crate::summarize::Summarizer;
use crate::transcript::strip_timestamps;
use crate::wav;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Pipeline configuration independent of the trait seams.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving the written artifacts. Must already exist.
    pub dest_dir: PathBuf,
    /// Artifact extension, without the dot.
    pub extension: String,
    /// Prefix artifacts with a `# <title>` heading.
    pub title_heading: bool,
    /// Suppress progress output.
    pub quiet: bool,
    /// Verbosity level (0=progress only, 1=per-file detail, 2=diagnostics).
    pub verbosity: u8,
}

/// Outcome of a completed batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of WAV files discovered (all of them were processed).
    pub files_found: usize,
}

/// Batch orchestrator: discovers WAV files and pushes each one through
/// the full pipeline.
pub struct Pipeline {
    source: Box<dyn TranscriptSource>,
    summarizer: Box<dyn Summarizer>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn TranscriptSource>,
        summarizer: Box<dyn Summarizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            summarizer,
            config,
        }
    }

    /// Run the batch: discover WAV files under `source_root`, then process
    /// them sequentially.
    ///
    /// An empty discovery set is a successful run. Returns how many files
    /// were found; the first per-file failure aborts the run wrapped in
    /// `FileFailed` with the offending path.
    pub async fn run(&self, source_root: &Path, cancel: &CancellationToken) -> Result<RunSummary> {
        if cancel.is_cancelled() {
            return Err(WavnoteError::Cancelled);
        }

        if self.config.verbosity >= 2 {
            eprintln!("engine: {}", self.source.name());
        }

        let files = find_wav_files(source_root)?;
        if !self.config.quiet {
            println!("Found {} WAV files", files.len());
        }

        for (index, wav_path) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(WavnoteError::Cancelled);
            }

            if !self.config.quiet {
                println!("Processing {}. {} ...", index + 1, wav_path.display());
            }
            if self.config.verbosity >= 1
                && let Some(info) = wav::probe(wav_path)
            {
                eprintln!(
                    "  {:.1}s @ {} Hz, {} channel(s)",
                    info.duration_secs, info.sample_rate, info.channels
                );
            }

            let file_name = self
                .process_file(wav_path, cancel)
                .await
                .map_err(|e| WavnoteError::FileFailed {
                    path: wav_path.clone(),
                    source: Box::new(e),
                })?;

            if !self.config.quiet {
                println!("\tSaved file {}", file_name);
            }
        }

        Ok(RunSummary {
            files_found: files.len(),
        })
    }

    /// Push one file through transcribe → strip → summarize → sanitize →
    /// write. Returns the artifact file name.
    async fn process_file(&self, wav_path: &Path, cancel: &CancellationToken) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(WavnoteError::Cancelled);
        }

        let raw = self.source.transcribe(wav_path, cancel).await?;
        let clean = strip_timestamps(&raw);

        if clean.is_empty() && self.config.verbosity >= 1 {
            eprintln!(
                "  warning: transcript for {} is empty after timestamp stripping",
                wav_path.display()
            );
        }

        let title = self.summarizer.summarize(&clean, cancel).await?;
        let stem = sanitize_title(&title);

        // No uniqueness check: a later file whose title sanitizes to an
        // existing stem overwrites the earlier artifact.
        let file_name = format!("{}.{}", stem, self.config.extension);
        let artifact_path = self.config.dest_dir.join(&file_name);

        let contents = if self.config.title_heading {
            format!("# {}\n\n{}", title.trim(), clean)
        } else {
            clean
        };

        tokio::fs::write(&artifact_path, contents).await?;
        Ok(file_name)
    }
}
