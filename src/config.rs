use crate::defaults;
use crate::error::{Result, WavnoteError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub summarizer: SummarizerConfig,
    pub output: OutputConfig,
}

/// Speech-recognition engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable; resolved via PATH unless the value contains a path
    /// separator.
    pub binary: String,
    /// Arguments appended after the input-file flag and path.
    pub extra_args: Vec<String>,
    /// Wall-clock limit per invocation in seconds; 0 disables.
    pub timeout_secs: u64,
}

/// Summarization service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Base URL of the local inference service.
    pub url: String,
    pub model: String,
    pub system_prompt: String,
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension for written artifacts (without the dot).
    pub extension: String,
    /// Prefix each artifact with a `# <title>` heading.
    pub title_heading: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: defaults::ENGINE_BINARY.to_string(),
            extra_args: vec![defaults::ENGINE_NO_PRINTS_FLAG.to_string()],
            timeout_secs: defaults::ENGINE_TIMEOUT_SECS,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            url: defaults::OLLAMA_URL.to_string(),
            model: defaults::OLLAMA_MODEL.to_string(),
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: defaults::OUTPUT_EXTENSION.to_string(),
            title_heading: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WavnoteError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                WavnoteError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file
    /// doesn't exist
    ///
    /// Only falls back to defaults when the file is missing; invalid TOML
    /// is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(WavnoteError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - WAVNOTE_ENGINE → engine.binary
    /// - WAVNOTE_OLLAMA_URL → summarizer.url
    /// - WAVNOTE_MODEL → summarizer.model
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(binary) = std::env::var("WAVNOTE_ENGINE")
            && !binary.is_empty()
        {
            self.engine.binary = binary;
        }

        if let Ok(url) = std::env::var("WAVNOTE_OLLAMA_URL")
            && !url.is_empty()
        {
            self.summarizer.url = url;
        }

        if let Ok(model) = std::env::var("WAVNOTE_MODEL")
            && !model.is_empty()
        {
            self.summarizer.model = model;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/wavnote/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("wavnote")
            .join("config.toml")
    }
}
