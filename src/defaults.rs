//! Default configuration constants for wavnote.
//!
//! Shared between the config layer, the CLI, and the component defaults so
//! the documented values stay in one place.

/// Default speech-recognition engine binary.
///
/// The stock setup drops a whisper.cpp llamafile next to the working
/// directory; point `engine.binary` elsewhere for a system-wide install.
pub const ENGINE_BINARY: &str = "./whisper-tiny.en.llamafile";

/// Flag the engine expects before the input audio path.
pub const ENGINE_FILE_FLAG: &str = "-f";

/// Flag that suppresses the engine's startup banner so stdout carries the
/// transcript and nothing else.
pub const ENGINE_NO_PRINTS_FLAG: &str = "--no-prints";

/// Default wall-clock limit for one engine invocation, in seconds.
///
/// Long recordings on slow hardware can take minutes; 10 minutes is a
/// generous ceiling. `0` disables the limit entirely.
pub const ENGINE_TIMEOUT_SECS: u64 = 600;

/// Default base URL of the local summarization service.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Endpoint path for one-shot text generation on the summarization service.
pub const GENERATE_PATH: &str = "/api/generate";

/// Default summarization model.
pub const OLLAMA_MODEL: &str = "llama3.1";

/// System role sent with every summarization request.
pub const SYSTEM_PROMPT: &str = "You are a helpful summarizer.";

/// Instruction prepended to the transcript when asking for a title.
///
/// The 3-to-7-word bound keeps titles short enough to survive the
/// filename length cap after sanitization.
pub const TITLE_PROMPT: &str = "Summarize the following content. \
Your summary will be used in a file name. Keep it short with 3 to 7 words. \
Only respond with the summary. Do not elaborate.";

/// Default extension for written artifacts.
pub const OUTPUT_EXTENSION: &str = "md";

/// Maximum length of a sanitized filename stem, in characters.
pub const MAX_STEM_CHARS: usize = 50;
