//! Title derivation via the local summarization service.
//!
//! A clean transcript is wrapped in a short instruction prompt and posted
//! to an Ollama-style `/api/generate` endpoint on loopback. The model's
//! answer is returned verbatim; trimming and sanitization happen later in
//! the pipeline. The `Summarizer` trait allows swapping the HTTP client
//! for a mock in tests.

use crate::config::SummarizerConfig;
use crate::defaults;
use crate::error::{Result, WavnoteError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Trait for deriving a short title from a clean transcript.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Derive a title candidate from transcript text.
    ///
    /// Fails with `Cancelled` if `cancel` fires before or during the call.
    async fn summarize(&self, transcript: &str, cancel: &CancellationToken) -> Result<String>;
}

/// Implement Summarizer for Arc<T> so a summarizer can be shared (e.g.
/// with a test that inspects a mock after the pipeline consumed it).
#[async_trait]
impl<T: Summarizer> Summarizer for std::sync::Arc<T> {
    async fn summarize(&self, transcript: &str, cancel: &CancellationToken) -> Result<String> {
        (**self).summarize(transcript, cancel).await
    }
}

/// Request body for the `/api/generate` endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    system: &'a str,
    model: &'a str,
    prompt: String,
    stream: bool,
}

/// Response body; only the generated text matters here.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Production summarizer backed by a locally hosted inference service.
pub struct OllamaSummarizer {
    client: reqwest::Client,
    endpoint: String,
    base_url: String,
    model: String,
    system_prompt: String,
}

impl OllamaSummarizer {
    pub fn new(config: &SummarizerConfig) -> Self {
        let base_url = config.url.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url, defaults::GENERATE_PATH),
            base_url,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        }
    }

    fn build_prompt(transcript: &str) -> String {
        format!("{}\nCONTENT:\n{}", defaults::TITLE_PROMPT, transcript)
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, transcript: &str, cancel: &CancellationToken) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(WavnoteError::Cancelled);
        }

        let body = GenerateRequest {
            system: &self.system_prompt,
            model: &self.model,
            prompt: Self::build_prompt(transcript),
            stream: false,
        };

        let request = self.client.post(&self.endpoint).json(&body).send();

        let response = tokio::select! {
            result = request => result.map_err(|e| {
                if e.is_connect() {
                    WavnoteError::SummarizerUnreachable {
                        url: self.base_url.clone(),
                        message: format!("{e}. Is the service running? Start with: ollama serve"),
                    }
                } else {
                    WavnoteError::SummarizeFailed {
                        message: e.to_string(),
                    }
                }
            })?,
            () = cancel.cancelled() => return Err(WavnoteError::Cancelled),
        };

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(WavnoteError::SummarizeFailed {
                message: format!("service returned {}: {}", status, detail),
            });
        }

        let decoded: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| WavnoteError::SummarizeFailed {
                    message: format!("could not decode response: {}", e),
                })?;

        Ok(decoded.response)
    }
}

/// Mock summarizer for testing.
///
/// Records every transcript it is asked to summarize and returns queued
/// responses in order, falling back to a fixed default.
pub struct MockSummarizer {
    responses: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    calls: Mutex<Vec<String>>,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

// Test-support code; a poisoned mutex here is a test bug.
#[allow(clippy::unwrap_used)]
impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: "Mock Title".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a title response.
    pub fn with_response(self, title: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(title.to_string()));
        self
    }

    /// Queue an error response.
    pub fn with_error(self, error: WavnoteError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Transcripts passed to `summarize`, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[allow(clippy::unwrap_used)]
#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, transcript: &str, _cancel: &CancellationToken) -> Result<String> {
        self.calls.lock().unwrap().push(transcript.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
