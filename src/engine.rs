//! Transcript acquisition from the external speech-recognition engine.
//!
//! The engine is an external executable invoked once per audio file. Its
//! stdout is the raw transcript; stderr is passed straight through so the
//! operator sees engine diagnostics live. The `TranscriptSource` trait
//! allows swapping the real subprocess for a mock in tests.

use crate::config::EngineConfig;
use crate::defaults;
use crate::error::{Result, WavnoteError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Trait for acquiring a raw transcript from one audio file.
///
/// This trait allows swapping implementations (real engine vs mock).
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Transcribe the audio file at `path`, returning raw engine output.
    ///
    /// Fails with `Cancelled` if `cancel` fires before or during the run.
    async fn transcribe(&self, path: &Path, cancel: &CancellationToken) -> Result<String>;

    /// Name of the engine, for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Implement TranscriptSource for Arc<T> so a source can be shared (e.g.
/// with a test that inspects a mock after the pipeline consumed it).
#[async_trait]
impl<T: TranscriptSource> TranscriptSource for std::sync::Arc<T> {
    async fn transcribe(&self, path: &Path, cancel: &CancellationToken) -> Result<String> {
        (**self).transcribe(path, cancel).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Production transcript source: spawns the configured engine binary.
pub struct EngineCommand {
    binary: String,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
}

impl EngineCommand {
    pub fn new(config: &EngineConfig) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self {
            binary: config.binary.clone(),
            extra_args: config.extra_args.clone(),
            timeout,
        }
    }
}

#[async_trait]
impl TranscriptSource for EngineCommand {
    async fn transcribe(&self, path: &Path, cancel: &CancellationToken) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(WavnoteError::Cancelled);
        }

        let mut cmd = Command::new(&self.binary);
        cmd.arg(defaults::ENGINE_FILE_FLAG)
            .arg(path)
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WavnoteError::EngineNotFound {
                    binary: self.binary.clone(),
                }
            } else {
                WavnoteError::EngineFailed {
                    message: format!("failed to start {}: {}", self.binary, e),
                }
            }
        })?;

        // Drain stdout concurrently so a chatty engine can't fill the pipe
        // and deadlock against wait().
        let stdout_pipe = child.stdout.take();
        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stdout_pipe {
                pipe.read_to_end(&mut buf).await.ok();
            }
            buf
        });

        let status = tokio::select! {
            status = child.wait() => status.map_err(|e| WavnoteError::EngineFailed {
                message: format!("wait for {} failed: {}", self.binary, e),
            })?,
            () = cancel.cancelled() => {
                child.kill().await.ok();
                stdout_task.abort();
                return Err(WavnoteError::Cancelled);
            }
            () = sleep_or_forever(self.timeout) => {
                child.kill().await.ok();
                stdout_task.abort();
                let limit = self.timeout.unwrap_or_default();
                return Err(WavnoteError::EngineFailed {
                    message: format!(
                        "{} timed out after {}",
                        self.binary,
                        humantime::format_duration(limit)
                    ),
                });
            }
        };

        if !status.success() {
            return Err(WavnoteError::EngineFailed {
                message: format!("{} exited with {}", self.binary, status),
            });
        }

        let stdout = stdout_task.await.unwrap_or_default();
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn name(&self) -> &str {
        &self.binary
    }
}

/// Pending forever when no timeout is configured.
async fn sleep_or_forever(timeout: Option<Duration>) {
    match timeout {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

/// Mock transcript source for testing.
///
/// Records every transcribed path and returns queued responses in order,
/// falling back to a fixed default once the queue is drained.
pub struct MockTranscriptSource {
    responses: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    calls: Mutex<Vec<PathBuf>>,
}

impl Default for MockTranscriptSource {
    fn default() -> Self {
        Self::new()
    }
}

// Test-support code; a poisoned mutex here is a test bug.
#[allow(clippy::unwrap_used)]
impl MockTranscriptSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: "[00:00] mock transcript".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful raw transcript.
    pub fn with_response(self, response: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.to_string()));
        self
    }

    /// Queue an error response.
    pub fn with_error(self, error: WavnoteError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Paths passed to `transcribe`, in order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[allow(clippy::unwrap_used)]
#[async_trait]
impl TranscriptSource for MockTranscriptSource {
    async fn transcribe(&self, path: &Path, _cancel: &CancellationToken) -> Result<String> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(binary: &str, timeout_secs: u64) -> EngineCommand {
        EngineCommand::new(&EngineConfig {
            binary: binary.to_string(),
            extra_args: Vec::new(),
            timeout_secs,
        })
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout_of_successful_engine() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "engine", "printf '[00:00] engine output'");
        let engine = engine_with(script.to_str().unwrap(), 0);

        let out = engine
            .transcribe(Path::new("take.wav"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out, "[00:00] engine output");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_engine_failed() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "engine", "exit 3");
        let engine = engine_with(script.to_str().unwrap(), 0);

        let err = engine
            .transcribe(Path::new("take.wav"), &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            WavnoteError::EngineFailed { message } => {
                assert!(message.contains("exited with"), "got: {}", message);
            }
            other => panic!("expected EngineFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_engine_not_found() {
        let engine = engine_with("/nonexistent/engine-binary", 0);
        let err = engine
            .transcribe(Path::new("take.wav"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WavnoteError::EngineNotFound { .. }));
    }

    #[tokio::test]
    async fn pre_cancelled_token_fails_before_spawn() {
        // A missing binary would be EngineNotFound if the spawn happened;
        // Cancelled proves nothing was dispatched.
        let engine = engine_with("/nonexistent/engine-binary", 0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = engine
            .transcribe(Path::new("take.wav"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, WavnoteError::Cancelled));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancellation_kills_running_engine() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "engine", "sleep 30");
        let engine = engine_with(script.to_str().unwrap(), 0);

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let start = std::time::Instant::now();
        let err = engine
            .transcribe(Path::new("take.wav"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, WavnoteError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_running_engine() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "engine", "sleep 30");
        let engine = engine_with(script.to_str().unwrap(), 1);

        let err = engine
            .transcribe(Path::new("take.wav"), &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            WavnoteError::EngineFailed { message } => {
                assert!(message.contains("timed out"), "got: {}", message);
            }
            other => panic!("expected EngineFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn passes_file_flag_path_and_extra_args() {
        let dir = tempfile::tempdir().unwrap();
        // Echo all arguments back through stdout.
        let script = write_script(dir.path(), "engine", r#"printf '%s ' "$@""#);
        let engine = EngineCommand::new(&EngineConfig {
            binary: script.to_str().unwrap().to_string(),
            extra_args: vec!["--no-prints".to_string()],
            timeout_secs: 0,
        });

        let out = engine
            .transcribe(Path::new("/recordings/take.wav"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out.trim_end(), "-f /recordings/take.wav --no-prints");
    }

    #[tokio::test]
    async fn mock_returns_queued_responses_then_fallback() {
        let mock = MockTranscriptSource::new()
            .with_response("[00:00] first")
            .with_response("[00:00] second");
        let cancel = CancellationToken::new();

        assert_eq!(
            mock.transcribe(Path::new("a.wav"), &cancel).await.unwrap(),
            "[00:00] first"
        );
        assert_eq!(
            mock.transcribe(Path::new("b.wav"), &cancel).await.unwrap(),
            "[00:00] second"
        );
        assert_eq!(
            mock.transcribe(Path::new("c.wav"), &cancel).await.unwrap(),
            "[00:00] mock transcript"
        );

        assert_eq!(
            mock.calls(),
            vec![
                PathBuf::from("a.wav"),
                PathBuf::from("b.wav"),
                PathBuf::from("c.wav"),
            ]
        );
    }

    #[tokio::test]
    async fn mock_returns_queued_error() {
        let mock = MockTranscriptSource::new().with_error(WavnoteError::EngineFailed {
            message: "mock failure".to_string(),
        });
        let err = mock
            .transcribe(Path::new("a.wav"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WavnoteError::EngineFailed { .. }));
    }

    #[test]
    fn trait_is_object_safe() {
        let source: Box<dyn TranscriptSource> = Box::new(MockTranscriptSource::new());
        assert_eq!(source.name(), "mock");
    }
}
