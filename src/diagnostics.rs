//! Dependency checking for the `check` subcommand.
//!
//! Verifies that the external collaborators are actually there before a
//! long batch run: the speech-recognition engine binary and the local
//! summarization service.

use crate::config::Config;
use owo_colors::OwoColorize;
use std::process::Command;
use std::time::Duration;

/// Result of a single dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Dependency is available
    Ok,
    /// Dependency is not found / not reachable
    Missing(String),
    /// Dependency responded, but oddly
    Warning(String),
}

/// Check that the engine binary can be spawned at all.
///
/// Without an input file most engines print usage and exit non-zero;
/// spawnability is what matters here, not the exit code.
fn check_engine(binary: &str) -> CheckResult {
    match Command::new(binary).arg("--help").output() {
        Ok(_) => CheckResult::Ok,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::Missing(format!(
            "'{}' not found on PATH or at the configured location",
            binary
        )),
        Err(e) => CheckResult::Warning(format!("error checking '{}': {}", binary, e)),
    }
}

/// Check that the summarization service answers on its base URL.
async fn check_summarizer(url: &str) -> CheckResult {
    let base = url.trim_end_matches('/');
    let client = reqwest::Client::new();
    let request = client.get(base).timeout(Duration::from_secs(5)).send();

    match request.await {
        Ok(response) if response.status().is_success() => CheckResult::Ok,
        Ok(response) => CheckResult::Warning(format!(
            "service at {} answered with {}",
            base,
            response.status()
        )),
        Err(e) => CheckResult::Missing(format!(
            "cannot reach {}: {}. Start with: ollama serve",
            base, e
        )),
    }
}

fn report(label: &str, result: &CheckResult) {
    print!("{}: ", label);
    match result {
        CheckResult::Ok => println!("{}", "OK".green()),
        CheckResult::Missing(message) => {
            println!("{}", "MISSING".red());
            println!("  {}", message);
        }
        CheckResult::Warning(message) => {
            println!("{}", "WARNING".yellow());
            println!("  {}", message);
        }
    }
}

/// Run all dependency checks and print a colored report.
///
/// Returns `true` when every hard dependency is available. Warnings do not
/// fail the check.
pub async fn check_dependencies(config: &Config) -> bool {
    println!("Checking wavnote dependencies...\n");

    let engine = check_engine(&config.engine.binary);
    report(
        &format!("transcription engine ({})", config.engine.binary),
        &engine,
    );

    let summarizer = check_summarizer(&config.summarizer.url).await;
    report(
        &format!("summarization service ({})", config.summarizer.url),
        &summarizer,
    );

    let all_ok = !matches!(engine, CheckResult::Missing(_))
        && !matches!(summarizer, CheckResult::Missing(_));

    println!();
    if all_ok {
        println!("{}", "All dependencies available.".green());
    } else {
        println!("{}", "Some dependencies are missing.".red());
    }

    all_ok
}
