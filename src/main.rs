use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use wavnote::cli::{Cli, Commands};
use wavnote::config::Config;
use wavnote::diagnostics::check_dependencies;
use wavnote::engine::EngineCommand;
use wavnote::pipeline::{Pipeline, PipelineConfig};
use wavnote::summarize::OllamaSummarizer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        None => {
            let (source, dest) = match (cli.source.clone(), cli.dest.clone()) {
                (Some(source), Some(dest)) => (source, dest),
                _ => anyhow::bail!("--source and --dest are required (see --help for usage)"),
            };
            let mut config = load_config(cli.config.as_deref())?;
            apply_cli_overrides(&mut config, &cli);
            run_batch(config, &source, &dest, cli.quiet, cli.verbose).await?;
        }
        Some(Commands::Check) => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_cli_overrides(&mut config, &cli);
            if !check_dependencies(&config).await {
                std::process::exit(1);
            }
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "wavnote", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load config from the explicit path, or from the default location with
/// fallback to built-in defaults, then apply environment overrides.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(explicit) => Config::load(explicit)?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    Ok(config.with_env_overrides())
}

/// CLI flags override both file and environment values.
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(binary) = &cli.engine {
        config.engine.binary = binary.clone();
    }
    if let Some(timeout) = cli.engine_timeout {
        config.engine.timeout_secs = timeout;
    }
    if let Some(url) = &cli.ollama_url {
        config.summarizer.url = url.clone();
    }
    if let Some(model) = &cli.model {
        config.summarizer.model = model.clone();
    }
    if let Some(extension) = &cli.extension {
        config.output.extension = extension.clone();
    }
}

/// Run the batch: create the destination, wire up cancellation, process
/// every discovered WAV file.
async fn run_batch(
    config: Config,
    source: &Path,
    dest: &Path,
    quiet: bool,
    verbosity: u8,
) -> Result<()> {
    std::fs::create_dir_all(dest)?;

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone(), quiet);

    let pipeline = Pipeline::new(
        Box::new(EngineCommand::new(&config.engine)),
        Box::new(OllamaSummarizer::new(&config.summarizer)),
        PipelineConfig {
            dest_dir: dest.to_path_buf(),
            extension: config.output.extension.clone(),
            title_heading: config.output.title_heading,
            quiet,
            verbosity,
        },
    );

    let summary = pipeline.run(source, &cancel).await?;
    if !quiet {
        println!("Done. {} file(s) processed.", summary.files_found);
    }

    Ok(())
}

/// Cancel the run on SIGINT or SIGTERM. The in-flight engine subprocess or
/// HTTP request is torn down by the pipeline when the token fires.
fn spawn_signal_handler(cancel: CancellationToken, quiet: bool) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                if !quiet {
                    eprintln!("\nReceived SIGINT, stopping...");
                }
            }
            result = wait_for_sigterm() => {
                if let Err(e) = result {
                    eprintln!("Error setting up signal handler: {}", e);
                }
                if !quiet {
                    eprintln!("\nReceived SIGTERM, stopping...");
                }
            }
        }
        cancel.cancel();
    });
}

/// Wait for SIGTERM (used under systemd and service managers).
#[cfg(unix)]
async fn wait_for_sigterm() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigterm = signal(SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_sigterm() -> std::io::Result<()> {
    // On non-Unix, just wait forever (Ctrl+C still works)
    std::future::pending().await
}
