//! Command-line front end for the tiered sentiment classifier.
//!
//! # Usage
//!
//! ```bash
//! # Classify one message
//! HF_TOKEN=hf_... sentiment-cli "I am so happy and grateful today"
//!
//! # One message per line from stdin, one JSON result per line on stdout
//! cat journal.txt | sentiment-cli --lines
//!
//! # Settings from a file, overridden by SENTIMENT_* variables
//! sentiment-cli --config sentiment.toml "it's fine I guess"
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sentiment_classifier::{ClassificationResult, ClassifierConfig, EscalationController};
use tracing::info;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to classify (omit with --lines)
    text: Option<String>,

    /// Read messages from stdin, one per line
    #[arg(long, default_value_t = false, conflicts_with = "text")]
    lines: bool,

    /// Path to a TOML settings file (environment variables take precedence)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never call the remote classifier (confidence threshold of 0)
    #[arg(long, default_value_t = false)]
    local_only: bool,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = load_config(&args, |key| std::env::var(key).ok())?;
    info!(
        threshold = config.confidence_threshold,
        model = %config.remote_model,
        max_attempts = config.retry.max_attempts(),
        "Sentiment classifier starting"
    );

    let controller = EscalationController::from_config(&config)
        .context("failed to build remote classifier client")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.lines {
        let stdin = std::io::stdin();
        for (lineno, line) in stdin.lock().lines().enumerate() {
            let line = line.context("failed to read stdin")?;
            if line.trim().is_empty() {
                tracing::debug!(line = lineno + 1, "Skipping blank line");
                continue;
            }
            let result = controller.classify(&line).await;
            emit(&mut out, &result, args.pretty)?;
        }
    } else {
        let text = validate_text(args.text.as_deref())?;
        let result = controller.classify(text).await;
        emit(&mut out, &result, args.pretty)?;
    }

    let stats = controller.stats();
    info!(
        total = stats.total(),
        local = stats.local,
        remote = stats.remote,
        local_fallback = stats.local_fallback,
        "Done"
    );

    Ok(())
}

/// Resolve configuration for this run; `--local-only` disables escalation.
fn load_config<F>(args: &Args, env: F) -> Result<ClassifierConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ClassifierConfig::load_with(args.config.as_deref(), env)
        .context("failed to load classifier configuration")?;
    if args.local_only {
        config.confidence_threshold = 0.0;
    }
    Ok(config)
}

/// Reject missing, empty or whitespace-only input before it reaches the pipeline.
fn validate_text(text: Option<&str>) -> Result<&str> {
    let Some(text) = text else {
        bail!("no text given; pass a message or use --lines");
    };
    if text.trim().is_empty() {
        bail!("input text is empty");
    }
    Ok(text)
}

fn emit(out: &mut impl Write, result: &ClassificationResult, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    writeln!(out, "{json}")?;
    Ok(())
}
