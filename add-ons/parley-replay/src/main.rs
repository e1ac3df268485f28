//! Parley replay: runs a role-play transcript through the conversation engine.
//!
//! Usage:
//!   cargo run -p parley-replay -- <transcript.json> [--config path] [--prompt]
//!   cargo run -p parley-replay -- --write-config config/parley.toml
//!
//! Prints a JSON report (per-turn affect, flags, guidance, objectives and each coaching
//! question's tier) to stdout. Logs go to stderr; set RUST_LOG to adjust.

mod replay;
mod transcript;

use parley_bridge::CompletionRouter;
use parley_core::{EngineConfig, LlmMode, TierClassifier};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transcript::Transcript;

fn print_usage() {
    eprintln!("Parley replay: conversation engine transcript runner");
    eprintln!("  <transcript.json>     Transcript to replay");
    eprintln!("  --config PATH         Engine config (default: PARLEY_CONFIG or config/parley.toml)");
    eprintln!("  --prompt              Include the next persona system prompt in the report");
    eprintln!("  --write-config PATH   Write the default config as TOML and exit");
    eprintln!();
    eprintln!("Tier fallback uses the completion service only when llm.mode = \"live\".");
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum CliError {
    #[error("{0} needs a path")]
    MissingValue(String),
}

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    transcript_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    write_config: Option<PathBuf>,
    include_prompt: bool,
}

impl CliArgs {
    /// `Ok(None)` means help was requested.
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Option<Self>, CliError> {
        let mut args = args.into_iter();
        let mut out = Self::default();
        while let Some(a) = args.next() {
            match a.as_str() {
                "--config" => {
                    let value = args.next().ok_or_else(|| CliError::MissingValue(a.clone()))?;
                    out.config_path = Some(PathBuf::from(value));
                }
                "--write-config" => {
                    let value = args.next().ok_or_else(|| CliError::MissingValue(a.clone()))?;
                    out.write_config = Some(PathBuf::from(value));
                }
                "--prompt" => out.include_prompt = true,
                "-h" | "--help" => return Ok(None),
                other => out.transcript_path = Some(PathBuf::from(other)),
            }
        }
        Ok(Some(out))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[parley-replay] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(2);
        }
    };
    let CliArgs {
        transcript_path,
        config_path,
        write_config,
        include_prompt,
    } = args;

    if let Some(path) = write_config {
        EngineConfig::default().save_to_path(&path)?;
        tracing::info!(path = %path.display(), "Wrote default config");
        return Ok(());
    }

    let Some(transcript_path) = transcript_path else {
        print_usage();
        return Ok(());
    };

    let config = match &config_path {
        Some(path) => EngineConfig::load_from_path(path)?,
        None => EngineConfig::load()?,
    };

    let mut classifier = TierClassifier::new(config.tier.clone());
    if config.llm.mode == LlmMode::Live {
        let router = CompletionRouter::from_config(&config.llm);
        if !router.has_api_key() {
            tracing::warn!("llm.mode is live but no API key is configured; fallback calls will fail over to heuristics");
        }
        classifier = classifier.with_fallback(Arc::new(router));
    }

    let transcript = Transcript::load(&transcript_path)?;
    tracing::info!(
        path = %transcript_path.display(),
        turns = transcript.turns.len(),
        persona = %transcript.persona.name,
        "Replaying transcript"
    );

    let report = replay::run(&transcript, &config, &classifier, include_prompt).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<CliArgs>, CliError> {
        CliArgs::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn flags_and_transcript() {
        let args = parse(&["t.json", "--config", "c.toml", "--prompt"]).unwrap().unwrap();
        assert_eq!(args.transcript_path, Some(PathBuf::from("t.json")));
        assert_eq!(args.config_path, Some(PathBuf::from("c.toml")));
        assert!(args.include_prompt);
        assert_eq!(parse(&["--help"]), Ok(None));
    }

    #[test]
    fn path_flags_without_value_are_errors() {
        assert_eq!(
            parse(&["t.json", "--config"]),
            Err(CliError::MissingValue("--config".into()))
        );
        let err = parse(&["--write-config"]).unwrap_err();
        assert_eq!(err.to_string(), "--write-config needs a path");
    }
}
