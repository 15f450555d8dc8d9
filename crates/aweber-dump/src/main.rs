//! `aweber-dump` - export an AWeber list's broadcasts to a Markdown digest.
//!
//! Reads credentials from the environment (or a `.env` file), authorizes
//! once interactively, caches the token in `aweber_token.json`, and writes
//! every draft, scheduled and sent broadcast of the first list, newest first.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod prompt;

use std::process::ExitCode;

use anyhow::Context;
use aweber_core::{Config, WriteOutcome};
use aweber_oauth::TokenCache;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prompt::TerminalPrompt;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aweber_dump=info,aweber_core=info,aweber_oauth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    info!("AWeber Dumper v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e).context("failed to load .env");
    }
    let config = Config::from_env()?;

    let mut prompt = TerminalPrompt::stdio();
    let summary = aweber_core::export(&config, TokenCache::default(), &mut prompt).await?;

    match summary.outcome {
        WriteOutcome::Written { path, count } => {
            info!("Done! {count} messages from {} saved to {}", summary.list_name, path.display());
        }
        WriteOutcome::Skipped => info!("Nothing to save."),
    }
    Ok(())
}
