//! pinlink command line entry point
//!
//! Deploys local sites through the pinning service, binds domains, and moves
//! content in and out as CAR archives.

mod adapters;
mod cli;
mod commands;
mod config;
mod prompt;

use std::process::ExitCode;

use adapters::KeyringCredentialStore;
use clap::Parser;
use cli::Cli;
use commands::App;
use config::AppConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only results
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref(), cli.verbose);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(filter)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins when set and valid; otherwise `-v` picks debug over info.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid RUST_LOG: {e}"),
        }
    }
    EnvFilter::new(if verbose { "debug" } else { "info" })
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let dir = config::app_dir()?;
    let mut config = AppConfig::load_from(&dir).await?.with_env();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    tracing::debug!("Using API {} (config dir {})", config.api_base, dir.display());

    let app = App::new(config, KeyringCredentialStore::new(dir));
    app.run(cli.command).await
}
