//! `shelf`: an offline-first book and author catalog.
//!
//! Reads and writes go through a synchronization gateway that keeps a local
//! cache, the bundled seed catalogs and an optional remote catalog in step.
//! Without a reachable remote every command still works against the cache.

mod app;
mod cli;
mod error;
mod render;

use crate::app::App;
use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use crate::render::Output;
use clap::Parser;
use exn::ResultExt;
use shelf_config::Config;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    tracing::debug!(data_dir = %config.data_dir.display(), backend = %config.storage.backend, seed = %config.seed, "Configuration loaded");
    let app = App::build(&config, cli.dry_run, Output::from_flag(cli.json)).await?;
    let result = app.run(cli.command).await;
    app.close().await;
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            if err.is_retryable() {
                eprintln!("This may succeed if you try again.");
            }
            ExitCode::FAILURE
        },
    }
}
