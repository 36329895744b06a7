#![doc = include_str!("../README.md")]

mod config;
mod report;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, OutputFormat, RunConfig};
use fanline::{CancellationToken, Pipeline, RunReport};
use report::render;
use telemetry::init_telemetry;
use tokio::signal;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let token = CancellationToken::with_timeout(config.pipeline.timeout);
    let signals = tokio::spawn(cancel_on_signal(token.clone()));

    // The pipeline blocks on OS threads until it has fully drained.
    let pipeline = Pipeline::new(config.pipeline.clone());
    let run_token = token.clone();
    let report = tokio::task::spawn_blocking(move || pipeline.run_until(&run_token))
        .await
        .context("pipeline run panicked")?
        .context("failed to start pipeline")?;
    signals.abort();

    finish(config.output, &report)
}

/// Prints the report, then turns a failed accounting check into a fatal error.
fn finish(output: OutputFormat, report: &RunReport) -> anyhow::Result<()> {
    println!("{}", render(output, report)?);

    if let Err(e) = report.verify() {
        tracing::error!("{e}");
        return Err(anyhow::Error::new(e).context("pipeline accounting check failed"));
    }

    tracing::info!(
        count = report.collected.count,
        sum = report.collected.sum,
        "All invariants hold"
    );
    Ok(())
}

fn log_startup_info(config: &RunConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting pipeline with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting pipeline with {} workers for {:?}",
            config.pipeline.workers,
            config.pipeline.timeout
        );
    }
}

/// Cancels the generator early on Ctrl+C or SIGTERM.
///
/// The rest of the pipeline still drains, so an interrupted run reports and
/// verifies everything generated up to the signal.
async fn cancel_on_signal(token: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Stopping generator, draining in-flight values...");
    token.cancel();
}
