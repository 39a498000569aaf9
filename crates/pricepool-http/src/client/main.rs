use clap::Parser;
use pricepool_http::{
    client::{
        config::{CliArgs, ClientConfig},
        run,
    },
    common::telemetry::init_telemetry,
};
use std::time::Instant;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ClientConfig::try_from(args)?;

    init_telemetry()?;

    tracing::info!(
        "Sending {} records to {} ({} in flight)",
        config.record_count,
        config.server_url,
        config.concurrency
    );

    let start = Instant::now();
    let summary = run(&config).await?;

    tracing::info!(
        sent = summary.sent,
        exported = summary.exported,
        dropped = summary.dropped(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Exported results to {}",
        config.output.display()
    );

    Ok(())
}
