//! Load-generating client for a pricepool server.
//!
//! A run generates example records, sends each one to the server as a
//! single-item batch, times the round trip, and exports every successful
//! result as newline-delimited JSON. Items whose round trip fails are logged
//! and left out of the export; the run itself only fails if the export does.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env configuration for the `pricepool-client` binary.
//! - [`records`] - seedable example-data generation.
//! - [`transport`] - the HTTP client.
//! - [`export`] - atomic NDJSON export.

pub mod config;
pub mod export;
pub mod records;
pub mod transport;

pub use export::{TimedResult, export_ndjson};
pub use records::generate_records;
pub use transport::PricingClient;

use config::ClientConfig;
use rand::{SeedableRng, rngs::StdRng};

/// Errors surfaced by the client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The request never completed (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A body or export line was not valid JSON for the expected type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server returned a different number of results than items sent.
    #[error("Expected {expected} results, got {got}")]
    UnexpectedCount { expected: usize, got: usize },

    /// The export file could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Counts for one completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: usize,
    pub exported: usize,
}

impl RunSummary {
    pub const fn dropped(&self) -> usize {
        self.sent - self.exported
    }
}

/// Generates, sends, and exports one run's worth of records.
///
/// # Errors
///
/// Fails only if the HTTP client cannot be built or the export cannot be
/// written. Per-item failures are dropped.
pub async fn run(config: &ClientConfig) -> Result<RunSummary, ClientError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let records = generate_records(config.record_count, &mut rng);
    let sent = records.len();

    let client = PricingClient::new(&config.server_url, config.request_timeout)?;
    let results = client.send_all(records, config.concurrency).await;

    export_ndjson(&config.output, &results).await?;

    Ok(RunSummary {
        sent,
        exported: results.len(),
    })
}
