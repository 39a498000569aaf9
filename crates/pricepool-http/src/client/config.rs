use anyhow::bail;
use clap::Parser;
use core::{num::NonZeroUsize, time::Duration};
use std::path::PathBuf;

/// Runtime configuration for the `pricepool-client` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pricepool-client",
    version,
    about = "Sends generated pricing records to a pricepool server and exports the results"
)]
pub struct CliArgs {
    /// Full URL of the server's process endpoint.
    ///
    /// Environment variable: `SERVER_URL`
    #[arg(long, env = "SERVER_URL", default_value_t = String::from("http://localhost:8080/process"))]
    pub server_url: String,

    /// Number of example records to generate and send.
    ///
    /// Environment variable: `RECORD_COUNT`
    #[arg(long, env = "RECORD_COUNT", default_value_t = 1000)]
    pub record_count: usize,

    /// Number of single-item requests kept in flight at once.
    ///
    /// Environment variable: `CONCURRENCY`
    #[arg(long, env = "CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// Where to write the newline-delimited JSON results.
    ///
    /// Environment variable: `OUTPUT`
    #[arg(long, env = "OUTPUT", default_value = "results.ndjson")]
    pub output: PathBuf,

    /// Seed for the record generator. Omit for a random seed.
    ///
    /// Environment variable: `SEED`
    #[arg(long, env = "SEED")]
    pub seed: Option<u64>,

    /// Per-request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT_SECS`
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub record_count: usize,
    pub concurrency: NonZeroUsize,
    pub output: PathBuf,
    pub seed: Option<u64>,
    pub request_timeout: Duration,
}

impl TryFrom<CliArgs> for ClientConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let Some(concurrency) = NonZeroUsize::new(args.concurrency) else {
            bail!("CONCURRENCY must be greater than 0");
        };

        if args.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        Ok(Self {
            server_url: args.server_url,
            record_count: args.record_count,
            concurrency,
            output: args.output,
            seed: args.seed,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        })
    }
}
