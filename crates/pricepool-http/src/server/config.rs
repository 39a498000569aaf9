use anyhow::bail;
use clap::Parser;
use core::num::NonZeroUsize;
use pricepool::{DEFAULT_NUM_WORKERS, DEFAULT_RESULT_BUFFER_SIZE, PoolConfig};

/// Runtime configuration for the `pricepool-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first if present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pricepool-server",
    version,
    about = "An HTTP service that prices batches with a bounded worker pool"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Number of concurrent workers draining each batch.
    ///
    /// Pool size only affects scheduling, never the computed values.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = DEFAULT_NUM_WORKERS)]
    pub num_workers: usize,

    /// Capacity of the channel between workers and the aggregator.
    ///
    /// Environment variable: `RESULT_BUFFER_SIZE`
    #[arg(long, env = "RESULT_BUFFER_SIZE", default_value_t = DEFAULT_RESULT_BUFFER_SIZE)]
    pub result_buffer_size: usize,

    /// Number of results written per response frame.
    ///
    /// Environment variable: `CHUNK_SIZE`
    #[arg(long, env = "CHUNK_SIZE", default_value_t = 100)]
    pub chunk_size: usize,

    /// Maximum number of items accepted in one batch.
    ///
    /// Larger batches are rejected with `400 Bad Request` before any work
    /// starts, since each batch is buffered in full while it is processed.
    ///
    /// Environment variable: `MAX_BATCH_SIZE`
    #[arg(long, env = "MAX_BATCH_SIZE", default_value_t = 1_000_000)]
    pub max_batch_size: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub pool: PoolConfig,
    pub chunk_size: NonZeroUsize,
    pub max_batch_size: usize,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let pool = PoolConfig::new(args.num_workers)
            .and_then(|pool| pool.with_result_buffer_size(args.result_buffer_size))?;

        let Some(chunk_size) = NonZeroUsize::new(args.chunk_size) else {
            bail!("CHUNK_SIZE must be greater than 0");
        };

        if args.max_batch_size == 0 {
            bail!("MAX_BATCH_SIZE must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            pool,
            chunk_size,
            max_batch_size: args.max_batch_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            server_addr: "127.0.0.1:0".to_string(),
            num_workers: 5,
            result_buffer_size: 64,
            chunk_size: 100,
            max_batch_size: 1_000,
        }
    }

    #[test]
    fn accepts_defaults() {
        let config = ServerConfig::try_from(args()).unwrap();
        assert_eq!(config.pool.num_workers(), 5);
        assert_eq!(config.chunk_size.get(), 100);
        assert_eq!(config.max_batch_size, 1_000);
    }

    #[test]
    fn rejects_zero_values() {
        for args in [
            CliArgs {
                num_workers: 0,
                ..args()
            },
            CliArgs {
                result_buffer_size: 0,
                ..args()
            },
            CliArgs {
                chunk_size: 0,
                ..args()
            },
            CliArgs {
                max_batch_size: 0,
                ..args()
            },
        ] {
            assert!(ServerConfig::try_from(args).is_err());
        }
    }

    #[test]
    fn cli_flags_parse() {
        let args = CliArgs::try_parse_from([
            "pricepool-server",
            "--server-addr",
            "127.0.0.1:9000",
            "--num-workers",
            "50",
            "--chunk-size",
            "10",
        ])
        .unwrap();
        assert_eq!(args.server_addr, "127.0.0.1:9000");
        assert_eq!(args.num_workers, 50);
        assert_eq!(args.chunk_size, 10);
    }
}
