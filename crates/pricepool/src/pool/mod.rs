//! Fixed-size worker pool that drains a closed work queue.
//!
//! A [`WorkerPool`] spawns exactly `num_workers` Tokio tasks per drain. Every
//! worker pulls from the same [`async_channel::Receiver`] (receivers are
//! cloneable, so no lock sits in front of the queue) and pushes one outcome
//! per item into a bounded [`mpsc`] channel. A single aggregator task owns
//! the [`ResultSet`] and is the only writer to it.
//!
//! Workers exit when the queue is closed and empty. There is no other
//! shutdown signal.
//!
//! ## Structure
//!
//! - [`worker`] - per-item processing and the worker loop.
//! - [`aggregator`] - the single-writer result collector.

pub(crate) mod aggregator;
pub(crate) mod worker;

use crate::{
    Error, IdIssuer, MonotonicClock, PricingRequest, Result, ResultSet, TaxInclusive,
    pool::{aggregator::aggregate, worker::WorkerContext, worker::worker_loop},
    pricing::Pricer,
    result_set::{Failure, panic_message},
    time::TimeSource,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default number of concurrent workers.
pub const DEFAULT_NUM_WORKERS: usize = 5;

/// Default capacity of the channel between workers and the aggregator.
pub const DEFAULT_RESULT_BUFFER_SIZE: usize = 64;

/// Sizing for a [`WorkerPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    num_workers: usize,
    result_buffer_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: DEFAULT_NUM_WORKERS,
            result_buffer_size: DEFAULT_RESULT_BUFFER_SIZE,
        }
    }
}

impl PoolConfig {
    /// Creates a config with `num_workers` workers and the default result
    /// buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `num_workers` is zero.
    pub fn new(num_workers: usize) -> Result<Self> {
        Self::default().with_num_workers(num_workers)
    }

    pub fn with_num_workers(self, num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "num_workers must be greater than 0".to_string(),
            });
        }
        Ok(Self {
            num_workers,
            ..self
        })
    }

    pub fn with_result_buffer_size(self, result_buffer_size: usize) -> Result<Self> {
        if result_buffer_size == 0 {
            return Err(Error::InvalidConfig {
                reason: "result_buffer_size must be greater than 0".to_string(),
            });
        }
        Ok(Self {
            result_buffer_size,
            ..self
        })
    }

    pub const fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub const fn result_buffer_size(&self) -> usize {
        self.result_buffer_size
    }
}

/// A pool of `N` workers sharing one [`IdIssuer`], one [`Pricer`] and one
/// [`TimeSource`].
///
/// The pool holds no tasks between drains; each call to [`drain`] starts a
/// fresh set of workers and waits for all of them to exit.
///
/// [`drain`]: WorkerPool::drain
pub struct WorkerPool<P = TaxInclusive, C = MonotonicClock> {
    config: PoolConfig,
    context: Arc<WorkerContext<P, C>>,
}

impl WorkerPool {
    /// Creates a pool using [`TaxInclusive`] pricing and a fresh
    /// [`MonotonicClock`].
    pub fn new(config: PoolConfig, issuer: Arc<IdIssuer>) -> Self {
        Self::with_parts(config, issuer, TaxInclusive, MonotonicClock::new())
    }
}

impl<P, C> WorkerPool<P, C>
where
    P: Pricer,
    C: TimeSource,
{
    pub fn with_parts(config: PoolConfig, issuer: Arc<IdIssuer>, pricer: P, clock: C) -> Self {
        Self {
            config,
            context: Arc::new(WorkerContext::new(issuer, pricer, clock)),
        }
    }

    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn issuer(&self) -> &Arc<IdIssuer> {
        self.context.issuer()
    }

    /// Drains `queue` with `num_workers` concurrent workers and returns the
    /// aggregated [`ResultSet`].
    ///
    /// `expected` is a capacity hint for the result set. The queue should
    /// already be closed; otherwise this call waits until it is.
    ///
    /// A worker that dies outright is recorded as [`Failure::Worker`] and its
    /// siblings keep draining. Items still queued after every worker has
    /// exited are recorded as [`Failure::Unprocessed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aggregation`] if the aggregator task itself fails.
    pub async fn drain(
        &self,
        queue: async_channel::Receiver<PricingRequest>,
        expected: usize,
    ) -> Result<ResultSet> {
        let (result_tx, result_rx) = mpsc::channel(self.config.result_buffer_size);
        let aggregator = tokio::spawn(aggregate(result_rx, expected));

        let workers: Vec<_> = (0..self.config.num_workers)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    queue.clone(),
                    Arc::clone(&self.context),
                    result_tx.clone(),
                ))
            })
            .collect();

        // The aggregator finishes once every worker has dropped its sender.
        drop(result_tx);

        let mut lost = Vec::new();
        for (worker_id, joined) in futures::future::join_all(workers)
            .await
            .into_iter()
            .enumerate()
        {
            if let Err(e) = joined {
                let reason = if e.is_panic() {
                    format!("worker panicked: {}", panic_message(&*e.into_panic()))
                } else {
                    e.to_string()
                };
                #[cfg(feature = "tracing")]
                tracing::error!("Worker {worker_id} failed: {reason}");
                lost.push(Failure::Worker { worker_id, reason });
            }
        }

        while let Ok(request) = queue.try_recv() {
            lost.push(Failure::Unprocessed {
                request_id: request.id,
            });
        }

        let mut set = aggregator.await.map_err(|e| Error::Aggregation {
            reason: e.to_string(),
        })?;
        set.extend_failures(lost);
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.num_workers(), 5);
        assert_eq!(config.result_buffer_size(), 64);
    }

    #[test]
    fn config_rejects_zero_sizes() {
        assert!(matches!(
            PoolConfig::new(0),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            PoolConfig::default().with_result_buffer_size(0),
            Err(Error::InvalidConfig { .. })
        ));
        let config = PoolConfig::new(50)
            .and_then(|c| c.with_result_buffer_size(1))
            .unwrap();
        assert_eq!(config.num_workers(), 50);
        assert_eq!(config.result_buffer_size(), 1);
    }

    #[tokio::test]
    async fn drain_of_an_empty_closed_queue_returns_immediately() {
        let pool = WorkerPool::new(PoolConfig::default(), Arc::new(IdIssuer::new()));
        let (tx, rx) = async_channel::bounded::<PricingRequest>(1);
        tx.close();

        let set = pool.drain(rx, 0).await.unwrap();
        assert!(set.is_empty());
        assert!(set.is_complete());
        assert_eq!(pool.issuer().issued(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn workers_block_until_the_queue_is_closed() {
        let pool = Arc::new(WorkerPool::new(
            PoolConfig::new(3).unwrap(),
            Arc::new(IdIssuer::new()),
        ));
        let (tx, rx) = async_channel::unbounded();

        let drain = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.drain(rx, 4).await })
        };

        for i in 0..4 {
            tx.send(PricingRequest::new(format!("late-{i}"), 10.0, 0.5))
                .await
                .unwrap();
            tokio::task::yield_now().await;
        }
        assert!(!drain.is_finished());
        tx.close();

        let set = drain.await.unwrap().unwrap();
        assert_eq!(set.len(), 4);
        assert!(set.is_complete());
    }
}
