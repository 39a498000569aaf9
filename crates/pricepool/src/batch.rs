use crate::{
    Error, IdIssuer, MonotonicClock, PoolConfig, PricingRequest, Result, ResultSet, TaxInclusive,
    WorkerPool, pricing::Pricer, time::TimeSource,
};
use std::sync::Arc;

/// Runs whole batches through a [`WorkerPool`].
///
/// For each call to [`process`], the processor validates the batch, loads it
/// into a fresh queue sized to the batch, closes the queue, and waits for the
/// pool to drain it. Nothing is streamed back before the drain completes.
///
/// [`process`]: BatchProcessor::process
pub struct BatchProcessor<P = TaxInclusive, C = MonotonicClock> {
    pool: WorkerPool<P, C>,
}

impl BatchProcessor {
    /// Creates a processor with a default-priced pool drawing ids from
    /// `issuer`.
    pub fn new(config: PoolConfig, issuer: Arc<IdIssuer>) -> Self {
        Self::from_pool(WorkerPool::new(config, issuer))
    }
}

impl<P, C> BatchProcessor<P, C>
where
    P: Pricer,
    C: TimeSource,
{
    pub const fn from_pool(pool: WorkerPool<P, C>) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &WorkerPool<P, C> {
        &self.pool
    }

    /// Processes `batch` and returns its [`ResultSet`].
    ///
    /// An empty batch returns an empty set without starting any worker.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] if any item fails
    ///   [`PricingRequest::validate`]. No item is processed in that case.
    /// - [`Error::ChannelError`] if the queue cannot be loaded.
    /// - [`Error::Aggregation`] if the aggregator dies.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(items = batch.len())))]
    pub async fn process(&self, batch: Vec<PricingRequest>) -> Result<ResultSet> {
        if batch.is_empty() {
            return Ok(ResultSet::default());
        }

        for request in &batch {
            request.validate()?;
        }

        let expected = batch.len();
        let (queue_tx, queue_rx) = async_channel::bounded(expected);
        for request in batch {
            queue_tx.try_send(request).map_err(|e| Error::ChannelError {
                context: format!("Failed to load work queue: {e}"),
            })?;
        }
        queue_tx.close();

        let set = self.pool.drain(queue_rx, expected).await?;

        #[cfg(feature = "tracing")]
        {
            if set.is_complete() {
                tracing::debug!("Processed {expected} items");
            } else {
                tracing::warn!(
                    "Processed {} of {expected} items ({} failures)",
                    set.len(),
                    set.failures().len()
                );
            }
        }

        Ok(set)
    }
}
