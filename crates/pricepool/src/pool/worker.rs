use crate::{
    IdIssuer, PricingRequest, PricingResult,
    pricing::Pricer,
    result_set::{Failure, Outcome, panic_message},
    time::TimeSource,
};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};
use tokio::sync::mpsc;

/// State shared read-only by every worker of a pool.
///
/// The issuer's counter is the only mutable piece, and it is atomic.
pub(crate) struct WorkerContext<P, C> {
    issuer: Arc<IdIssuer>,
    pricer: P,
    clock: C,
}

impl<P, C> WorkerContext<P, C>
where
    P: Pricer,
    C: TimeSource,
{
    pub(crate) const fn new(issuer: Arc<IdIssuer>, pricer: P, clock: C) -> Self {
        Self {
            issuer,
            pricer,
            clock,
        }
    }

    pub(crate) const fn issuer(&self) -> &Arc<IdIssuer> {
        &self.issuer
    }

    /// Turns one request into a result, or into an item failure if the
    /// issuer is exhausted or the pricer panics.
    pub(crate) fn process(&self, worker_id: usize, request: PricingRequest) -> Outcome {
        let received_at = self.clock.now();

        let id = self.issuer.issue().map_err(|e| Failure::Item {
            request_id: request.id.clone(),
            worker_id,
            reason: e.to_string(),
        })?;

        let quote = panic::catch_unwind(AssertUnwindSafe(|| self.pricer.quote(&request)))
            .map_err(|payload| Failure::Item {
                request_id: request.id.clone(),
                worker_id,
                reason: format!("pricer panicked: {}", panic_message(&*payload)),
            })?;

        let processed_at = self.clock.now();

        Ok(PricingResult {
            id,
            total_price: quote.total_price,
            tax_amount: quote.tax_amount,
            received_at,
            processed_at,
        })
    }
}

/// Worker task that drains the shared queue until it is closed and empty.
///
/// Every popped request produces exactly one [`Outcome`], which is sent to
/// the aggregator. A panic while processing an item fails only that item.
/// The worker stops early only if the aggregator is gone.
pub(crate) async fn worker_loop<P, C>(
    worker_id: usize,
    queue: async_channel::Receiver<PricingRequest>,
    context: Arc<WorkerContext<P, C>>,
    results: mpsc::Sender<Outcome>,
) where
    P: Pricer,
    C: TimeSource,
{
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    while let Ok(request) = queue.recv().await {
        let request_id = request.id.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            context.process(worker_id, request)
        }))
        .unwrap_or_else(|payload| {
            Err(Failure::Item {
                request_id,
                worker_id,
                reason: format!("worker panicked: {}", panic_message(&*payload)),
            })
        });

        #[cfg(feature = "tracing")]
        {
            if let Err(failure) = &outcome {
                tracing::warn!("Worker {worker_id}: {failure}");
            }
        }

        if let Err(_e) = results.send(outcome).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Worker {worker_id} lost the aggregator: {_e}");
            break;
        }

        // A ready queue never parks the task, so hand the thread to siblings.
        tokio::task::yield_now().await;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped");
}
