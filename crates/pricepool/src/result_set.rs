use crate::PricingResult;
use core::{any::Any, num::NonZeroUsize, slice};

/// What a worker hands to the aggregator for each item.
pub(crate) type Outcome = Result<PricingResult, Failure>;

/// A reported failure that kept an item out of the results.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// One item could not be processed. Its worker carried on.
    #[error("item {request_id:?} failed on worker {worker_id}: {reason}")]
    Item {
        request_id: String,
        worker_id: usize,
        reason: String,
    },

    /// A worker task died outside of item processing.
    #[error("worker {worker_id} failed: {reason}")]
    Worker { worker_id: usize, reason: String },

    /// An item was still queued after every worker had exited.
    #[error("item {request_id:?} was never processed")]
    Unprocessed { request_id: String },
}

/// The complete, unordered outcome of one batch.
///
/// Results carry no positional relationship to the input; correlate through
/// [`PricingResult::id`] only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    results: Vec<PricingResult>,
    failures: Vec<Failure>,
}

impl ResultSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
            failures: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, outcome: Outcome) {
        match outcome {
            Ok(result) => self.results.push(result),
            Err(failure) => self.failures.push(failure),
        }
    }

    pub(crate) fn extend_failures(&mut self, failures: impl IntoIterator<Item = Failure>) {
        self.failures.extend(failures);
    }

    /// Number of successful results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns `true` if no item or worker failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn results(&self) -> &[PricingResult] {
        &self.results
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn iter(&self) -> slice::Iter<'_, PricingResult> {
        self.results.iter()
    }

    /// Splits the results into `ceil(len / chunk_size)` consecutive slices
    /// for transport. Every slice but the last holds exactly `chunk_size`
    /// results.
    pub fn chunks(&self, chunk_size: NonZeroUsize) -> slice::Chunks<'_, PricingResult> {
        self.results.chunks(chunk_size.get())
    }

    pub fn into_parts(self) -> (Vec<PricingResult>, Vec<Failure>) {
        (self.results, self.failures)
    }
}

impl IntoIterator for ResultSet {
    type Item = PricingResult;
    type IntoIter = std::vec::IntoIter<PricingResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a PricingResult;
    type IntoIter = slice::Iter<'a, PricingResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
