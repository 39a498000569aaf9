//! Error types for the batch pricing core.
//!
//! ## Error Cases
//! - `InvalidRequest`: A batch contained an item with a negative or non-finite
//!   value. The whole batch is rejected before any work starts.
//! - `InvalidConfig`: A pool was configured with a zero-sized resource.
//! - `IdSpaceExhausted`: The ID issuer ran out of identifiers.
//! - `ChannelError`: Internal queue or result channel failure.
//! - `Aggregation`: The aggregator task died before returning the result set.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the batch pricing core.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The batch was rejected before entering the worker pool.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The pool configuration cannot be used.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Every identifier the issuer can represent has been handed out.
    #[error("ID space exhausted after {last}")]
    IdSpaceExhausted { last: u64 },

    /// Internal channel send/receive failure (e.g., closed or full channel).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The aggregator task failed and its results are unrecoverable.
    #[error("Aggregation failed: {reason}")]
    Aggregation { reason: String },
}
