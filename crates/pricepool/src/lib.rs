#![doc = include_str!("../README.md")]

mod batch;
mod error;
mod id;
mod pool;
mod pricing;
mod result_set;
mod time;


pub use crate::{
    batch::BatchProcessor,
    error::{Error, Result},
    id::{IdIssuer, ResultId},
    pool::{DEFAULT_NUM_WORKERS, DEFAULT_RESULT_BUFFER_SIZE, PoolConfig, WorkerPool},
    pricing::{Pricer, PricingRequest, PricingResult, Quote, TaxInclusive},
    result_set::{Failure, ResultSet},
    time::{MonotonicClock, TimeSource},
};
