//! HTTP service wrapping the batch pricing core.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env configuration for the `pricepool-server` binary.
//! - [`handler`] - routes, shared state, and the `POST /process` handler.

pub mod config;
pub mod handler;
