//! Definitions shared by the server and client.
//!
//! ## Submodules
//!
//! - [`error`] - server-side error type and its HTTP status mapping.
//! - [`framing`] - NDJSON frame encoding and decoding.
//! - [`telemetry`] - `tracing` subscriber setup for both binaries.

pub mod error;
pub mod framing;
pub mod telemetry;
