//! Routes and request handling for the pricing service.
//!
//! `POST /process` decodes a JSON array of requests, runs it through the
//! shared [`BatchProcessor`], and streams the result set back as NDJSON, one
//! body frame per `chunk_size` results. The full set is computed before the
//! first frame is written.

use crate::common::{
    error::{Error, Result},
    framing::{NDJSON_CONTENT_TYPE, encode_frame},
};
use crate::server::config::ServerConfig;
use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use core::{convert::Infallible, num::NonZeroUsize};
use pricepool::{BatchProcessor, IdIssuer, PricingRequest};
use std::{sync::Arc, time::Instant};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Response header carrying the number of items that failed.
pub const FAILED_ITEMS_HEADER: &str = "x-failed-items";

/// Request body allowance per batch item. A typical encoded request is under
/// 64 bytes; the rest leaves room for long input ids.
pub const MAX_BYTES_PER_ITEM: usize = 256;

/// State shared by every request.
///
/// The [`IdIssuer`] inside the processor lives as long as the server, so
/// result ids are unique across all batches served by this process.
#[derive(Clone)]
pub struct AppState {
    processor: Arc<BatchProcessor>,
    chunk_size: NonZeroUsize,
    max_batch_size: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig, issuer: Arc<IdIssuer>) -> Self {
        Self {
            processor: Arc::new(BatchProcessor::new(config.pool, issuer)),
            chunk_size: config.chunk_size,
            max_batch_size: config.max_batch_size,
        }
    }
}

/// Builds the service router.
///
/// The request body limit scales with `max_batch_size`, so the item-count
/// check in the handler is what rejects an oversized batch, not axum's
/// default 2 MB cap.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_batch_size.saturating_mul(MAX_BYTES_PER_ITEM);

    Router::new()
        .route("/process", post(process_batch))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn process_batch(
    State(state): State<AppState>,
    payload: core::result::Result<Json<Vec<PricingRequest>>, JsonRejection>,
) -> Result<Response> {
    let Json(batch) = payload?;
    let len = batch.len();

    if len > state.max_batch_size {
        return Err(Error::BatchTooLarge {
            len,
            max: state.max_batch_size,
        });
    }

    let start = Instant::now();
    let set = state.processor.process(batch).await?;

    for failure in set.failures() {
        tracing::warn!("{failure}");
    }

    let frames = set
        .chunks(state.chunk_size)
        .map(encode_frame)
        .collect::<core::result::Result<Vec<_>, _>>()?;

    tracing::info!(
        items = len,
        results = set.len(),
        failures = set.failures().len(),
        frames = frames.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Processed batch"
    );

    let body = Body::from_stream(futures::stream::iter(
        frames.into_iter().map(Ok::<_, Infallible>),
    ));

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(NDJSON_CONTENT_TYPE),
            ),
            (
                HeaderName::from_static(FAILED_ITEMS_HEADER),
                HeaderValue::from(set.failures().len()),
            ),
        ],
        body,
    )
        .into_response())
}
