use super::{ClientError, export::TimedResult};
use crate::common::framing::decode_lines;
use core::{num::NonZeroUsize, time::Duration};
use futures::{StreamExt, stream};
use pricepool::{PricingRequest, PricingResult};
use std::time::Instant;

/// HTTP client for a pricepool server's process endpoint.
#[derive(Clone, Debug)]
pub struct PricingClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PricingClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Posts `batch` as one JSON array and decodes the NDJSON response.
    pub async fn process(&self, batch: &[PricingRequest]) -> Result<Vec<PricingResult>, ClientError> {
        let response = self.http.post(&self.endpoint).json(batch).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        Ok(decode_lines(&body)?)
    }

    /// Sends a single request and measures its round trip.
    pub async fn send_one(&self, request: &PricingRequest) -> Result<TimedResult, ClientError> {
        let start = Instant::now();
        let results = self.process(core::slice::from_ref(request)).await?;
        let round_trip = start.elapsed();

        let [result]: [PricingResult; 1] =
            results
                .try_into()
                .map_err(|results: Vec<_>| ClientError::UnexpectedCount {
                    expected: 1,
                    got: results.len(),
                })?;

        Ok(TimedResult {
            result,
            round_trip_ms: round_trip.as_secs_f64() * 1000.0,
        })
    }

    /// Sends every record individually, keeping up to `concurrency`
    /// requests in flight.
    ///
    /// A record whose round trip fails is logged and dropped; the rest carry
    /// on. Nothing is retried. Output order follows completion order.
    pub async fn send_all(
        &self,
        records: Vec<PricingRequest>,
        concurrency: NonZeroUsize,
    ) -> Vec<TimedResult> {
        stream::iter(records)
            .map(|record| async move {
                let outcome = self.send_one(&record).await;
                (record, outcome)
            })
            .buffer_unordered(concurrency.get())
            .filter_map(|(record, outcome)| async move {
                match outcome {
                    Ok(timed) => Some(timed),
                    Err(e) => {
                        tracing::warn!("Dropping item {}: {e}", record.id);
                        None
                    }
                }
            })
            .collect()
            .await
    }
}
