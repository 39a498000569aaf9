//! Error types for the HTTP service.
//!
//! [`Error`] implements [`IntoResponse`] so handlers can return it directly.
//! Every error is rendered as `{"error": "<message>"}`.
//!
//! ## Status mapping
//! - `Malformed`: whatever status the JSON extractor chose (400, 413, 415 or 422).
//! - `BatchTooLarge` and invalid items: `400 Bad Request`.
//! - Everything else: `500 Internal Server Error`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the HTTP service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The body could not be decoded into a batch.
    #[error("Malformed batch: {0}")]
    Malformed(#[from] JsonRejection),

    /// The batch exceeded the configured limit.
    #[error("Batch of {len} items exceeds maximum allowed ({max})")]
    BatchTooLarge { len: usize, max: usize },

    /// The pricing core rejected or failed the batch.
    #[error(transparent)]
    Core(#[from] pricepool::Error),

    /// A result frame could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Malformed(rejection) => rejection.status(),
            Self::BatchTooLarge { .. } | Self::Core(pricepool::Error::InvalidRequest { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Core(_) | Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("Rejected request: {self}");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_core_errors_to_status_codes() {
        let invalid = Error::from(pricepool::Error::InvalidRequest {
            reason: "negative".to_string(),
        });
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let aggregation = Error::from(pricepool::Error::Aggregation {
            reason: "gone".to_string(),
        });
        assert_eq!(aggregation.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let too_large = Error::BatchTooLarge { len: 11, max: 10 };
        assert_eq!(too_large.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            too_large.to_string(),
            "Batch of 11 items exceeds maximum allowed (10)"
        );
    }

    #[test]
    fn core_messages_pass_through() {
        let err = Error::from(pricepool::Error::InvalidRequest {
            reason: "item \"A\": price must be a finite, non-negative number (got -1)".to_string(),
        });
        assert!(err.to_string().starts_with("Invalid request: item \"A\""));
    }
}
