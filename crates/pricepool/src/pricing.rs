//! Pricing records and the pure computation applied to each of them.

use crate::{Error, Result, ResultId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single item of a batch, as decoded from the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    /// Caller-assigned identifier. Only used for diagnostics; results are
    /// identified by the [`ResultId`] the pool assigns.
    pub id: String,
    pub price: f64,
    pub tax_rate: f64,
}

impl PricingRequest {
    pub fn new(id: impl Into<String>, price: f64, tax_rate: f64) -> Self {
        Self {
            id: id.into(),
            price,
            tax_rate,
        }
    }

    /// Checks that `price` and `tax_rate` are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        check_non_negative(&self.id, "price", self.price)?;
        check_non_negative(&self.id, "taxRate", self.tax_rate)
    }
}

fn check_non_negative(id: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRequest {
            reason: format!("item {id:?}: {field} must be a finite, non-negative number (got {value})"),
        })
    }
}

/// The derived amounts for one request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quote {
    pub total_price: f64,
    pub tax_amount: f64,
}

/// The computation a worker applies to each request.
///
/// Implementations must be pure: the same request always yields the same
/// quote, regardless of which worker computes it.
pub trait Pricer: Send + Sync + 'static {
    fn quote(&self, request: &PricingRequest) -> Quote;
}

/// Adds `price * tax_rate` of tax on top of `price`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaxInclusive;

impl Pricer for TaxInclusive {
    fn quote(&self, request: &PricingRequest) -> Quote {
        Quote {
            total_price: request.price * (1.0 + request.tax_rate),
            tax_amount: request.price * request.tax_rate,
        }
    }
}

/// The outcome of processing one [`PricingRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    /// Issuer-assigned identifier, unrelated to the request's own `id`.
    pub id: ResultId,
    pub total_price: f64,
    pub tax_amount: f64,
    /// When the worker popped the request off the queue.
    pub received_at: DateTime<Utc>,
    /// When the worker finished computing the quote.
    pub processed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn tax_inclusive_example() {
        let quote = TaxInclusive.quote(&PricingRequest::new("A", 100.0, 0.1));
        assert!((quote.total_price - 110.0).abs() < EPSILON);
        assert!((quote.tax_amount - 10.0).abs() < EPSILON);
    }

    #[test]
    fn tax_inclusive_matches_formula_over_a_grid() {
        for price in [0.0, 0.01, 1.0, 10.0, 999.99, 1e9] {
            for rate in [0.0, 0.05, 0.5, 1.0, 2.0] {
                let quote = TaxInclusive.quote(&PricingRequest::new("x", price, rate));
                let tol = EPSILON * price.max(1.0);
                assert!((quote.total_price - price * (1.0 + rate)).abs() <= tol);
                assert!((quote.tax_amount - price * rate).abs() <= tol);
            }
        }
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(PricingRequest::new("ok", 0.0, 0.0).validate().is_ok());
        for (price, rate) in [
            (-1.0, 0.1),
            (1.0, -0.1),
            (f64::NAN, 0.1),
            (1.0, f64::INFINITY),
        ] {
            let err = PricingRequest::new("bad", price, rate).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidRequest { .. }), "{err}");
        }
    }

    #[test]
    fn wire_names_are_camel_case() {
        let req: PricingRequest =
            serde_json::from_str(r#"{"id":"A","price":100.0,"taxRate":0.1}"#).unwrap();
        assert_eq!(req, PricingRequest::new("A", 100.0, 0.1));

        let epoch = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        let result = PricingResult {
            id: ResultId::from_raw(7),
            total_price: 110.0,
            tax_amount: 10.0,
            received_at: epoch,
            processed_at: epoch,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["totalPrice"], 110.0);
        assert_eq!(json["taxAmount"], 10.0);
        assert!(json.get("receivedAt").is_some());
        assert!(json.get("processedAt").is_some());
    }
}
