use core::ops::Range;
use pricepool::PricingRequest;
use rand::Rng;

pub const PRICE_RANGE: Range<f64> = 10.0..1000.0;
pub const TAX_RATE_RANGE: Range<f64> = 0.05..2.0;

/// Generates `count` example records with ids `ID-1..=ID-count`, prices drawn
/// uniformly from [`PRICE_RANGE`] and tax rates from [`TAX_RATE_RANGE`].
pub fn generate_records<R: Rng>(count: usize, rng: &mut R) -> Vec<PricingRequest> {
    (1..=count)
        .map(|n| {
            PricingRequest::new(
                format!("ID-{n}"),
                rng.random_range(PRICE_RANGE),
                rng.random_range(TAX_RATE_RANGE),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn records_fall_in_range_and_validate() {
        let records = generate_records(500, &mut StdRng::seed_from_u64(1));
        assert_eq!(records.len(), 500);
        assert_eq!(records[0].id, "ID-1");
        assert_eq!(records[499].id, "ID-500");
        for record in &records {
            assert!(PRICE_RANGE.contains(&record.price));
            assert!(TAX_RATE_RANGE.contains(&record.tax_rate));
            record.validate().unwrap();
        }
    }

    #[test]
    fn same_seed_same_records() {
        let a = generate_records(20, &mut StdRng::seed_from_u64(42));
        let b = generate_records(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_records() {
        assert!(generate_records(0, &mut StdRng::seed_from_u64(0)).is_empty());
    }
}
