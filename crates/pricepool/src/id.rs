use crate::{Error, Result};
use core::fmt;
use portable_atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a [`PricingResult`] by an [`IdIssuer`].
///
/// Serialized as a decimal string so it never loses precision in JSON
/// consumers that parse numbers as doubles.
///
/// [`PricingResult`]: crate::PricingResult
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ResultId(u64);

impl ResultId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ResultId> for String {
    fn from(id: ResultId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ResultId {
    type Error = core::num::ParseIntError;

    fn try_from(value: String) -> core::result::Result<Self, Self::Error> {
        value.parse().map(Self)
    }
}

/// A lock-free issuer of unique, strictly increasing [`ResultId`]s.
///
/// The counter lives in a single [`AtomicU64`]. An issuer is constructed
/// explicitly and handed to the worker pool, so independent pools (and tests)
/// never share a sequence by accident.
///
/// The counter is process-local: a restarted process starts over from its
/// configured origin.
#[derive(Debug, Default)]
pub struct IdIssuer {
    last: AtomicU64,
}

impl IdIssuer {
    /// Creates an issuer whose first identifier is `1`.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates an issuer whose first identifier is `start + 1`.
    pub const fn starting_at(start: u64) -> Self {
        Self {
            last: AtomicU64::new(start),
        }
    }

    /// Issues the next identifier.
    ///
    /// Safe to call from any number of threads at once. Each call observes a
    /// distinct value, and successive calls from the same thread observe
    /// strictly increasing values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdSpaceExhausted`] once `u64::MAX` has been issued.
    /// The counter never wraps.
    pub fn issue(&self) -> Result<ResultId> {
        self.last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                last.checked_add(1)
            })
            .map(|prev| ResultId(prev + 1))
            .map_err(|last| Error::IdSpaceExhausted { last })
    }

    /// Returns the most recently issued raw value (or the origin if nothing
    /// has been issued yet).
    pub fn issued(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn first_id_is_one() {
        let issuer = IdIssuer::new();
        assert_eq!(issuer.issue().unwrap().to_raw(), 1);
        assert_eq!(issuer.issue().unwrap().to_raw(), 2);
        assert_eq!(issuer.issued(), 2);
    }

    #[test]
    fn independent_issuers_do_not_share_a_counter() {
        let a = IdIssuer::new();
        let b = IdIssuer::new();
        a.issue().unwrap();
        a.issue().unwrap();
        assert_eq!(b.issue().unwrap().to_raw(), 1);
    }

    #[test]
    fn exhaustion_is_an_error_not_a_wrap() {
        let issuer = IdIssuer::starting_at(u64::MAX - 1);
        assert_eq!(issuer.issue().unwrap().to_raw(), u64::MAX);
        assert_eq!(
            issuer.issue(),
            Err(Error::IdSpaceExhausted { last: u64::MAX })
        );
        assert_eq!(issuer.issued(), u64::MAX);
    }

    #[test]
    fn concurrent_issue_yields_no_duplicates() {
        const THREADS: usize = 50;
        const PER_THREAD: usize = 10_000;

        let issuer = Arc::new(IdIssuer::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let issuer = Arc::clone(&issuer);
                thread::spawn(move || {
                    let mut seen = Vec::with_capacity(PER_THREAD);
                    for _ in 0..PER_THREAD {
                        seen.push(issuer.issue().unwrap().to_raw());
                    }
                    seen
                })
            })
            .collect();

        let mut all = HashSet::with_capacity(THREADS * PER_THREAD);
        for handle in handles {
            let seen = handle.join().unwrap();
            assert!(seen.windows(2).all(|w| w[0] < w[1]), "per-thread sequence not increasing");
            for id in seen {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }

        assert_eq!(all.len(), THREADS * PER_THREAD);
        assert_eq!(issuer.issued(), (THREADS * PER_THREAD) as u64);
    }

    #[test]
    fn serializes_as_decimal_string() {
        let id = ResultId::from_raw(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        let back: ResultId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ResultId>("\"abc\"").is_err());
    }
}
