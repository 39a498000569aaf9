use crate::result_set::{Outcome, ResultSet};
use tokio::sync::mpsc;

/// Single-writer collector for one drain.
///
/// This task is the only owner of the [`ResultSet`] while workers run; they
/// reach it exclusively through `rx`. It returns once every sender has been
/// dropped, i.e. once every worker has exited.
pub(crate) async fn aggregate(mut rx: mpsc::Receiver<Outcome>, expected: usize) -> ResultSet {
    let mut set = ResultSet::with_capacity(expected);
    while let Some(outcome) = rx.recv().await {
        set.record(outcome);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Aggregated {} results and {} failures",
        set.len(),
        set.failures().len()
    );

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PricingResult, ResultId, result_set::Failure};
    use chrono::Utc;

    fn result(raw: u64) -> PricingResult {
        let now = Utc::now();
        PricingResult {
            id: ResultId::from_raw(raw),
            total_price: 1.0,
            tax_amount: 0.0,
            received_at: now,
            processed_at: now,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn collects_from_many_senders_without_loss() {
        let (tx, rx) = mpsc::channel(4);
        let collector = tokio::spawn(aggregate(rx, 400));

        let senders: Vec<_> = (0..4u64)
            .map(|s| {
                let tx = tx.clone();
                tokio::spawn(async move {
                    for i in 0..100u64 {
                        tx.send(Ok(result(s * 100 + i + 1))).await.unwrap();
                    }
                })
            })
            .collect();
        drop(tx);
        for sender in senders {
            sender.await.unwrap();
        }

        let set = collector.await.unwrap();
        assert_eq!(set.len(), 400);
        let mut ids: Vec<_> = set.iter().map(|r| r.id.to_raw()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=400).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn keeps_failures_apart_from_results() {
        let (tx, rx) = mpsc::channel(4);
        let collector = tokio::spawn(aggregate(rx, 2));

        tx.send(Ok(result(1))).await.unwrap();
        tx.send(Err(Failure::Item {
            request_id: "x".to_string(),
            worker_id: 0,
            reason: "nope".to_string(),
        }))
        .await
        .unwrap();
        drop(tx);

        let set = collector.await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.failures().len(), 1);
        assert!(!set.is_complete());
    }
}
