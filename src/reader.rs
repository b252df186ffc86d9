use futures_util::future::try_join_all;

use crate::chain::{ChainError, MarketSource};
use crate::market::MarketRecord;

/// Fetch markets 0..count concurrently and join them in index order. Any
/// failed sub-fetch fails the whole batch; there is no partial list.
pub async fn fetch_batch<S: MarketSource>(
    source: &S,
    count: u64,
) -> Result<Vec<MarketRecord>, ChainError> {
    try_join_all((0..count).map(|id| source.market(id))).await
}

/// Displayed-list state. A batch is keyed by the generation taken when
/// its count change was observed; a batch whose generation is no longer
/// current is discarded, so a stale fan-out can never clobber a newer
/// result.
#[derive(Debug, Default)]
pub struct ListState {
    generation: u64,
    last_count: Option<u64>,
    markets: Vec<MarketRecord>,
    error: Option<String>,
    in_flight: bool,
}

impl ListState {
    /// Record a newly read count. Returns the generation of the batch to
    /// start, or None when no fetch is needed (count unchanged, or zero).
    pub fn observe_count(&mut self, count: u64) -> Option<u64> {
        if self.last_count == Some(count) {
            return None;
        }
        self.last_count = Some(count);
        self.generation += 1;
        self.error = None;

        if count == 0 {
            self.markets.clear();
            self.in_flight = false;
            return None;
        }

        self.in_flight = true;
        Some(self.generation)
    }

    /// Apply a completed batch. A failed batch keeps the previous list,
    /// surfaces the error, and forgets the count so the next refresh
    /// retries. Returns true when the display should be updated.
    pub fn apply(
        &mut self,
        generation: u64,
        outcome: Result<Vec<MarketRecord>, String>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.in_flight = false;
        match outcome {
            Ok(markets) => {
                self.markets = markets;
                self.error = None;
            }
            Err(message) => {
                self.last_count = None;
                self.error = Some(message);
            }
        }
        true
    }

    pub fn markets(&self) -> &[MarketRecord] {
        &self.markets
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// False until the first count read lands; nothing is rendered before
    /// then.
    pub fn count_known(&self) -> bool {
        self.last_count.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct StubSource {
        count: u64,
        fail_at: Option<u64>,
        calls: AtomicU64,
    }

    impl StubSource {
        fn new(count: u64) -> Self {
            Self {
                count,
                fail_at: None,
                calls: AtomicU64::new(0),
            }
        }

        fn failing_at(count: u64, id: u64) -> Self {
            Self {
                count,
                fail_at: Some(id),
                calls: AtomicU64::new(0),
            }
        }
    }

    impl MarketSource for StubSource {
        async fn market_count(&self) -> Result<u64, ChainError> {
            Ok(self.count)
        }

        async fn market(&self, id: u64) -> Result<MarketRecord, ChainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == Some(id) {
                return Err(ChainError::Tx(format!("fetch {id} failed")));
            }
            Ok(MarketRecord {
                id,
                question: format!("Question {id}"),
                end_time: 1_000 + id,
                resolved: id % 2 == 0,
                yes_shares: id * 10,
                no_shares: id * 5,
            })
        }
    }

    #[tokio::test]
    async fn batch_is_index_ordered() {
        let source = StubSource::new(3);
        let markets = fetch_batch(&source, 3).await.unwrap();
        let ids: Vec<u64> = markets.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(markets[2].question, "Question 2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn one_failed_fetch_fails_the_batch() {
        let source = StubSource::failing_at(3, 1);
        assert!(fetch_batch(&source, 3).await.is_err());
    }

    #[tokio::test]
    async fn zero_count_issues_no_fetches() {
        let source = StubSource::new(0);
        let markets = fetch_batch(&source, 0).await.unwrap();
        assert!(markets.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    fn record(id: u64) -> MarketRecord {
        MarketRecord {
            id,
            question: format!("Q{id}"),
            end_time: 0,
            resolved: false,
            yes_shares: 0,
            no_shares: 0,
        }
    }

    #[test]
    fn count_zero_clears_without_fetch() {
        let mut list = ListState::default();
        assert_eq!(list.observe_count(0), None);
        assert!(list.count_known());
        assert!(list.markets().is_empty());
        assert!(!list.is_loading());
    }

    #[test]
    fn unchanged_count_does_not_refetch() {
        let mut list = ListState::default();
        let generation = list.observe_count(2).unwrap();
        assert!(list.apply(generation, Ok(vec![record(0), record(1)])));
        assert_eq!(list.observe_count(2), None);
        assert_eq!(list.markets().len(), 2);
    }

    #[test]
    fn stale_batch_is_discarded() {
        let mut list = ListState::default();
        let old = list.observe_count(2).unwrap();
        let new = list.observe_count(3).unwrap();
        assert_ne!(old, new);

        // Old batch finishes after the count moved on.
        assert!(!list.apply(old, Ok(vec![record(0), record(1)])));
        assert!(list.markets().is_empty());

        assert!(list.apply(new, Ok(vec![record(0), record(1), record(2)])));
        assert_eq!(list.markets().len(), 3);
    }

    #[test]
    fn failed_batch_keeps_previous_list_and_allows_retry() {
        let mut list = ListState::default();
        let generation = list.observe_count(2).unwrap();
        assert!(list.apply(generation, Ok(vec![record(0), record(1)])));

        let generation = list.observe_count(3).unwrap();
        assert!(list.apply(generation, Err("rpc unreachable".to_string())));
        assert_eq!(list.markets().len(), 2);
        assert_eq!(list.error(), Some("rpc unreachable"));

        // Same count on the next refresh still starts a new batch.
        assert!(list.observe_count(3).is_some());
    }
}
