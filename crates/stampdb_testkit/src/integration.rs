//! Model-checking harness.
//!
//! [`StoreHarness`] drives a store and a plain in-memory map side by side,
//! and asserts that reads, searches and statistics agree.

use crate::fixtures::TestStore;
use crate::generators::SearchCase;
use stampdb_core::{aggregate, CollectionStats, GroupBy, Stamp, StampId, StoredStamp};
use std::collections::BTreeMap;

/// A store paired with the records it is expected to hold.
pub struct StoreHarness {
    /// The store under test.
    pub store: TestStore,
    expected: BTreeMap<StampId, Stamp>,
}

impl StoreHarness {
    /// Creates a harness over an empty in-memory store.
    pub fn new() -> Self {
        Self::with_store(TestStore::memory())
    }

    /// Creates a harness over an empty file store.
    pub fn file() -> Self {
        Self::with_store(TestStore::file())
    }

    fn with_store(store: TestStore) -> Self {
        Self {
            store,
            expected: BTreeMap::new(),
        }
    }

    /// Creates a stamp and tracks it.
    pub fn create(&mut self, stamp: Stamp) -> StampId {
        let id = self.store.create(&stamp).expect("Failed to create stamp");
        assert!(
            !self.expected.contains_key(&id),
            "identifier {id} was handed out twice"
        );
        if let Some(last) = self.expected.keys().next_back() {
            assert!(id > *last, "identifier {id} is not above {last}");
        }
        self.expected.insert(id, stamp);
        id
    }

    /// Replaces a tracked stamp.
    pub fn update(&mut self, id: StampId, stamp: Stamp) {
        self.store.update(id, &stamp).expect("Failed to update stamp");
        self.expected.insert(id, stamp);
    }

    /// Deletes a tracked stamp.
    pub fn delete(&mut self, id: StampId) {
        self.store.delete(id).expect("Failed to delete stamp");
        self.expected.remove(&id);
    }

    /// Closes and reopens a file store, keeping the expectations.
    pub fn reopen(self) -> Self {
        Self {
            store: self.store.reopen(),
            expected: self.expected,
        }
    }

    /// Identifiers currently tracked, ascending.
    pub fn ids(&self) -> Vec<StampId> {
        self.expected.keys().copied().collect()
    }

    /// Returns the count of tracked stamps.
    pub fn tracked_count(&self) -> usize {
        self.expected.len()
    }

    /// Verifies every tracked stamp reads back unchanged and nothing else is
    /// stored.
    pub fn verify_all(&self) {
        for (id, stamp) in &self.expected {
            let actual = self.store.read(*id).expect("Failed to read stamp");
            assert_eq!(&actual, stamp, "stamp {id} differs");
        }
        let listed = self.store.list_all().expect("Failed to list stamps");
        assert_eq!(listed, self.expected_records(|_| true), "listing differs");
        assert_eq!(
            self.store.count().expect("Failed to count stamps"),
            self.expected.len() as u64
        );
    }

    /// Runs `case` against the store and checks the result against the
    /// oracle, in identifier order.
    pub fn verify_search(&self, case: &SearchCase) -> Vec<StoredStamp> {
        let hits = self
            .store
            .search(&case.criteria())
            .expect("Failed to search");
        assert_eq!(
            hits,
            self.expected_records(|stamp| case.matches(stamp)),
            "search {case:?} differs"
        );
        hits
    }

    /// Checks store statistics against aggregating the tracked stamps.
    pub fn verify_statistics(&self, group_by: Option<GroupBy>) -> CollectionStats {
        let stats = self
            .store
            .statistics(&Default::default(), group_by)
            .expect("Failed to compute statistics");
        let model: Vec<&Stamp> = self.expected.values().collect();
        let expected = aggregate(&model, group_by).expect("Failed to aggregate model");
        assert_eq!(stats, expected, "statistics differ");
        stats
    }

    fn expected_records(&self, keep: impl Fn(&Stamp) -> bool) -> Vec<StoredStamp> {
        self.expected
            .iter()
            .filter(|(_, stamp)| keep(stamp))
            .map(|(id, stamp)| StoredStamp {
                id: *id,
                stamp: stamp.clone(),
            })
            .collect()
    }
}

impl Default for StoreHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenarios;
    use stampdb_core::Condition;

    #[test]
    fn test_harness_crud() {
        let mut harness = StoreHarness::new();
        let ids: Vec<StampId> = scenarios::sample_stamps()
            .into_iter()
            .map(|s| harness.create(s))
            .collect();

        harness.update(ids[0], Stamp::new("2616", "replaced"));
        harness.delete(ids[1]);
        assert_eq!(harness.tracked_count(), ids.len() - 1);
        harness.verify_all();
    }

    #[test]
    fn test_harness_search() {
        let mut harness = StoreHarness::new();
        for stamp in scenarios::sample_stamps() {
            harness.create(stamp);
        }
        let hits = harness.verify_search(&SearchCase {
            country_contains: Some("us".into()),
            condition: Some(Condition::Used),
            ..SearchCase::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stamp.catalog_number, "119");
    }

    #[test]
    fn test_harness_statistics() {
        let mut harness = StoreHarness::new();
        for stamp in scenarios::sample_stamps() {
            harness.create(stamp);
        }
        for field in GroupBy::ALL {
            harness.verify_statistics(Some(field));
        }
    }
}
