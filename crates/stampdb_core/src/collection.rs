//! In-memory collection of stamps.

use crate::aggregate::{aggregate, CollectionStats, GroupBy};
use crate::error::CoreResult;
use crate::stamp::Stamp;
use rust_decimal::Decimal;

/// An ordered, in-memory list of stamps.
///
/// Keeps insertion order. It is a transient view for building or showing a
/// batch; the store remains the system of record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StampCollection {
    stamps: Vec<Stamp>,
}

impl StampCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stamp.
    pub fn add(&mut self, stamp: Stamp) {
        self.stamps.push(stamp);
    }

    /// The stamps, in insertion order.
    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    /// Number of stamps.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Returns true if the collection holds no stamps.
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Stamp> {
        self.stamps.iter()
    }

    /// Sum of [`Stamp::total_value`] over the collection.
    pub fn total_value(&self) -> Decimal {
        self.stamps.iter().map(Stamp::total_value).sum()
    }

    /// Aggregates the collection.
    pub fn stats(&self, group_by: Option<GroupBy>) -> CoreResult<CollectionStats> {
        aggregate(&self.stamps, group_by)
    }

    /// Consumes the collection, returning the stamps.
    pub fn into_vec(self) -> Vec<Stamp> {
        self.stamps
    }
}

impl Extend<Stamp> for StampCollection {
    fn extend<I: IntoIterator<Item = Stamp>>(&mut self, iter: I) {
        self.stamps.extend(iter);
    }
}

impl FromIterator<Stamp> for StampCollection {
    fn from_iter<I: IntoIterator<Item = Stamp>>(iter: I) -> Self {
        Self {
            stamps: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for StampCollection {
    type Item = Stamp;
    type IntoIter = std::vec::IntoIter<Stamp>;

    fn into_iter(self) -> Self::IntoIter {
        self.stamps.into_iter()
    }
}

impl<'a> IntoIterator for &'a StampCollection {
    type Item = &'a Stamp;
    type IntoIter = std::slice::Iter<'a, Stamp>;

    fn into_iter(self) -> Self::IntoIter {
        self.stamps.iter()
    }
}
