//! Deduplication stage.
//!
//! Suppresses tuples equal (over every field) to one already emitted. The
//! membership set grows with the number of distinct tuples seen and is never
//! evicted; it lives only as long as a single producer run.

use crate::tuple::Tuple;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<Tuple>,
}

impl Deduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `tuple` and return `true` if it has not been seen before.
    pub fn admit(&mut self, tuple: &Tuple) -> bool {
        if self.seen.contains(tuple) {
            return false;
        }
        self.seen.insert(tuple.clone())
    }

    /// Distinct tuples seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
