//! Ordered multiset of pending output timestamps.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::comparator::MergeOrder;

/// Holds the timestamps of all buffered-but-not-yet-emitted child rows and
/// extracts the extreme one first: min when ascending, max when descending.
///
/// `add` keeps one entry per source row, so equal timestamps reported by
/// different children each occupy a slot. `poll_first` collapses equal
/// entries on the way out, which is what gives the output grid one row per
/// distinct timestamp.
#[derive(Debug)]
pub struct TimeSelector {
    heap: Heap,
}

#[derive(Debug)]
enum Heap {
    Ascending(BinaryHeap<Reverse<i64>>),
    Descending(BinaryHeap<i64>),
}

impl TimeSelector {
    pub fn new(order: MergeOrder) -> Self {
        Self::with_capacity(order, 0)
    }

    pub fn with_capacity(order: MergeOrder, cap: usize) -> Self {
        let heap = match order {
            MergeOrder::Ascending => Heap::Ascending(BinaryHeap::with_capacity(cap)),
            MergeOrder::Descending => Heap::Descending(BinaryHeap::with_capacity(cap)),
        };
        Self { heap }
    }

    pub fn len(&self) -> usize {
        match &self.heap {
            Heap::Ascending(h) => h.len(),
            Heap::Descending(h) => h.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&mut self, t: i64) {
        match &mut self.heap {
            Heap::Ascending(h) => h.push(Reverse(t)),
            Heap::Descending(h) => h.push(t),
        }
    }

    /// The current extreme value, without removing it. `None` when empty:
    /// calling this on an empty selector is a contract violation the
    /// operator converts into an invariant failure.
    pub fn peek_first(&self) -> Option<i64> {
        match &self.heap {
            Heap::Ascending(h) => h.peek().map(|r| r.0),
            Heap::Descending(h) => h.peek().copied(),
        }
    }

    /// Remove and return the current extreme value, collapsing every entry
    /// equal to it.
    pub fn poll_first(&mut self) -> Option<i64> {
        match &mut self.heap {
            Heap::Ascending(h) => {
                let first = h.pop()?.0;
                while h.peek().map(|r| r.0) == Some(first) {
                    h.pop();
                }
                Some(first)
            }
            Heap::Descending(h) => {
                let first = h.pop()?;
                while h.peek().copied() == Some(first) {
                    h.pop();
                }
                Some(first)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_yields_min_first() {
        let mut s = TimeSelector::new(MergeOrder::Ascending);
        for t in [5, 1, 3] {
            s.add(t);
        }
        assert_eq!(s.peek_first(), Some(1));
        assert_eq!(s.poll_first(), Some(1));
        assert_eq!(s.poll_first(), Some(3));
        assert_eq!(s.poll_first(), Some(5));
        assert_eq!(s.poll_first(), None);
    }

    #[test]
    fn descending_yields_max_first() {
        let mut s = TimeSelector::new(MergeOrder::Descending);
        for t in [5, 1, 3] {
            s.add(t);
        }
        assert_eq!(s.poll_first(), Some(5));
        assert_eq!(s.poll_first(), Some(3));
        assert_eq!(s.poll_first(), Some(1));
    }

    #[test]
    fn equal_entries_collapse_on_poll() {
        let mut s = TimeSelector::new(MergeOrder::Ascending);
        // two children both buffered a row at t=2
        for t in [2, 2, 7] {
            s.add(t);
        }
        assert_eq!(s.len(), 3);
        assert_eq!(s.poll_first(), Some(2));
        assert_eq!(s.poll_first(), Some(7));
        assert!(s.is_empty());
    }
}
