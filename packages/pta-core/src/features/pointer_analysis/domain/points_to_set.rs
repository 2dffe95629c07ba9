//! Points-to Set
//!
//! Monotone set of context-sensitive object ids. Storage is a sorted vector
//! with a small unsorted pending buffer and deferred consolidation: inserts
//! are O(1) amortized, membership is a binary search after consolidation.
//!
//! There is no removal operation: propagation only ever grows a set, which is
//! what bounds the fixpoint.

use std::cmp::Ordering;

/// Auto-consolidate when the pending buffer exceeds this
const PENDING_BUFFER_THRESHOLD: usize = 16;

/// A growable set of `u32` object ids
#[derive(Debug, Clone, Default)]
pub struct PointsToSet {
    /// Sorted elements (main storage)
    elements: Vec<u32>,
    /// Pending insertions (unsorted)
    pending: Vec<u32>,
}

impl PointsToSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn singleton(element: u32) -> Self {
        Self {
            elements: vec![element],
            pending: Vec::new(),
        }
    }

    /// Merge pending insertions into the sorted main storage
    fn consolidate(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.pending.sort_unstable();
        self.pending.dedup();

        if self.elements.is_empty() {
            std::mem::swap(&mut self.elements, &mut self.pending);
            return;
        }

        let mut merged = Vec::with_capacity(self.elements.len() + self.pending.len());
        let (mut i, mut j) = (0, 0);
        while i < self.elements.len() && j < self.pending.len() {
            match self.elements[i].cmp(&self.pending[j]) {
                Ordering::Less => {
                    merged.push(self.elements[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(self.pending[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(self.elements[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.elements[i..]);
        merged.extend_from_slice(&self.pending[j..]);
        self.elements = merged;
        self.pending.clear();
    }

    /// Insert an element. Returns true if it was not already present.
    #[inline]
    pub fn insert(&mut self, element: u32) -> bool {
        if self.elements.binary_search(&element).is_ok() || self.pending.contains(&element) {
            return false;
        }
        self.pending.push(element);
        if self.pending.len() >= PENDING_BUFFER_THRESHOLD {
            self.consolidate();
        }
        true
    }

    #[inline]
    pub fn contains(&self, element: u32) -> bool {
        self.elements.binary_search(&element).is_ok() || self.pending.contains(&element)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len() + self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.pending.is_empty()
    }

    /// Iterate over all elements (order unspecified while pending is dirty)
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.elements.iter().chain(self.pending.iter()).copied()
    }

    /// Union `other` into self. Returns true if self grew.
    pub fn union_with(&mut self, other: &PointsToSet) -> bool {
        let mut grew = false;
        for element in other.iter() {
            grew |= self.insert(element);
        }
        grew
    }

    /// Elements of self not present in `other`
    pub fn difference(&self, other: &PointsToSet) -> PointsToSet {
        let mut diff = PointsToSet::new();
        for element in self.iter() {
            if !other.contains(element) {
                diff.insert(element);
            }
        }
        diff
    }
}

/// Equality is over the logical element set, not the (elements, pending)
/// representation: a set left with pending insertions equals its
/// consolidated twin.
impl PartialEq for PointsToSet {
    fn eq(&self, other: &Self) -> bool {
        // Both sides hold no duplicates, so equal size plus one-way
        // containment is set equality
        self.len() == other.len() && self.iter().all(|e| other.contains(e))
    }
}

impl Eq for PointsToSet {}

impl FromIterator<u32> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut elements: Vec<u32> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Self {
            elements,
            pending: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_reports_newness() {
        let mut pts = PointsToSet::new();
        assert!(pts.insert(7));
        assert!(!pts.insert(7));
        assert_eq!(pts.len(), 1);
    }

    #[test]
    fn test_contains_across_pending_and_sorted() {
        let mut pts = PointsToSet::new();
        // Force a consolidation, then leave fresh elements pending
        for i in 0..PENDING_BUFFER_THRESHOLD as u32 {
            pts.insert(i * 2);
        }
        pts.insert(1);
        assert!(pts.contains(0));
        assert!(pts.contains(1));
        assert!(!pts.contains(3));
        assert_eq!(pts.len(), PENDING_BUFFER_THRESHOLD + 1);
    }

    #[test]
    fn test_union_grows_monotonically() {
        let mut a: PointsToSet = [1, 2, 3].into_iter().collect();
        let b: PointsToSet = [3, 4].into_iter().collect();
        assert!(a.union_with(&b));
        assert_eq!(a.len(), 4);
        // Idempotent: a second union adds nothing
        assert!(!a.union_with(&b));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_difference() {
        let a: PointsToSet = [1, 2, 3, 4].into_iter().collect();
        let b: PointsToSet = [2, 4].into_iter().collect();
        let d = a.difference(&b);
        let mut got: Vec<u32> = d.iter().collect();
        got.sort_unstable();
        assert_eq!(got, vec![1, 3]);
        assert!(b.difference(&a).is_empty());
    }

    #[test]
    fn test_equality_ignores_representation() {
        let mut grown = PointsToSet::new();
        grown.insert(1);
        assert_eq!(grown, PointsToSet::singleton(1));

        // One side consolidated, the other with a dirty pending buffer
        let mut dirty = PointsToSet::new();
        for i in 0..PENDING_BUFFER_THRESHOLD as u32 {
            dirty.insert(i);
        }
        dirty.insert(99);
        let clean: PointsToSet = (0..PENDING_BUFFER_THRESHOLD as u32).chain([99]).collect();
        assert_eq!(dirty, clean);
        assert_ne!(dirty, PointsToSet::singleton(99));
    }

    #[test]
    fn test_singleton() {
        let pts = PointsToSet::singleton(42);
        assert!(pts.contains(42));
        assert_eq!(pts.len(), 1);
    }
}
