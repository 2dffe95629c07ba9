//! Work List
//!
//! Queue of pending (pointer, points-to increment) obligations. The final
//! fixpoint is independent of drain order; FIFO is the default for bounded
//! latency-to-stability, and LIFO exists so tests can demonstrate confluence.

use crate::features::pointer_analysis::domain::points_to_set::PointsToSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::cs_manager::PointerId;

/// Drain order of the work list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrainOrder {
    Fifo,
    Lifo,
}

impl Default for DrainOrder {
    fn default() -> Self {
        DrainOrder::Fifo
    }
}

#[derive(Debug, Default)]
pub struct WorkList {
    entries: VecDeque<(PointerId, PointsToSet)>,
    order: DrainOrder,
    pushed: usize,
}

impl WorkList {
    pub fn new(order: DrainOrder) -> Self {
        Self {
            entries: VecDeque::new(),
            order,
            pushed: 0,
        }
    }

    pub fn push(&mut self, pointer: PointerId, pts: PointsToSet) {
        self.pushed += 1;
        self.entries.push_back((pointer, pts));
    }

    pub fn pop(&mut self) -> Option<(PointerId, PointsToSet)> {
        match self.order {
            DrainOrder::Fifo => self.entries.pop_front(),
            DrainOrder::Lifo => self.entries.pop_back(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries ever scheduled
    #[inline]
    pub fn total_pushed(&self) -> usize {
        self.pushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut wl = WorkList::new(DrainOrder::Fifo);
        wl.push(1, PointsToSet::singleton(10));
        wl.push(2, PointsToSet::singleton(20));
        assert_eq!(wl.pop().unwrap().0, 1);
        assert_eq!(wl.pop().unwrap().0, 2);
        assert!(wl.pop().is_none());
        assert_eq!(wl.total_pushed(), 2);
    }

    #[test]
    fn test_lifo_order() {
        let mut wl = WorkList::new(DrainOrder::Lifo);
        wl.push(1, PointsToSet::singleton(10));
        wl.push(2, PointsToSet::singleton(20));
        assert_eq!(wl.pop().unwrap().0, 2);
        assert_eq!(wl.pop().unwrap().0, 1);
    }
}
