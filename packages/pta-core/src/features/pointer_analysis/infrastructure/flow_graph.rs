//! Pointer Flow Graph
//!
//! Directed graph over interned pointer ids. An edge src → dst means
//! "whatever is added to pt(src) must also be added to pt(dst)". Edges are
//! inserted at most once and never removed.

use rustc_hash::{FxHashMap, FxHashSet};

use super::cs_manager::PointerId;

#[derive(Debug, Default)]
pub struct PointerFlowGraph {
    edges: FxHashSet<(PointerId, PointerId)>,
    succs: FxHashMap<PointerId, Vec<PointerId>>,
}

impl PointerFlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge. Returns true if it was not already present.
    pub fn add_edge(&mut self, src: PointerId, dst: PointerId) -> bool {
        if self.edges.insert((src, dst)) {
            self.succs.entry(src).or_default().push(dst);
            true
        } else {
            false
        }
    }

    /// Successors of a pointer (pointers its set flows into)
    #[inline]
    pub fn succs_of(&self, ptr: PointerId) -> &[PointerId] {
        self.succs.get(&ptr).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}
