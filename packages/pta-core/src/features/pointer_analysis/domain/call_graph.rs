//! Context-Sensitive Call Graph
//!
//! Accumulates reachable context-sensitive methods and resolved call edges as
//! the solver discovers them. Both collections are insert-only with duplicate
//! suppression; insertion reports newness so the solver can gate one-time
//! work (statement processing, parameter wiring) on it.

use crate::features::pointer_analysis::infrastructure::cs_manager::{CsCallSiteId, CsMethodId};
use rustc_hash::{FxHashMap, FxHashSet};

use super::program::CallKind;

/// A resolved call edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallEdge {
    pub kind: CallKind,
    pub call_site: CsCallSiteId,
    pub callee: CsMethodId,
}

/// The call graph under construction
#[derive(Debug, Default)]
pub struct CsCallGraph {
    entry: Option<CsMethodId>,
    reachable: FxHashSet<CsMethodId>,
    /// Discovery order, for deterministic reporting
    reachable_order: Vec<CsMethodId>,
    edges: FxHashSet<CallEdge>,
    /// Resolved targets per call site
    callees: FxHashMap<CsCallSiteId, Vec<(CallKind, CsMethodId)>>,
}

impl CsCallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the program entry
    pub fn set_entry(&mut self, method: CsMethodId) {
        self.entry = Some(method);
    }

    #[inline]
    pub fn entry(&self) -> Option<CsMethodId> {
        self.entry
    }

    /// Mark a method reachable. Returns true on first discovery.
    pub fn add_reachable(&mut self, method: CsMethodId) -> bool {
        if self.reachable.insert(method) {
            self.reachable_order.push(method);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_reachable(&self, method: CsMethodId) -> bool {
        self.reachable.contains(&method)
    }

    /// Reachable methods in discovery order
    pub fn reachable_methods(&self) -> impl Iterator<Item = CsMethodId> + '_ {
        self.reachable_order.iter().copied()
    }

    #[inline]
    pub fn num_reachable(&self) -> usize {
        self.reachable_order.len()
    }

    /// Insert a call edge. Returns true if the edge was not present.
    pub fn add_edge(&mut self, edge: CallEdge) -> bool {
        if self.edges.insert(edge) {
            self.callees
                .entry(edge.call_site)
                .or_default()
                .push((edge.kind, edge.callee));
            true
        } else {
            false
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &CallEdge> {
        self.edges.iter()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Resolved callees of one call site
    pub fn callees_of(&self, call_site: CsCallSiteId) -> &[(CallKind, CsMethodId)] {
        self.callees
            .get(&call_site)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
