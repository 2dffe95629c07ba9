//! Pointer Analysis Facade
//!
//! Configures and runs one solve, then exposes the frozen result: per-pointer
//! points-to sets, context-insensitive projections for alias queries, and the
//! discovered call graph. No partial results are observable; everything is
//! queried after `solve` returns.

use crate::errors::Result;
use crate::features::pointer_analysis::domain::call_graph::{CallEdge, CsCallGraph};
use crate::features::pointer_analysis::domain::points_to_set::PointsToSet;
use crate::features::pointer_analysis::domain::program::{
    MethodId, ObjId, Program, StmtRef, VarId,
};
use crate::features::pointer_analysis::infrastructure::cs_manager::{
    CsManager, CsMethodId, CtxId, PointerId, PointerKey,
};
use crate::features::pointer_analysis::infrastructure::selector::{ContextPolicy, ContextSelector};
use crate::features::pointer_analysis::infrastructure::solver::{SolveOutput, Solver, SolverStats};
use crate::features::pointer_analysis::infrastructure::worklist::DrainOrder;
use crate::features::pointer_analysis::ports::{AllocationSiteModel, HeapModel};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Analysis configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Context-sensitivity policy (insensitive by default)
    pub policy: ContextPolicy,
    /// Worklist drain order; the fixpoint is order-independent
    pub drain_order: DrainOrder,
}

/// The analysis facade
pub struct PointerAnalysis<'p> {
    program: &'p Program,
    config: AnalysisConfig,
}

impl<'p> PointerAnalysis<'p> {
    pub fn new(program: &'p Program, config: AnalysisConfig) -> Self {
        Self { program, config }
    }

    /// Run the fixpoint from `entry` with allocation-site heap abstraction
    pub fn solve(&self, entry: MethodId) -> Result<PointerAnalysisResult> {
        let solver = Solver::new(
            self.program,
            AllocationSiteModel::new(),
            ContextSelector::new(self.config.policy),
            self.config.drain_order,
        );
        let SolveOutput {
            cs,
            call_graph,
            heap,
            stats,
        } = solver.solve(entry)?;
        Ok(PointerAnalysisResult {
            cs,
            call_graph,
            heap,
            stats,
        })
    }
}

/// Frozen result of one solve
#[derive(Debug)]
pub struct PointerAnalysisResult {
    cs: CsManager,
    call_graph: CsCallGraph,
    heap: AllocationSiteModel,
    stats: SolverStats,
}

impl PointerAnalysisResult {
    #[inline]
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    #[inline]
    pub fn call_graph(&self) -> &CsCallGraph {
        &self.call_graph
    }

    #[inline]
    pub fn cs_manager(&self) -> &CsManager {
        &self.cs
    }

    /// Points-to set of one interned pointer
    #[inline]
    pub fn points_to(&self, pointer: PointerId) -> &PointsToSet {
        self.cs.points_to(pointer)
    }

    /// Context-insensitive projection: the raw abstract objects a variable
    /// may point to, merged over all of its contexts
    pub fn points_to_objs(&self, var: VarId) -> FxHashSet<ObjId> {
        let mut objs = FxHashSet::default();
        for (id, key) in self.cs.pointers() {
            if let PointerKey::Var(_, v) = key {
                if v == var {
                    for cs_obj in self.cs.points_to(id).iter() {
                        objs.insert(self.cs.obj_of(cs_obj).1);
                    }
                }
            }
        }
        objs
    }

    /// May two variables reference the same abstract object?
    pub fn may_alias(&self, a: VarId, b: VarId) -> bool {
        let pts_a = self.points_to_objs(a);
        if pts_a.is_empty() {
            return false;
        }
        self.points_to_objs(b).iter().any(|o| pts_a.contains(o))
    }

    /// Allocation site of an abstract object
    #[inline]
    pub fn obj_site(&self, obj: ObjId) -> StmtRef {
        self.heap.obj_site(obj)
    }

    /// Reachable context-sensitive methods, decoded to (context, raw method)
    pub fn reachable_methods(&self) -> impl Iterator<Item = (CtxId, MethodId)> + '_ {
        self.call_graph
            .reachable_methods()
            .map(|m| self.cs.method_of(m))
    }

    /// Raw methods reachable in at least one context
    pub fn reachable_raw_methods(&self) -> FxHashSet<MethodId> {
        self.reachable_methods().map(|(_, m)| m).collect()
    }

    #[inline]
    pub fn is_reachable_raw(&self, method: MethodId) -> bool {
        self.reachable_methods().any(|(_, m)| m == method)
    }

    /// All call edges
    pub fn call_edges(&self) -> impl Iterator<Item = &CallEdge> {
        self.call_graph.edges()
    }

    /// Decode a call edge's site to (caller context, statement)
    #[inline]
    pub fn edge_site(&self, edge: &CallEdge) -> (CtxId, StmtRef) {
        self.cs.call_site_of(edge.call_site)
    }

    /// Decode a call edge's callee to (callee context, raw method)
    #[inline]
    pub fn edge_callee(&self, edge: &CallEdge) -> (CtxId, MethodId) {
        self.cs.method_of(edge.callee)
    }

    /// Decode a context-sensitive method id
    #[inline]
    pub fn method_of(&self, method: CsMethodId) -> (CtxId, MethodId) {
        self.cs.method_of(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pointer_analysis::domain::program::Stmt;

    #[test]
    fn test_facade_smoke() {
        let mut p = Program::new();
        let a = p.add_class("A", None);
        let c = p.add_class("C", None);
        let main = p.add_method(c, "main", true);
        let x = p.add_var(main, "x");
        let y = p.add_var(main, "y");
        p.push_stmt(main, Stmt::New { lhs: x, class: a });
        p.push_stmt(main, Stmt::Copy { lhs: y, rhs: x });

        let result = PointerAnalysis::new(&p, AnalysisConfig::default())
            .solve(main)
            .unwrap();
        assert!(result.is_reachable_raw(main));
        assert!(result.may_alias(x, y));
        assert_eq!(result.points_to_objs(y).len(), 1);
        let obj = result.points_to_objs(y).into_iter().next().unwrap();
        assert_eq!(result.obj_site(obj).method, main);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = AnalysisConfig {
            policy: ContextPolicy::Object { k: 2, heap_k: 1 },
            drain_order: DrainOrder::Lifo,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.policy, config.policy);
        assert_eq!(back.drain_order, config.drain_order);
    }
}
