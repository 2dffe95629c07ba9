//! Worklist-Driven Fixpoint Solver
//!
//! Inclusion-based points-to analysis with on-the-fly call graph discovery.
//! The pointer flow graph, points-to sets and call graph are all insert-only,
//! and every worklist delivery that changes nothing is dropped, so the loop
//! reaches the least fixpoint of a monotone system over a finite domain and
//! terminates.
//!
//! Statement processing runs exactly once per (context, method). Instance
//! field and array accesses cannot be wired there — their base object is not
//! yet known — so they are indexed per base variable and revisited whenever
//! that variable's points-to set grows. Every call with a receiver (virtual,
//! interface and special) is resolved the same way, from the receiver
//! variable, because the receiver object must seed the callee's `this` and
//! may contribute to the callee's context.

use crate::errors::{PtaError, Result};
use crate::features::pointer_analysis::domain::call_graph::{CallEdge, CsCallGraph};
use crate::features::pointer_analysis::domain::points_to_set::PointsToSet;
use crate::features::pointer_analysis::domain::program::{
    CallKind, Invoke, MethodId, Program, Stmt, StmtRef, VarId,
};
use crate::features::pointer_analysis::ports::HeapModel;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use super::cs_manager::{CsManager, CsMethodId, CsObjId, CtxId, PointerId, PointerKey};
use super::selector::ContextSelector;
use super::worklist::{DrainOrder, WorkList};

/// Statistics of one solve
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    pub reachable_methods: usize,
    pub call_edges: usize,
    pub pointers: usize,
    pub contexts: usize,
    pub objects: usize,
    pub pfg_edges: usize,
    pub worklist_entries: usize,
    pub propagations: usize,
    pub duration_ms: f64,
}

/// Statements indexed by the variable whose points-to growth re-triggers them
#[derive(Debug, Clone, Default)]
struct RelevantStmts {
    field_loads: Vec<StmtRef>,
    field_stores: Vec<StmtRef>,
    array_loads: Vec<StmtRef>,
    array_stores: Vec<StmtRef>,
    invokes: Vec<StmtRef>,
}

/// Everything the solve produced, handed to the application layer
#[derive(Debug)]
pub struct SolveOutput<H> {
    pub cs: CsManager,
    pub call_graph: CsCallGraph,
    pub heap: H,
    pub stats: SolverStats,
}

/// The fixpoint solver
pub struct Solver<'p, H: HeapModel> {
    program: &'p Program,
    heap: H,
    selector: ContextSelector,
    cs: CsManager,
    pfg: super::flow_graph::PointerFlowGraph,
    call_graph: CsCallGraph,
    worklist: WorkList,
    /// Raw methods whose statement index was already built
    indexed: FxHashSet<MethodId>,
    relevant: FxHashMap<VarId, RelevantStmts>,
    stats: SolverStats,
}

impl<'p, H: HeapModel> Solver<'p, H> {
    pub fn new(
        program: &'p Program,
        heap: H,
        selector: ContextSelector,
        drain_order: DrainOrder,
    ) -> Self {
        Self {
            program,
            heap,
            selector,
            cs: CsManager::new(),
            pfg: super::flow_graph::PointerFlowGraph::new(),
            call_graph: CsCallGraph::new(),
            worklist: WorkList::new(drain_order),
            indexed: FxHashSet::default(),
            relevant: FxHashMap::default(),
            stats: SolverStats::default(),
        }
    }

    /// Run the analysis from `entry` to its fixpoint
    pub fn solve(mut self, entry: MethodId) -> Result<SolveOutput<H>> {
        let started = Instant::now();
        self.validate(entry)?;
        self.initialize(entry);
        self.analyze();

        self.stats.reachable_methods = self.call_graph.num_reachable();
        self.stats.call_edges = self.call_graph.num_edges();
        self.stats.pointers = self.cs.num_pointers();
        self.stats.contexts = self.cs.num_contexts();
        self.stats.objects = self.cs.num_objs();
        self.stats.pfg_edges = self.pfg.num_edges();
        self.stats.worklist_entries = self.worklist.total_pushed();
        self.stats.duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!(
            reachable = self.stats.reachable_methods,
            call_edges = self.stats.call_edges,
            pointers = self.stats.pointers,
            duration_ms = self.stats.duration_ms,
            "pointer analysis reached fixpoint"
        );

        Ok(SolveOutput {
            cs: self.cs,
            call_graph: self.call_graph,
            heap: self.heap,
            stats: self.stats,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Pre-fixpoint validation of the IR contract
    // ═══════════════════════════════════════════════════════════════════════

    fn validate(&self, entry: MethodId) -> Result<()> {
        let program = self.program;
        if entry as usize >= program.num_methods() || program.method(entry).is_abstract {
            return Err(PtaError::NoEntry(format!("{entry}")));
        }

        for (id, method) in program.methods() {
            let name = || program.method_name(id);
            for stmt in &method.stmts {
                match stmt {
                    Stmt::New { class, .. } => {
                        if program.class(*class).is_interface {
                            return Err(PtaError::malformed(name(), "allocation of an interface"));
                        }
                    }
                    Stmt::LoadStatic { field, .. } | Stmt::StoreStatic { field, .. } => {
                        if !program.field(*field).is_static {
                            return Err(PtaError::malformed(
                                name(),
                                "static field access names an instance field",
                            ));
                        }
                    }
                    Stmt::LoadField { field, .. } | Stmt::StoreField { field, .. } => {
                        if program.field(*field).is_static {
                            return Err(PtaError::malformed(
                                name(),
                                "instance field access names a static field",
                            ));
                        }
                    }
                    Stmt::Invoke(inv) => self.validate_invoke(inv, &name())?,
                    Stmt::Copy { .. } | Stmt::LoadArray { .. } | Stmt::StoreArray { .. } => {}
                }
            }
        }
        Ok(())
    }

    fn validate_invoke(&self, inv: &Invoke, method_name: &str) -> Result<()> {
        match inv.kind {
            CallKind::Static if inv.recv.is_some() => Err(PtaError::malformed(
                method_name,
                "static invocation carries an instance receiver",
            )),
            CallKind::Special | CallKind::Virtual | CallKind::Interface if inv.recv.is_none() => {
                Err(PtaError::malformed(
                    method_name,
                    "instance invocation without a receiver",
                ))
            }
            _ => {
                if let Some(callee) = self.program.resolve_static_call(inv) {
                    if self.program.method(callee).params.len() != inv.args.len() {
                        return Err(PtaError::malformed(
                            method_name,
                            "argument count does not match the callee",
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Initialization and reachability
    // ═══════════════════════════════════════════════════════════════════════

    fn initialize(&mut self, entry: MethodId) {
        let ctx = self.selector.empty_context();
        let cs_entry = self.cs.cs_method(ctx, entry);
        self.call_graph.set_entry(cs_entry);
        debug!(entry = %self.program.method_name(entry), "seeding entry method");
        self.add_reachable(cs_entry);
    }

    /// Process a newly reachable context-sensitive method
    fn add_reachable(&mut self, cs_method: CsMethodId) {
        if !self.call_graph.add_reachable(cs_method) {
            return;
        }
        let (ctx, method) = self.cs.method_of(cs_method);
        self.index_method(method);
        self.process_stmts(cs_method, ctx, method);
    }

    /// Build the per-variable statement index, once per raw method
    fn index_method(&mut self, method: MethodId) {
        if !self.indexed.insert(method) {
            return;
        }
        let program = self.program;
        for (index, stmt) in program.method(method).stmts.iter().enumerate() {
            let site = StmtRef {
                method,
                index: index as u32,
            };
            match stmt {
                Stmt::LoadField { base, .. } => {
                    self.relevant.entry(*base).or_default().field_loads.push(site)
                }
                Stmt::StoreField { base, .. } => {
                    self.relevant.entry(*base).or_default().field_stores.push(site)
                }
                Stmt::LoadArray { base, .. } => {
                    self.relevant.entry(*base).or_default().array_loads.push(site)
                }
                Stmt::StoreArray { base, .. } => {
                    self.relevant.entry(*base).or_default().array_stores.push(site)
                }
                Stmt::Invoke(inv) => {
                    // Every receiver-bearing call resolves reactively,
                    // special calls included
                    if let Some(recv) = inv.recv {
                        self.relevant.entry(recv).or_default().invokes.push(site);
                    }
                }
                _ => {}
            }
        }
    }

    /// One-time translation of a method's statements: allocation, copy,
    /// static load/store and static/special invocation. The rest is reactive.
    fn process_stmts(&mut self, cs_method: CsMethodId, ctx: CtxId, method: MethodId) {
        let program = self.program;
        for (index, stmt) in program.method(method).stmts.iter().enumerate() {
            let site = StmtRef {
                method,
                index: index as u32,
            };
            match stmt {
                Stmt::New { lhs, class } => {
                    let obj = self.heap.obj_at(site, *class);
                    let heap_ctx = self.selector.select_heap_context(&mut self.cs, cs_method, obj);
                    let cs_obj = self.cs.cs_obj(heap_ctx, obj);
                    let ptr = self.cs.cs_var(ctx, *lhs);
                    // Seed through the worklist, never by direct mutation
                    self.worklist.push(ptr, PointsToSet::singleton(cs_obj));
                }
                Stmt::Copy { lhs, rhs } => {
                    let src = self.cs.cs_var(ctx, *rhs);
                    let dst = self.cs.cs_var(ctx, *lhs);
                    self.add_pfg_edge(src, dst);
                }
                Stmt::LoadStatic { lhs, field } => {
                    let src = self.cs.static_field(*field);
                    let dst = self.cs.cs_var(ctx, *lhs);
                    self.add_pfg_edge(src, dst);
                }
                Stmt::StoreStatic { field, rhs } => {
                    let src = self.cs.cs_var(ctx, *rhs);
                    let dst = self.cs.static_field(*field);
                    self.add_pfg_edge(src, dst);
                }
                Stmt::Invoke(inv) if inv.kind == CallKind::Static => {
                    self.process_static_call(ctx, site, inv);
                }
                // Instance field/array accesses and receiver-bearing calls
                // wait for the base variable's points-to set
                _ => {}
            }
        }
    }

    /// Static calls have a unique callee independent of points-to info
    fn process_static_call(&mut self, ctx: CtxId, site: StmtRef, inv: &Invoke) {
        let Some(callee) = self.program.resolve_static_call(inv) else {
            debug!(site = %site, "static call does not resolve, no edge produced");
            return;
        };
        let cs_site = self.cs.cs_call_site(ctx, site);
        let callee_ctx = self.selector.select_context(&mut self.cs, cs_site, callee);
        let cs_callee = self.cs.cs_method(callee_ctx, callee);
        let edge = CallEdge {
            kind: inv.kind,
            call_site: cs_site,
            callee: cs_callee,
        };
        if self.call_graph.add_edge(edge) {
            self.add_reachable(cs_callee);
            self.wire_call(ctx, inv, callee_ctx, callee);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Propagation
    // ═══════════════════════════════════════════════════════════════════════

    /// Insert a PFG edge; if new and pt(src) is already non-empty, the
    /// accumulated set must retroactively flow to dst
    fn add_pfg_edge(&mut self, src: PointerId, dst: PointerId) {
        if self.pfg.add_edge(src, dst) {
            let pts = self.cs.points_to(src).clone();
            if !pts.is_empty() {
                self.worklist.push(dst, pts);
            }
        }
    }

    /// Union the genuinely new objects into pt(pointer) and forward them to
    /// all PFG successors. Returns the true increment.
    fn propagate(&mut self, pointer: PointerId, incoming: &PointsToSet) -> PointsToSet {
        let diff = incoming.difference(self.cs.points_to(pointer));
        if !diff.is_empty() {
            self.cs.points_to_mut(pointer).union_with(&diff);
            self.stats.propagations += 1;
            let succs = self.pfg.succs_of(pointer).to_vec();
            for succ in succs {
                self.worklist.push(succ, diff.clone());
            }
        }
        diff
    }

    /// Drain the worklist to the global fixpoint
    fn analyze(&mut self) {
        while let Some((pointer, incoming)) = self.worklist.pop() {
            let diff = self.propagate(pointer, &incoming);
            if diff.is_empty() {
                continue;
            }
            // Reactive resolution applies to variable pointers only
            let PointerKey::Var(ctx, var) = self.cs.pointer_key(pointer) else {
                continue;
            };
            let rel = self.relevant.get(&var).cloned().unwrap_or_default();
            for obj in diff.iter() {
                self.visit_field_accesses(ctx, obj, &rel);
                self.process_calls(ctx, obj, &rel.invokes);
            }
        }
    }

    /// Wire instance field and array accesses for a newly discovered base object
    fn visit_field_accesses(&mut self, ctx: CtxId, obj: CsObjId, rel: &RelevantStmts) {
        let program = self.program;
        for &site in &rel.field_loads {
            if let Stmt::LoadField { lhs, field, .. } = program.stmt(site) {
                let src = self.cs.instance_field(obj, *field);
                let dst = self.cs.cs_var(ctx, *lhs);
                self.add_pfg_edge(src, dst);
            }
        }
        for &site in &rel.field_stores {
            if let Stmt::StoreField { field, rhs, .. } = program.stmt(site) {
                let src = self.cs.cs_var(ctx, *rhs);
                let dst = self.cs.instance_field(obj, *field);
                self.add_pfg_edge(src, dst);
            }
        }
        for &site in &rel.array_loads {
            if let Stmt::LoadArray { lhs, .. } = program.stmt(site) {
                let src = self.cs.array_index(obj);
                let dst = self.cs.cs_var(ctx, *lhs);
                self.add_pfg_edge(src, dst);
            }
        }
        for &site in &rel.array_stores {
            if let Stmt::StoreArray { rhs, .. } = program.stmt(site) {
                let src = self.cs.cs_var(ctx, *rhs);
                let dst = self.cs.array_index(obj);
                self.add_pfg_edge(src, dst);
            }
        }
    }

    /// Resolve pending receiver-bearing calls for a newly discovered receiver
    /// object. Virtual/interface calls dispatch on the object's runtime class;
    /// special calls resolve by declared class. Both seed `this` with the
    /// receiver and select the callee context from it.
    fn process_calls(&mut self, ctx: CtxId, recv_obj: CsObjId, invokes: &[StmtRef]) {
        let program = self.program;
        for &site in invokes {
            let Stmt::Invoke(inv) = program.stmt(site) else {
                continue;
            };
            let (_, raw_obj) = self.cs.obj_of(recv_obj);
            let resolved = if inv.kind.is_dispatched() {
                program.dispatch(self.heap.obj_class(raw_obj), &inv.signature)
            } else {
                program.resolve_static_call(inv)
            };
            let Some(callee) = resolved else {
                debug!(site = %site, "call resolves to no target, no edge produced");
                continue;
            };
            let cs_site = self.cs.cs_call_site(ctx, site);
            let callee_ctx =
                self.selector
                    .select_context_with_recv(&mut self.cs, cs_site, recv_obj, callee);

            // Seed the callee's receiver parameter regardless of edge newness
            if let Some(this) = program.method(callee).this {
                let this_ptr = self.cs.cs_var(callee_ctx, this);
                self.worklist.push(this_ptr, PointsToSet::singleton(recv_obj));
            }

            let cs_callee = self.cs.cs_method(callee_ctx, callee);
            let edge = CallEdge {
                kind: inv.kind,
                call_site: cs_site,
                callee: cs_callee,
            };
            if self.call_graph.add_edge(edge) {
                self.add_reachable(cs_callee);
                self.wire_call(ctx, inv, callee_ctx, callee);
            }
        }
    }

    /// Wire actual→formal and return→result edges, once per call edge.
    /// Actuals and formals are matched positionally; when a dynamically
    /// dispatched callee's arity differs from the call site, only the common
    /// prefix is wired (arity is validated up front for statically resolvable
    /// callees only).
    fn wire_call(&mut self, caller_ctx: CtxId, inv: &Invoke, callee_ctx: CtxId, callee: MethodId) {
        let program = self.program;
        let callee_method = program.method(callee);
        for (&arg, &param) in inv.args.iter().zip(callee_method.params.iter()) {
            let src = self.cs.cs_var(caller_ctx, arg);
            let dst = self.cs.cs_var(callee_ctx, param);
            self.add_pfg_edge(src, dst);
        }
        if let Some(result) = inv.result {
            for &ret in &callee_method.ret_vars {
                let src = self.cs.cs_var(callee_ctx, ret);
                let dst = self.cs.cs_var(caller_ctx, result);
                self.add_pfg_edge(src, dst);
            }
        }
    }
}
