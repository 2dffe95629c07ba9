//! Context-Sensitive Entity Manager
//!
//! Interns every (context ⊕ raw entity) pair into a dense u32 id. Requesting
//! the same logical entity twice returns the same id; without this, the
//! worklist and pointer flow graph would fragment and the fixpoint would never
//! converge. Entities live in arenas addressed by their ids, so graph edges
//! are index pairs and the cyclic graphs built on top carry no ownership
//! cycles.
//!
//! Every pointer id owns exactly one points-to set, stored in a parallel
//! arena and mutated only through the solver's propagation path.

use crate::features::pointer_analysis::domain::context::Context;
use crate::features::pointer_analysis::domain::points_to_set::PointsToSet;
use crate::features::pointer_analysis::domain::program::{FieldId, MethodId, ObjId, StmtRef, VarId};
use rustc_hash::FxHashMap;

/// Interned context id; `EMPTY_CTX` is always id 0
pub type CtxId = u32;

/// The context-insensitive context, interned at construction
pub const EMPTY_CTX: CtxId = 0;

/// Interned (heap context, object) pair
pub type CsObjId = u32;

/// Interned pointer (any of the four variants)
pub type PointerId = u32;

/// Interned (context, call site) pair
pub type CsCallSiteId = u32;

/// Interned (context, method) pair
pub type CsMethodId = u32;

/// The four pointer variants of the pointer flow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKey {
    /// (context, local variable)
    Var(CtxId, VarId),
    /// Static field, context-independent
    StaticField(FieldId),
    /// (context-sensitive base object, instance field)
    InstanceField(CsObjId, FieldId),
    /// All elements of one array object, modeled uniformly
    ArrayIndex(CsObjId),
}

/// Interning tables for all context-sensitive entities
#[derive(Debug)]
pub struct CsManager {
    contexts: Vec<Context>,
    ctx_ids: FxHashMap<Context, CtxId>,

    objs: Vec<(CtxId, ObjId)>,
    obj_ids: FxHashMap<(CtxId, ObjId), CsObjId>,

    pointers: Vec<PointerKey>,
    pointer_ids: FxHashMap<PointerKey, PointerId>,
    /// Points-to set of each pointer, parallel to `pointers`
    points_to: Vec<PointsToSet>,

    call_sites: Vec<(CtxId, StmtRef)>,
    call_site_ids: FxHashMap<(CtxId, StmtRef), CsCallSiteId>,

    methods: Vec<(CtxId, MethodId)>,
    method_ids: FxHashMap<(CtxId, MethodId), CsMethodId>,
}

impl Default for CsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CsManager {
    pub fn new() -> Self {
        let mut mgr = Self {
            contexts: Vec::new(),
            ctx_ids: FxHashMap::default(),
            objs: Vec::new(),
            obj_ids: FxHashMap::default(),
            pointers: Vec::new(),
            pointer_ids: FxHashMap::default(),
            points_to: Vec::new(),
            call_sites: Vec::new(),
            call_site_ids: FxHashMap::default(),
            methods: Vec::new(),
            method_ids: FxHashMap::default(),
        };
        let empty = mgr.context(Context::empty());
        debug_assert_eq!(empty, EMPTY_CTX);
        mgr
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Contexts
    // ═══════════════════════════════════════════════════════════════════════

    /// Intern a context by value
    pub fn context(&mut self, ctx: Context) -> CtxId {
        if let Some(&id) = self.ctx_ids.get(&ctx) {
            return id;
        }
        let id = self.contexts.len() as CtxId;
        self.contexts.push(ctx.clone());
        self.ctx_ids.insert(ctx, id);
        id
    }

    #[inline]
    pub fn ctx(&self, id: CtxId) -> &Context {
        &self.contexts[id as usize]
    }

    #[inline]
    pub fn num_contexts(&self) -> usize {
        self.contexts.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Context-sensitive objects
    // ═══════════════════════════════════════════════════════════════════════

    pub fn cs_obj(&mut self, heap_ctx: CtxId, obj: ObjId) -> CsObjId {
        if let Some(&id) = self.obj_ids.get(&(heap_ctx, obj)) {
            return id;
        }
        let id = self.objs.len() as CsObjId;
        self.objs.push((heap_ctx, obj));
        self.obj_ids.insert((heap_ctx, obj), id);
        id
    }

    /// (heap context, raw object) of a context-sensitive object
    #[inline]
    pub fn obj_of(&self, id: CsObjId) -> (CtxId, ObjId) {
        self.objs[id as usize]
    }

    #[inline]
    pub fn num_objs(&self) -> usize {
        self.objs.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Pointers
    // ═══════════════════════════════════════════════════════════════════════

    fn pointer(&mut self, key: PointerKey) -> PointerId {
        if let Some(&id) = self.pointer_ids.get(&key) {
            return id;
        }
        let id = self.pointers.len() as PointerId;
        self.pointers.push(key);
        self.pointer_ids.insert(key, id);
        self.points_to.push(PointsToSet::new());
        id
    }

    #[inline]
    pub fn cs_var(&mut self, ctx: CtxId, var: VarId) -> PointerId {
        self.pointer(PointerKey::Var(ctx, var))
    }

    #[inline]
    pub fn static_field(&mut self, field: FieldId) -> PointerId {
        self.pointer(PointerKey::StaticField(field))
    }

    #[inline]
    pub fn instance_field(&mut self, base: CsObjId, field: FieldId) -> PointerId {
        self.pointer(PointerKey::InstanceField(base, field))
    }

    #[inline]
    pub fn array_index(&mut self, base: CsObjId) -> PointerId {
        self.pointer(PointerKey::ArrayIndex(base))
    }

    #[inline]
    pub fn pointer_key(&self, id: PointerId) -> PointerKey {
        self.pointers[id as usize]
    }

    #[inline]
    pub fn points_to(&self, id: PointerId) -> &PointsToSet {
        &self.points_to[id as usize]
    }

    #[inline]
    pub fn points_to_mut(&mut self, id: PointerId) -> &mut PointsToSet {
        &mut self.points_to[id as usize]
    }

    #[inline]
    pub fn num_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// All interned pointers with their keys
    pub fn pointers(&self) -> impl Iterator<Item = (PointerId, PointerKey)> + '_ {
        self.pointers
            .iter()
            .enumerate()
            .map(|(i, &k)| (i as PointerId, k))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Call sites and methods
    // ═══════════════════════════════════════════════════════════════════════

    pub fn cs_call_site(&mut self, ctx: CtxId, site: StmtRef) -> CsCallSiteId {
        if let Some(&id) = self.call_site_ids.get(&(ctx, site)) {
            return id;
        }
        let id = self.call_sites.len() as CsCallSiteId;
        self.call_sites.push((ctx, site));
        self.call_site_ids.insert((ctx, site), id);
        id
    }

    #[inline]
    pub fn call_site_of(&self, id: CsCallSiteId) -> (CtxId, StmtRef) {
        self.call_sites[id as usize]
    }

    pub fn cs_method(&mut self, ctx: CtxId, method: MethodId) -> CsMethodId {
        if let Some(&id) = self.method_ids.get(&(ctx, method)) {
            return id;
        }
        let id = self.methods.len() as CsMethodId;
        self.methods.push((ctx, method));
        self.method_ids.insert((ctx, method), id);
        id
    }

    #[inline]
    pub fn method_of(&self, id: CsMethodId) -> (CtxId, MethodId) {
        self.methods[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pointer_analysis::domain::context::ContextElem;

    #[test]
    fn test_empty_context_is_id_zero() {
        let mut mgr = CsManager::new();
        assert_eq!(mgr.context(Context::empty()), EMPTY_CTX);
        assert!(mgr.ctx(EMPTY_CTX).is_empty());
    }

    #[test]
    fn test_interning_is_canonical() {
        let mut mgr = CsManager::new();
        let ctx = Context::from_elems([ContextElem::Obj(3)]);
        let a = mgr.context(ctx.clone());
        let b = mgr.context(ctx);
        assert_eq!(a, b);

        let p1 = mgr.cs_var(a, 5);
        let p2 = mgr.cs_var(a, 5);
        assert_eq!(p1, p2);
        assert_eq!(mgr.num_pointers(), 1);

        let o1 = mgr.cs_obj(EMPTY_CTX, 9);
        let o2 = mgr.cs_obj(EMPTY_CTX, 9);
        assert_eq!(o1, o2);
    }

    #[test]
    fn test_distinct_contexts_distinct_pointers() {
        let mut mgr = CsManager::new();
        let c1 = mgr.context(Context::from_elems([ContextElem::Obj(1)]));
        let p_empty = mgr.cs_var(EMPTY_CTX, 5);
        let p_c1 = mgr.cs_var(c1, 5);
        assert_ne!(p_empty, p_c1);
    }

    #[test]
    fn test_pointer_owns_one_set() {
        let mut mgr = CsManager::new();
        let p = mgr.cs_var(EMPTY_CTX, 0);
        assert!(mgr.points_to(p).is_empty());
        mgr.points_to_mut(p).insert(1);
        assert!(mgr.points_to(p).contains(1));
    }

    #[test]
    fn test_static_field_is_context_free() {
        let mut mgr = CsManager::new();
        let f1 = mgr.static_field(2);
        let f2 = mgr.static_field(2);
        assert_eq!(f1, f2);
        assert_eq!(mgr.pointer_key(f1), PointerKey::StaticField(2));
    }
}
