//! Ports for pointer analysis
//!
//! The heap abstraction is a capability injected into the solver: given an
//! allocation statement, return its abstract object. The solver never decides
//! how the heap is partitioned; swapping the model changes the abstraction
//! without touching the fixpoint.

use crate::features::pointer_analysis::domain::program::{ClassId, ObjId, StmtRef};
use rustc_hash::FxHashMap;

/// Heap abstraction capability
pub trait HeapModel {
    /// Abstract object for an allocation site, created on first request
    fn obj_at(&mut self, site: StmtRef, class: ClassId) -> ObjId;

    /// Runtime class of an abstract object
    fn obj_class(&self, obj: ObjId) -> ClassId;

    /// Allocation site of an abstract object
    fn obj_site(&self, obj: ObjId) -> StmtRef;

    fn num_objs(&self) -> usize;
}

/// Allocation-site abstraction: one abstract object per `new` statement
#[derive(Debug, Default)]
pub struct AllocationSiteModel {
    objs: Vec<(StmtRef, ClassId)>,
    by_site: FxHashMap<StmtRef, ObjId>,
}

impl AllocationSiteModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeapModel for AllocationSiteModel {
    fn obj_at(&mut self, site: StmtRef, class: ClassId) -> ObjId {
        if let Some(&obj) = self.by_site.get(&site) {
            return obj;
        }
        let obj = self.objs.len() as ObjId;
        self.objs.push((site, class));
        self.by_site.insert(site, obj);
        obj
    }

    #[inline]
    fn obj_class(&self, obj: ObjId) -> ClassId {
        self.objs[obj as usize].1
    }

    #[inline]
    fn obj_site(&self, obj: ObjId) -> StmtRef {
        self.objs[obj as usize].0
    }

    #[inline]
    fn num_objs(&self) -> usize {
        self.objs.len()
    }
}
