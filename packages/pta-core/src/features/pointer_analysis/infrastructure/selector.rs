//! Context Selection Policies
//!
//! A closed set of context-sensitivity variants behind one selector type;
//! context-insensitive analysis is the degenerate case where every query
//! returns the empty context. All selections are pure functions of their
//! interned inputs, so entity canonicalization stays sound.
//!
//! Contexts never grow past their bound: appending slides a window over the
//! most recent k elements instead of refusing deeper contexts.

use crate::features::pointer_analysis::domain::context::ContextElem;
use crate::features::pointer_analysis::domain::program::{MethodId, ObjId};
use serde::{Deserialize, Serialize};

use super::cs_manager::{CsCallSiteId, CsManager, CsMethodId, CsObjId, CtxId, EMPTY_CTX};

/// Context sensitivity policy, chosen at analysis construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextPolicy {
    /// Context-insensitive baseline
    Insensitive,

    /// k-call-site sensitivity (k-CFA): callee context is the caller's
    /// context extended with the call site, windowed to k
    CallSite { k: usize, heap_k: usize },

    /// k-object sensitivity: receiver-bearing calls take the receiver
    /// object's heap context extended with the receiver, windowed to k;
    /// static calls inherit the caller's context unchanged
    Object { k: usize, heap_k: usize },

    /// Object policy on receiver-bearing calls, call-site policy on static
    /// calls
    Hybrid { k: usize, heap_k: usize },
}

impl Default for ContextPolicy {
    fn default() -> Self {
        ContextPolicy::Insensitive
    }
}

impl ContextPolicy {
    /// Heap context depth for this policy
    fn heap_k(&self) -> usize {
        match self {
            ContextPolicy::Insensitive => 0,
            ContextPolicy::CallSite { heap_k, .. }
            | ContextPolicy::Object { heap_k, .. }
            | ContextPolicy::Hybrid { heap_k, .. } => *heap_k,
        }
    }
}

/// Computes contexts for callee activations and heap allocations
#[derive(Debug, Clone, Copy)]
pub struct ContextSelector {
    policy: ContextPolicy,
}

impl ContextSelector {
    pub fn new(policy: ContextPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn policy(&self) -> ContextPolicy {
        self.policy
    }

    /// The zero-length context, used for the entry method
    #[inline]
    pub fn empty_context(&self) -> CtxId {
        EMPTY_CTX
    }

    /// Context for a static callee activation (no receiver)
    pub fn select_context(
        &self,
        mgr: &mut CsManager,
        caller_site: CsCallSiteId,
        _callee: MethodId,
    ) -> CtxId {
        let (caller_ctx, site) = mgr.call_site_of(caller_site);
        match self.policy {
            ContextPolicy::Insensitive => EMPTY_CTX,
            ContextPolicy::CallSite { k, .. } | ContextPolicy::Hybrid { k, .. } => {
                let ctx = mgr.ctx(caller_ctx).appended(ContextElem::CallSite(site), k);
                mgr.context(ctx)
            }
            // Object sensitivity: static calls stay in the caller's context
            ContextPolicy::Object { .. } => caller_ctx,
        }
    }

    /// Context for a receiver-bearing callee activation (virtual, interface
    /// or special)
    pub fn select_context_with_recv(
        &self,
        mgr: &mut CsManager,
        caller_site: CsCallSiteId,
        recv: CsObjId,
        _callee: MethodId,
    ) -> CtxId {
        match self.policy {
            ContextPolicy::Insensitive => EMPTY_CTX,
            ContextPolicy::CallSite { k, .. } => {
                let (caller_ctx, site) = mgr.call_site_of(caller_site);
                let ctx = mgr.ctx(caller_ctx).appended(ContextElem::CallSite(site), k);
                mgr.context(ctx)
            }
            ContextPolicy::Object { k, .. } | ContextPolicy::Hybrid { k, .. } => {
                let (heap_ctx, obj) = mgr.obj_of(recv);
                let ctx = mgr.ctx(heap_ctx).appended(ContextElem::Obj(obj), k);
                mgr.context(ctx)
            }
        }
    }

    /// Context for an object allocated inside `method`
    pub fn select_heap_context(
        &self,
        mgr: &mut CsManager,
        method: CsMethodId,
        _obj: ObjId,
    ) -> CtxId {
        let heap_k = self.policy.heap_k();
        if heap_k == 0 {
            return EMPTY_CTX;
        }
        let (method_ctx, _) = mgr.method_of(method);
        let ctx = mgr.ctx(method_ctx).truncated(heap_k);
        mgr.context(ctx)
    }
}
