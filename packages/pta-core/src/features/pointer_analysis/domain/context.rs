//! Calling Context
//!
//! An immutable, value-comparable sequence of context elements. Two contexts
//! are equal iff their element sequences are equal; the unique empty context
//! is the context-insensitive degenerate case.
//!
//! Growth is bounded by sliding-window truncation: appending to a context of
//! length k keeps the most recent k elements, so a context built from calls
//! c1, c2, c3 under k = 2 equals the one built from c2, c3.

use super::program::{ObjId, StmtRef};

/// One element of a calling or heap context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextElem {
    /// A call site (call-site sensitivity)
    CallSite(StmtRef),
    /// An abstract object (object sensitivity)
    Obj(ObjId),
}

/// A finite ordered context, most recent element last
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Context {
    elements: Vec<ContextElem>,
}

impl Context {
    /// The empty (context-insensitive) context
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_elems(elements: impl IntoIterator<Item = ContextElem>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    /// Append `elem`, keeping only the most recent `k` elements.
    /// `k = 0` always yields the empty context.
    pub fn appended(&self, elem: ContextElem, k: usize) -> Context {
        if k == 0 {
            return Context::empty();
        }
        let mut elements = self.elements.clone();
        elements.push(elem);
        if elements.len() > k {
            elements.drain(..elements.len() - k);
        }
        Context { elements }
    }

    /// Keep only the most recent `k` elements
    pub fn truncated(&self, k: usize) -> Context {
        if self.elements.len() <= k {
            return self.clone();
        }
        Context {
            elements: self.elements[self.elements.len() - k..].to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn elements(&self) -> &[ContextElem] {
        &self.elements
    }
}
