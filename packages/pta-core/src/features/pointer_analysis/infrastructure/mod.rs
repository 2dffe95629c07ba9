//! Infrastructure for pointer analysis
//!
//! The solving machinery:
//! - **CsManager**: interning of (context ⊕ entity) pairs into dense ids
//! - **ContextSelector**: context-sensitivity policies
//! - **PointerFlowGraph**: insert-only inclusion-constraint graph
//! - **WorkList**: pending propagation obligations
//! - **Solver**: the worklist-driven fixpoint loop

pub mod cs_manager;
pub mod flow_graph;
pub mod selector;
pub mod solver;
pub mod worklist;

pub use cs_manager::{CsCallSiteId, CsManager, CsMethodId, CsObjId, CtxId, PointerId, PointerKey};
pub use flow_graph::PointerFlowGraph;
pub use selector::{ContextPolicy, ContextSelector};
pub use solver::{Solver, SolverStats};
pub use worklist::{DrainOrder, WorkList};
