//! Domain models for pointer analysis
//!
//! Core value types independent of the solving algorithm:
//! - Program: read-only program model (classes, methods, statements, dispatch)
//! - Context: finite calling/allocation history abstraction
//! - PointsToSet: monotone set of context-sensitive objects
//! - CsCallGraph: reachable methods and deduplicated call edges

pub mod call_graph;
pub mod context;
pub mod points_to_set;
pub mod program;

pub use call_graph::{CallEdge, CsCallGraph};
pub use context::{Context, ContextElem};
pub use points_to_set::PointsToSet;
pub use program::{CallKind, Invoke, Program, Stmt, StmtRef};
