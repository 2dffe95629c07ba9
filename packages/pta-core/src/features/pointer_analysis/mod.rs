//! # Pointer Analysis Feature
//!
//! Inclusion-based points-to analysis with on-the-fly call graph discovery.
//!
//! Layering:
//! - `domain/`: value types with no algorithms (program model, contexts,
//!   points-to sets, call graph)
//! - `ports/`: heap abstraction boundary (allocation-site modeling)
//! - `infrastructure/`: the machinery (entity interning, context selection,
//!   pointer flow graph, worklist, solver)
//! - `application/`: the `PointerAnalysis` facade and queryable result

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for the feature's public API
pub use application::analyzer::{AnalysisConfig, PointerAnalysis, PointerAnalysisResult};
pub use domain::call_graph::{CallEdge, CsCallGraph};
pub use domain::context::{Context, ContextElem};
pub use domain::points_to_set::PointsToSet;
pub use domain::program::{CallKind, Program, Stmt};
pub use infrastructure::selector::{ContextPolicy, ContextSelector};
pub use infrastructure::solver::{Solver, SolverStats};
