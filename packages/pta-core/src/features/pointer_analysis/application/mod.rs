//! Application layer for pointer analysis
//!
//! `PointerAnalysis` is the entry facade: configure a policy, hand it a
//! program and an entry method, get back a queryable `PointerAnalysisResult`.

pub mod analyzer;

pub use analyzer::{AnalysisConfig, PointerAnalysis, PointerAnalysisResult};
