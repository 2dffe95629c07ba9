//! Feature modules (vertical slices)

pub mod pointer_analysis;
