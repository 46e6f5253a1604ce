//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the search inputs (`CoefficientSequence`, `DegreePair`, `SearchConfig`)
//! - rational approximants (`Polynomial`, `Approximant`)
//! - search outputs (`ScoredCandidate`, `CellAttempt`, `SearchRun`, `SearchResult`)

pub mod types;

pub use types::*;
