//! Degree-grid search orchestration.
//!
//! Responsibilities:
//!
//! - enumerate the (n, m) degree grid
//! - build and score each cell (parallel)
//! - fold the scored cells into a champion (deterministic tie-break)

pub mod driver;
pub mod grid;
pub mod score;

pub use driver::*;
pub use grid::*;
pub use score::*;
