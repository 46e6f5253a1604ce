//! Padé approximant construction.
//!
//! Builders are small, pure functions of the Taylor series and a degree pair so
//! the grid search can call them from any worker thread.

pub mod builder;

pub use builder::*;
