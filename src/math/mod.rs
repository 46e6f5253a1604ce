//! Mathematical utilities: dense linear solves and adaptive quadrature.

pub mod linsolve;
pub mod quad;

pub use linsolve::*;
pub use quad::*;
