//! Input/output helpers.
//!
//! - champion JSON read/write (`result`)

pub mod result;

pub use result::*;
