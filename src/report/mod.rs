//! Reporting: attempt log, run summary, and the pasteable coefficient block.

pub mod format;

pub use format::*;
