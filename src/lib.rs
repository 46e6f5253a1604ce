//! `pade-search` library crate.
//!
//! Searches the (n, m) degree grid for the Padé approximant `P/Q` of a
//! Taylor series that best matches the true function on an interval.
//!
//! The binary (`pade`) is a thin wrapper around this library so that the
//! search can be tested without spawning processes.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod eval;
pub mod io;
pub mod math;
pub mod pade;
pub mod report;
pub mod search;
pub mod series;
