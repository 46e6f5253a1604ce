//! Command-line parsing for the Padé coefficient search.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! search/math code. Every search option can also come from a `PADE_*`
//! environment variable (a `.env` file is loaded first).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::LossKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pade", version, about = "Padé approximant coefficient search for exp(x)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the (n, m) degree grid and print the best coefficients.
    Search(SearchArgs),
    /// Measure a range-reduced exp built from a saved result.
    Check(CheckArgs),
}

/// Options for the grid search.
#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    /// Number of Taylor terms fed to the builder (at most 19 for exp).
    #[arg(long, env = "PADE_TERMS", default_value_t = 19)]
    pub terms: usize,

    /// Largest denominator degree n.
    #[arg(long, env = "PADE_MAX_N", default_value_t = 18)]
    pub max_n: usize,

    /// Largest numerator degree m.
    #[arg(long, env = "PADE_MAX_M", default_value_t = 18)]
    pub max_m: usize,

    /// Lower end of the scoring interval (default: -ln2/2).
    #[arg(long, env = "PADE_LO", allow_negative_numbers = true, requires = "hi")]
    pub lo: Option<f64>,

    /// Upper end of the scoring interval (default: ln2/2).
    #[arg(long, env = "PADE_HI", allow_negative_numbers = true, requires = "lo")]
    pub hi: Option<f64>,

    /// Score on the zero-width interval [ln2/2, ln2/2] of the legacy script.
    #[arg(long, conflicts_with_all = ["lo", "hi"])]
    pub legacy_interval: bool,

    /// Error measure used to rank candidates.
    #[arg(long, env = "PADE_LOSS", value_enum, default_value_t = LossKind::Integral)]
    pub loss: LossKind,

    /// Sample count for `--loss max-abs`.
    #[arg(long, env = "PADE_SAMPLES", default_value_t = 10_000)]
    pub samples: usize,

    /// Absolute quadrature tolerance.
    #[arg(long, env = "PADE_EPSABS", default_value_t = 1.49e-8)]
    pub epsabs: f64,

    /// Relative quadrature tolerance.
    #[arg(long, env = "PADE_EPSREL", default_value_t = 1.49e-8)]
    pub epsrel: f64,

    /// Maximum number of quadrature subintervals.
    #[arg(long, env = "PADE_LIMIT", default_value_t = 50)]
    pub limit: usize,

    /// Do not print the per-cell attempt log.
    #[arg(long)]
    pub quiet: bool,

    /// Export the best approximant to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for checking a saved result.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Result JSON file produced by `pade search --export`.
    #[arg(long, value_name = "JSON")]
    pub result: PathBuf,

    /// Sweep exp over [-range, range].
    #[arg(long, default_value_t = 20.0)]
    pub range: f64,

    /// Sweep step.
    #[arg(long, default_value_t = 0.01)]
    pub step: f64,
}
