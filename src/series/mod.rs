//! Taylor series providers for target functions.
//!
//! The search only needs two things from a target: its Taylor coefficients
//! around 0 and a way to evaluate it exactly (for scoring).

use crate::domain::CoefficientSequence;
use crate::error::SearchError;

/// `1/k!` for `k = 0..=18`.
pub const EXP_TAYLOR: [f64; 19] = [
    1.0,
    1.0,
    1.0 / 2.0,
    1.0 / 6.0,
    1.0 / 24.0,
    1.0 / 120.0,
    1.0 / 720.0,
    1.0 / 5_040.0,
    1.0 / 40_320.0,
    1.0 / 362_880.0,
    1.0 / 3_628_800.0,
    1.0 / 39_916_800.0,
    1.0 / 479_001_600.0,
    1.0 / 6_227_020_800.0,
    1.0 / 87_178_291_200.0,
    1.0 / 1_307_674_368_000.0,
    1.0 / 20_922_789_888_000.0,
    1.0 / 355_687_428_096_000.0,
    1.0 / 6_402_373_705_728_000.0,
];

/// A function with a known Taylor expansion around 0.
pub trait TargetFunction: Sync {
    fn name(&self) -> &'static str;

    /// Maximum number of Taylor terms this target can supply.
    fn max_terms(&self) -> usize;

    /// Coefficient of `x^k`, for `k < max_terms()`.
    fn coefficient(&self, k: usize) -> f64;

    /// Exact value used as the scoring reference.
    fn eval(&self, x: f64) -> f64;

    /// The first `len` Taylor coefficients.
    fn taylor(&self, len: usize) -> Result<CoefficientSequence, SearchError> {
        if len == 0 || len > self.max_terms() {
            return Err(SearchError::InvalidConfig(format!(
                "{} supplies between 1 and {} Taylor terms (requested {len})",
                self.name(),
                self.max_terms()
            )));
        }
        CoefficientSequence::new((0..len).map(|k| self.coefficient(k)).collect())
    }
}

/// `exp(x)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl TargetFunction for Exp {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn max_terms(&self) -> usize {
        EXP_TAYLOR.len()
    }

    fn coefficient(&self, k: usize) -> f64 {
        EXP_TAYLOR[k]
    }

    fn eval(&self, x: f64) -> f64 {
        x.exp()
    }
}
