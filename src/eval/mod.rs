//! Range-reduced `exp` built on a searched approximant.
//!
//! Any `x` is split as `x = k·ln2 + r` with `|r| <= ln2/2`, so
//! `exp(x) = 2^k · exp(r)` and only `exp(r)` is approximated by `P(r)/Q(r)`.
//! `ln2` is carried as a hi/lo pair so that `k·ln2_hi` is exact for every `k`
//! that does not overflow.

use std::f64::consts::LOG2_E;

use crate::domain::{Approximant, Interval, Polynomial};
use crate::error::AppError;
use crate::series::TargetFunction;

/// ln2 rounded so its low 21 mantissa bits are clear.
const LN2_HI: f64 = 6.931_471_803_691_238_164_90e-1;
const LN2_LO: f64 = 1.908_214_929_270_587_700_02e-10;

/// `ln(f64::MAX)`; above this `exp` overflows.
const MAX_ARG: f64 = 709.782_712_893_384;
/// `ln` of the smallest subnormal; below this `exp` underflows to 0.
const MIN_ARG: f64 = -745.133_219_101_941_1;

#[derive(Debug, Clone)]
pub struct RangeReducedExp {
    approximant: Approximant,
}

impl RangeReducedExp {
    pub fn new(approximant: Approximant) -> Self {
        Self { approximant }
    }

    /// Baseline: the truncated Taylor polynomial with `terms` coefficients.
    pub fn taylor<T: TargetFunction>(target: &T, terms: usize) -> Result<Self, AppError> {
        let series = target
            .taylor(terms)
            .map_err(|e| AppError::new(2, e.to_string()))?;
        Ok(Self::new(Approximant::new(
            Polynomial::new(series.as_slice().to_vec()),
            Polynomial::new(vec![1.0]),
        )))
    }

    pub fn approximant(&self) -> &Approximant {
        &self.approximant
    }

    pub fn eval(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if x > MAX_ARG {
            return f64::INFINITY;
        }
        if x < MIN_ARG {
            return 0.0;
        }

        let k = (x * LOG2_E).round();
        let r = (x - k * LN2_HI) - k * LN2_LO;
        scale_by_pow2(self.approximant.eval(r), k as i32)
    }
}

/// `y · 2^k` without overflowing the intermediate power of two.
fn scale_by_pow2(mut y: f64, mut k: i32) -> f64 {
    while k > 1023 {
        y *= 2f64.powi(1023);
        k -= 1023;
    }
    while k < -1022 {
        y *= 2f64.powi(-1022);
        k += 1022;
    }
    y * 2f64.powi(k)
}

/// Upper bound on the number of points in one accuracy sweep.
pub const MAX_SWEEP_SAMPLES: usize = 50_000_000;

/// Worst-case error of an evaluator against `f64::exp` over a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyReport {
    pub max_abs: f64,
    pub max_rel: f64,
    /// Argument with the largest relative error.
    pub worst_x: f64,
    pub samples: usize,
}

/// Sweep `[interval.lo, interval.hi]` in increments of `step`.
pub fn accuracy<F>(eval: F, interval: Interval, step: f64) -> Result<AccuracyReport, AppError>
where
    F: Fn(f64) -> f64,
{
    if !(step.is_finite() && step > 0.0) {
        return Err(AppError::new(2, format!("Sweep step must be finite and > 0 (got {step}).")));
    }

    let steps = (interval.width() / step).floor();
    if steps >= MAX_SWEEP_SAMPLES as f64 {
        return Err(AppError::new(
            2,
            format!(
                "Sweep of {interval} with step {step} needs more than {MAX_SWEEP_SAMPLES} samples."
            ),
        ));
    }
    let count = steps as usize + 1;
    let mut report = AccuracyReport {
        max_abs: 0.0,
        max_rel: 0.0,
        worst_x: interval.lo,
        samples: count,
    };

    for i in 0..count {
        let x = interval.lo + step * i as f64;
        let exact = x.exp();
        let abs = (eval(x) - exact).abs();
        let rel = if exact != 0.0 { abs / exact.abs() } else { abs };
        report.max_abs = report.max_abs.max(abs);
        if rel > report.max_rel || rel.is_nan() {
            report.max_rel = rel;
            report.worst_x = x;
        }
    }

    Ok(report)
}
