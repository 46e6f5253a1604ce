//! Classical Padé construction with `Q(0) = 1`.
//!
//! For a pair `(n, m)` (denominator degree `n`, numerator degree `m`) we want
//!
//! ```text
//! P(x) - Q(x) Σ a_k x^k = O(x^{n+m+1})
//! ```
//!
//! With `q_0 = 1` the coefficients of `x^{m+1} .. x^{m+n}` give the n×n system
//!
//! ```text
//! Σ_{j=1..n} q_j a_{k-j} = -a_k,    k = m+1 .. m+n      (a_i = 0 for i < 0)
//! ```
//!
//! and the numerator follows directly:
//!
//! ```text
//! p_k = Σ_{j=0..min(k,n)} q_j a_{k-j},    k = 0 .. m
//! ```

use nalgebra::{DMatrix, DVector};

use crate::domain::{Approximant, CoefficientSequence, DegreePair, Polynomial};
use crate::error::InfeasibleReason;
use crate::math::solve_square;

/// Maximum allowed relative mismatch between each re-expanded coefficient and
/// the series coefficient it should reproduce.
pub const SERIES_MATCH_TOL: f64 = 1e-8;

/// Rounding allowance, in units of `f64::EPSILON`, on the sum `Σ |q_j a_{k-j}|`
/// that forms coefficient `k`. Only matters for (near-)zero series coefficients.
const ROUNDING_ULPS: f64 = 64.0;

/// Build the `(n, m)` Padé approximant of `series`.
pub fn build(series: &CoefficientSequence, pair: DegreePair) -> Result<Approximant, InfeasibleReason> {
    let n = pair.n();
    let m = pair.m();

    if n < 1 || m < 1 {
        return Err(InfeasibleReason::DegreeOutOfRange { pair });
    }
    if !pair.is_determined_by(series.len()) {
        return Err(InfeasibleReason::InsufficientCoefficients {
            pair,
            required: pair.required_coefficients(),
            available: series.len(),
        });
    }

    let a = |k: usize, j: usize| series.coeff(k as isize - j as isize);

    let mut mat = DMatrix::<f64>::zeros(n, n);
    let mut rhs = DVector::<f64>::zeros(n);
    for row in 0..n {
        let k = m + 1 + row;
        for col in 0..n {
            mat[(row, col)] = a(k, col + 1);
        }
        rhs[row] = -a(k, 0);
    }

    let solved = solve_square(&mat, &rhs).ok_or(InfeasibleReason::SingularSystem { pair })?;

    let mut q = Vec::with_capacity(n + 1);
    q.push(1.0);
    q.extend(solved.iter().copied());

    let p: Vec<f64> = (0..=m)
        .map(|k| (0..=k.min(n)).map(|j| q[j] * a(k, j)).sum())
        .collect();

    if p.iter().chain(q.iter()).any(|c| !c.is_finite()) {
        return Err(InfeasibleReason::NonFiniteSolution { pair });
    }

    let approximant = Approximant::new(Polynomial::new(p), Polynomial::new(q));
    verify_series_match(series, &approximant, pair)?;
    Ok(approximant)
}

/// Reject solutions that do not reproduce the first `n+m+1` coefficients.
///
/// Each coefficient is checked against its own magnitude, so the tiny
/// high-order terms are held to the same relative accuracy as `a_0`. An exactly
/// singular system is caught by the LU; this catches the numerically singular
/// ones whose solve "succeeds" with garbage.
fn verify_series_match(
    series: &CoefficientSequence,
    approximant: &Approximant,
    pair: DegreePair,
) -> Result<(), InfeasibleReason> {
    let len = pair.required_coefficients();
    let q = approximant.denominator.coeffs();
    let reexpanded = approximant.taylor_coefficients(len);

    for (k, &c) in reexpanded.iter().enumerate() {
        let tolerance = coefficient_tolerance(series, q, k);
        let mismatch = (c - series.coeff(k as isize)).abs();
        // NaN mismatches fail too.
        if !(mismatch <= tolerance) {
            return Err(InfeasibleReason::IllConditioned {
                pair,
                mismatch,
                tolerance,
            });
        }
    }
    Ok(())
}

/// `SERIES_MATCH_TOL·|a_k|` plus the rounding floor of forming coefficient `k`.
fn coefficient_tolerance(series: &CoefficientSequence, q: &[f64], k: usize) -> f64 {
    let magnitude: f64 = q
        .iter()
        .enumerate()
        .take(k + 1)
        .map(|(j, qj)| (qj * series.coeff(k as isize - j as isize)).abs())
        .sum();
    SERIES_MATCH_TOL * series.coeff(k as isize).abs() + ROUNDING_ULPS * f64::EPSILON * magnitude
}
