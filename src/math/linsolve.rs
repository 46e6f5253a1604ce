//! Square linear system solver.
//!
//! The Padé construction reduces to one small square system per grid cell:
//!
//! ```text
//! A q = b,   A is n×n (Toeplitz in the Taylor coefficients)
//! ```
//!
//! Implementation choices:
//! - Rows are scaled to unit max norm first; the exp coefficients span ~16
//!   orders of magnitude and each row must be solved to its own scale.
//! - Full-pivot LU, followed by a few steps of iterative refinement with the
//!   same factorization so the residual is small in every row, not just the
//!   largest one.
//! - Exact singularity (a zero pivot) is reported as `None`. Near-singular
//!   systems are left to the caller, which verifies the solution against the
//!   series it was built from.

use nalgebra::{DMatrix, DVector};

/// Refinement passes after the initial LU solve.
const REFINEMENT_STEPS: usize = 2;

/// Solve `a x = b` for square `a`.
///
/// Returns `None` if `a` is singular, not square, or the solution is not finite.
pub fn solve_square(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if a.nrows() != a.ncols() || a.nrows() != b.len() {
        return None;
    }

    let (a, b) = equilibrate_rows(a, b);
    let lu = a.clone().full_piv_lu();
    if !lu.is_invertible() {
        return None;
    }

    let mut x = lu.solve(&b)?;
    for _ in 0..REFINEMENT_STEPS {
        let residual = &b - &a * &x;
        let Some(delta) = lu.solve(&residual) else { break };
        if !delta.iter().all(|v| v.is_finite()) {
            break;
        }
        x += delta;
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

/// Scale each row of `[a | b]` by its largest absolute entry (zero rows untouched).
fn equilibrate_rows(a: &DMatrix<f64>, b: &DVector<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let mut a = a.clone();
    let mut b = b.clone();
    for row in 0..a.nrows() {
        let size = a.row(row).amax().max(b[row].abs());
        if size > 0.0 && size.is_finite() {
            a.row_mut(row).unscale_mut(size);
            b[row] /= size;
        }
    }
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_simple_system() {
        // 2x + y = 5, x + 3y = 10  ->  x = 1, y = 3
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_row_slice(&[5.0, 10.0]);

        let x = solve_square(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn singular_system_is_none() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_square(&a, &b).is_none());

        let zero = DMatrix::from_row_slice(1, 1, &[0.0]);
        assert!(solve_square(&zero, &DVector::from_row_slice(&[1.0])).is_none());
    }

    #[test]
    fn badly_scaled_rows_are_solved_to_their_own_scale() {
        // Row 2 is 1e-14 times smaller than row 1; both residuals must be
        // small relative to their own row.
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 1e-14, 3e-14]);
        let b = DVector::from_row_slice(&[2.0, 7e-14]);

        let x = solve_square(&a, &b).unwrap();
        let r = &b - &a * &x;
        assert!(r[0].abs() <= 1e-13 * 2.0);
        assert!(r[1].abs() <= 1e-13 * 7e-14, "row 2 residual {}", r[1]);
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn shape_mismatch_is_none() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_square(&a, &b).is_none());
    }
}
