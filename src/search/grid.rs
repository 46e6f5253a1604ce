//! Degree grid generation.
//!
//! We search the (n, m) plane exhaustively. Enumeration order is fixed:
//! denominator degree `n` outer, numerator degree `m` inner, both ascending.
//! The order only matters for tie-breaking, but it must never change between
//! runs.

use crate::domain::DegreePair;
use crate::error::SearchError;

/// All pairs `n ∈ 1..=max_n`, `m ∈ 1..=max_m` in enumeration order.
pub fn degree_grid(max_n: usize, max_m: usize) -> Result<Vec<DegreePair>, SearchError> {
    if max_n < 1 || max_m < 1 {
        return Err(SearchError::InvalidConfig(format!(
            "degree bounds must be >= 1 (got max_n={max_n}, max_m={max_m})"
        )));
    }

    let mut out = Vec::with_capacity(max_n * max_m);
    for n in 1..=max_n {
        for m in 1..=max_m {
            out.push(DegreePair::new(n, m));
        }
    }
    Ok(out)
}

/// Number of pairs in `grid` that a series of length `len` can determine.
pub fn determined_count(grid: &[DegreePair], len: usize) -> usize {
    grid.iter().filter(|p| p.is_determined_by(len)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_order_is_denominator_major() {
        let grid = degree_grid(2, 3).unwrap();
        let pairs: Vec<(usize, usize)> = grid.iter().map(|p| (p.n(), p.m())).collect();
        assert_eq!(pairs, vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn grid_rejects_zero_bounds() {
        assert!(degree_grid(0, 3).is_err());
        assert!(degree_grid(3, 0).is_err());
    }

    #[test]
    fn determined_count_applies_length_constraint() {
        let grid = degree_grid(18, 18).unwrap();
        // n + m < 19 with n, m >= 1: sum_{n=1}^{17} (18 - n) = 153
        assert_eq!(determined_count(&grid, 19), 153);
        assert_eq!(determined_count(&degree_grid(5, 5).unwrap(), 3), 1);
    }
}
