//! Shared domain types.
//!
//! Polynomials store coefficients lowest degree first everywhere in the crate.
//! Only the reporter reverses them (highest degree first) for printing.
//!
//! Degree convention: in a `DegreePair`, `n` is the denominator degree and
//! `m` is the numerator degree.

use std::f64::consts::LN_2;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{InfeasibleReason, SearchError, SingularIntegrand};

/// Truncated Taylor expansion `a_0 + a_1 x + ... + a_{L-1} x^{L-1}` around 0.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSequence {
    coeffs: Vec<f64>,
}

impl CoefficientSequence {
    pub fn new(coeffs: Vec<f64>) -> Result<Self, SearchError> {
        if coeffs.is_empty() {
            return Err(SearchError::InvalidConfig(
                "Taylor coefficient sequence must not be empty".into(),
            ));
        }
        if let Some(k) = coeffs.iter().position(|c| !c.is_finite()) {
            return Err(SearchError::InvalidConfig(format!(
                "Taylor coefficient a_{k} is not finite"
            )));
        }
        Ok(Self { coeffs })
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.coeffs
    }

    /// `a_k`, taking `a_k = 0` outside the stored range.
    pub fn coeff(&self, k: isize) -> f64 {
        if k < 0 {
            return 0.0;
        }
        self.coeffs.get(k as usize).copied().unwrap_or(0.0)
    }
}

/// Candidate degrees: `denominator` is `n`, `numerator` is `m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DegreePair {
    pub denominator: usize,
    pub numerator: usize,
}

impl DegreePair {
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            denominator: n,
            numerator: m,
        }
    }

    pub fn n(&self) -> usize {
        self.denominator
    }

    pub fn m(&self) -> usize {
        self.numerator
    }

    /// Number of Taylor coefficients the pair consumes (`n + m + 1`).
    pub fn required_coefficients(&self) -> usize {
        self.denominator + self.numerator + 1
    }

    /// `n + m < len`: the series determines both polynomials.
    pub fn is_determined_by(&self, len: usize) -> bool {
        self.denominator + self.numerator < len
    }
}

impl fmt::Display for DegreePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}, m={}", self.denominator, self.numerator)
    }
}

/// Dense polynomial, coefficients lowest degree first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Coefficients highest degree first (printing order).
    pub fn highest_first(&self) -> impl Iterator<Item = f64> + '_ {
        self.coeffs.iter().rev().copied()
    }

    pub fn derivative(&self) -> Polynomial {
        Polynomial::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, c)| k as f64 * c)
                .collect(),
        )
    }

    /// First point in `[lo, hi]` where the polynomial is (nearly) zero,
    /// non-finite, or has changed sign relative to `p(lo)`.
    ///
    /// `samples` evenly spaced points are checked, plus every local extremum
    /// bracketed by a sign change of `p'` between neighbouring samples. That
    /// catches double roots and root pairs that fall between two samples.
    /// "Nearly zero" means `|p(x)| <= NEAR_ZERO_REL * |p(0)|`.
    pub fn vanishes_in(&self, lo: f64, hi: f64, samples: usize) -> Option<f64> {
        let steps = samples.max(1);
        let floor = NEAR_ZERO_REL * self.coeffs.first().map_or(0.0, |c| c.abs());
        let first = self.eval(lo);
        let vanishes =
            |v: f64| v.abs() <= floor || !v.is_finite() || v.signum() != first.signum();

        if vanishes(first) {
            return Some(lo);
        }

        let slope = self.derivative();
        let (mut prev_x, mut prev_d) = (lo, slope.eval(lo));
        for i in 1..=steps {
            let x = lo + (hi - lo) * (i as f64 / steps as f64);
            if vanishes(self.eval(x)) {
                return Some(x);
            }
            let d = slope.eval(x);
            if prev_d * d < 0.0 {
                let xe = bisect_root(&slope, prev_x, x);
                if vanishes(self.eval(xe)) {
                    return Some(xe);
                }
            }
            (prev_x, prev_d) = (x, d);
        }
        None
    }
}

/// Relative size below which a polynomial value counts as a root.
const NEAR_ZERO_REL: f64 = 1e-12;

/// Root of `p` in `[a, b]`, given `p(a)` and `p(b)` of opposite sign.
fn bisect_root(p: &Polynomial, mut a: f64, mut b: f64) -> f64 {
    let mut fa = p.eval(a);
    for _ in 0..100 {
        let mid = 0.5 * (a + b);
        if mid <= a || mid >= b {
            break;
        }
        let fm = p.eval(mid);
        if fm == 0.0 {
            return mid;
        }
        if (fm < 0.0) == (fa < 0.0) {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    0.5 * (a + b)
}

/// Rational approximant `P(x) / Q(x)` with `Q(0) = 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approximant {
    pub numerator: Polynomial,
    pub denominator: Polynomial,
}

impl Approximant {
    pub fn new(numerator: Polynomial, denominator: Polynomial) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn pair(&self) -> DegreePair {
        DegreePair::new(self.denominator.degree(), self.numerator.degree())
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.numerator.eval(x) / self.denominator.eval(x)
    }

    /// Re-expand `P/Q` as a power series and return its first `len` coefficients.
    ///
    /// Uses `c_k = (p_k - Σ_{j≥1} q_j c_{k-j}) / q_0`.
    pub fn taylor_coefficients(&self, len: usize) -> Vec<f64> {
        let p = self.numerator.coeffs();
        let q = self.denominator.coeffs();
        let q0 = q.first().copied().unwrap_or(1.0);
        let mut c: Vec<f64> = Vec::with_capacity(len);
        for k in 0..len {
            let mut acc = p.get(k).copied().unwrap_or(0.0);
            for j in 1..q.len().min(k + 1) {
                acc -= q[j] * c[k - j];
            }
            c.push(acc / q0);
        }
        c
    }
}

/// Closed evaluation interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Result<Self, SearchError> {
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(SearchError::InvalidConfig(format!(
                "interval bounds must be finite (got [{lo}, {hi}])"
            )));
        }
        if lo > hi {
            return Err(SearchError::InvalidConfig(format!(
                "interval lower bound {lo} exceeds upper bound {hi}"
            )));
        }
        Ok(Self { lo, hi })
    }

    /// `[-ln2/2, ln2/2]`: the reduced argument range of a range-reduced `exp`.
    pub fn reduced_exp() -> Self {
        Self {
            lo: -LN_2 / 2.0,
            hi: LN_2 / 2.0,
        }
    }

    /// `[ln2/2, ln2/2]`, the zero-width interval of the legacy search script.
    pub fn legacy() -> Self {
        Self {
            lo: LN_2 / 2.0,
            hi: LN_2 / 2.0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.lo == self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// `samples` evenly spaced points including both endpoints.
    pub fn linspace(&self, samples: usize) -> Vec<f64> {
        match samples {
            0 => Vec::new(),
            1 => vec![self.lo],
            _ => {
                let step = self.width() / (samples as f64 - 1.0);
                (0..samples).map(|i| self.lo + step * i as f64).collect()
            }
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// How a candidate's error against the true function is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LossKind {
    /// `∫ |P/Q - f| dx` by adaptive quadrature.
    Integral,
    /// `max |P/Q - f|` over evenly spaced samples.
    MaxAbs,
}

impl LossKind {
    pub fn display_name(self) -> &'static str {
        match self {
            LossKind::Integral => "integrated |error|",
            LossKind::MaxAbs => "max |error|",
        }
    }
}

/// Adaptive quadrature tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureConfig {
    pub epsabs: f64,
    pub epsrel: f64,
    /// Maximum number of subintervals.
    pub limit: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            epsabs: 1.49e-8,
            epsrel: 1.49e-8,
            limit: 50,
        }
    }
}

/// Grid search bounds and scoring options.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_n: usize,
    pub max_m: usize,
    pub interval: Interval,
    pub loss: LossKind,
    /// Sample count for `LossKind::MaxAbs`.
    pub samples: usize,
    pub quad: QuadratureConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_n: 18,
            max_m: 18,
            interval: Interval::reduced_exp(),
            loss: LossKind::Integral,
            samples: 10_000,
            quad: QuadratureConfig::default(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_n < 1 {
            return Err(SearchError::InvalidConfig("max_n must be >= 1".into()));
        }
        if self.max_m < 1 {
            return Err(SearchError::InvalidConfig("max_m must be >= 1".into()));
        }
        // Re-run the constructor checks: the fields are public.
        Interval::new(self.interval.lo, self.interval.hi)?;
        if self.loss == LossKind::MaxAbs && self.samples < 1 {
            return Err(SearchError::InvalidConfig("samples must be >= 1".into()));
        }
        let q = &self.quad;
        if !(q.epsabs.is_finite() && q.epsabs >= 0.0 && q.epsrel.is_finite() && q.epsrel >= 0.0) {
            return Err(SearchError::InvalidConfig(
                "quadrature tolerances must be finite and non-negative".into(),
            ));
        }
        if q.epsabs == 0.0 && q.epsrel == 0.0 {
            return Err(SearchError::InvalidConfig(
                "at least one quadrature tolerance must be positive".into(),
            ));
        }
        if q.limit < 1 {
            return Err(SearchError::InvalidConfig(
                "quadrature subdivision limit must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// A built and scored grid cell.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub pair: DegreePair,
    pub approximant: Approximant,
    pub score: f64,
}

/// The champion of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub pair: DegreePair,
    pub approximant: Approximant,
    pub score: f64,
}

impl From<ScoredCandidate> for SearchResult {
    fn from(c: ScoredCandidate) -> Self {
        Self {
            pair: c.pair,
            approximant: c.approximant,
            score: c.score,
        }
    }
}

/// What happened to one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    Scored { score: f64 },
    /// Never attempted (`n + m >= L`).
    Skipped(InfeasibleReason),
    Infeasible(InfeasibleReason),
    Singular(SingularIntegrand),
}

impl CellOutcome {
    pub fn is_attempted(&self) -> bool {
        !matches!(self, CellOutcome::Skipped(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellAttempt {
    /// Position in enumeration order.
    pub index: usize,
    pub pair: DegreePair,
    pub outcome: CellOutcome,
}

/// Everything a finished grid search produced.
#[derive(Debug, Clone)]
pub struct SearchRun {
    pub attempts: Vec<CellAttempt>,
    pub best: Option<SearchResult>,
}

impl SearchRun {
    pub fn attempted_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.outcome.is_attempted()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.attempts.len() - self.attempted_count()
    }

    /// The winning candidate, or `NoSolutionFound` if no cell produced a finite score.
    pub fn champion(&self) -> Result<&SearchResult, SearchError> {
        self.best.as_ref().ok_or(SearchError::NoSolutionFound {
            attempted: self.attempted_count(),
            skipped: self.skipped_count(),
        })
    }
}

/// A full `pade search` invocation as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of Taylor terms fed to the builder.
    pub terms: usize,
    pub search: SearchConfig,
    pub show_attempts: bool,
    pub export: Option<PathBuf>,
}

/// A saved search result (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    pub target: String,
    pub generated: DateTime<Utc>,
    pub interval: Interval,
    pub loss: LossKind,
    pub score: f64,
    pub numerator_degree: usize,
    pub denominator_degree: usize,
    /// Lowest degree first.
    pub numerator: Vec<f64>,
    /// Lowest degree first.
    pub denominator: Vec<f64>,
}

impl ResultFile {
    pub fn approximant(&self) -> Approximant {
        Approximant::new(
            Polynomial::new(self.numerator.clone()),
            Polynomial::new(self.denominator.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynomial_eval_is_lowest_degree_first() {
        // 1 + 2x + 3x^2 at x = 2
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.eval(2.0), 17.0);
        assert_eq!(p.degree(), 2);
        assert_eq!(p.highest_first().collect::<Vec<_>>(), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn vanishes_in_detects_sign_change() {
        // 1 - x has its root at 1.
        let q = Polynomial::new(vec![1.0, -1.0]);
        assert!(q.vanishes_in(0.0, 0.5, 64).is_none());
        let x = q.vanishes_in(0.0, 2.0, 64).unwrap();
        assert!((1.0..=2.0).contains(&x));
    }

    #[test]
    fn vanishes_in_finds_roots_between_samples() {
        // (x - 1/3)^2: touches zero without changing sign.
        let double = Polynomial::new(vec![1.0 / 9.0, -2.0 / 3.0, 1.0]);
        let x = double.vanishes_in(0.0, 1.0, 4).unwrap();
        assert!((x - 1.0 / 3.0).abs() < 1e-6, "found {x}");

        // (x - 0.3)(x - 0.31): both roots sit between the samples 0.25 and 0.5.
        let pair = Polynomial::new(vec![0.093, -0.61, 1.0]);
        let x = pair.vanishes_in(0.0, 1.0, 4).unwrap();
        assert!((0.25..=0.5).contains(&x), "found {x}");

        // 1 + x^2 has an extremum at 0 but no root.
        let positive = Polynomial::new(vec![1.0, 0.0, 1.0]);
        assert!(positive.vanishes_in(-1.0, 1.0, 4).is_none());
    }

    #[test]
    fn vanishes_in_treats_tiny_values_as_roots() {
        // 1 - x + 1e-14: stays positive on [0, 1] but dips to 1e-14 of Q(0).
        let q = Polynomial::new(vec![1.0 + 1e-14, -1.0]);
        assert!(q.vanishes_in(0.0, 1.0, 8).is_some());
    }

    #[test]
    fn degree_pair_convention() {
        let pair = DegreePair::new(3, 2);
        assert_eq!(pair.n(), 3);
        assert_eq!(pair.denominator, 3);
        assert_eq!(pair.m(), 2);
        assert_eq!(pair.numerator, 2);
        assert_eq!(pair.required_coefficients(), 6);
        assert!(pair.is_determined_by(6));
        assert!(!pair.is_determined_by(5));
        assert_eq!(pair.to_string(), "n=3, m=2");
    }

    #[test]
    fn interval_rejects_reversed_and_non_finite_bounds() {
        assert!(Interval::new(0.5, 0.1).is_err());
        assert!(Interval::new(f64::NAN, 0.1).is_err());
        assert!(Interval::new(0.0, f64::INFINITY).is_err());
        assert!(Interval::new(0.3, 0.3).unwrap().is_degenerate());
        assert!(Interval::legacy().is_degenerate());
        assert!(!Interval::reduced_exp().is_degenerate());
    }

    #[test]
    fn linspace_includes_endpoints() {
        let v = Interval::new(0.0, 1.0).unwrap().linspace(5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(Interval::legacy().linspace(1), vec![Interval::legacy().lo]);
    }

    #[test]
    fn coefficient_sequence_rejects_empty_and_nan() {
        assert!(CoefficientSequence::new(vec![]).is_err());
        assert!(CoefficientSequence::new(vec![1.0, f64::NAN]).is_err());
        let s = CoefficientSequence::new(vec![1.0, 2.0]).unwrap();
        assert_eq!(s.coeff(-1), 0.0);
        assert_eq!(s.coeff(1), 2.0);
        assert_eq!(s.coeff(5), 0.0);
    }

    #[test]
    fn config_validation_rejects_malformed_bounds() {
        let mut config = SearchConfig::default();
        assert!(config.validate().is_ok());

        config.max_n = 0;
        assert!(matches!(config.validate(), Err(SearchError::InvalidConfig(_))));

        let mut config = SearchConfig::default();
        config.interval = Interval { lo: 1.0, hi: 0.0 };
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.quad.limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn champion_reports_no_solution_distinctly() {
        let run = SearchRun {
            attempts: vec![CellAttempt {
                index: 0,
                pair: DegreePair::new(1, 1),
                outcome: CellOutcome::Infeasible(InfeasibleReason::SingularSystem {
                    pair: DegreePair::new(1, 1),
                }),
            }],
            best: None,
        };
        assert_eq!(
            run.champion().unwrap_err(),
            SearchError::NoSolutionFound {
                attempted: 1,
                skipped: 0
            }
        );
    }
}
