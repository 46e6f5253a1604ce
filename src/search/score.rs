//! Candidate scoring.
//!
//! The score is the integrated absolute error
//!
//! ```text
//! ∫_lo^hi |P(x)/Q(x) - f(x)| dx
//! ```
//!
//! or, with `LossKind::MaxAbs`, the largest pointwise error over evenly spaced
//! samples. Lower is better; every finite score is non-negative.

use crate::domain::{Approximant, Interval, LossKind, SearchConfig};
use crate::error::SingularIntegrand;
use crate::math::quad;

/// Sample count used to look for denominator roots inside the interval.
const ROOT_SCAN_SAMPLES: usize = 256;

/// Score `approximant` against `true_fn` on `config.interval`.
///
/// A degenerate interval `[c, c]` scores the pointwise error `|P(c)/Q(c) - f(c)|`
/// for either loss kind.
pub fn score<F>(approximant: &Approximant, true_fn: &F, config: &SearchConfig) -> Result<f64, SingularIntegrand>
where
    F: Fn(f64) -> f64,
{
    let Interval { lo, hi } = config.interval;

    if let Some(x) = approximant.denominator.vanishes_in(lo, hi, ROOT_SCAN_SAMPLES) {
        return Err(SingularIntegrand::DenominatorVanishes { x });
    }

    let err = |x: f64| (approximant.eval(x) - true_fn(x)).abs();

    if config.interval.is_degenerate() {
        return finite(err(lo), lo);
    }

    match config.loss {
        LossKind::Integral => {
            let r = quad(err, lo, hi, &config.quad)
                .map_err(|e| SingularIntegrand::NonFinite { x: e.x })?;
            if !r.converged {
                tracing::debug!(
                    pair = %approximant.pair(),
                    abserr = r.abserr,
                    subintervals = r.subintervals,
                    "quadrature hit the subdivision limit"
                );
            }
            finite(r.value, 0.5 * (lo + hi))
        }
        LossKind::MaxAbs => {
            let mut worst = 0.0_f64;
            for x in config.interval.linspace(config.samples) {
                worst = worst.max(finite(err(x), x)?);
            }
            Ok(worst)
        }
    }
}

fn finite(v: f64, x: f64) -> Result<f64, SingularIntegrand> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SingularIntegrand::NonFinite { x })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DegreePair, Polynomial};
    use crate::pade::build;
    use crate::series::{Exp, TargetFunction};
    use approx::assert_relative_eq;

    fn config_on(lo: f64, hi: f64) -> SearchConfig {
        SearchConfig {
            interval: Interval::new(lo, hi).unwrap(),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn score_is_non_negative_on_exp_approximants() {
        let series = Exp.taylor(19).unwrap();
        let config = config_on(-0.5, 1.0);
        for n in 1..=6 {
            for m in 1..=6 {
                let r = build(&series, DegreePair::new(n, m)).unwrap();
                let s = score(&r, &f64::exp, &config).unwrap();
                assert!(s >= 0.0 && s.is_finite(), "n={n}, m={m}: {s}");
            }
        }
    }

    #[test]
    fn integral_matches_closed_form() {
        // P/Q = 1 + x against f = 0 on [0, 1]: ∫ (1 + x) dx = 1.5
        let r = Approximant::new(Polynomial::new(vec![1.0, 1.0]), Polynomial::new(vec![1.0]));
        let s = score(&r, &|_| 0.0, &config_on(0.0, 1.0)).unwrap();
        assert_relative_eq!(s, 1.5, max_relative = 1e-12);
    }

    #[test]
    fn degenerate_interval_scores_pointwise_error() {
        let series = Exp.taylor(19).unwrap();
        let r = build(&series, DegreePair::new(1, 1)).unwrap();
        for c in [-0.7, 0.0, Interval::legacy().lo, 0.9] {
            let mut config = config_on(c, c);
            let expected = (r.eval(c) - c.exp()).abs();
            assert_eq!(score(&r, &f64::exp, &config).unwrap(), expected);

            config.loss = LossKind::MaxAbs;
            assert_eq!(score(&r, &f64::exp, &config).unwrap(), expected);
        }
    }

    #[test]
    fn denominator_root_in_interval_is_singular() {
        // Q = 1 - x/2 vanishes at x = 2.
        let series = Exp.taylor(3).unwrap();
        let r = build(&series, DegreePair::new(1, 1)).unwrap();
        let err = score(&r, &f64::exp, &config_on(1.0, 3.0)).unwrap_err();
        assert!(matches!(err, SingularIntegrand::DenominatorVanishes { .. }));

        let err = score(&r, &f64::exp, &config_on(2.0, 2.0)).unwrap_err();
        assert!(matches!(err, SingularIntegrand::DenominatorVanishes { .. }));
    }

    #[test]
    fn double_root_of_denominator_is_singular() {
        // Q = (1 - 3x)^2 is non-negative but touches zero at x = 1/3, off the sample grid.
        let r = Approximant::new(Polynomial::new(vec![1.0]), Polynomial::new(vec![1.0, -6.0, 9.0]));
        let err = score(&r, &f64::exp, &config_on(0.0, 1.0)).unwrap_err();
        match err {
            SingularIntegrand::DenominatorVanishes { x } => assert!((x - 1.0 / 3.0).abs() < 1e-6),
            other => panic!("expected a vanishing denominator, got {other}"),
        }
    }

    #[test]
    fn max_abs_loss_takes_the_worst_sample() {
        let r = Approximant::new(Polynomial::new(vec![0.0, 1.0]), Polynomial::new(vec![1.0]));
        let mut config = config_on(-1.0, 0.5);
        config.loss = LossKind::MaxAbs;
        config.samples = 4;
        // |x| sampled at -1, -0.5, 0, 0.5
        assert_eq!(score(&r, &|_| 0.0, &config).unwrap(), 1.0);
    }
}
