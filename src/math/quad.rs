//! Adaptive Gauss–Kronrod quadrature.
//!
//! Global adaptive scheme on the 7-point Gauss / 15-point Kronrod pair:
//! keep a list of subintervals, repeatedly bisect the one with the largest
//! error estimate until `err <= max(epsabs, epsrel * |I|)` or the subinterval
//! limit is reached.
//!
//! The scheme is fully deterministic: the same integrand and tolerances always
//! produce the same sequence of bisections.

use crate::domain::QuadratureConfig;

/// Kronrod abscissae on `[0, 1]`; odd indices are the Gauss nodes.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Outcome of an adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadResult {
    pub value: f64,
    pub abserr: f64,
    pub subintervals: usize,
    /// `false` if the subinterval limit was hit before the tolerance was met.
    pub converged: bool,
}

/// The integrand returned NaN/inf at `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonFiniteIntegrand {
    pub x: f64,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    err: f64,
}

/// Integrate `f` over `[a, b]`.
///
/// A zero-width interval integrates to exactly 0.
pub fn quad<F>(f: F, a: f64, b: f64, opts: &QuadratureConfig) -> Result<QuadResult, NonFiniteIntegrand>
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return Ok(QuadResult {
            value: 0.0,
            abserr: 0.0,
            subintervals: 0,
            converged: true,
        });
    }

    let limit = opts.limit.max(1);
    let mut segments = vec![kronrod15(&f, a, b)?];

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let abserr: f64 = segments.iter().map(|s| s.err).sum();
        let tol = opts.epsabs.max(opts.epsrel * value.abs());

        if abserr <= tol || segments.len() >= limit {
            if !(value.is_finite() && abserr.is_finite()) {
                return Err(NonFiniteIntegrand { x: (a + b) / 2.0 });
            }
            return Ok(QuadResult {
                value,
                abserr,
                subintervals: segments.len(),
                converged: abserr <= tol,
            });
        }

        // Bisect the worst segment; ties go to the earliest in the list.
        let mut worst = 0;
        for (i, s) in segments.iter().enumerate().skip(1) {
            if s.err > segments[worst].err {
                worst = i;
            }
        }
        let s = segments.swap_remove(worst);
        let mid = 0.5 * (s.a + s.b);
        let left = kronrod15(&f, s.a, mid)?;
        let right = kronrod15(&f, mid, s.b)?;
        segments.push(left);
        segments.push(right);
    }
}

fn kronrod15<F>(f: &F, a: f64, b: f64) -> Result<Segment, NonFiniteIntegrand>
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let eval = |x: f64| -> Result<f64, NonFiniteIntegrand> {
        let v = f(x);
        if v.is_finite() { Ok(v) } else { Err(NonFiniteIntegrand { x }) }
    };

    let fc = eval(center)?;
    let mut res_g = fc * WG[3];
    let mut res_k = fc * WGK[7];

    for j in 0..3 {
        let jtw = 2 * j + 1;
        let dx = half * XGK[jtw];
        let pair = eval(center - dx)? + eval(center + dx)?;
        res_g += WG[j] * pair;
        res_k += WGK[jtw] * pair;
    }
    for j in 0..4 {
        let jtwm1 = 2 * j;
        let dx = half * XGK[jtwm1];
        let pair = eval(center - dx)? + eval(center + dx)?;
        res_k += WGK[jtwm1] * pair;
    }

    Ok(Segment {
        a,
        b,
        value: res_k * half,
        err: ((res_k - res_g) * half).abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn integrates_polynomials_exactly() {
        let opts = QuadratureConfig::default();
        let r = quad(|x| 3.0 * x * x, 0.0, 2.0, &opts).unwrap();
        assert_relative_eq!(r.value, 8.0, max_relative = 1e-14);
        assert!(r.converged);
    }

    #[test]
    fn integrates_exp() {
        let opts = QuadratureConfig::default();
        let r = quad(f64::exp, -1.0, 1.0, &opts).unwrap();
        assert_relative_eq!(r.value, 1f64.exp() - (-1f64).exp(), max_relative = 1e-12);
    }

    #[test]
    fn adapts_to_a_kink() {
        let opts = QuadratureConfig {
            epsabs: 1e-10,
            epsrel: 1e-10,
            limit: 200,
        };
        let r = quad(|x: f64| (x - 0.3).abs(), 0.0, 1.0, &opts).unwrap();
        // 0.3^2/2 + 0.7^2/2
        assert_relative_eq!(r.value, 0.29, max_relative = 1e-9);
        assert!(r.subintervals > 1);
    }

    #[test]
    fn zero_width_interval_is_zero() {
        let r = quad(f64::exp, 0.5, 0.5, &QuadratureConfig::default()).unwrap();
        assert_eq!(r.value, 0.0);
    }

    #[test]
    fn non_finite_integrand_is_reported() {
        let err = quad(|x| 1.0 / (x - 0.5), 0.0, 1.0, &QuadratureConfig::default()).unwrap_err();
        assert!(err.x.is_finite());
    }
}
