//! Special functions and distribution tails used by the tests.
//!
//! Thin wrappers over `statrs` so the tests read like the NIST formulas:
//! `igamc(k/2, x/2)` is the chi-square survival function with `k` degrees of
//! freedom, `erfc` is re-exported as is.

use statrs::distribution::{ChiSquared, ContinuousCDF, Discrete, Poisson};
use statrs::function::erf;

use crate::error::TestError;

pub use statrs::function::erf::erfc;

/// Degrees of freedom above which the normal approximation is used when the
/// exact chi-square tail is unavailable.
const NORMAL_APPROX_DF: f64 = 30.0;

/// Upper tail of the chi-square distribution with `df` degrees of freedom.
pub fn chi_square_sf(df: f64, x: f64) -> Result<f64, TestError> {
    if x.is_nan() {
        return Err(TestError::Computation(format!(
            "chi-square statistic is not a number (df={df})"
        )));
    }
    if x <= 0.0 {
        return Ok(1.0);
    }
    let dist = ChiSquared::new(df)
        .map_err(|e| TestError::Computation(format!("chi-square with df={df}: {e}")))?;
    Ok(dist.sf(x))
}

/// Chi-square tail that never fails. When the exact tail is unavailable it
/// falls back to the normal approximation for `df > 30` and to `exp(-x/2)`
/// below that.
pub fn chi_square_sf_or_approx(df: f64, x: f64) -> f64 {
    match chi_square_sf(df, x) {
        Ok(p) if p.is_finite() => p,
        _ if df > NORMAL_APPROX_DF => {
            let z = (x - df) / (2.0 * df).sqrt();
            0.5 * erfc(z / std::f64::consts::SQRT_2)
        }
        _ => (-x / 2.0).exp(),
    }
}

/// Chi-square goodness-of-fit statistic, skipping cells with zero expectation.
pub fn chi_square_statistic(observed: &[u64], probs: &[f64], total: f64) -> f64 {
    observed
        .iter()
        .zip(probs)
        .map(|(&obs, &p)| {
            let expected = total * p;
            if expected > 0.0 {
                let diff = obs as f64 - expected;
                diff * diff / expected
            } else {
                0.0
            }
        })
        .sum()
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erf::erfc(-x / std::f64::consts::SQRT_2)
}

/// Poisson probability mass at `k`.
pub fn poisson_pmf(lambda: f64, k: u64) -> Result<f64, TestError> {
    let dist = Poisson::new(lambda)
        .map_err(|e| TestError::Computation(format!("poisson with lambda={lambda}: {e}")))?;
    Ok(dist.pmf(k))
}

/// Clamp a probability into [0, 1]. NaN is a computation fault.
pub fn clamp_probability(p: f64) -> Result<f64, TestError> {
    if p.is_nan() {
        return Err(TestError::Computation("p-value is not a number".to_string()));
    }
    Ok(p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{ContinuousCDF, Normal};

    #[test]
    fn test_chi_square_df2_is_exponential() {
        for x in [0.5, 1.0, 3.0, 10.0] {
            let p = chi_square_sf(2.0, x).unwrap();
            assert!((p - (-x / 2.0f64).exp()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_chi_square_zero_statistic() {
        assert_eq!(chi_square_sf(5.0, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_chi_square_nan_is_error() {
        assert!(chi_square_sf(5.0, f64::NAN).is_err());
    }

    #[test]
    fn test_fallback_matches_exact() {
        let exact = chi_square_sf(8.0, 6.0).unwrap();
        assert!((chi_square_sf_or_approx(8.0, 6.0) - exact).abs() < 1e-12);
    }

    #[test]
    fn test_normal_cdf_matches_statrs() {
        let norm = Normal::standard();
        for x in [-3.0, -1.0, 0.0, 0.5, 2.5] {
            assert!((normal_cdf(x) - norm.cdf(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_chi_square_statistic() {
        let chi = chi_square_statistic(&[10, 30], &[0.25, 0.75], 40.0);
        assert!(chi.abs() < 1e-12);
        let chi = chi_square_statistic(&[20, 20], &[0.5, 0.5], 40.0);
        assert!(chi.abs() < 1e-12);
        let chi = chi_square_statistic(&[30, 10], &[0.5, 0.5], 40.0);
        assert!((chi - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_probability() {
        assert_eq!(clamp_probability(1.0000001).unwrap(), 1.0);
        assert_eq!(clamp_probability(-1e-18).unwrap(), 0.0);
        assert!(clamp_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_poisson_pmf() {
        let p0 = poisson_pmf(2.0, 0).unwrap();
        assert!((p0 - (-2.0f64).exp()).abs() < 1e-12);
    }
}
