//! Cumulative sums (cusum) test, forward and backward.

use crate::bits::{check_sequence, step};
use crate::error::TestError;
use crate::info_map;
use crate::math::normal_cdf;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "cusum";
pub const MIN_BITS: usize = 100;

/// Maximal excursion of the ±1 random walk. Reports `[forward, backward]`.
pub fn cumulative_sums(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

/// Largest `|S_k|` of the walk over `steps`.
fn max_excursion(steps: impl Iterator<Item = i64>) -> i64 {
    steps
        .scan(0i64, |s, x| {
            *s += x;
            Some(s.abs())
        })
        .max()
        .unwrap_or(0)
}

/// NIST series for `P(max |S_k| >= z)`. The summation bounds use integer
/// division truncated toward zero, as in the NIST reference code.
fn p_value(n: i64, z: i64) -> f64 {
    let sqrt_n = (n as f64).sqrt();
    let term = |a: i64, k: i64| normal_cdf(((4 * k + a) * z) as f64 / sqrt_n);
    let upper = (n / z - 1) / 4;
    let sum1: f64 = ((-n / z + 1) / 4..=upper)
        .map(|k| term(1, k) - term(-1, k))
        .sum();
    let sum2: f64 = ((-n / z - 3) / 4..=upper)
        .map(|k| term(3, k) - term(1, k))
        .sum();
    1.0 - sum1 + sum2
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let n = bits.len() as i64;
    let z_forward = max_excursion(bits.iter().map(|&b| step(b)));
    let z_backward = max_excursion(bits.iter().rev().map(|&b| step(b)));
    let forward = p_value(n, z_forward);
    let backward = p_value(n, z_backward);
    Ok(Outcome::multiple(
        vec![forward, backward],
        info_map! {
            "max_excursion_forward" => z_forward,
            "max_excursion_backward" => z_backward,
            "p_value_forward" => forward,
            "p_value_backward" => backward,
        },
    ))
}
