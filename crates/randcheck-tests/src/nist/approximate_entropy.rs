//! Approximate entropy test.

use crate::bits::{cyclic_pattern_counts, ensure_binary};
use crate::error::TestError;
use crate::info_map;
use crate::math::chi_square_sf_or_approx;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "entropy";
pub const DEFAULT_PATTERN_LENGTH: usize = 2;
/// Shortest sequence for which the default `m` satisfies `m < log2 n`.
/// Other pattern lengths need more than `2^m` bits.
pub const MIN_BITS: usize = (1 << DEFAULT_PATTERN_LENGTH) + 1;

/// Frequency of overlapping `m`- and `(m+1)`-bit patterns compared through
/// `ApEn(m) = phi(m) - phi(m+1)`.
pub fn approximate_entropy(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits, params))
}

/// `phi(m) = sum pi_i ln pi_i` over the cyclic `m`-bit pattern frequencies.
fn phi(bits: &[u8], m: usize) -> f64 {
    let n = bits.len() as f64;
    cyclic_pattern_counts(bits, m)
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            p * p.ln()
        })
        .sum()
}

fn evaluate(bits: &[u8], params: &TestParams) -> Result<Outcome, TestError> {
    ensure_binary(bits)?;
    let n = bits.len();
    let m = params.pattern_length.unwrap_or(DEFAULT_PATTERN_LENGTH);
    // m < log2(n) is 2^m < n
    let patterns = match u32::try_from(m).ok().and_then(|m| 1usize.checked_shl(m)) {
        Some(p) if m > 0 => p,
        _ => {
            return Err(TestError::InvalidParameter(format!(
                "pattern length m={m} must satisfy 0 < m < log2(n)"
            )));
        }
    };
    if n <= patterns {
        return Err(TestError::TooShort {
            needed: patterns + 1,
            got: n,
        });
    }
    let apen = phi(bits, m) - phi(bits, m + 1);
    let chi_square = 2.0 * n as f64 * (std::f64::consts::LN_2 - apen);
    let df = 2f64.powi(m as i32);
    let p = chi_square_sf_or_approx(df, chi_square);
    Ok(Outcome::single(
        p,
        info_map! {
            "pattern_length" => m,
            "approximate_entropy" => apen,
            "chi_square" => chi_square,
            "degrees_of_freedom" => df,
        },
    ))
}
