//! Frequency (monobit) test.

use crate::bits::{check_sequence, step};
use crate::error::TestError;
use crate::info_map;
use crate::math::erfc;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "frequency_monobit";
pub const MIN_BITS: usize = 100;

/// Proportion of ones against one half: `p = erfc(|S_n| / sqrt(2n))`.
pub fn frequency_monobit(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let n = bits.len();
    let sum: i64 = bits.iter().map(|&b| step(b)).sum();
    let s_obs = sum.unsigned_abs() as f64 / (n as f64).sqrt();
    let p = erfc(s_obs / std::f64::consts::SQRT_2);
    let ones = bits.iter().filter(|&&b| b == 1).count();
    Ok(Outcome::single(
        p,
        info_map! {
            "n" => n,
            "sum" => sum,
            "s_obs" => s_obs,
            "ones" => ones,
            "zeros" => n - ones,
        },
    ))
}
