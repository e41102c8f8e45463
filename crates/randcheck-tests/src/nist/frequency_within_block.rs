//! Frequency test within a block.

use crate::bits::check_sequence;
use crate::error::TestError;
use crate::info_map;
use crate::math::chi_square_sf;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "block_frequency";
pub const MIN_BITS: usize = 100;

/// Smallest block length considered by the automatic selection.
const MIN_AUTO_BLOCK: usize = 20;
/// Upper bound on the number of blocks (N < 100).
const MAX_BLOCKS: usize = 100;

/// Proportion of ones in each of `N` non-overlapping `M`-bit blocks.
pub fn block_frequency(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits, params))
}

/// First `M` in `20..=n/2` with `M > n/100` and `n/M < 100`.
pub fn select_block_size(n: usize) -> Result<usize, TestError> {
    (MIN_AUTO_BLOCK..=n / 2)
        .find(|&m| m * 100 > n && n / m < MAX_BLOCKS)
        .ok_or(TestError::NoBlockSize { n })
}

fn evaluate(bits: &[u8], params: &TestParams) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let n = bits.len();
    let m = match params.block_size {
        Some(m) if m == 0 || m > n => {
            return Err(TestError::InvalidParameter(format!(
                "block_size={m} must satisfy 0 < M <= n ({n})"
            )));
        }
        Some(m) => m,
        None => select_block_size(n)?,
    };
    let (chi_square, blocks) = statistic(bits, m);
    let p = chi_square_sf(blocks as f64, chi_square)?;
    Ok(Outcome::single(
        p,
        info_map! {
            "block_size" => m,
            "blocks" => blocks,
            "chi_square" => chi_square,
        },
    ))
}

/// `chi^2 = 4M * sum (pi_i - 1/2)^2` over the complete blocks.
fn statistic(bits: &[u8], m: usize) -> (f64, usize) {
    let blocks = bits.len() / m;
    let chi = bits
        .chunks_exact(m)
        .map(|block| {
            let ones = block.iter().filter(|&&b| b == 1).count();
            let pi = ones as f64 / m as f64 - 0.5;
            pi * pi
        })
        .sum::<f64>()
        * 4.0
        * m as f64;
    (chi, blocks)
}
