//! Non-overlapping template matching test.

use crate::bits::check_sequence;
use crate::error::TestError;
use crate::info_map;
use crate::math::chi_square_sf;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "non_overlapping_template_matching";
pub const MIN_BITS: usize = 100;
pub const DEFAULT_TEMPLATE: &str = "000000001";

const MIN_TEMPLATE_LEN: usize = 2;
const MAX_TEMPLATE_LEN: usize = 10;
const MAX_BLOCKS: usize = 100;

/// Occurrences of an aperiodic template per block, skipping past each match.
pub fn non_overlapping_template_matching(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits, params))
}

fn evaluate(bits: &[u8], params: &TestParams) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let template = params.template_bits(DEFAULT_TEMPLATE)?;
    let m = template.len();
    if !(MIN_TEMPLATE_LEN..=MAX_TEMPLATE_LEN).contains(&m) {
        return Err(TestError::InvalidParameter(format!(
            "template length m={m} is outside {MIN_TEMPLATE_LEN}..={MAX_TEMPLATE_LEN} (m = 9 or 10 recommended)"
        )));
    }
    let n = bits.len();
    let block_size = (n / 100 + 1).max(m + 1);
    let blocks = (n / block_size).min(MAX_BLOCKS);
    if blocks == 0 {
        return Err(TestError::InvalidParameter(format!(
            "sequence too short for block size M={block_size}"
        )));
    }
    let occurrences: Vec<u64> = bits
        .chunks_exact(block_size)
        .take(blocks)
        .map(|block| count_matches(block, &template))
        .collect();
    let chi_square = statistic(&occurrences, block_size, m);
    let p = chi_square_sf(blocks as f64, chi_square)?;
    Ok(Outcome::single(
        p,
        info_map! {
            "number_of_blocks" => blocks,
            "block_size" => block_size,
            "template" => template.iter().map(|b| char::from(b'0' + b)).collect::<String>(),
            "template_occurrences" => occurrences,
            "chi_square" => chi_square,
        },
    ))
}

/// Matches of `template` in `block`, jumping past the window after each hit.
fn count_matches(block: &[u8], template: &[u8]) -> u64 {
    let m = template.len();
    let mut count = 0;
    let mut j = 0;
    while j + m <= block.len() {
        if &block[j..j + m] == template {
            count += 1;
            j += m;
        } else {
            j += 1;
        }
    }
    count
}

/// `sum (W_j - mu)^2 / sigma^2` with the theoretical mean and variance for
/// an `m`-bit template in `M`-bit blocks.
fn statistic(occurrences: &[u64], block_size: usize, m: usize) -> f64 {
    let two_m = 2f64.powi(m as i32);
    let mu = (block_size - m + 1) as f64 / two_m;
    let sigma2 = block_size as f64 * (1.0 / two_m - (2 * m - 1) as f64 / (two_m * two_m));
    occurrences
        .iter()
        .map(|&w| {
            let d = w as f64 - mu;
            d * d / sigma2
        })
        .sum()
}
