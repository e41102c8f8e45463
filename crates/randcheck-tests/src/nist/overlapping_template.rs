//! Overlapping template matching test.

use crate::bits::check_sequence;
use crate::error::TestError;
use crate::info_map;
use crate::math::{chi_square_sf, chi_square_statistic, poisson_pmf};
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "overlapping_template_matching";
pub const MIN_BITS: usize = 1000;
pub const DEFAULT_TEMPLATE: &str = "111111111";

const BLOCK_SIZE: usize = 1032;
/// Occurrence buckets 0..K, the last one holding `>= K`.
const K: usize = 5;
const MAX_TEMPLATE_LEN: usize = 21;

/// NIST probabilities for the nine-ones template with M = 1032.
const DEFAULT_PROBABILITIES: [f64; K + 1] =
    [0.364091, 0.185659, 0.139381, 0.100571, 0.0704323, 0.139865];

/// Overlapping occurrences of a template per 1032-bit block.
pub fn overlapping_template_matching(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits, params))
}

/// Bucket probabilities for a template of length `m`. The nine-ones template
/// uses NIST's exact table; any other template uses a Poisson approximation
/// with mean `eta = lambda / 2`.
fn bucket_probabilities(template: &[u8]) -> Result<Vec<f64>, TestError> {
    if template.len() == 9 && template.iter().all(|&b| b == 1) {
        return Ok(DEFAULT_PROBABILITIES.to_vec());
    }
    let eta = lambda(template.len()) / 2.0;
    let mut probs = (0..K as u64)
        .map(|i| poisson_pmf(eta, i))
        .collect::<Result<Vec<_>, _>>()?;
    let tail = 1.0 - probs.iter().sum::<f64>();
    probs.push(tail.max(0.0));
    Ok(probs)
}

fn lambda(m: usize) -> f64 {
    (BLOCK_SIZE - m + 1) as f64 / 2f64.powi(m as i32)
}

fn count_overlapping(block: &[u8], template: &[u8]) -> usize {
    block.windows(template.len()).filter(|w| *w == template).count()
}

fn evaluate(bits: &[u8], params: &TestParams) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let template = params.template_bits(DEFAULT_TEMPLATE)?;
    let m = template.len();
    if m > MAX_TEMPLATE_LEN {
        return Err(TestError::InvalidParameter(format!(
            "template length m={m} exceeds {MAX_TEMPLATE_LEN}"
        )));
    }
    let blocks = bits.len() / BLOCK_SIZE;
    if blocks == 0 {
        return Err(TestError::InvalidParameter(format!(
            "sequence too short for blocks of {BLOCK_SIZE} bits"
        )));
    }
    let probs = bucket_probabilities(&template)?;
    let mut frequencies = vec![0u64; K + 1];
    for block in bits.chunks_exact(BLOCK_SIZE) {
        frequencies[count_overlapping(block, &template).min(K)] += 1;
    }
    let chi_square = chi_square_statistic(&frequencies, &probs, blocks as f64);
    let p = chi_square_sf(K as f64, chi_square)?;
    let lambda = lambda(m);
    Ok(Outcome::single(
        p,
        info_map! {
            "chi_squared" => chi_square,
            "template" => template,
            "template_length" => m,
            "block_size" => BLOCK_SIZE,
            "num_blocks" => blocks,
            "frequencies" => frequencies,
            "expected_frequencies" => probs.iter().map(|p| p * blocks as f64).collect::<Vec<_>>(),
            "lambda" => lambda,
            "eta" => lambda / 2.0,
        },
    ))
}
