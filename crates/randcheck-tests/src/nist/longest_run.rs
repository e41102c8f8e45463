//! Test for the longest run of ones in a block.

use crate::bits::check_sequence;
use crate::error::TestError;
use crate::info_map;
use crate::math::{chi_square_sf, chi_square_statistic};
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "longest_runs";
pub const MIN_BITS: usize = 128;

/// Block size, bucket range and bucket probabilities for one length regime.
struct Tier {
    /// Sequences shorter than this use the tier.
    below: usize,
    block_size: usize,
    /// Longest runs `<= shortest` share the first bucket.
    shortest: usize,
    /// Longest runs `>= longest` share the last bucket.
    longest: usize,
    probabilities: &'static [f64],
}

static TIERS: [Tier; 3] = [
    Tier {
        below: 6272,
        block_size: 8,
        shortest: 1,
        longest: 4,
        probabilities: &[0.2148, 0.3672, 0.2305, 0.1875],
    },
    Tier {
        below: 750_000,
        block_size: 128,
        shortest: 4,
        longest: 9,
        probabilities: &[0.1174, 0.2430, 0.2493, 0.1752, 0.1027, 0.1124],
    },
    Tier {
        below: usize::MAX,
        block_size: 10_000,
        shortest: 10,
        longest: 16,
        probabilities: &[0.0882, 0.2092, 0.2483, 0.1933, 0.1208, 0.0675, 0.0727],
    },
];

/// Longest run of ones in each `M`-bit block, bucketed against NIST's table.
pub fn longest_runs(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

fn tier_for(n: usize) -> &'static Tier {
    TIERS
        .iter()
        .find(|t| n < t.below)
        .unwrap_or(&TIERS[TIERS.len() - 1])
}

fn longest_run(block: &[u8]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &b in block {
        if b == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let tier = tier_for(bits.len());
    let k = tier.probabilities.len() - 1;
    let mut frequencies = vec![0u64; k + 1];
    let mut longest_run_max = 0;
    let mut blocks = 0usize;
    for block in bits.chunks_exact(tier.block_size) {
        let run = longest_run(block);
        longest_run_max = longest_run_max.max(run);
        let bucket = run.clamp(tier.shortest, tier.longest) - tier.shortest;
        frequencies[bucket] += 1;
        blocks += 1;
    }
    let chi_square = chi_square_statistic(&frequencies, tier.probabilities, blocks as f64);
    let p = chi_square_sf(k as f64, chi_square)?;
    Ok(Outcome::single(
        p,
        info_map! {
            "block_size" => tier.block_size,
            "blocks" => blocks,
            "degrees_of_freedom" => k,
            "frequencies" => frequencies,
            "chi_square" => chi_square,
            "longest_run_max" => longest_run_max,
        },
    ))
}
