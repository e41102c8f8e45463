//! Binary matrix rank test.

use crate::bits::check_sequence;
use crate::error::TestError;
use crate::gf2;
use crate::info_map;
use crate::math::{chi_square_sf, chi_square_statistic};
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "binary_matrix_rank";

const ROWS: usize = 32;
const COLS: usize = 32;
pub const MIN_BITS: usize = 38 * ROWS * COLS;

/// Probability of rank 32, 31 and below for a random 32x32 matrix over GF(2).
const RANK_PROBABILITIES: [f64; 3] = [0.2888, 0.5776, 0.1336];

/// Rank of disjoint 32x32 sub-matrices, bucketed into full, full - 1 and lower.
pub fn binary_matrix_rank(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let counts = rank_counts(bits);
    let matrices = counts.iter().sum::<u64>();
    let chi_square = chi_square_statistic(&counts, &RANK_PROBABILITIES, matrices as f64);
    let p = chi_square_sf(2.0, chi_square)?;
    Ok(Outcome::single(
        p,
        info_map! {
            "matrices_count" => matrices,
            "full_rank_count" => counts[0],
            "full_rank_minus_one_count" => counts[1],
            "lower_rank_count" => counts[2],
            "chi_square" => chi_square,
            "matrix_dimensions" => format!("{ROWS}x{COLS}"),
        },
    ))
}

/// `[F_32, F_31, rest]` over every complete matrix.
fn rank_counts(bits: &[u8]) -> [u64; 3] {
    let mut counts = [0u64; 3];
    for block in bits.chunks_exact(ROWS * COLS) {
        let mut rows = gf2::pack_rows(block, ROWS, COLS);
        let bucket = match gf2::rank(&mut rows, COLS) {
            r if r == ROWS => 0,
            r if r == ROWS - 1 => 1,
            _ => 2,
        };
        counts[bucket] += 1;
    }
    counts
}
