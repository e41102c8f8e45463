//! Linear complexity test.

use crate::bits::check_sequence;
use crate::error::TestError;
use crate::gf2;
use crate::info_map;
use crate::math::{chi_square_sf, chi_square_statistic};
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "linear_complexity";
pub const DEFAULT_BLOCK_SIZE: usize = 500;
pub const MIN_BITS: usize = DEFAULT_BLOCK_SIZE;

/// NIST class probabilities for `T <= -2.5, ..., T > 2.5`.
const CLASS_PROBABILITIES: [f64; 7] = [0.010417, 0.03125, 0.125, 0.5, 0.25, 0.0625, 0.020833];

/// Berlekamp-Massey complexity of each `M`-bit block against its expectation.
pub fn linear_complexity(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits, params))
}

/// Theoretical mean complexity of a random `M`-bit block.
fn theoretical_mean(m: usize) -> f64 {
    let mf = m as f64;
    let sign = if m % 2 == 0 { -1.0 } else { 1.0 };
    mf / 2.0 + (9.0 + sign) / 36.0 - (mf / 3.0 + 2.0 / 9.0) * 0.5f64.powf(mf)
}

fn class_of(t: f64) -> usize {
    const EDGES: [f64; 6] = [-2.5, -1.5, -0.5, 0.5, 1.5, 2.5];
    EDGES.iter().position(|&edge| t <= edge).unwrap_or(EDGES.len())
}

fn evaluate(bits: &[u8], params: &TestParams) -> Result<Outcome, TestError> {
    let m = params.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
    if m == 0 {
        return Err(TestError::InvalidParameter(
            "block_size must be positive".to_string(),
        ));
    }
    check_sequence(bits, m)?;
    let mu = theoretical_mean(m);
    let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
    let mut frequencies = [0u64; 7];
    let mut blocks = 0usize;
    for block in bits.chunks_exact(m) {
        let l = gf2::linear_complexity(block) as f64;
        let t = sign * (l - mu) + 2.0 / 9.0;
        frequencies[class_of(t)] += 1;
        blocks += 1;
    }
    let chi_square = chi_square_statistic(&frequencies, &CLASS_PROBABILITIES, blocks as f64);
    let p = chi_square_sf(6.0, chi_square)?;
    Ok(Outcome::single(
        p,
        info_map! {
            "block_size" => m,
            "number_of_blocks" => blocks,
            "theoretical_mean" => mu,
            "chi_square" => chi_square,
            "frequency_count" => frequencies,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nist::testutil::pseudo_random_bits;
    use crate::policy::TestStatus;

    #[test]
    fn test_theoretical_mean() {
        // M/2 + 8/36 for even M once 2^-M vanishes
        assert!((theoretical_mean(500) - (250.0 + 8.0 / 36.0)).abs() < 1e-9);
        assert!((theoretical_mean(13) - 6.777222).abs() < 1e-5);
    }

    #[test]
    fn test_class_edges() {
        assert_eq!(class_of(-3.0), 0);
        assert_eq!(class_of(-2.5), 0);
        assert_eq!(class_of(-2.0), 1);
        assert_eq!(class_of(0.0), 3);
        assert_eq!(class_of(0.6), 4);
        assert_eq!(class_of(2.6), 6);
    }

    #[test]
    fn test_random_blocks() {
        let record = linear_complexity(&pseudo_random_bits(100_000, 21), &TestParams::default());
        assert!(!record.error, "{}", record.message);
        let info = record.additional_info.unwrap();
        assert_eq!(info["number_of_blocks"], 200);
    }

    #[test]
    fn test_low_complexity_fails() {
        // period-7 sequence: every block has complexity at most 7
        let bits: Vec<u8> = (0..50_000).map(|i| [1, 1, 1, 0, 1, 0, 0][i % 7]).collect();
        let record = linear_complexity(&bits, &TestParams::default());
        assert_eq!(record.test_status, TestStatus::Failed);
    }

    #[test]
    fn test_block_size_validation() {
        let bits = pseudo_random_bits(1000, 1);
        let zero = TestParams {
            block_size: Some(0),
            ..Default::default()
        };
        assert!(linear_complexity(&bits, &zero).error);
        let too_big = TestParams {
            block_size: Some(1001),
            ..Default::default()
        };
        assert!(linear_complexity(&bits, &too_big).error);
    }
}
