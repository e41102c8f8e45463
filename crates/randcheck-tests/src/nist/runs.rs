//! Runs test.

use crate::bits::check_sequence;
use crate::error::TestError;
use crate::info_map;
use crate::math::erfc;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "runs";
pub const MIN_BITS: usize = 100;

/// Total number of uninterrupted runs of identical bits.
pub fn runs(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let n = bits.len() as f64;
    let pi = bits.iter().filter(|&&b| b == 1).count() as f64 / n;
    let tau = 2.0 / n.sqrt();
    if (pi - 0.5).abs() >= tau {
        return Err(TestError::Prerequisite(format!(
            "proportion of ones {pi:.6} is too far from 1/2 (|pi - 0.5| >= {tau:.6})"
        )));
    }
    let runs = count_runs(bits);
    Ok(Outcome::single(
        p_value(runs, n, pi),
        info_map! {
            "runs" => runs,
            "proportion_of_ones" => pi,
            "expected_runs" => 2.0 * n * pi * (1.0 - pi),
        },
    ))
}

/// `V_n(obs)`: one plus the number of transitions.
fn count_runs(bits: &[u8]) -> usize {
    1 + bits.windows(2).filter(|w| w[0] != w[1]).count()
}

fn p_value(runs: usize, n: f64, pi: f64) -> f64 {
    let spread = pi * (1.0 - pi);
    erfc((runs as f64 - 2.0 * n * spread).abs() / (2.0 * (2.0 * n).sqrt() * spread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nist::testutil::{PI_100, parse_bits};
    use crate::policy::{PValue, TestStatus};

    #[test]
    fn test_nist_small_example() {
        // NIST SP 800-22 section 2.3.4: epsilon = 1001101011
        let bits = parse_bits("1001101011");
        assert_eq!(count_runs(&bits), 7);
        let p = p_value(7, 10.0, 0.6);
        assert!((p - 0.147232).abs() < 1e-6, "p={p}");
    }

    #[test]
    fn test_nist_pi_example() {
        let record = runs(&parse_bits(PI_100), &TestParams::default());
        let Some(PValue::Single(p)) = record.p_value else {
            panic!("expected single p-value, got {record:?}");
        };
        assert!((p - 0.500798).abs() < 1e-6, "p={p}");
    }

    #[test]
    fn test_alternating_has_maximum_runs() {
        let bits: Vec<u8> = (0..128).map(|i| (i % 2) as u8).collect();
        let record = runs(&bits, &TestParams::default());
        assert_eq!(record.test_status, TestStatus::Failed);
        let info = record.additional_info.unwrap();
        assert_eq!(info["runs"], 128);
    }

    #[test]
    fn test_prerequisite_rejects_biased_sequence() {
        let mut bits = vec![1u8; 200];
        bits[0] = 0;
        let record = runs(&bits, &TestParams::default());
        assert!(record.error);
        assert!(record.message.contains("proportion of ones"));
    }
}
