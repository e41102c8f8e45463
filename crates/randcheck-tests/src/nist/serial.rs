//! Serial test.

use crate::bits::{check_sequence, cyclic_pattern_counts};
use crate::error::TestError;
use crate::info_map;
use crate::math::chi_square_sf;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "serial";
pub const MIN_BITS: usize = 100;
pub const DEFAULT_PATTERN_LENGTH: usize = 3;

/// Frequency of every overlapping `m`-bit pattern, compared through the first
/// and second differences of `psi^2`. Reports two p-values.
pub fn serial(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits, params))
}

/// `psi^2_m = 2^m / n * sum(count^2) - n`, zero for `m == 0`.
fn psi_squared(bits: &[u8], m: usize) -> f64 {
    if m == 0 {
        return 0.0;
    }
    let n = bits.len() as f64;
    let sum_sq: f64 = cyclic_pattern_counts(bits, m)
        .iter()
        .map(|&c| (c as f64) * (c as f64))
        .sum();
    2f64.powi(m as i32) / n * sum_sq - n
}

/// `(nabla psi^2, nabla^2 psi^2)` for pattern length `m >= 2`.
fn deltas(bits: &[u8], m: usize) -> (f64, f64) {
    let psi_m = psi_squared(bits, m);
    let psi_m1 = psi_squared(bits, m - 1);
    let psi_m2 = psi_squared(bits, m - 2);
    (psi_m - psi_m1, psi_m - 2.0 * psi_m1 + psi_m2)
}

fn evaluate(bits: &[u8], params: &TestParams) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let m = params.pattern_length.unwrap_or(DEFAULT_PATTERN_LENGTH);
    let max_m = (bits.len().ilog2() as usize).saturating_sub(2);
    if m < 2 || m >= max_m {
        return Err(TestError::InvalidParameter(format!(
            "pattern length m={m} must satisfy 2 <= m < {max_m} for {} bits",
            bits.len()
        )));
    }
    let (del1, del2) = deltas(bits, m);
    let p1 = chi_square_sf(2f64.powi(m as i32 - 1), del1)?;
    let p2 = chi_square_sf(2f64.powi(m as i32 - 2), del2)?;
    Ok(Outcome::multiple(
        vec![p1, p2],
        info_map! {
            "pattern_length" => m,
            "delta_psi_squared" => del1,
            "delta2_psi_squared" => del2,
            "p_value_1" => p1,
            "p_value_2" => p2,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nist::testutil::{parse_bits, pseudo_random_bits};
    use crate::policy::{PValue, TestStatus};

    #[test]
    fn test_nist_example() {
        // NIST SP 800-22 section 2.11.4: epsilon = 0011011101, m = 3
        let bits = parse_bits("0011011101");
        assert!((psi_squared(&bits, 3) - 2.8).abs() < 1e-9);
        assert!((psi_squared(&bits, 2) - 1.2).abs() < 1e-9);
        assert!((psi_squared(&bits, 1) - 0.4).abs() < 1e-9);
        let (del1, del2) = deltas(&bits, 3);
        assert!((del1 - 1.6).abs() < 1e-9);
        assert!((del2 - 0.8).abs() < 1e-9);
        let p1 = chi_square_sf(4.0, del1).unwrap();
        let p2 = chi_square_sf(2.0, del2).unwrap();
        assert!((p1 - 0.808792).abs() < 1e-6, "p1={p1}");
        assert!((p2 - 0.670320).abs() < 1e-6, "p2={p2}");
    }

    #[test]
    fn test_two_p_values() {
        let record = serial(&pseudo_random_bits(10_000, 4), &TestParams::default());
        match record.p_value {
            Some(PValue::Multiple(ref ps)) => assert_eq!(ps.len(), 2),
            _ => panic!("expected two p-values, got {record:?}"),
        }
    }

    #[test]
    fn test_periodic_sequence_fails() {
        let bits: Vec<u8> = (0..4096).map(|i| u8::from(i % 4 < 2)).collect();
        let record = serial(&bits, &TestParams::default());
        assert_eq!(record.test_status, TestStatus::Failed);
    }

    #[test]
    fn test_pattern_length_bounds() {
        let bits = pseudo_random_bits(128, 4);
        // floor(log2 128) - 2 = 5
        for m in [1, 5] {
            let params = TestParams {
                pattern_length: Some(m),
                ..Default::default()
            };
            assert!(serial(&bits, &params).error, "m={m}");
        }
        let params = TestParams {
            pattern_length: Some(4),
            ..Default::default()
        };
        assert!(!serial(&bits, &params).error);
    }
}
