//! Discrete Fourier transform (spectral) test.

use rustfft::{FftPlanner, num_complex::Complex};

use crate::bits::{check_sequence, step};
use crate::error::TestError;
use crate::info_map;
use crate::math::erfc;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "dft_spectral";
pub const MIN_BITS: usize = 100;

/// Periodic features: fraction of the half-spectrum below the 95% peak
/// height threshold `T = sqrt(ln(1/0.05) * n)`.
pub fn dft_spectral(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let n = bits.len();

    let mut buffer: Vec<Complex<f64>> = bits
        .iter()
        .map(|&b| Complex {
            re: step(b) as f64,
            im: 0.0,
        })
        .collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let threshold = ((1.0f64 / 0.05).ln() * n as f64).sqrt();
    let n0 = 0.95 * n as f64 / 2.0;
    let n1 = buffer[..n / 2]
        .iter()
        .filter(|c| c.norm() < threshold)
        .count();
    let d = (n1 as f64 - n0) / (n as f64 * 0.95 * 0.05 / 4.0).sqrt();
    let p = erfc(d.abs() / std::f64::consts::SQRT_2);
    Ok(Outcome::single(
        p,
        info_map! {
            "threshold" => threshold,
            "expected_peaks" => n0,
            "observed_peaks" => n1,
            "d" => d,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nist::testutil::{PI_100, parse_bits, pseudo_random_bits};
    use crate::policy::{PValue, TestStatus};

    #[test]
    fn test_nist_pi_example() {
        // NIST SP 800-22 section 2.6.8
        let record = dft_spectral(&parse_bits(PI_100), &TestParams::default());
        let Some(PValue::Single(p)) = record.p_value else {
            panic!("expected single p-value, got {record:?}");
        };
        assert!((p - 0.646355).abs() < 1e-6, "p={p}");
        assert_eq!(record.additional_info.unwrap()["observed_peaks"], 48);
    }

    #[test]
    fn test_odd_length() {
        let record = dft_spectral(&pseudo_random_bits(1001, 8), &TestParams::default());
        assert!(!record.error);
    }

    #[test]
    fn test_periodic_sequence_fails() {
        let bits: Vec<u8> = (0..4096).map(|i| u8::from(i % 16 < 8)).collect();
        let record = dft_spectral(&bits, &TestParams::default());
        assert_eq!(record.test_status, TestStatus::Failed);
    }
}
