//! Random excursions test.

use crate::bits::{check_sequence, partial_sums};
use crate::error::TestError;
use crate::info_map;
use crate::math::{chi_square_sf, chi_square_statistic};
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "random_excursion";
/// Shortest sequence that can hold [`MIN_CYCLES`] cycles.
pub const MIN_BITS: usize = 2 * MIN_CYCLES - 1;
/// Fewer zero-crossing cycles than this make the chi-square unreliable.
pub const MIN_CYCLES: usize = 500;

const STATES: [i64; 8] = [-4, -3, -2, -1, 1, 2, 3, 4];

/// Visits to the states ±1..±4 per cycle of the random walk. The overall
/// p-value is the smallest of the eight per-state p-values.
pub fn random_excursions(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

/// Split the walk `S_1..S_n` into cycles. Each cycle ends at a return to
/// zero; a trailing excursion that never returns counts as a final cycle.
pub(crate) fn split_cycles(sums: &[i64]) -> Vec<&[i64]> {
    sums.split_inclusive(|&s| s == 0).collect()
}

/// Number of cycles `J` without materializing them.
pub(crate) fn cycle_count(sums: &[i64]) -> usize {
    let zeros = sums.iter().filter(|&&s| s == 0).count();
    match sums.last() {
        Some(&last) if last != 0 => zeros + 1,
        _ => zeros,
    }
}

/// Probability that a cycle visits state `x` exactly `k` times (`k = 5`
/// meaning five or more).
fn visit_probabilities(x: i64) -> [f64; 6] {
    let ax = x.unsigned_abs() as f64;
    let stay = 1.0 - 1.0 / (2.0 * ax);
    let mut pi = [0.0; 6];
    pi[0] = stay;
    for (k, p) in pi.iter_mut().enumerate().take(5).skip(1) {
        *p = 1.0 / (4.0 * ax * ax) * stay.powi(k as i32 - 1);
    }
    pi[5] = 1.0 / (2.0 * ax) * stay.powi(4);
    pi
}

/// Per-state `nu_k(x)`: number of cycles visiting `x` exactly `k` times.
fn visit_frequencies(cycles: &[&[i64]], x: i64) -> [u64; 6] {
    let mut nu = [0u64; 6];
    for cycle in cycles {
        let visits = cycle.iter().filter(|&&s| s == x).count();
        nu[visits.min(5)] += 1;
    }
    nu
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let sums = partial_sums(bits);
    let cycles = split_cycles(&sums);
    let j = cycles.len();
    if j < MIN_CYCLES {
        return Err(TestError::InsufficientCycles {
            found: j,
            needed: MIN_CYCLES,
        });
    }
    let mut per_state = serde_json::Map::new();
    let mut min_p = f64::INFINITY;
    for x in STATES {
        let nu = visit_frequencies(&cycles, x);
        let chi_square = chi_square_statistic(&nu, &visit_probabilities(x), j as f64);
        let p = chi_square_sf(5.0, chi_square)?;
        min_p = min_p.min(p);
        per_state.insert(x.to_string(), serde_json::json!(p));
    }
    Ok(Outcome::single(
        min_p,
        info_map! {
            "cycles" => j,
            "state_p_values" => per_state,
        },
    ))
}
