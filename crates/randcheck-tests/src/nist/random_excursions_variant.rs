//! Random excursions variant test.

use crate::bits::{check_sequence, partial_sums};
use crate::error::TestError;
use crate::info_map;
use crate::math::erfc;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::random_excursions::{MIN_CYCLES, cycle_count};
use super::{Outcome, conclude};

pub const NAME: &str = "random_excursion_variant";
pub const MIN_BITS: usize = 1_000_000;

/// States -9..=-1, 1..=9.
fn states() -> impl Iterator<Item = i64> {
    (-9..=9).filter(|&x| x != 0)
}

/// Total visits to each of the states ±1..±9 across the whole walk, one
/// p-value per state.
pub fn random_excursions_variant(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

/// `erfc(|xi - J| / sqrt(2J(4|x| - 2)))`.
fn state_p_value(visits: usize, cycles: usize, x: i64) -> f64 {
    let j = cycles as f64;
    let denom = (2.0 * j * (4.0 * x.unsigned_abs() as f64 - 2.0)).sqrt();
    erfc((visits as f64 - j).abs() / denom)
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let sums = partial_sums(bits);
    let j = cycle_count(&sums);
    if j < MIN_CYCLES {
        return Err(TestError::InsufficientCycles {
            found: j,
            needed: MIN_CYCLES,
        });
    }
    let mut p_values = Vec::with_capacity(18);
    let mut per_state = serde_json::Map::new();
    for x in states() {
        let visits = sums.iter().filter(|&&s| s == x).count();
        let p = state_p_value(visits, j, x);
        p_values.push(p);
        per_state.insert(
            x.to_string(),
            serde_json::json!({ "visits": visits, "p_value": p }),
        );
    }
    Ok(Outcome::multiple(
        p_values,
        info_map! {
            "cycles" => j,
            "states" => per_state,
        },
    ))
}
