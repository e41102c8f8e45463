//! Linear complexity attack over the whole sequence.

use crate::bits::ensure_binary;
use crate::error::TestError;
use crate::gf2;
use crate::info_map;
use crate::nist::{Outcome, conclude};
use crate::params::TestParams;
use crate::record::TestRecord;

pub const NAME: &str = "berlekamp_massey";
/// Any length works; the empty sequence has linear complexity 0.
pub const MIN_BITS: usize = 0;

/// Synthesize the shortest LFSR generating `bits` and report its length and
/// connection polynomial. Always `attack_success` when it runs.
pub fn berlekamp_massey(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    ensure_binary(bits)?;
    let synthesis = gf2::berlekamp_massey(bits);
    log::debug!(
        "{NAME}: linear complexity {} over {} bits",
        synthesis.linear_complexity,
        bits.len()
    );
    Ok(Outcome::Attack {
        info: info_map! {
            "linear_complexity" => synthesis.linear_complexity,
            "polynomial" => synthesis.polynomial(),
            "coefficients" => synthesis.connection,
        },
    })
}
