//! Maurer's "universal statistical" test.

use crate::bits::check_sequence;
use crate::error::TestError;
use crate::info_map;
use crate::math::erfc;
use crate::params::TestParams;
use crate::record::TestRecord;

use super::{Outcome, conclude};

pub const NAME: &str = "maurer";
pub const MIN_BITS: usize = 387_840;

/// Parameters for sequences of at least `min_len` bits.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MaurerParams {
    min_len: usize,
    /// Block length L.
    block_len: usize,
    /// Initialization blocks Q.
    init_blocks: usize,
    expected: f64,
    variance: f64,
}

const fn row(
    min_len: usize,
    block_len: usize,
    init_blocks: usize,
    expected: f64,
    variance: f64,
) -> MaurerParams {
    MaurerParams {
        min_len,
        block_len,
        init_blocks,
        expected,
        variance,
    }
}

/// NIST table, longest qualifying length first.
static PARAMS: [MaurerParams; 11] = [
    row(1_059_061_760, 16, 655_360, 15.167379, 3.421),
    row(496_435_200, 15, 327_680, 14.167488, 3.419),
    row(231_669_760, 14, 163_840, 13.167693, 3.416),
    row(107_560_960, 13, 81_920, 12.168070, 3.410),
    row(49_643_520, 12, 40_960, 11.168765, 3.401),
    row(22_753_280, 11, 20_480, 10.170032, 3.384),
    row(10_342_400, 10, 10_240, 9.1723243, 3.356),
    row(4_654_080, 9, 5_120, 8.1764248, 3.311),
    row(2_068_480, 8, 2_560, 7.1836656, 3.238),
    row(904_960, 7, 1_280, 6.1962507, 3.125),
    row(387_840, 6, 640, 5.2177052, 2.954),
];

/// Compressibility measured through the distance between repeated L-bit blocks.
pub fn maurer(bits: &[u8], params: &TestParams) -> TestRecord {
    conclude(NAME, params, || evaluate(bits))
}

fn params_for(n: usize) -> Option<&'static MaurerParams> {
    PARAMS.iter().find(|p| n >= p.min_len)
}

fn block_value(bits: &[u8]) -> usize {
    bits.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize)
}

/// `f_n`: mean `log2` distance to the previous occurrence of each test-segment
/// block. A block never seen before counts its own (1-based) index.
fn statistic(bits: &[u8], block_len: usize, init_blocks: usize) -> (f64, usize) {
    let total = bits.len() / block_len;
    let test_blocks = total.saturating_sub(init_blocks);
    let mut last_seen = vec![0usize; 1 << block_len];
    for (i, block) in bits.chunks_exact(block_len).take(init_blocks).enumerate() {
        last_seen[block_value(block)] = i + 1;
    }
    let mut sum = 0.0;
    for (i, block) in bits
        .chunks_exact(block_len)
        .enumerate()
        .skip(init_blocks)
        .take(test_blocks)
    {
        let v = block_value(block);
        let distance = i + 1 - last_seen[v];
        sum += (distance as f64).log2();
        last_seen[v] = i + 1;
    }
    if test_blocks == 0 {
        (0.0, 0)
    } else {
        (sum / test_blocks as f64, test_blocks)
    }
}

fn evaluate(bits: &[u8]) -> Result<Outcome, TestError> {
    check_sequence(bits, MIN_BITS)?;
    let table = params_for(bits.len()).ok_or_else(|| {
        TestError::Computation(format!("no Maurer parameters for {} bits", bits.len()))
    })?;
    let l = table.block_len;
    let (fn_value, k) = statistic(bits, l, table.init_blocks);
    if k == 0 {
        return Err(TestError::InvalidParameter(
            "no blocks left for the test segment (K must be positive)".to_string(),
        ));
    }
    let lf = l as f64;
    let kf = k as f64;
    let c = 0.7 - 0.8 / lf + (4.0 + 32.0 / lf) * kf.powf(-3.0 / lf) / 15.0;
    let sigma = c * (table.variance / kf).sqrt();
    let p = erfc((fn_value - table.expected).abs() / (std::f64::consts::SQRT_2 * sigma));
    Ok(Outcome::single(
        p,
        info_map! {
            "block_length" => l,
            "init_blocks" => table.init_blocks,
            "test_blocks" => k,
            "fn" => fn_value,
            "expected" => table.expected,
            "sigma" => sigma,
        },
    ))
}
