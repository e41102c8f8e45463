//! Bit-packed linear algebra over GF(2): matrix rank and Berlekamp-Massey.
//!
//! Everything here is exclusive-or on machine words, so results are exact.

/// Rank of a binary matrix whose rows are packed into the low `cols` bits of
/// each `u64` (column 0 is the most significant of those bits). `rows` is used
/// as scratch space.
pub fn rank(rows: &mut [u64], cols: usize) -> usize {
    debug_assert!(cols <= 64);
    let mut rank = 0;
    for col in 0..cols {
        if rank == rows.len() {
            break;
        }
        let bit = 1u64 << (cols - 1 - col);
        let Some(pivot) = (rank..rows.len()).find(|&r| rows[r] & bit != 0) else {
            continue;
        };
        rows.swap(rank, pivot);
        let pivot_row = rows[rank];
        for (r, row) in rows.iter_mut().enumerate() {
            if r != rank && *row & bit != 0 {
                *row ^= pivot_row;
            }
        }
        rank += 1;
    }
    rank
}

/// Pack `rows * cols` bits (row-major, values 0/1) into one word per row.
pub fn pack_rows(bits: &[u8], rows: usize, cols: usize) -> Vec<u64> {
    (0..rows)
        .map(|r| {
            bits[r * cols..(r + 1) * cols]
                .iter()
                .fold(0u64, |acc, &b| (acc << 1) | u64::from(b & 1))
        })
        .collect()
}

/// Shortest LFSR generating a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfsrSynthesis {
    /// Length of the register (linear complexity).
    pub linear_complexity: usize,
    /// Connection polynomial coefficients c_0..c_d (c_0 = 1), trailing zeros removed.
    pub connection: Vec<u8>,
}

impl LfsrSynthesis {
    /// Render the connection polynomial as `1 + x + x^3`.
    pub fn polynomial(&self) -> String {
        let terms: Vec<String> = self
            .connection
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 1)
            .map(|(i, _)| match i {
                0 => "1".to_string(),
                1 => "x".to_string(),
                _ => format!("x^{i}"),
            })
            .collect();
        if terms.is_empty() {
            "0".to_string()
        } else {
            terms.join(" + ")
        }
    }
}

/// Bits `start..start+64` of a packed bit vector, zero past the end.
#[inline]
fn window(words: &[u64], start: usize) -> u64 {
    let idx = start / 64;
    let shift = start % 64;
    let lo = words.get(idx).copied().unwrap_or(0);
    if shift == 0 {
        lo
    } else {
        let hi = words.get(idx + 1).copied().unwrap_or(0);
        (lo >> shift) | (hi << (64 - shift))
    }
}

/// `dst ^= src << shift`, truncated to the length of `dst`.
#[inline]
fn xor_shifted(dst: &mut [u64], src: &[u64], shift: usize) {
    let word_shift = shift / 64;
    let bit_shift = shift % 64;
    for (i, &w) in src.iter().enumerate() {
        if w == 0 {
            continue;
        }
        let lo = i + word_shift;
        if lo >= dst.len() {
            break;
        }
        dst[lo] ^= w << bit_shift;
        if bit_shift != 0 && lo + 1 < dst.len() {
            dst[lo + 1] ^= w >> (64 - bit_shift);
        }
    }
}

/// Berlekamp-Massey synthesis over GF(2).
///
/// The sequence is stored reversed so that the discrepancy
/// `s_k + c_1 s_{k-1} + ... + c_L s_{k-L}` becomes the parity of
/// `C & window(reversed, n-1-k)`, computed a word at a time.
pub fn berlekamp_massey(seq: &[u8]) -> LfsrSynthesis {
    let n = seq.len();
    let words = n / 64 + 1;
    let mut reversed = vec![0u64; words];
    for (k, &b) in seq.iter().enumerate() {
        if b & 1 == 1 {
            let j = n - 1 - k;
            reversed[j / 64] |= 1u64 << (j % 64);
        }
    }

    let mut c = vec![0u64; words];
    let mut b = vec![0u64; words];
    c[0] = 1;
    b[0] = 1;
    let mut l: usize = 0;
    let mut m: isize = -1;

    for k in 0..n {
        let offset = n - 1 - k;
        let mut acc = 0u64;
        for (w, &cw) in c.iter().enumerate().take(l / 64 + 1) {
            acc ^= cw & window(&reversed, offset + 64 * w);
        }
        if acc.count_ones() & 1 == 1 {
            let shift = (k as isize - m) as usize;
            if 2 * l <= k {
                let t = c.clone();
                xor_shifted(&mut c, &b, shift);
                l = k + 1 - l;
                m = k as isize;
                b = t;
            } else {
                xor_shifted(&mut c, &b, shift);
            }
        }
    }

    let mut connection: Vec<u8> = (0..=l)
        .map(|i| ((c[i / 64] >> (i % 64)) & 1) as u8)
        .collect();
    while connection.len() > 1 && connection.last() == Some(&0) {
        connection.pop();
    }
    LfsrSynthesis {
        linear_complexity: l,
        connection,
    }
}

/// Linear complexity only.
pub fn linear_complexity(seq: &[u8]) -> usize {
    berlekamp_massey(seq).linear_complexity
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference bit-at-a-time Berlekamp-Massey.
    fn naive_bm(seq: &[u8]) -> usize {
        let n = seq.len();
        let mut c = vec![0u8; n + 1];
        let mut b = vec![0u8; n + 1];
        c[0] = 1;
        b[0] = 1;
        let mut l = 0usize;
        let mut m: isize = -1;
        for k in 0..n {
            let mut d = seq[k];
            for i in 1..=l {
                d ^= c[i] & seq[k - i];
            }
            if d == 1 {
                let t = c.clone();
                let shift = (k as isize - m) as usize;
                for i in shift..=n {
                    c[i] ^= b[i - shift];
                }
                if 2 * l <= k {
                    l = k + 1 - l;
                    m = k as isize;
                    b = t;
                }
            }
        }
        l
    }

    fn lcg_bits(n: usize, mut state: u64) -> Vec<u8> {
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) & 1) as u8
            })
            .collect()
    }

    #[test]
    fn test_rank_identity_and_zero() {
        let mut identity: Vec<u64> = (0..32).map(|i| 1u64 << i).collect();
        assert_eq!(rank(&mut identity, 32), 32);
        let mut zero = vec![0u64; 32];
        assert_eq!(rank(&mut zero, 32), 0);
    }

    #[test]
    fn test_rank_duplicate_rows() {
        let mut rows = vec![0b101u64, 0b101, 0b011];
        assert_eq!(rank(&mut rows, 3), 2);
        // NIST SP 800-22 example: 3x3 matrix of rank 2
        let mut rows = pack_rows(&[0, 1, 0, 1, 1, 0, 0, 1, 0], 3, 3);
        assert_eq!(rank(&mut rows, 3), 2);
    }

    #[test]
    fn test_pack_rows() {
        assert_eq!(pack_rows(&[1, 0, 1, 0, 1, 1], 2, 3), vec![0b101, 0b011]);
    }

    #[test]
    fn test_bm_nist_example() {
        // NIST SP 800-22 section 2.10.8: 1101011110001 has complexity 4
        let seq = [1, 1, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1];
        assert_eq!(linear_complexity(&seq), 4);
    }

    #[test]
    fn test_bm_trivial_sequences() {
        assert_eq!(linear_complexity(&[]), 0);
        assert_eq!(linear_complexity(&[0; 100]), 0);
        let mut seq = vec![0u8; 99];
        seq.push(1);
        assert_eq!(linear_complexity(&seq), 100);
        let ones = berlekamp_massey(&[1; 70]);
        assert_eq!(ones.linear_complexity, 1);
        assert_eq!(ones.connection, vec![1, 1]);
    }

    #[test]
    fn test_bm_matches_naive_across_word_boundaries() {
        for (len, seed) in [(63, 1u64), (64, 2), (65, 3), (200, 4), (500, 5)] {
            let seq = lcg_bits(len, seed);
            assert_eq!(linear_complexity(&seq), naive_bm(&seq), "len={len}");
        }
    }

    #[test]
    fn test_bm_recovers_lfsr() {
        // s_k = s_{k-2} ^ s_{k-5}, connection polynomial 1 + x^2 + x^5 (primitive)
        let mut seq = vec![1u8, 0, 0, 0, 0];
        for k in 5..62 {
            let next = seq[k - 2] ^ seq[k - 5];
            seq.push(next);
        }
        let synth = berlekamp_massey(&seq);
        assert_eq!(synth.linear_complexity, 5);
        assert_eq!(synth.connection, vec![1, 0, 1, 0, 0, 1]);
        assert_eq!(synth.polynomial(), "1 + x^2 + x^5");
    }
}
