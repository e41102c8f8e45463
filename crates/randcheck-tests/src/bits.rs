//! Bit sequence helpers shared by the tests.

use crate::error::TestError;

/// Unpack a byte slice into individual bits (MSB first per byte).
pub fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Reject values outside {0, 1}. Nothing is coerced.
pub fn ensure_binary(bits: &[u8]) -> Result<(), TestError> {
    match bits.iter().position(|&b| b > 1) {
        Some(index) => Err(TestError::NonBinary {
            index,
            value: bits[index],
        }),
        None => Ok(()),
    }
}

/// Length check followed by the domain check.
pub fn check_sequence(bits: &[u8], min_len: usize) -> Result<(), TestError> {
    if bits.len() < min_len {
        return Err(TestError::TooShort {
            needed: min_len,
            got: bits.len(),
        });
    }
    ensure_binary(bits)
}

/// Map a bit to the ±1 step of the random walk.
#[inline]
pub fn step(bit: u8) -> i64 {
    if bit == 1 { 1 } else { -1 }
}

/// Partial sums S_1..S_n of the ±1 walk.
pub fn partial_sums(bits: &[u8]) -> Vec<i64> {
    bits.iter()
        .scan(0i64, |s, &b| {
            *s += step(b);
            Some(*s)
        })
        .collect()
}

/// Count of every `len`-bit pattern over the sequence read cyclically
/// (the first `len - 1` bits are appended to the end). Index = pattern value,
/// first bit most significant. `len == 0` yields `[n]`.
pub fn cyclic_pattern_counts(bits: &[u8], len: usize) -> Vec<u64> {
    let n = bits.len();
    let mut counts = vec![0u64; 1usize << len];
    if n == 0 {
        return counts;
    }
    if len == 0 {
        counts[0] = n as u64;
        return counts;
    }
    let mask = (1usize << len) - 1;
    let mut value = 0usize;
    for j in 0..len - 1 {
        value = (value << 1) | bits[j % n] as usize;
    }
    for i in 0..n {
        value = ((value << 1) | bits[(i + len - 1) % n] as usize) & mask;
        counts[value] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bits() {
        let data = [0b10110001u8];
        assert_eq!(to_bits(&data), vec![1, 0, 1, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_ensure_binary_reports_position() {
        assert!(ensure_binary(&[0, 1, 1, 0]).is_ok());
        assert_eq!(
            ensure_binary(&[0, 1, 2, 0]),
            Err(TestError::NonBinary { index: 2, value: 2 })
        );
    }

    #[test]
    fn test_check_sequence_length_first() {
        assert_eq!(
            check_sequence(&[0, 7], 100),
            Err(TestError::TooShort { needed: 100, got: 2 })
        );
    }

    #[test]
    fn test_partial_sums() {
        assert_eq!(partial_sums(&[1, 1, 0, 1, 0, 0, 0]), vec![1, 2, 1, 2, 1, 0, -1]);
    }

    #[test]
    fn test_cyclic_pattern_counts() {
        // 0011 read cyclically: 00, 01, 11, 10
        assert_eq!(cyclic_pattern_counts(&[0, 0, 1, 1], 2), vec![1, 1, 1, 1]);
        // NIST SP 800-22 serial example, epsilon = 0011011101, m = 3
        let eps = [0, 0, 1, 1, 0, 1, 1, 1, 0, 1];
        assert_eq!(cyclic_pattern_counts(&eps, 3), vec![0, 1, 1, 2, 1, 2, 2, 1]);
        assert_eq!(cyclic_pattern_counts(&eps, 1), vec![4, 6]);
        assert_eq!(cyclic_pattern_counts(&eps, 0), vec![10]);
    }
}
