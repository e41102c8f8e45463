//! Attacks: measurements reported without a randomness verdict.

pub mod berlekamp_massey;
