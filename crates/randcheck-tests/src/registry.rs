//! Fixed identifier → algorithm table.

use std::time::Instant;

use crate::attack::berlekamp_massey;
use crate::nist::{
    approximate_entropy, binary_matrix_rank, cumulative_sums, dft_spectral, frequency_monobit,
    frequency_within_block, linear_complexity, longest_run, maurer_universal,
    non_overlapping_template, overlapping_template, random_excursions, random_excursions_variant,
    runs, serial,
};
use crate::params::TestParams;
use crate::record::TestRecord;

/// Signature shared by every registered algorithm.
pub type TestFn = fn(&[u8], &TestParams) -> TestRecord;

/// One registered algorithm.
#[derive(Debug, Clone, Copy)]
pub struct TestEntry {
    /// Identifier used by callers (`"frequency_monobit"`, ...).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Documented minimum sequence length with default parameters.
    pub min_bits: usize,
    pub run: TestFn,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

/// Every algorithm, in presentation order.
pub static REGISTRY: [TestEntry; 16] = [
    TestEntry {
        id: frequency_monobit::NAME,
        name: "Frequency (Monobit)",
        min_bits: frequency_monobit::MIN_BITS,
        run: frequency_monobit::frequency_monobit,
    },
    TestEntry {
        id: frequency_within_block::NAME,
        name: "Frequency within a Block",
        min_bits: frequency_within_block::MIN_BITS,
        run: frequency_within_block::block_frequency,
    },
    TestEntry {
        id: runs::NAME,
        name: "Runs",
        min_bits: runs::MIN_BITS,
        run: runs::runs,
    },
    TestEntry {
        id: longest_run::NAME,
        name: "Longest Run of Ones in a Block",
        min_bits: longest_run::MIN_BITS,
        run: longest_run::longest_runs,
    },
    TestEntry {
        id: non_overlapping_template::NAME,
        name: "Non-overlapping Template Matching",
        min_bits: non_overlapping_template::MIN_BITS,
        run: non_overlapping_template::non_overlapping_template_matching,
    },
    TestEntry {
        id: binary_matrix_rank::NAME,
        name: "Binary Matrix Rank",
        min_bits: binary_matrix_rank::MIN_BITS,
        run: binary_matrix_rank::binary_matrix_rank,
    },
    TestEntry {
        id: linear_complexity::NAME,
        name: "Linear Complexity",
        min_bits: linear_complexity::MIN_BITS,
        run: linear_complexity::linear_complexity,
    },
    TestEntry {
        id: serial::NAME,
        name: "Serial",
        min_bits: serial::MIN_BITS,
        run: serial::serial,
    },
    TestEntry {
        id: dft_spectral::NAME,
        name: "Discrete Fourier Transform (Spectral)",
        min_bits: dft_spectral::MIN_BITS,
        run: dft_spectral::dft_spectral,
    },
    TestEntry {
        id: overlapping_template::NAME,
        name: "Overlapping Template Matching",
        min_bits: overlapping_template::MIN_BITS,
        run: overlapping_template::overlapping_template_matching,
    },
    TestEntry {
        id: maurer_universal::NAME,
        name: "Maurer's Universal Statistical",
        min_bits: maurer_universal::MIN_BITS,
        run: maurer_universal::maurer,
    },
    TestEntry {
        id: approximate_entropy::NAME,
        name: "Approximate Entropy",
        min_bits: approximate_entropy::MIN_BITS,
        run: approximate_entropy::approximate_entropy,
    },
    TestEntry {
        id: cumulative_sums::NAME,
        name: "Cumulative Sums",
        min_bits: cumulative_sums::MIN_BITS,
        run: cumulative_sums::cumulative_sums,
    },
    TestEntry {
        id: random_excursions::NAME,
        name: "Random Excursions",
        min_bits: random_excursions::MIN_BITS,
        run: random_excursions::random_excursions,
    },
    TestEntry {
        id: random_excursions_variant::NAME,
        name: "Random Excursions Variant",
        min_bits: random_excursions_variant::MIN_BITS,
        run: random_excursions_variant::random_excursions_variant,
    },
    TestEntry {
        id: berlekamp_massey::NAME,
        name: "Berlekamp-Massey (Linear Complexity Attack)",
        min_bits: berlekamp_massey::MIN_BITS,
        run: berlekamp_massey::berlekamp_massey,
    },
];

/// Registry entry for `id`.
pub fn lookup(id: &str) -> Option<&'static TestEntry> {
    REGISTRY.iter().find(|entry| entry.id == id)
}

/// Every registered identifier, in registry order.
pub fn available_tests() -> Vec<&'static str> {
    REGISTRY.iter().map(|entry| entry.id).collect()
}

/// Identifiers of the fifteen NIST statistical tests (everything but attacks).
pub fn nist_tests() -> Vec<&'static str> {
    REGISTRY
        .iter()
        .map(|entry| entry.id)
        .filter(|&id| id != berlekamp_massey::NAME)
        .collect()
}

/// Run the test registered as `name`. Unknown identifiers yield an error
/// record naming them; this never panics.
pub fn run_test(name: &str, bits: &[u8], params: &TestParams) -> TestRecord {
    let Some(entry) = lookup(name) else {
        log::debug!("unknown test identifier {name:?}");
        return TestRecord::failure(name, Some(&format!("Test '{name}' is not recognized")));
    };
    let start = Instant::now();
    log::debug!("{}: start ({} bits)", entry.id, bits.len());
    let record = (entry.run)(bits, params);
    log::debug!(
        "{}: {} in {:.1} ms",
        entry.id,
        record.test_status,
        start.elapsed().as_secs_f64() * 1000.0
    );
    record
}
