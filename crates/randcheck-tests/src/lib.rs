//! NIST SP 800-22 randomness test engine.
//!
//! Fifteen statistical tests plus a Berlekamp-Massey linear complexity
//! attack, each a pure function of a bit sequence (values 0/1) returning a
//! [`TestRecord`]. A shared [`DecisionPolicy`] maps p-values to a verdict
//! with an ambiguity band around the significance level. The [`registry`]
//! resolves identifiers and the [`dispatch`] module runs batches either
//! sequentially or on a bounded thread pool.
//!
//! ```no_run
//! use randcheck_tests::{TestParams, run_many_parallel, nist_tests};
//!
//! let bits: Vec<u8> = (0..10_000).map(|i| ((i * 7919) % 13 % 2) as u8).collect();
//! let report = run_many_parallel(&nist_tests(), &bits, &TestParams::default(), None);
//! for record in &report.results {
//!     println!("{:40} {}", record.test_name, record.test_status);
//! }
//! ```

pub mod attack;
pub mod bits;
pub mod dispatch;
pub mod error;
pub mod gf2;
pub mod math;
pub mod nist;
pub mod params;
pub mod policy;
pub mod record;
pub mod registry;

pub use bits::to_bits;
pub use dispatch::{BatchReport, run_many, run_many_parallel};
pub use error::{PolicyError, TestError};
pub use params::TestParams;
pub use policy::{DecisionPolicy, PValue, TestStatus, classify};
pub use record::{AdditionalInfo, TestRecord};
pub use registry::{REGISTRY, TestEntry, available_tests, lookup, nist_tests, run_test};
