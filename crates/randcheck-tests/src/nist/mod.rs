//! NIST SP 800-22 statistical tests.
//!
//! Every test is a pure function `fn(&[u8], &TestParams) -> TestRecord`.
//! The statistic itself lives in a private `evaluate` returning
//! `Result<Outcome, TestError>`; [`conclude`] turns that into a record,
//! applies the decision policy and catches panics at the test boundary.

pub mod approximate_entropy;
pub mod binary_matrix_rank;
pub mod cumulative_sums;
pub mod dft_spectral;
pub mod frequency_monobit;
pub mod frequency_within_block;
pub mod linear_complexity;
pub mod longest_run;
pub mod maurer_universal;
pub mod non_overlapping_template;
pub mod overlapping_template;
pub mod random_excursions;
pub mod random_excursions_variant;
pub mod runs;
pub mod serial;

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::TestError;
use crate::math::clamp_probability;
use crate::params::TestParams;
use crate::policy::{PValue, TestStatus};
use crate::record::{AdditionalInfo, TestRecord};

/// What a test computed before classification.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Hypothesis test: one or more p-values plus diagnostics.
    Statistic { p_value: PValue, info: AdditionalInfo },
    /// Measurement that is reported as is, without a verdict.
    Attack { info: AdditionalInfo },
}

impl Outcome {
    pub fn single(p: f64, info: AdditionalInfo) -> Self {
        Self::Statistic {
            p_value: PValue::Single(p),
            info,
        }
    }

    pub fn multiple(ps: Vec<f64>, info: AdditionalInfo) -> Self {
        Self::Statistic {
            p_value: PValue::Multiple(ps),
            info,
        }
    }
}

/// Build an [`AdditionalInfo`] map from `key => value` pairs.
#[macro_export]
#[doc(hidden)]
macro_rules! info_map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = $crate::record::AdditionalInfo::new();
        $( map.insert($key.to_string(), ::serde_json::json!($value)); )*
        map
    }};
}

/// Run `evaluate` and turn its outcome into a record.
pub(crate) fn conclude<F>(test_name: &str, params: &TestParams, evaluate: F) -> TestRecord
where
    F: FnOnce() -> Result<Outcome, TestError>,
{
    match catch_unwind(AssertUnwindSafe(|| finish(params, evaluate()))) {
        Ok(Ok((p_value, status, info))) => {
            TestRecord::completed(test_name, p_value, status, Some(info))
        }
        Ok(Err(err)) => {
            log::debug!("{test_name}: {err}");
            TestRecord::failure(test_name, Some(&err.to_string()))
        }
        Err(panic) => {
            let msg = panic_message(panic.as_ref());
            log::error!("{test_name} panicked: {msg}");
            let err = TestError::Computation(format!("computation fault: {msg}"));
            TestRecord::failure(test_name, Some(&err.to_string()))
        }
    }
}

fn finish(
    params: &TestParams,
    outcome: Result<Outcome, TestError>,
) -> Result<(Option<PValue>, TestStatus, AdditionalInfo), TestError> {
    match outcome? {
        Outcome::Statistic { p_value, info } => {
            let policy = params.policy()?;
            let p_value = match p_value {
                PValue::Single(p) => PValue::Single(clamp_probability(p)?),
                PValue::Multiple(ps) => PValue::Multiple(
                    ps.into_iter()
                        .map(clamp_probability)
                        .collect::<Result<_, _>>()?,
                ),
            };
            let status = policy.classify(&p_value)?;
            Ok((Some(p_value), status, info))
        }
        Outcome::Attack { info } => Ok((None, TestStatus::AttackSuccess, info)),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conclude_catches_panic() {
        let record = conclude("boom", &TestParams::default(), || {
            panic!("index out of range")
        });
        assert!(record.error);
        assert_eq!(record.test_status, TestStatus::Error);
        assert!(record.message.contains("index out of range"));
    }

    #[test]
    fn test_conclude_nan_is_error() {
        let record = conclude("nan", &TestParams::default(), || {
            Ok(Outcome::single(f64::NAN, AdditionalInfo::new()))
        });
        assert!(record.error);
    }

    #[test]
    fn test_conclude_clamps() {
        let record = conclude("clamp", &TestParams::default(), || {
            Ok(Outcome::multiple(vec![1.0 + 1e-12, 0.5], AdditionalInfo::new()))
        });
        assert_eq!(record.p_value, Some(PValue::Multiple(vec![1.0, 0.5])));
        assert_eq!(record.test_status, TestStatus::Success);
    }

    #[test]
    fn test_conclude_rejects_bad_policy() {
        let params = TestParams {
            decision_rule: Some(0.0),
            ..Default::default()
        };
        let record = conclude("policy", &params, || {
            Ok(Outcome::single(0.5, AdditionalInfo::new()))
        });
        assert!(record.error);
        assert!(record.message.contains("decision_rule"));
    }

    #[test]
    fn test_info_macro() {
        let info = info_map! { "a" => 1, "b" => vec![1, 2] };
        assert_eq!(info["a"], 1);
        assert_eq!(info["b"], serde_json::json!([1, 2]));
    }
}
