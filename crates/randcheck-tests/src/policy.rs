//! Decision policy: turns one or more p-values into a verdict.
//!
//! A single p-value is compared against a symmetric ambiguity band around the
//! decision rule:
//!
//! ```text
//!   failed  | warning |  success
//! ---------]---------[----------->  p
//!      rule - half  rule + half
//! ```
//!
//! Several p-values are classified one by one and combined: any `failed`
//! makes the whole result `failed`, all `success` makes it `success`, and
//! anything else is `warning`.

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Default significance level.
pub const DEFAULT_DECISION_RULE: f64 = 0.01;
/// Default half-width of the ambiguity band around the decision rule.
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.002;

/// Outcome of one test invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Consistent with randomness.
    Success,
    /// Inconsistent with randomness.
    Failed,
    /// Inside the ambiguity band.
    Warning,
    /// The test could not be evaluated.
    Error,
    /// Attack-style evaluation that reports a measurement rather than a verdict.
    AttackSuccess,
}

impl TestStatus {
    /// Fixed human-readable message for this status.
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "The sequence is random for this test",
            Self::Failed => "The sequence is not random for this test",
            Self::Warning => {
                "The sequence shows ambiguous results (close to the decision threshold)"
            }
            Self::AttackSuccess => "Linear complexity attack completed",
            Self::Error => "An error occurred while running the test",
        }
    }

    /// Ordering rank used for the monotonicity guarantee: failed < warning < success.
    /// `None` for statuses that are not verdicts.
    pub fn verdict_rank(self) -> Option<u8> {
        match self {
            Self::Failed => Some(0),
            Self::Warning => Some(1),
            Self::Success => Some(2),
            Self::Error | Self::AttackSuccess => None,
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::AttackSuccess => write!(f, "attack_success"),
        }
    }
}

/// One probability, or an ordered collection of them for tests with several
/// component statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PValue {
    Single(f64),
    Multiple(Vec<f64>),
}

impl PValue {
    /// All component probabilities, in order.
    pub fn values(&self) -> &[f64] {
        match self {
            Self::Single(p) => std::slice::from_ref(p),
            Self::Multiple(ps) => ps,
        }
    }

    /// Smallest component, or `None` for an empty collection.
    pub fn min(&self) -> Option<f64> {
        self.values().iter().copied().reduce(f64::min)
    }
}

impl From<f64> for PValue {
    fn from(p: f64) -> Self {
        Self::Single(p)
    }
}

impl From<Vec<f64>> for PValue {
    fn from(ps: Vec<f64>) -> Self {
        Self::Multiple(ps)
    }
}

/// Decision threshold plus ambiguity half-width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    pub decision_rule: f64,
    pub warning_threshold: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            decision_rule: DEFAULT_DECISION_RULE,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
        }
    }
}

impl DecisionPolicy {
    pub fn new(decision_rule: f64, warning_threshold: f64) -> Self {
        Self {
            decision_rule,
            warning_threshold,
        }
    }

    /// Classify a single probability.
    pub fn classify_one(&self, p: f64) -> Result<TestStatus, PolicyError> {
        if p.is_nan() {
            return Err(PolicyError::NotANumber);
        }
        let lower = self.decision_rule - self.warning_threshold;
        let upper = self.decision_rule + self.warning_threshold;
        Ok(if p >= upper {
            TestStatus::Success
        } else if p <= lower {
            TestStatus::Failed
        } else {
            TestStatus::Warning
        })
    }

    /// Classify one probability or a collection of them.
    pub fn classify(&self, p: &PValue) -> Result<TestStatus, PolicyError> {
        match p {
            PValue::Single(p) => self.classify_one(*p),
            PValue::Multiple(ps) => {
                if ps.is_empty() {
                    return Err(PolicyError::EmptyCollection);
                }
                let statuses = ps
                    .iter()
                    .map(|&p| self.classify_one(p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(if statuses.contains(&TestStatus::Failed) {
                    TestStatus::Failed
                } else if statuses.iter().all(|&s| s == TestStatus::Success) {
                    TestStatus::Success
                } else {
                    TestStatus::Warning
                })
            }
        }
    }
}

/// Classify `p` against `decision_rule` with ambiguity half-width `warning_threshold`.
pub fn classify(
    p: &PValue,
    decision_rule: f64,
    warning_threshold: f64,
) -> Result<TestStatus, PolicyError> {
    DecisionPolicy::new(decision_rule, warning_threshold).classify(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bands() {
        let policy = DecisionPolicy::default();
        assert_eq!(policy.classify_one(0.5).unwrap(), TestStatus::Success);
        assert_eq!(policy.classify_one(0.0121).unwrap(), TestStatus::Success);
        assert_eq!(policy.classify_one(0.0119).unwrap(), TestStatus::Warning);
        assert_eq!(policy.classify_one(0.01).unwrap(), TestStatus::Warning);
        assert_eq!(policy.classify_one(0.0081).unwrap(), TestStatus::Warning);
        assert_eq!(policy.classify_one(0.0079).unwrap(), TestStatus::Failed);
        assert_eq!(policy.classify_one(0.0).unwrap(), TestStatus::Failed);
    }

    #[test]
    fn test_zero_half_width() {
        let policy = DecisionPolicy::new(0.01, 0.0);
        assert_eq!(policy.classify_one(0.01).unwrap(), TestStatus::Success);
        assert_eq!(policy.classify_one(0.0099).unwrap(), TestStatus::Failed);
    }

    #[test]
    fn test_monotone_in_p() {
        let policy = DecisionPolicy::default();
        let mut last = 0u8;
        for i in 0..=2000 {
            let p = i as f64 / 2000.0 * 0.05;
            let rank = policy.classify_one(p).unwrap().verdict_rank().unwrap();
            assert!(rank >= last, "verdict went down at p={p}");
            last = rank;
        }
        assert_eq!(last, 2);
    }

    #[test]
    fn test_collection_failure_dominates() {
        let p = PValue::Multiple(vec![0.9, 0.5, 0.0001, 0.011]);
        assert_eq!(classify(&p, 0.01, 0.002).unwrap(), TestStatus::Failed);
    }

    #[test]
    fn test_collection_all_success() {
        let p = PValue::Multiple(vec![0.9, 0.5, 0.2]);
        assert_eq!(classify(&p, 0.01, 0.002).unwrap(), TestStatus::Success);
    }

    #[test]
    fn test_collection_mixed_is_warning() {
        let p = PValue::Multiple(vec![0.9, 0.0105]);
        assert_eq!(classify(&p, 0.01, 0.002).unwrap(), TestStatus::Warning);
    }

    #[test]
    fn test_empty_collection_rejected() {
        let p = PValue::Multiple(Vec::new());
        assert_eq!(
            classify(&p, 0.01, 0.002),
            Err(PolicyError::EmptyCollection)
        );
    }

    #[test]
    fn test_nan_rejected() {
        assert_eq!(
            classify(&PValue::Single(f64::NAN), 0.01, 0.002),
            Err(PolicyError::NotANumber)
        );
        assert_eq!(
            classify(&PValue::Multiple(vec![0.5, f64::NAN]), 0.01, 0.002),
            Err(PolicyError::NotANumber)
        );
    }

    #[test]
    fn test_pvalue_min() {
        assert_eq!(PValue::Single(0.3).min(), Some(0.3));
        assert_eq!(PValue::Multiple(vec![0.3, 0.1, 0.7]).min(), Some(0.1));
        assert_eq!(PValue::Multiple(Vec::new()).min(), None);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TestStatus::AttackSuccess).unwrap();
        assert_eq!(json, "\"attack_success\"");
        let json = serde_json::to_string(&PValue::Multiple(vec![0.5, 0.25])).unwrap();
        assert_eq!(json, "[0.5,0.25]");
    }
}
