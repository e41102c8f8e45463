//! Per-test parameter overrides.

use serde::{Deserialize, Serialize};

use crate::error::TestError;
use crate::policy::{DEFAULT_DECISION_RULE, DEFAULT_WARNING_THRESHOLD, DecisionPolicy};

/// Optional overrides shared by every test. Each test reads only the fields it
/// understands; absent fields fall back to that test's NIST default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestParams {
    /// Significance level (default 0.01).
    pub decision_rule: Option<f64>,
    /// Half-width of the ambiguity band (default 0.002).
    pub warning_threshold: Option<f64>,
    /// Block length M (linear complexity, block frequency).
    pub block_size: Option<usize>,
    /// Pattern length m (serial, approximate entropy).
    pub pattern_length: Option<usize>,
    /// Template as a string of '0' and '1' (template matching tests).
    pub template: Option<String>,
}

impl TestParams {
    /// Build the decision policy, rejecting thresholds outside their range.
    pub fn policy(&self) -> Result<DecisionPolicy, TestError> {
        let rule = self.decision_rule.unwrap_or(DEFAULT_DECISION_RULE);
        let half = self.warning_threshold.unwrap_or(DEFAULT_WARNING_THRESHOLD);
        if !(rule > 0.0 && rule < 1.0) {
            return Err(TestError::InvalidParameter(format!(
                "decision_rule={rule} must lie strictly between 0 and 1"
            )));
        }
        if !(half >= 0.0 && half < rule) {
            return Err(TestError::InvalidParameter(format!(
                "warning_threshold={half} must satisfy 0 <= threshold < decision_rule"
            )));
        }
        Ok(DecisionPolicy::new(rule, half))
    }

    /// Parse the template override, or return `default` when none is given.
    pub fn template_bits(&self, default: &str) -> Result<Vec<u8>, TestError> {
        parse_template(self.template.as_deref().unwrap_or(default))
    }
}

/// Parse a template such as `"000000001"` into bits.
pub fn parse_template(text: &str) -> Result<Vec<u8>, TestError> {
    if text.is_empty() {
        return Err(TestError::InvalidParameter(
            "template must not be empty".to_string(),
        ));
    }
    text.chars()
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(TestError::InvalidParameter(format!(
                "template may only contain '0' and '1', found {other:?}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = TestParams::default().policy().unwrap();
        assert_eq!(policy, DecisionPolicy::default());
    }

    #[test]
    fn test_policy_rejects_out_of_range() {
        let params = TestParams {
            decision_rule: Some(1.5),
            ..Default::default()
        };
        assert!(params.policy().is_err());

        let params = TestParams {
            decision_rule: Some(0.01),
            warning_threshold: Some(0.02),
            ..Default::default()
        };
        assert!(params.policy().is_err());
    }

    #[test]
    fn test_parse_template() {
        assert_eq!(parse_template("0011").unwrap(), vec![0, 0, 1, 1]);
        assert!(parse_template("").is_err());
        assert!(parse_template("01a").is_err());
    }

    #[test]
    fn test_params_deserialize_partial() {
        let params: TestParams = serde_json::from_str(r#"{"block_size": 1000}"#).unwrap();
        assert_eq!(params.block_size, Some(1000));
        assert_eq!(params.template, None);
    }
}
