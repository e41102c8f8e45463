//! Uniform result records returned by every test.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::policy::{PValue, TestStatus};

/// Diagnostic attributes attached to a successful evaluation.
pub type AdditionalInfo = Map<String, Value>;

/// Result of one test invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub test_name: String,
    pub error: bool,
    pub message: String,
    pub p_value: Option<PValue>,
    pub test_status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,
}

impl TestRecord {
    /// Record for an evaluated test. The message is derived from `test_status`.
    pub fn completed(
        test_name: &str,
        p_value: Option<PValue>,
        test_status: TestStatus,
        additional_info: Option<AdditionalInfo>,
    ) -> Self {
        Self {
            test_name: test_name.to_string(),
            error: false,
            message: test_status.message().to_string(),
            p_value,
            test_status,
            additional_info,
        }
    }

    /// Record for a test that could not be evaluated. Falls back to the
    /// generic error message when `message` is `None`.
    pub fn failure(test_name: &str, message: Option<&str>) -> Self {
        Self {
            test_name: test_name.to_string(),
            error: true,
            message: message
                .unwrap_or(TestStatus::Error.message())
                .to_string(),
            p_value: None,
            test_status: TestStatus::Error,
            additional_info: None,
        }
    }

    /// Single entry point mirroring the record contract: `error` wins over
    /// every other argument and drops `additional_info`.
    pub fn build(
        test_name: &str,
        p_value: Option<PValue>,
        test_status: Option<TestStatus>,
        error: bool,
        error_message: Option<&str>,
        additional_info: Option<AdditionalInfo>,
    ) -> Self {
        match test_status {
            Some(status) if !error && status != TestStatus::Error => {
                Self::completed(test_name, p_value, status, additional_info)
            }
            _ => Self::failure(test_name, error_message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completed_record_message() {
        let r = TestRecord::completed("runs", Some(PValue::Single(0.4)), TestStatus::Success, None);
        assert!(!r.error);
        assert_eq!(r.message, TestStatus::Success.message());
        assert_eq!(r.p_value, Some(PValue::Single(0.4)));
    }

    #[test]
    fn test_error_drops_additional_info() {
        let mut info = AdditionalInfo::new();
        info.insert("chi_square".into(), json!(1.5));
        let r = TestRecord::build(
            "serial",
            Some(PValue::Single(0.5)),
            Some(TestStatus::Success),
            true,
            Some("boom"),
            Some(info),
        );
        assert!(r.error);
        assert_eq!(r.message, "boom");
        assert_eq!(r.p_value, None);
        assert_eq!(r.test_status, TestStatus::Error);
        assert!(r.additional_info.is_none());
    }

    #[test]
    fn test_generic_error_message() {
        let r = TestRecord::failure("maurer", None);
        assert_eq!(r.message, TestStatus::Error.message());
    }

    #[test]
    fn test_serialized_shape() {
        let r = TestRecord::completed(
            "cusum",
            Some(PValue::Multiple(vec![0.5, 0.25])),
            TestStatus::Success,
            None,
        );
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["test_name"], "cusum");
        assert_eq!(v["error"], false);
        assert_eq!(v["test_status"], "success");
        assert_eq!(v["p_value"], json!([0.5, 0.25]));
        assert!(v.get("additional_info").is_none());

        let e = serde_json::to_value(TestRecord::failure("cusum", Some("bad"))).unwrap();
        assert_eq!(e["p_value"], Value::Null);
        assert_eq!(e["test_status"], "error");
    }
}
