use randcheck_tests::{BatchReport, TestParams, TestRecord, TestStatus, lookup};

/// Markdown report for one batch.
pub fn generate_report(
    label: &str,
    batch: &BatchReport,
    params: &TestParams,
    elapsed: f64,
) -> String {
    let policy = params.policy().unwrap_or_default();
    let mut report = String::new();
    report.push_str("# randcheck: NIST SP 800-22 Randomness Test Report\n\n");
    report.push_str(&format!("Generated: {}\n\n", timestamp()));

    report.push_str(&format!("## {label}\n\n"));
    report.push_str(&format!(
        "- Sequence length: {} bits\n- Tests: {}\n- Decision rule: {} (ambiguity band ±{})\n- Passed: {}/{}\n- Elapsed: {elapsed:.2}s\n\n",
        batch.sequence_length,
        batch.count,
        policy.decision_rule,
        policy.warning_threshold,
        batch.count_status(TestStatus::Success),
        batch.count,
    ));

    report.push_str("| Test | Status | p-value | Details |\n");
    report.push_str("|------|--------|---------|---------|\n");
    for record in &batch.results {
        report.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            display_name(&record.test_name),
            record.test_status,
            super::format_p_value(record.p_value.as_ref()),
            details(record)
        ));
    }
    report.push_str("\n---\n");
    report
}

fn display_name(id: &str) -> String {
    match lookup(id) {
        Some(entry) => format!("{} (`{id}`)", entry.name),
        None => format!("`{id}`"),
    }
}

/// Error message, or the scalar diagnostics of a completed test.
fn details(record: &TestRecord) -> String {
    if record.error {
        return record.message.replace('|', "\\|");
    }
    let Some(info) = &record.additional_info else {
        return String::new();
    };
    info.iter()
        .filter(|(_, v)| v.is_number() || v.is_string())
        .map(|(k, v)| match v.as_f64() {
            Some(f) if v.is_f64() => format!("{k}={f:.4}"),
            _ => format!("{k}={}", v.to_string().trim_matches('"')),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn timestamp() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", dur.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> BatchReport {
        let bits: Vec<u8> = (0..1000).map(|i| ((i * 37 + i / 7) % 2) as u8).collect();
        randcheck_tests::run_many(
            &["frequency_monobit", "bogus"],
            &bits,
            &TestParams::default(),
        )
    }

    #[test]
    fn test_report_has_row_per_record() {
        let report = generate_report("sample", &batch(), &TestParams::default(), 0.1);
        assert!(report.starts_with("# randcheck"));
        assert!(report.contains("## sample"));
        assert!(report.contains("- Sequence length: 1000 bits"));
        assert!(report.contains("Frequency (Monobit) (`frequency_monobit`)"));
        assert!(report.contains("| `bogus` | error |"));
        assert!(report.contains("Test 'bogus' is not recognized"));
    }

    #[test]
    fn test_details_lists_scalars() {
        let record = &batch().results[0];
        let details = details(record);
        assert!(details.contains("n=1000"), "{details}");
        assert!(details.contains("s_obs="), "{details}");
    }
}
