use std::time::Instant;

use randcheck_tests::{BatchReport, TestParams, TestStatus};

use super::Source;

pub struct RunOptions<'a> {
    pub source: Source,
    pub tests: &'a str,
    pub parallel: bool,
    pub workers: Option<usize>,
    pub params: TestParams,
    pub json: Option<&'a str>,
    pub report: Option<&'a str>,
}

pub fn run(opts: RunOptions<'_>) {
    if let Err(e) = opts.params.policy() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let bits = match opts.source.load() {
        Ok(bits) => bits,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let names = super::parse_test_list(opts.tests);
    if names.is_empty() {
        eprintln!("No tests selected.");
        std::process::exit(1);
    }

    let label = opts.source.label();
    let json_to_stdout = opts.json == Some("-");
    if !json_to_stdout {
        println!(
            "Running {} test(s) on {} bits from {}{}...\n",
            names.len(),
            bits.len(),
            label,
            if opts.parallel { " (parallel)" } else { "" }
        );
    }

    let t0 = Instant::now();
    let mut batch = if opts.parallel {
        randcheck_tests::run_many_parallel(&names, &bits, &opts.params, opts.workers)
    } else {
        randcheck_tests::run_many(&names, &bits, &opts.params)
    };
    let elapsed = t0.elapsed().as_secs_f64();
    if opts.parallel {
        // Completion order is nondeterministic; present in request order.
        batch
            .results
            .sort_by_key(|r| names.iter().position(|n| *n == r.test_name));
    }

    if let Some(path) = opts.json {
        let json = match serde_json::to_string_pretty(&batch) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Failed to serialize results: {e}");
                std::process::exit(1);
            }
        };
        if json_to_stdout {
            println!("{json}");
        } else if let Err(e) = std::fs::write(path, json) {
            eprintln!("Failed to write JSON to {path}: {e}");
        } else {
            println!("JSON saved to: {path}");
        }
    }

    if let Some(path) = opts.report {
        let report = super::report::generate_report(&label, &batch, &opts.params, elapsed);
        if let Err(e) = std::fs::write(path, &report) {
            eprintln!("Failed to write report to {path}: {e}");
        } else if !json_to_stdout {
            println!("Report saved to: {path}");
        }
    }

    if !json_to_stdout {
        print_summary(&batch, elapsed);
    }
}

fn status_mark(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Success => "✓",
        TestStatus::Failed => "✗",
        TestStatus::Warning => "~",
        TestStatus::AttackSuccess => "⚔",
        TestStatus::Error => "!",
    }
}

fn print_summary(batch: &BatchReport, elapsed: f64) {
    println!("{}", "=".repeat(78));
    println!("  {:<36} {:<15} {:>22}", "Test", "Status", "p-value");
    println!("{}", "-".repeat(78));
    for record in &batch.results {
        println!(
            "{} {:<36} {:<15} {:>22}",
            status_mark(record.test_status),
            record.test_name,
            record.test_status.to_string(),
            super::format_p_value(record.p_value.as_ref())
        );
        if record.error {
            println!("    {}", record.message);
        }
    }
    println!("{}", "-".repeat(78));
    println!(
        "  {} passed, {} warning, {} failed, {} error [{:.2}s]",
        batch.count_status(TestStatus::Success),
        batch.count_status(TestStatus::Warning),
        batch.count_status(TestStatus::Failed),
        batch.count_status(TestStatus::Error),
        elapsed
    );
}
