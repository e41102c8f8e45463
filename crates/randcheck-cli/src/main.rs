//! CLI for randcheck: NIST SP 800-22 randomness tests from the command line.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "randcheck")]
#[command(about = "randcheck: NIST SP 800-22 randomness tests with tri-state verdicts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered test with its minimum sequence length
    List,

    /// Run a batch of tests against one bit sequence.
    /// Reads INPUT, or draws fresh bits from the OS CSPRNG with --generate.
    Run {
        /// Input file (use "-" for stdin)
        #[arg(conflicts_with = "generate")]
        input: Option<String>,

        /// Input format: text ('0'/'1' characters, whitespace ignored) or bytes (unpacked MSB-first)
        #[arg(long, default_value = "text", value_parser = ["text", "bytes"])]
        format: String,

        /// Test a fresh sequence of N bits from the OS CSPRNG instead of reading a file
        #[arg(long, value_name = "N")]
        generate: Option<usize>,

        /// Comma-separated test identifiers, "nist" for the fifteen NIST tests, or "all"
        #[arg(long, default_value = "nist")]
        tests: String,

        /// Run tests on a worker pool instead of one after another
        #[arg(long)]
        parallel: bool,

        /// Worker pool size (implies --parallel)
        #[arg(long)]
        workers: Option<usize>,

        /// Significance level
        #[arg(long)]
        decision_rule: Option<f64>,

        /// Half-width of the ambiguity band around the significance level
        #[arg(long)]
        warning_threshold: Option<f64>,

        /// Block length M (block frequency, linear complexity)
        #[arg(long)]
        block_size: Option<usize>,

        /// Pattern length m (serial, approximate entropy)
        #[arg(long)]
        pattern_length: Option<usize>,

        /// Template for the template matching tests, e.g. 000000001
        #[arg(long)]
        template: Option<String>,

        /// Write the batch report as JSON to PATH ("-" for stdout)
        #[arg(long, value_name = "PATH")]
        json: Option<String>,

        /// Write a Markdown report to PATH
        #[arg(long, value_name = "PATH")]
        report: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => commands::list::run(),
        Commands::Run {
            input,
            format,
            generate,
            tests,
            parallel,
            workers,
            decision_rule,
            warning_threshold,
            block_size,
            pattern_length,
            template,
            json,
            report,
        } => {
            let source = match (input, generate) {
                (_, Some(n)) => commands::Source::Generate(n),
                (Some(path), None) => commands::Source::File {
                    path,
                    bytes: format == "bytes",
                },
                (None, None) => {
                    eprintln!("Nothing to test: pass an input file or --generate N.");
                    std::process::exit(1);
                }
            };
            let params = randcheck_tests::TestParams {
                decision_rule,
                warning_threshold,
                block_size,
                pattern_length,
                template,
            };
            commands::run::run(commands::run::RunOptions {
                source,
                tests: &tests,
                parallel: parallel || workers.is_some(),
                workers,
                params,
                json: json.as_deref(),
                report: report.as_deref(),
            })
        }
    }
}
