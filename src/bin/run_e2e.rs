//! End-to-end launcher for a range-query program (compare / bench modes)
//!
//! Usage:
//!   run_e2e --mode compare ./build/rb_tree tests/e2e/001.in tests/e2e/001.out
//!   run_e2e --mode bench ./build/rb_tree tests/data/q1000.txt

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use range_probe::AppConfig;
use range_probe::core_types::{EXIT_FAILURE, ExitCode, VERSION};
use range_probe::harness::{self, HarnessMode, HarnessRequest, RunReport};

#[derive(Parser, Debug)]
#[command(name = "run_e2e", version = VERSION)]
#[command(about = "E2E launcher for a range-query program (compare / bench modes)")]
struct Args {
    /// compare: check output vs expected; bench: just run and measure time
    #[arg(long, value_enum)]
    mode: HarnessMode,

    /// Path to the subject program binary
    binary: PathBuf,

    /// Input file fed to the subject's stdin
    input: PathBuf,

    /// Expected-output file (only for --mode compare)
    expected: Option<PathBuf>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Configuration environment (reads config/<env>.yaml)
    #[arg(short, long, default_value = "dev")]
    env: String,
}

fn real_main(args: Args) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load(&args.env).context("Failed to load configuration")?;
    let _log_guard = range_probe::logging::init_logging(&config.logging)
        .context("Failed to initialize logging")?;

    let request = HarnessRequest {
        mode: args.mode,
        subject: args.binary,
        input: args.input,
        expected: args.expected,
    };

    let started_at = chrono::Utc::now();
    let report = match harness::run(&request, &config.harness) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return Ok(e.exit_code());
        }
    };

    report
        .write_to(&mut io::stdout().lock(), &mut io::stderr().lock())
        .context("Failed to print harness result")?;

    if let Some(path) = &args.report {
        RunReport::new(&request, &report, started_at)
            .write_json(path)
            .with_context(|| format!("Failed to write run report to {}", path.display()))?;
    }

    Ok(report.exit_code())
}

fn main() {
    let args = Args::parse();
    let code = match real_main(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
